//! Attribute reconciliation policies.
//!
//! Each policy reads one attribute from both elements and writes the
//! reconciled value back onto the destination. Numeric and override policies
//! fail when a value is absent (numeric ones also when it is not a number);
//! the lexicographic ones never fail.

use tmerge_doc::Element;

use crate::error::{MergeError, MergeResult};
use crate::rules::{Step, TagRule};

/// Run every step of `rule` against the pair.
pub fn apply(rule: &TagRule, destination: &mut Element, source: &Element) -> MergeResult<()> {
    for step in rule.steps {
        match *step {
            Step::SumInt(attribute) => sum_int(destination, source, attribute)?,
            Step::SumFloat(attribute) => sum_float(destination, source, attribute)?,
            Step::Min(attribute) => min_lexicographic(destination, source, attribute),
            Step::Max(attribute) => max_lexicographic(destination, source, attribute),
            Step::OverrideIfDefault {
                attribute,
                recessive,
            } => override_if_default(destination, source, attribute, recessive)?,
        }
    }
    Ok(())
}

/// Replace the destination value with the integer sum of both values.
pub fn sum_int(destination: &mut Element, source: &Element, attribute: &str) -> MergeResult<()> {
    let lhs: i64 = parse_number(destination, attribute)?;
    let rhs: i64 = parse_number(source, attribute)?;
    let sum = lhs
        .checked_add(rhs)
        .ok_or_else(|| MergeError::Overflow {
            element: destination.name.clone(),
            attribute: attribute.to_string(),
        })?;
    destination.set_attr(attribute, sum.to_string());
    Ok(())
}

/// Replace the destination value with the floating-point sum of both values.
///
/// The sum is written with the shortest representation that parses back to
/// the same `f64`, so textual round-trips of the inputs are not guaranteed.
pub fn sum_float(destination: &mut Element, source: &Element, attribute: &str) -> MergeResult<()> {
    let lhs: f64 = parse_number(destination, attribute)?;
    let rhs: f64 = parse_number(source, attribute)?;
    destination.set_attr(attribute, (lhs + rhs).to_string());
    Ok(())
}

/// Keep the ordinal minimum of both values.
///
/// Timestamps in both formats sort lexicographically, so no date parsing
/// happens here. A value present on one side only wins.
pub fn min_lexicographic(destination: &mut Element, source: &Element, attribute: &str) {
    pick(destination, source, attribute, |dst, src| src < dst);
}

/// Keep the ordinal maximum of both values.
pub fn max_lexicographic(destination: &mut Element, source: &Element, attribute: &str) {
    pick(destination, source, attribute, |dst, src| src > dst);
}

/// Copy the source value while the destination still holds `recessive`.
///
/// Both sides must carry the attribute.
pub fn override_if_default(
    destination: &mut Element,
    source: &Element,
    attribute: &str,
    recessive: &str,
) -> MergeResult<()> {
    let current = required(destination, attribute)?;
    let incoming = required(source, attribute)?;
    if current == recessive {
        let value = incoming.to_string();
        destination.set_attr(attribute, value);
    }
    Ok(())
}

fn pick<F>(destination: &mut Element, source: &Element, attribute: &str, source_wins: F)
where
    F: Fn(&str, &str) -> bool,
{
    let Some(src) = source.attr(attribute) else {
        return;
    };
    let replace = match destination.attr(attribute) {
        Some(dst) => source_wins(dst, src),
        None => true,
    };
    if replace {
        let value = src.to_string();
        destination.set_attr(attribute, value);
    }
}

fn required<'a>(element: &'a Element, attribute: &str) -> MergeResult<&'a str> {
    element
        .attr(attribute)
        .ok_or_else(|| MergeError::MissingAttribute {
            element: element.name.clone(),
            attribute: attribute.to_string(),
        })
}

fn parse_number<T: std::str::FromStr>(element: &Element, attribute: &str) -> MergeResult<T> {
    let raw = required(element, attribute)?;
    raw.trim().parse().map_err(|_| MergeError::NotNumeric {
        element: element.name.clone(),
        attribute: attribute.to_string(),
        value: raw.to_string(),
    })
}
