//! Identity matching: do two elements denote the same logical entity?

use tmerge_doc::Element;

use crate::rules::{rule_for, Dialect, Identity, TagRule};

/// Whether `source` should be merged into `destination` under `rule`.
///
/// Elements with different tag names never match, whatever the rule says.
/// An attribute absent on both sides counts as equal.
pub fn identical(rule: &TagRule, destination: &Element, source: &Element) -> bool {
    if destination.name != source.name {
        return false;
    }
    match rule.identity {
        Identity::Always => true,
        Identity::Attributes(keys) => keys
            .iter()
            .all(|key| destination.attr(key) == source.attr(key)),
    }
}

/// [`identical`] with the rule looked up from the destination's tag.
pub fn identical_in(dialect: Dialect, destination: &Element, source: &Element) -> bool {
    identical(rule_for(dialect, &destination.name), destination, source)
}
