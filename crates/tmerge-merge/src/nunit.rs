//! Merge engine for tree-structured NUnit `test-results` documents.
//!
//! The incoming tree is walked top-down while the master element matching
//! each incoming parent is carried along. Children are only ever compared
//! with the children of that master element, so two suites that share a short
//! name (`Tests` under different namespaces) stay apart. A named element
//! matches by the identity rule of its tag and is merged in place (children
//! first, then its own attributes); anything else is adopted as a new child.
//! Elements without a `name` attribute (`results`, `environment`,
//! `categories`, ...) are containers: they resolve to the same-tag child and
//! the walk continues below them.
//!
//! The two roots are always merged, whatever their names.

use tmerge_doc::{Document, Element, Location, Node};
use tracing::debug;

use crate::error::{MergeError, MergeResult};
use crate::identity::identical;
use crate::reconcile;
use crate::rules::{rule_for, Dialect};
use crate::stats::MergeStats;

/// Tag of the root element of an NUnit report.
pub const ROOT_TAG: &str = "test-results";

/// Where the walk currently is, relative to both trees.
#[derive(Clone, Debug)]
struct Scope {
    /// `name` attribute of the incoming parent (empty for containers).
    parent_name: String,
    /// Master element corresponding to the incoming parent.
    parent: Location,
}

impl Scope {
    fn root(root: &Element) -> Self {
        Self::descend(root, Location::root())
    }

    fn descend(element: &Element, at: Location) -> Self {
        Self {
            parent_name: element.attr("name").unwrap_or_default().to_string(),
            parent: at,
        }
    }
}

/// Fold `incoming` into `master`.
pub fn merge(master: &mut Document, incoming: Document) -> MergeResult<MergeStats> {
    check_root(&master.root)?;
    check_root(&incoming.root)?;

    let mut source = incoming.root;
    let mut stats = MergeStats {
        documents: 1,
        ..MergeStats::default()
    };

    let scope = Scope::root(&source);
    for child in std::mem::take(&mut source.children) {
        merge_node(&mut master.root, child, &scope, &mut stats)?;
    }

    let rule = rule_for(Dialect::NUnit, &master.root.name);
    reconcile::apply(rule, &mut master.root, &source)?;
    stats.merged += 1;

    debug!(
        merged = stats.merged,
        adopted = stats.adopted,
        "nunit document folded"
    );
    Ok(stats)
}

fn check_root(root: &Element) -> MergeResult<()> {
    if root.name != ROOT_TAG {
        return Err(MergeError::UnexpectedRoot {
            expected: ROOT_TAG.to_string(),
            actual: root.name.clone(),
        });
    }
    Ok(())
}

fn merge_node(
    master: &mut Element,
    node: Node,
    scope: &Scope,
    stats: &mut MergeStats,
) -> MergeResult<()> {
    // Only elements take part; text under a matched element stays as the
    // master has it.
    let Node::Element(mut element) = node else {
        return Ok(());
    };

    let rule = rule_for(Dialect::NUnit, &element.name);
    let parent = resolve(master, &scope.parent)?;
    let index = if element.has_attr("name") {
        parent.position_child(|candidate| identical(rule, candidate, &element))
    } else {
        parent.position_child(|candidate| candidate.name == element.name)
    };

    match index.map(|i| scope.parent.child(i)) {
        Some(at) => {
            let inner = Scope::descend(&element, at.clone());
            for child in std::mem::take(&mut element.children) {
                merge_node(master, child, &inner, stats)?;
            }
            let destination = resolve_mut(master, &at)?;
            reconcile::apply(rule, destination, &element)?;
            stats.merged += 1;
        }
        None => {
            debug!(
                tag = %element.name,
                name = element.attr("name").unwrap_or_default(),
                parent = %scope.parent_name,
                "adopting unmatched subtree"
            );
            resolve_mut(master, &scope.parent)?.push_child(element);
            stats.adopted += 1;
        }
    }
    Ok(())
}

fn resolve<'a>(master: &'a Element, at: &Location) -> MergeResult<&'a Element> {
    master
        .get(at)
        .ok_or_else(|| MergeError::Internal(format!("master location {at} does not resolve")))
}

fn resolve_mut<'a>(master: &'a mut Element, at: &Location) -> MergeResult<&'a mut Element> {
    master
        .get_mut(at)
        .ok_or_else(|| MergeError::Internal(format!("master location {at} does not resolve")))
}
