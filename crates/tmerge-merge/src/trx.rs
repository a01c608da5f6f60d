//! Merge engine for TRX execution logs.
//!
//! Only the run element (`TestRun` by default) takes part; the wrapper
//! around it and the run element's own attributes stay as the master has
//! them. Children are matched against the master's direct children of the
//! same tag, merged recursively on a match and adopted whole otherwise.

use tmerge_doc::{Document, Element, Node};
use tracing::debug;

use crate::error::{MergeError, MergeResult};
use crate::identity::identical;
use crate::reconcile;
use crate::rules::{rule_for, Dialect};
use crate::stats::MergeStats;

/// Default tag of the run-level element.
pub const DEFAULT_RUN_ELEMENT: &str = "TestRun";

/// Fold `incoming` into `master`, merging below their `run_element`s.
pub fn merge(
    master: &mut Document,
    incoming: Document,
    run_element: &str,
) -> MergeResult<MergeStats> {
    let mut source = take_first(incoming.root, run_element)
        .ok_or_else(|| MergeError::MissingRunElement(run_element.to_string()))?;
    let target = master
        .find_first_mut(run_element)
        .ok_or_else(|| MergeError::MissingRunElement(run_element.to_string()))?;

    let mut stats = MergeStats {
        documents: 1,
        ..MergeStats::default()
    };
    merge_children(target, &mut source, &mut stats)?;

    debug!(
        merged = stats.merged,
        adopted = stats.adopted,
        "trx document folded"
    );
    Ok(stats)
}

/// Detach the first element named `name`, in document order.
fn take_first(element: Element, name: &str) -> Option<Element> {
    if element.name == name {
        return Some(element);
    }
    element
        .children
        .into_iter()
        .filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
        .find_map(|child| take_first(child, name))
}

fn merge_children(
    master: &mut Element,
    incoming: &mut Element,
    stats: &mut MergeStats,
) -> MergeResult<()> {
    for node in std::mem::take(&mut incoming.children) {
        // Text, CDATA and comments of the incoming side are never merged.
        let Node::Element(mut child) = node else {
            continue;
        };
        let rule = rule_for(Dialect::Trx, &child.name);
        match master.position_child(|candidate| identical(rule, candidate, &child)) {
            Some(index) => {
                let destination = master.children[index]
                    .as_element_mut()
                    .ok_or_else(|| MergeError::Internal(format!("child {index} is not an element")))?;
                merge_children(destination, &mut child, stats)?;
                reconcile::apply(rule, destination, &child)?;
                stats.merged += 1;
            }
            None => {
                debug!(tag = %child.name, parent = %master.name, "adopting unmatched subtree");
                master.push_child(child);
                stats.adopted += 1;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fold::fold;
    use proptest::prelude::*;

    fn counters(total: u32, passed: u32, failed: u32) -> Element {
        let mut e = Element::new("Counters");
        for name in crate::rules::TRX_COUNTERS {
            let value = match name {
                "total" | "executed" | "completed" => total,
                "passed" => passed,
                "failed" => failed,
                _ => 0,
            };
            e.set_attr(name, value.to_string());
        }
        e
    }

    fn run(test_id: &str, exec_id: &str, start: &str, finish: &str, outcome: &str) -> Document {
        let passed = u32::from(outcome == "Passed");
        let failed = 1 - passed;
        Document::new(
            Element::new("TestRun")
                .with_attr("id", format!("run-{test_id}"))
                .with_attr("name", "shard")
                .with_child(
                    Element::new("Times")
                        .with_attr("creation", start)
                        .with_attr("queuing", start)
                        .with_attr("start", start)
                        .with_attr("finish", finish),
                )
                .with_child(
                    Element::new("Results").with_child(
                        Element::new("UnitTestResult")
                            .with_attr("executionId", exec_id)
                            .with_attr("testId", test_id)
                            .with_attr("testName", format!("Test_{test_id}"))
                            .with_attr("outcome", outcome)
                            .with_child(Node::Text("\n".into()))
                            .with_child(Element::new("Output")),
                    ),
                )
                .with_child(
                    Element::new("TestDefinitions").with_child(
                        Element::new("UnitTest")
                            .with_attr("id", test_id)
                            .with_attr("name", format!("Test_{test_id}"))
                            .with_child(Element::new("Execution").with_attr("id", exec_id))
                            .with_child(
                                Element::new("TestMethod")
                                    .with_attr("codeBase", "Tests.dll")
                                    .with_attr("className", "Tests.Calc")
                                    .with_attr("name", format!("Test_{test_id}")),
                            ),
                    ),
                )
                .with_child(
                    Element::new("TestEntries").with_child(
                        Element::new("TestEntry")
                            .with_attr("testId", test_id)
                            .with_attr("executionId", exec_id)
                            .with_attr("testListId", "list-all"),
                    ),
                )
                .with_child(
                    Element::new("TestLists")
                        .with_child(Element::new("TestList").with_attr("id", "list-all")),
                )
                .with_child(
                    Element::new("ResultSummary")
                        .with_attr("outcome", outcome)
                        .with_child(counters(1, passed, failed)),
                ),
        )
    }

    fn section<'a>(doc: &'a Document, tag: &str) -> &'a Element {
        doc.find_first(tag).unwrap()
    }

    #[test]
    fn disjoint_runs_append_results_and_sum_counters() {
        let mut master = run("t1", "e1", "2024-01-01T10:00:00", "2024-01-01T10:05:00", "Passed");
        let other = run("t2", "e2", "2024-01-01T09:59:00", "2024-01-01T10:06:00", "Passed");
        let stats = merge(&mut master, other, DEFAULT_RUN_ELEMENT).unwrap();

        assert_eq!(section(&master, "Results").child_elements().count(), 2);
        assert_eq!(section(&master, "TestDefinitions").child_elements().count(), 2);
        assert_eq!(section(&master, "TestEntries").child_elements().count(), 2);
        assert_eq!(section(&master, "TestLists").child_elements().count(), 1);

        let counters = section(&master, "Counters");
        assert_eq!(counters.attr("total"), Some("2"));
        assert_eq!(counters.attr("passed"), Some("2"));
        assert_eq!(counters.attr("failed"), Some("0"));
        assert_eq!(stats.adopted, 3);
    }

    #[test]
    fn times_take_earliest_start_and_latest_finish() {
        let mut master = run("t1", "e1", "2024-01-01T10:00:00", "2024-01-01T10:05:00", "Passed");
        let other = run("t2", "e2", "2024-01-01T09:59:00", "2024-01-01T10:06:00", "Passed");
        merge(&mut master, other, DEFAULT_RUN_ELEMENT).unwrap();
        let times = section(&master, "Times");
        assert_eq!(times.attr("creation"), Some("2024-01-01T09:59:00"));
        assert_eq!(times.attr("start"), Some("2024-01-01T09:59:00"));
        assert_eq!(times.attr("finish"), Some("2024-01-01T10:06:00"));
    }

    #[test]
    fn times_span_every_run_of_a_fold() {
        // Earliest start in the middle, latest finish last, neither in the master.
        let runs = vec![
            run("t1", "e1", "2024-01-01T10:00:00", "2024-01-01T10:05:00", "Passed"),
            run("t2", "e2", "2024-01-01T09:58:00", "2024-01-01T10:01:00", "Passed"),
            run("t3", "e3", "2024-01-01T10:02:00", "2024-01-01T10:03:00", "Failed"),
            run("t4", "e4", "2024-01-01T10:01:00", "2024-01-01T10:09:00", "Passed"),
        ];
        let merged = fold(Dialect::Trx, runs).unwrap();
        let times = section(&merged, "Times");
        assert_eq!(times.attr("creation"), Some("2024-01-01T09:58:00"));
        assert_eq!(times.attr("queuing"), Some("2024-01-01T09:58:00"));
        assert_eq!(times.attr("start"), Some("2024-01-01T09:58:00"));
        assert_eq!(times.attr("finish"), Some("2024-01-01T10:09:00"));

        let counters = section(&merged, "Counters");
        assert_eq!(counters.attr("total"), Some("4"));
        assert_eq!(counters.attr("passed"), Some("3"));
        assert_eq!(counters.attr("failed"), Some("1"));
        assert_eq!(section(&merged, "Results").child_elements().count(), 4);
    }

    #[test]
    fn run_attributes_are_not_reconciled() {
        let mut master = run("t1", "e1", "a", "b", "Passed");
        merge(&mut master, run("t2", "e2", "a", "b", "Failed"), DEFAULT_RUN_ELEMENT).unwrap();
        assert_eq!(master.root.attr("id"), Some("run-t1"));
        // Unlisted kinds keep the master's attributes.
        assert_eq!(section(&master, "ResultSummary").attr("outcome"), Some("Passed"));
        assert_eq!(section(&master, "Counters").attr("failed"), Some("1"));
    }

    #[test]
    fn same_result_record_is_merged() {
        let mut master = run("t1", "e1", "a", "b", "Passed");
        merge(&mut master, run("t1", "e1", "a", "b", "Passed"), DEFAULT_RUN_ELEMENT).unwrap();
        assert_eq!(section(&master, "Results").child_elements().count(), 1);
        assert_eq!(section(&master, "TestDefinitions").child_elements().count(), 1);
        assert_eq!(section(&master, "Counters").attr("total"), Some("2"));
    }

    #[test]
    fn incoming_text_nodes_are_skipped() {
        let mut master = run("t1", "e1", "a", "b", "Passed");
        merge(&mut master, run("t1", "e1", "a", "b", "Passed"), DEFAULT_RUN_ELEMENT).unwrap();
        let result = section(&master, "UnitTestResult");
        assert_eq!(result.children.len(), 2);
        assert_eq!(result.child_elements().count(), 1);
    }

    #[test]
    fn run_element_may_be_nested() {
        let wrap = |doc: Document| Document::new(Element::new("Envelope").with_child(doc.root));
        let mut master = wrap(run("t1", "e1", "a", "b", "Passed"));
        merge(&mut master, wrap(run("t2", "e2", "a", "b", "Passed")), DEFAULT_RUN_ELEMENT).unwrap();
        assert_eq!(section(&master, "Results").child_elements().count(), 2);
    }

    #[test]
    fn missing_run_element_fails() {
        let mut master = run("t1", "e1", "a", "b", "Passed");
        let err = merge(&mut master, Document::new(Element::new("Other")), DEFAULT_RUN_ELEMENT)
            .unwrap_err();
        assert!(matches!(err, MergeError::MissingRunElement(ref tag) if tag == "TestRun"));
    }

    #[test]
    fn custom_run_element() {
        let mut master = Document::new(
            Element::new("Run").with_child(Element::new("Counters").with_attr("total", "1")),
        );
        let mut counters = Element::new("Counters");
        for name in crate::rules::TRX_COUNTERS {
            counters.set_attr(name, "1");
        }
        master.root.children[0] = Node::Element(counters.clone());
        let incoming = Document::new(Element::new("Run").with_child(counters));
        merge(&mut master, incoming, "Run").unwrap();
        assert_eq!(section(&master, "Counters").attr("pending"), Some("2"));
    }

    proptest! {
        #[test]
        fn fold_times_are_bounds_over_all_runs(
            spans in prop::collection::vec(("[0-9]{2}:[0-9]{2}", "[0-9]{2}:[0-9]{2}"), 1..6)
        ) {
            let runs: Vec<Document> = spans
                .iter()
                .enumerate()
                .map(|(i, (start, finish))| {
                    run(&format!("t{i}"), &format!("e{i}"), start, finish, "Passed")
                })
                .collect();
            let merged = fold(Dialect::Trx, runs).unwrap();
            let times = section(&merged, "Times");

            let earliest = spans.iter().map(|(s, _)| s.as_str()).min();
            let latest = spans.iter().map(|(_, f)| f.as_str()).max();
            prop_assert_eq!(times.attr("creation"), earliest);
            prop_assert_eq!(times.attr("queuing"), earliest);
            prop_assert_eq!(times.attr("start"), earliest);
            prop_assert_eq!(times.attr("finish"), latest);
        }
    }
}
