//! Left-to-right folding of same-format documents.
//!
//! The first document pushed becomes the master; every later one is merged
//! into it in arrival order. Order matters: it decides which document's
//! shape hosts unmatched subtrees and which values survive override steps.

use tmerge_doc::Document;
use tracing::debug;

use crate::error::{MergeError, MergeResult};
use crate::rules::Dialect;
use crate::stats::MergeStats;
use crate::{nunit, trx};

/// Accumulates documents of one dialect into a single master.
#[derive(Debug)]
pub struct TreeMerger {
    dialect: Dialect,
    run_element: String,
    master: Option<Document>,
    stats: MergeStats,
}

impl TreeMerger {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            run_element: trx::DEFAULT_RUN_ELEMENT.to_string(),
            master: None,
            stats: MergeStats::default(),
        }
    }

    /// Override the TRX run element tag.
    pub fn with_run_element(mut self, run_element: impl Into<String>) -> Self {
        self.run_element = run_element.into();
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Add the next document of the fold.
    ///
    /// The pair is merged into a working copy of the master, so a failed
    /// push leaves the master exactly as it was before the call.
    pub fn push(&mut self, document: Document) -> MergeResult<()> {
        let Some(master) = self.master.as_ref() else {
            debug!(dialect = %self.dialect, "master document set");
            self.master = Some(document);
            return Ok(());
        };
        let mut working = master.clone();
        let stats = match self.dialect {
            Dialect::NUnit => nunit::merge(&mut working, document)?,
            Dialect::Trx => trx::merge(&mut working, document, &self.run_element)?,
        };
        self.master = Some(working);
        self.stats += stats;
        Ok(())
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> MergeStats {
        self.stats
    }

    /// The merged document, or `None` if nothing was pushed.
    pub fn finish(self) -> Option<Document> {
        self.master
    }
}

/// Fold `documents` in order with the first as master.
pub fn fold<I>(dialect: Dialect, documents: I) -> MergeResult<Document>
where
    I: IntoIterator<Item = Document>,
{
    let mut merger = TreeMerger::new(dialect);
    for document in documents {
        merger.push(document)?;
    }
    merger.finish().ok_or(MergeError::NoDocuments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tmerge_doc::Element;

    fn nunit_report(index: usize, total: u32) -> Document {
        Document::new(
            Element::new("test-results")
                .with_attr("name", format!("shard{index}.dll"))
                .with_attr("total", total.to_string())
                .with_attr("errors", "0")
                .with_attr("failures", "0")
                .with_attr("not-run", "0")
                .with_attr("inconclusive", "0")
                .with_attr("ignored", "0")
                .with_attr("skipped", "0")
                .with_attr("invalid", "0")
                .with_attr("date", format!("2024-01-{:02}", 10 + index))
                .with_attr("time", "12:00:00")
                .with_child(
                    Element::new("test-suite")
                        .with_attr("type", "Assembly")
                        .with_attr("name", "Tests.dll")
                        .with_attr("executed", "True")
                        .with_attr("result", "Success")
                        .with_attr("success", "True")
                        .with_attr("time", "1")
                        .with_attr("asserts", "0")
                        .with_child(
                            Element::new("results").with_child(
                                Element::new("test-case")
                                    .with_attr("name", format!("Tests.Case{index}"))
                                    .with_attr("executed", "True")
                                    .with_attr("result", "Success")
                                    .with_attr("success", "True")
                                    .with_attr("time", "1")
                                    .with_attr("asserts", "1"),
                            ),
                        ),
                ),
        )
    }

    fn case_names(doc: &Document) -> Vec<String> {
        doc.root
            .descendants()
            .into_iter()
            .filter(|e| e.name == "test-case")
            .filter_map(|e| e.attr("name").map(str::to_string))
            .collect()
    }

    #[test]
    fn empty_fold_is_an_error() {
        let err = fold(Dialect::Trx, Vec::new()).unwrap_err();
        assert!(matches!(err, MergeError::NoDocuments));
    }

    #[test]
    fn single_document_is_returned_unchanged() {
        let doc = nunit_report(0, 5);
        let merged = fold(Dialect::NUnit, vec![doc.clone()]).unwrap();
        assert_eq!(merged, doc);
    }

    #[test]
    fn merger_tracks_stats() {
        let mut merger = TreeMerger::new(Dialect::NUnit);
        assert_eq!(merger.dialect(), Dialect::NUnit);
        for i in 0..3 {
            merger.push(nunit_report(i, 1)).unwrap();
        }
        let stats = merger.stats();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.adopted, 2);
        assert!(merger.finish().is_some());
    }

    #[test]
    fn failed_push_leaves_master_untouched() {
        let mut merger = TreeMerger::new(Dialect::NUnit);
        merger.push(nunit_report(0, 1)).unwrap();
        merger.push(nunit_report(1, 1)).unwrap();
        let before_stats = merger.stats();

        let mut broken = nunit_report(2, 1);
        broken.root.attributes.retain(|a| a.name != "skipped");
        let err = merger.push(broken).unwrap_err();
        assert!(matches!(err, MergeError::MissingAttribute { ref attribute, .. } if attribute == "skipped"));
        assert_eq!(merger.stats(), before_stats);

        let master = merger.finish().unwrap();
        assert_eq!(master.root.attr("total"), Some("2"));
        assert_eq!(case_names(&master), vec!["Tests.Case0", "Tests.Case1"]);
    }

    #[test]
    fn swapped_order_keeps_sums_and_bounds() {
        let ab = fold(Dialect::NUnit, vec![nunit_report(1, 3), nunit_report(2, 4)]).unwrap();
        let ba = fold(Dialect::NUnit, vec![nunit_report(2, 4), nunit_report(1, 3)]).unwrap();
        for attr in ["total", "date", "time"] {
            assert_eq!(ab.root.attr(attr), ba.root.attr(attr), "{attr}");
        }
        // Structure follows the master.
        assert_eq!(case_names(&ab), vec!["Tests.Case1", "Tests.Case2"]);
        assert_eq!(case_names(&ba), vec!["Tests.Case2", "Tests.Case1"]);
    }

    proptest! {
        #[test]
        fn root_total_is_the_sum_of_inputs(totals in prop::collection::vec(0u32..10_000, 1..8)) {
            let docs: Vec<Document> = totals
                .iter()
                .enumerate()
                .map(|(i, t)| nunit_report(i, *t))
                .collect();
            let merged = fold(Dialect::NUnit, docs).unwrap();
            let expected = totals.iter().map(|t| u64::from(*t)).sum::<u64>().to_string();
            prop_assert_eq!(merged.root.attr("total"), Some(expected.as_str()));

            // Every case appears exactly once.
            let mut names = case_names(&merged);
            prop_assert_eq!(names.len(), totals.len());
            names.sort();
            names.dedup();
            prop_assert_eq!(names.len(), totals.len());
        }
    }
}
