//! Counters describing what a merge did.

use std::ops::AddAssign;

/// Outcome counters for one or more merge steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Incoming documents folded into the master (the master itself excluded).
    pub documents: usize,
    /// Incoming elements merged into an identical master element.
    pub merged: usize,
    /// Incoming subtrees adopted as new children of the master.
    pub adopted: usize,
}

impl AddAssign for MergeStats {
    fn add_assign(&mut self, other: Self) {
        self.documents += other.documents;
        self.merged += other.merged;
        self.adopted += other.adopted;
    }
}
