//! Merge engines for sharded test reports.
//!
//! Two dialects share one reconciliation vocabulary: each tag maps to a
//! [`TagRule`] naming how two elements are recognised as the same entity
//! and which attribute steps run once they are merged. [`fold`] combines any
//! number of same-dialect documents left to right, with the first as master.
//!
//! # Key Types
//!
//! - [`Dialect`] -- NUnit 2.x trees or TRX execution logs
//! - [`TagRule`] / [`Step`] -- identity and reconciliation per tag
//! - [`TreeMerger`] -- incremental fold over documents
//! - [`MergeStats`] -- what a merge matched and adopted

pub mod error;
pub mod fold;
pub mod identity;
pub mod nunit;
pub mod reconcile;
pub mod rules;
pub mod stats;
pub mod trx;

pub use error::{MergeError, MergeResult};
pub use fold::{fold, TreeMerger};
pub use identity::{identical, identical_in};
pub use rules::{rule_for, Dialect, Identity, Step, TagKind, TagRule};
pub use stats::MergeStats;
