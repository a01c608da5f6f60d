//! Merge driver for tmerge.
//!
//! Routes input files to a bucket per report format, folds each bucket with
//! the matching engine and writes one merged file per bucket into an output
//! directory. Buckets succeed or fail independently.
//!
//! # Key Types
//!
//! - [`MergeSession`] -- input discovery and bucket orchestration
//! - [`ResultsMerger`] -- per-family merger ([`NUnitMerger`], [`TrxMerger`])
//! - [`MergeConfig`] -- output names, TRX run element, writer layout
//! - [`MergeReport`] -- what was written and what failed

pub mod config;
pub mod error;
pub mod format;
pub mod merger;
pub mod session;

pub use config::{MergeConfig, OutputNames, TrxConfig, WriterConfig};
pub use error::{DriverError, DriverResult};
pub use format::Format;
pub use merger::{BucketOutcome, NUnitMerger, ResultsMerger, TrxMerger};
pub use session::{detect, discover, BucketReport, Detection, MergeReport, MergeSession};
