//! A merge session: discover inputs, bucket them, write merged reports.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::MergeConfig;
use crate::error::{DriverError, DriverResult};
use crate::format::Format;
use crate::merger::{BucketOutcome, NUnitMerger, ResultsMerger, TrxMerger};

/// How one input path was classified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub path: PathBuf,
    /// `None` when the file is ignored.
    pub format: Option<Format>,
}

/// Summary of one bucket in a [`MergeReport`].
#[derive(Clone, Debug, Serialize)]
pub struct BucketReport {
    pub format: Format,
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub error: Option<String>,
}

impl BucketReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

impl From<BucketOutcome> for BucketReport {
    fn from(outcome: BucketOutcome) -> Self {
        let (output, error) = match outcome.result {
            Ok(path) => (Some(path), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            format: outcome.format,
            inputs: outcome.inputs,
            output,
            error,
        }
    }
}

/// Result of [`MergeSession::run`].
#[derive(Clone, Debug, Serialize)]
pub struct MergeReport {
    pub output_dir: PathBuf,
    pub buckets: Vec<BucketReport>,
    /// Inputs whose extension matched no format.
    pub skipped: Vec<PathBuf>,
}

impl MergeReport {
    pub fn is_success(&self) -> bool {
        self.buckets.iter().all(BucketReport::succeeded)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.buckets.iter().filter_map(|b| b.output.as_deref())
    }

    pub fn failures(&self) -> impl Iterator<Item = &BucketReport> {
        self.buckets.iter().filter(|b| !b.succeeded())
    }
}

/// Owns one merger per report family and routes inputs to them.
#[derive(Debug)]
pub struct MergeSession {
    nunit: NUnitMerger,
    trx: TrxMerger,
    skipped: Vec<PathBuf>,
}

impl MergeSession {
    pub fn new(config: MergeConfig) -> Self {
        Self {
            nunit: NUnitMerger::new(config.clone()),
            trx: TrxMerger::new(config),
            skipped: Vec::new(),
        }
    }

    /// Queue files and directories. Directories are walked recursively.
    pub fn add_inputs(&mut self, inputs: &[PathBuf]) -> DriverResult<()> {
        let files = discover(inputs)?;
        for file in &files {
            if Format::from_path(file).is_none() {
                debug!(path = %file.display(), "skipping file with unrecognised extension");
                self.skipped.push(file.clone());
            }
        }
        self.nunit.add_to_merge(&files);
        self.trx.add_to_merge(&files);
        Ok(())
    }

    /// Merge every queued bucket into `output_dir`, creating it if needed.
    ///
    /// Only a failure to create the directory is returned as an error; bucket
    /// failures are recorded in the report.
    pub fn run(&self, output_dir: &Path) -> DriverResult<MergeReport> {
        std::fs::create_dir_all(output_dir).map_err(|e| DriverError::io(output_dir, e))?;

        let mut outcomes = self.nunit.merge(output_dir);
        outcomes.extend(self.trx.merge(output_dir));

        let buckets = outcomes
            .into_iter()
            .map(|outcome| {
                match &outcome.result {
                    Ok(path) => info!(
                        format = %outcome.format,
                        inputs = outcome.inputs.len(),
                        output = %path.display(),
                        "bucket merged"
                    ),
                    Err(e) => warn!(
                        format = %outcome.format,
                        inputs = outcome.inputs.len(),
                        error = %e,
                        "bucket failed"
                    ),
                }
                BucketReport::from(outcome)
            })
            .collect();

        Ok(MergeReport {
            output_dir: output_dir.to_path_buf(),
            buckets,
            skipped: self.skipped.clone(),
        })
    }
}

/// Expand `inputs` into files. Directory contents are sorted by file name.
pub fn discover(inputs: &[PathBuf]) -> DriverResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

/// Classify every input without merging anything.
pub fn detect(inputs: &[PathBuf]) -> DriverResult<Vec<Detection>> {
    Ok(discover(inputs)?
        .into_iter()
        .map(|path| Detection {
            format: Format::from_path(&path),
            path,
        })
        .collect())
}
