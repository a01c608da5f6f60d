//! Per-format mergers.
//!
//! A merger collects the input files it understands and, on [`merge`],
//! writes one output file per non-empty bucket. Buckets never share state:
//! each returns its own [`BucketOutcome`] and a failure in one does not stop
//! the next.
//!
//! [`merge`]: ResultsMerger::merge

use std::fs;
use std::path::{Path, PathBuf};

use tmerge_doc::Document;
use tmerge_merge::{Dialect, TreeMerger};
use tracing::debug;

use crate::config::MergeConfig;
use crate::error::{DriverError, DriverResult};
use crate::format::Format;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Result of merging one bucket.
#[derive(Debug)]
pub struct BucketOutcome {
    pub format: Format,
    pub inputs: Vec<PathBuf>,
    /// Path of the written file.
    pub result: DriverResult<PathBuf>,
}

/// A merger for one family of report formats.
pub trait ResultsMerger {
    /// Queue every file whose format this merger handles; others are ignored.
    fn add_to_merge(&mut self, files: &[PathBuf]);

    /// Merge each non-empty bucket into `output_dir`.
    fn merge(&self, output_dir: &Path) -> Vec<BucketOutcome>;
}

/// NUnit XML reports plus their console text.
#[derive(Debug)]
pub struct NUnitMerger {
    config: MergeConfig,
    text: Vec<PathBuf>,
    xml: Vec<PathBuf>,
}

impl NUnitMerger {
    pub fn new(config: MergeConfig) -> Self {
        Self {
            config,
            text: Vec::new(),
            xml: Vec::new(),
        }
    }

    pub fn queued(&self, format: Format) -> &[PathBuf] {
        match format {
            Format::NUnitText => &self.text,
            Format::NUnitXml => &self.xml,
            Format::Trx => &[],
        }
    }
}

impl ResultsMerger for NUnitMerger {
    fn add_to_merge(&mut self, files: &[PathBuf]) {
        for file in files {
            match Format::from_path(file) {
                Some(Format::NUnitText) => self.text.push(file.clone()),
                Some(Format::NUnitXml) => self.xml.push(file.clone()),
                _ => {}
            }
        }
    }

    fn merge(&self, output_dir: &Path) -> Vec<BucketOutcome> {
        [(Format::NUnitText, &self.text), (Format::NUnitXml, &self.xml)]
            .into_iter()
            .filter(|(_, files)| !files.is_empty())
            .map(|(format, files)| merge_bucket(&self.config, output_dir, format, files))
            .collect()
    }
}

/// TRX execution logs.
#[derive(Debug)]
pub struct TrxMerger {
    config: MergeConfig,
    files: Vec<PathBuf>,
}

impl TrxMerger {
    pub fn new(config: MergeConfig) -> Self {
        Self {
            config,
            files: Vec::new(),
        }
    }

    pub fn queued(&self) -> &[PathBuf] {
        &self.files
    }
}

impl ResultsMerger for TrxMerger {
    fn add_to_merge(&mut self, files: &[PathBuf]) {
        self.files.extend(
            files
                .iter()
                .filter(|file| Format::from_path(file) == Some(Format::Trx))
                .cloned(),
        );
    }

    fn merge(&self, output_dir: &Path) -> Vec<BucketOutcome> {
        if self.files.is_empty() {
            return Vec::new();
        }
        vec![merge_bucket(&self.config, output_dir, Format::Trx, &self.files)]
    }
}

fn merge_bucket(
    config: &MergeConfig,
    output_dir: &Path,
    format: Format,
    files: &[PathBuf],
) -> BucketOutcome {
    let output = output_dir.join(config.outputs.for_format(format));
    let result = match format.dialect() {
        Some(dialect) => merge_documents(config, dialect, files)
            .and_then(|doc| {
                doc.save(&output, &config.writer.write_options())
                    .map_err(DriverError::from)
            })
            .map(|()| output),
        None => concatenate(files, &output).map(|()| output),
    };
    BucketOutcome {
        format,
        inputs: files.to_vec(),
        result,
    }
}

/// Load and fold `files` in order; the first file is the master.
pub fn merge_documents(
    config: &MergeConfig,
    dialect: Dialect,
    files: &[PathBuf],
) -> DriverResult<Document> {
    let mut merger = TreeMerger::new(dialect).with_run_element(config.trx.run_element.clone());
    for path in files {
        let doc = Document::load(path).map_err(|source| DriverError::Parse {
            path: path.clone(),
            source,
        })?;
        merger.push(doc).map_err(|source| DriverError::MergeInto {
            path: path.clone(),
            source,
        })?;
    }
    let stats = merger.stats();
    debug!(
        dialect = %dialect,
        documents = stats.documents + 1,
        merged = stats.merged,
        adopted = stats.adopted,
        "bucket folded"
    );
    merger.finish().ok_or(DriverError::Merge(tmerge_merge::MergeError::NoDocuments))
}

/// Concatenate `files` byte for byte into `output`, dropping a leading
/// UTF-8 byte order mark from each part.
pub fn concatenate(files: &[PathBuf], output: &Path) -> DriverResult<()> {
    let mut contents = Vec::new();
    for path in files {
        let bytes = fs::read(path).map_err(|e| DriverError::io(path, e))?;
        contents.extend_from_slice(bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes));
    }
    fs::write(output, contents).map_err(|e| DriverError::io(output, e))
}
