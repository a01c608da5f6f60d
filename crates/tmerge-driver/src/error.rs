use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to read {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: tmerge_doc::DocError,
    },

    #[error("failed to merge {}: {source}", path.display())]
    MergeInto {
        path: PathBuf,
        #[source]
        source: tmerge_merge::MergeError,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document error: {0}")]
    Doc(#[from] tmerge_doc::DocError),

    #[error("merge error: {0}")]
    Merge(#[from] tmerge_merge::MergeError),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl DriverError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type DriverResult<T> = Result<T, DriverError>;
