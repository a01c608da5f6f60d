//! Error types for the document crate.

use std::path::PathBuf;

/// Errors that can occur while reading or writing a document.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// Reading or writing the file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The XML tokenizer rejected the input.
    #[error("XML error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// The input is not valid UTF-8.
    #[error("invalid encoding: {0}")]
    Encoding(String),

    /// The input is well-tokenized but does not form a single rooted tree.
    #[error("malformed document: {0}")]
    Malformed(String),
}

impl DocError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for document results.
pub type DocResult<T> = Result<T, DocError>;
