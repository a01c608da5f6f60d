//! Error types for the merge crate.

/// Errors that can occur while merging report trees.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// A reconciled attribute is absent on one of the two elements.
    #[error("<{element}> is missing attribute `{attribute}`")]
    MissingAttribute { element: String, attribute: String },

    /// A summed attribute does not hold a number.
    #[error("<{element}> attribute `{attribute}` is not numeric: {value:?}")]
    NotNumeric {
        element: String,
        attribute: String,
        value: String,
    },

    /// An integer sum does not fit in 64 bits.
    #[error("<{element}> attribute `{attribute}` overflows when summed")]
    Overflow { element: String, attribute: String },

    /// The document root is not the element this dialect merges.
    #[error("unexpected root element: expected <{expected}>, got <{actual}>")]
    UnexpectedRoot { expected: String, actual: String },

    /// The run-level element is absent from a document.
    #[error("run element <{0}> not found")]
    MissingRunElement(String),

    /// A fold was requested over an empty list.
    #[error("no documents to merge")]
    NoDocuments,

    /// A location recorded during the merge no longer resolves.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
