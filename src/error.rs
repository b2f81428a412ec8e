use thiserror::Error;

use crate::DocumentId;

/// Errors reported by the index. All are synchronous and detected at the
/// call that raised them; nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The document id is negative or already present in the index.
    #[error("invalid document id {0}")]
    InvalidDocument(DocumentId),

    /// A word in document text or the stop-word set contains a control
    /// character.
    #[error("word {0:?} contains a control character")]
    InvalidToken(String),

    /// A query token is malformed: empty after stripping the minus prefix,
    /// a bare or doubled `-`, or a control character.
    #[error("query word {0:?} is invalid")]
    InvalidQuery(String),

    /// The operation addressed a document id that is not in the index and
    /// absence is not a valid no-op for it.
    #[error("document {0} is not in the index")]
    DocumentNotFound(DocumentId),
}
