use std::path::PathBuf;
use thiserror::Error;

/// Errors are local to one query or one document: a failed query leaves the
/// loaded index untouched, and a malformed document is skipped without
/// aborting the build.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed query grammar: wrong token arity for the declared type,
    /// unknown type marker, or a proximity marker that is not `/N`.
    #[error("malformed query: {reason}")]
    QuerySyntax { reason: String },

    /// A query keyword does not occur anywhere in the indexed corpus.
    /// Callers typically render this as an empty result set.
    #[error("term not in dictionary: {term}")]
    UnknownTerm { term: String },

    /// Persisted index tables missing or unreadable at load time.
    #[error("index unavailable at {path}: {reason}")]
    IndexUnavailable { path: PathBuf, reason: String },

    /// A corpus document block could not be parsed into text. Recoverable:
    /// the block is skipped with a warning.
    #[error("malformed document: {reason}")]
    MalformedDocument { reason: String },

    /// Evaluation was cancelled via the caller-supplied flag.
    #[error("query evaluation cancelled")]
    Cancelled,
}

impl Error {
    pub(crate) fn syntax(reason: impl Into<String>) -> Self {
        Error::QuerySyntax { reason: reason.into() }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedDocument { reason: reason.into() }
    }
}
