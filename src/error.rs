//! Error types for query decoding, validation and compilation.

use thiserror::Error;

/// Errors produced while decoding, validating or compiling a query tree.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The query document is structurally malformed.
    #[error("malformed query at {path}: {message}")]
    Decode { path: String, message: String },

    /// The document is an object, but its shape matches no known query kind.
    #[error("unknown query kind at {path} (keys: {keys:?})")]
    UnknownQueryKind { path: String, keys: Vec<String> },

    /// A wildcard pattern did not translate into a valid automaton.
    #[error("wildcard pattern {pattern:?} does not compile: {source}")]
    PatternCompile {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A conjunct failed to compile. Searchers already built for earlier
    /// conjuncts have been released; `cleanup_failures` counts the ones
    /// whose release itself failed.
    #[error("conjunct {index} failed to compile: {source}")]
    ChildCompile {
        index: usize,
        cleanup_failures: usize,
        #[source]
        source: Box<QueryError>,
    },

    /// A query tree could not be encoded, e.g. because of a non-finite boost.
    #[error("cannot encode query: {0}")]
    Encode(#[from] serde_json::Error),

    /// Structural self-check failure.
    #[error("invalid query: {0}")]
    Validation(String),

    /// Failure reported by the index or searcher factory.
    #[error("searcher error: {0}")]
    Searcher(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, QueryError>;

impl QueryError {
    pub(crate) fn decode(path: &str, message: impl Into<String>) -> Self {
        QueryError::Decode {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Conjunct indices leading from the outermost conjunction down to the
    /// node that actually failed. Empty when the error is not a child failure.
    pub fn failing_path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        let mut err = self;
        while let QueryError::ChildCompile { index, source, .. } = err {
            path.push(*index);
            err = source.as_ref();
        }
        path
    }

    /// The innermost error beneath any `ChildCompile` wrappers.
    pub fn root_cause(&self) -> &QueryError {
        let mut err = self;
        while let QueryError::ChildCompile { source, .. } = err {
            err = source.as_ref();
        }
        err
    }
}
