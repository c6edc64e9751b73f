//! Error types for ews-bridge
//!
//! Translation failures fall into a small set of kinds: schema violations
//! (the message does not match the registry), value conversions (a scalar
//! cannot be represented on the other side), structural mismatches (array
//! where an object was expected and the like), I/O and codec failures, and
//! internal invariant breaches that indicate a bug in the registry or hooks.

use thiserror::Error;

/// Result type alias using the bridge [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for translation operations
#[derive(Error, Debug)]
pub enum Error {
    /// XML element/attribute not declared on the parent type, undeclared
    /// JSON key, or a missing/unresolvable `__type` discriminator
    #[error("schema violation: {0}")]
    Schema(String),

    /// A scalar value that cannot be converted (bad number literal, enum
    /// index out of range, unparsable bitfield integer)
    #[error("value conversion: {0}")]
    Value(String),

    /// Array where an object was expected or vice versa, a list value
    /// lacking its declared wrapper key, and similar shape mismatches
    #[error("structural mismatch: {0}")]
    Structure(String),

    /// Underlying reader/writer failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parse or emission error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// JSON parse or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invariant breach indicating a bug in the registry or hook tables
    #[error("internal error: {0}")]
    Internal(String),

    /// An error wrapped with the element path where it occurred
    #[error("{path} > {source}")]
    At {
        /// Element name (JSON key or XML tag) on the path to the failure
        path: String,
        /// The underlying error
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with one more element of path breadcrumb.
    ///
    /// Applied at each recursion level, the resulting display reads
    /// "outer > inner > leaf: reason".
    pub fn at(self, path: impl Into<String>) -> Self {
        Error::At {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait attaching path breadcrumbs to results
pub(crate) trait Breadcrumb<T> {
    /// Wrap the error, if any, with the given path element
    fn at(self, path: impl Into<String>) -> Result<T>;
}

impl<T> Breadcrumb<T> for Result<T> {
    fn at(self, path: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.at(path))
    }
}
