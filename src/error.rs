//! Error types
//!
//! One error kind covers the two failures this crate can report: a document
//! that does not load, and a path expression that does not parse. Absent data
//! (missing attribute, missing child, no matches) is never an error.

use thiserror::Error;

/// Error raised by document loading or path parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlError {
    /// The XML text is not well-formed
    #[error("malformed XML at byte {offset}: {message}")]
    Document { message: String, offset: usize },

    /// The path expression is not valid selector syntax
    #[error("malformed path {path:?}: {reason}")]
    MalformedPath { path: String, reason: String },
}

impl XmlError {
    pub(crate) fn document(message: impl Into<String>, offset: usize) -> Self {
        XmlError::Document {
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn malformed_path(path: &str, reason: impl Into<String>) -> Self {
        XmlError::MalformedPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// True for path syntax errors
    pub fn is_malformed_path(&self) -> bool {
        matches!(self, XmlError::MalformedPath { .. })
    }
}

pub type Result<T> = std::result::Result<T, XmlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_document() {
        let err = XmlError::document("Unclosed tag: <a>", 12);
        assert_eq!(err.to_string(), "malformed XML at byte 12: Unclosed tag: <a>");
        assert!(!err.is_malformed_path());
    }

    #[test]
    fn test_display_path() {
        let err = XmlError::malformed_path("A[@id", "unterminated predicate");
        assert_eq!(err.to_string(), "malformed path \"A[@id\": unterminated predicate");
        assert!(err.is_malformed_path());
    }
}
