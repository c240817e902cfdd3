//! Error types for chapter document operations

use std::fmt;

/// Errors surfaced by the document core.
///
/// Only fatal conditions live here. Recoverable ones (unreadable source,
/// unwritable destination, update lookup misses, validation findings) are
/// logged and reported through boolean returns instead, so batch drivers can
/// keep going file by file.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// Source bytes were not valid UTF-8
    Encoding(String),
    /// The source violates the chapter structure contract (e.g. a second H1)
    Structure {
        file: String,
        line: usize,
        message: String,
    },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Encoding(msg) => write!(f, "Encoding error: {msg}"),
            DocumentError::Structure {
                file,
                line,
                message,
            } => {
                write!(f, "Structural error in '{file}' at line {line}: {message}")
            }
        }
    }
}

impl std::error::Error for DocumentError {}
