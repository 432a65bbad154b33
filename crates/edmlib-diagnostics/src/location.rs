//! Locations attached to model errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an error was detected
///
/// Errors reported by a schema loader point into the source document; errors
/// produced while building a model in code point at the element by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// A position in a schema document
    Source(SourceLocation),
    /// A model element addressed by its qualified path (e.g. `NS.Customer/Orders`)
    Object(String),
}

impl Location {
    /// Create a source location
    pub const fn source(line: usize, column: usize) -> Self {
        Self::Source(SourceLocation::new(line, column, 0, 0))
    }

    /// Create an object location
    pub fn object(path: impl Into<String>) -> Self {
        Self::Object(path.into())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(loc) => write!(f, "{loc}"),
            Self::Object(path) => write!(f, "{path}"),
        }
    }
}

/// Source location with line and column information
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Byte offset from start (0-based)
    pub offset: usize,
    /// Length in bytes
    pub length: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub const fn new(line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            line,
            column,
            offset,
            length,
        }
    }

    /// Create from a byte offset into the source document
    pub fn from_offset(source: &str, offset: usize, length: usize) -> Self {
        let (line, column) = offset_to_line_col(source, offset);
        Self {
            line,
            column,
            offset,
            length,
        }
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::new(1, 1, 0, 0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Convert a byte offset to line and column numbers
pub fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;

    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}
