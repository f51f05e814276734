use serde::{Deserialize, Serialize};
use std::fmt;

/// Source position attached to every token and expression.
///
/// Rows and columns are 1-based for human-readable diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub row: u32,
    pub col: u32,
}

impl Location {
    /// Create a new location.
    pub fn new(file: impl Into<String>, row: u32, col: u32) -> Self {
        Self {
            file: file.into(),
            row,
            col,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.row, self.col)
    }
}

/// A named `.sat` script. The runner keeps it around so errors can quote
/// the row they point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Text of `row` (1-based, same numbering as [`Location::row`]) without
    /// its line terminator.
    pub fn line(&self, row: u32) -> Option<&str> {
        let index = usize::try_from(row.checked_sub(1)?).ok()?;
        self.source
            .split('\n')
            .nth(index)
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
    }
}
