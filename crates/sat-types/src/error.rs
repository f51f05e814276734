use crate::{Location, SourceFile};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Pipeline stage an error originates from, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Lex,
    Parse,
    Runtime,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex => write!(f, "lex"),
            Self::Parse => write!(f, "parse"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

/// Numeric error code (E100–E399).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Lex errors (E100–E199) ──
    pub const UNTERMINATED_STRING: Self = Self(100);
    pub const UNTERMINATED_OBJECT: Self = Self(101);
    pub const UNTERMINATED_ARRAY: Self = Self(102);
    pub const UNTERMINATED_BLOCK: Self = Self(103);

    // ── Parse errors (E200–E299) ──
    pub const UNEXPECTED_TOKEN: Self = Self(200);
    pub const EXPECTED_PIPE: Self = Self(201);
    pub const EXPECTED_BLOCK: Self = Self(202);
    pub const EXPECTED_TEST_NAME: Self = Self(203);
    pub const INVALID_NUMBER: Self = Self(204);
    pub const EXPECTED_EXPRESSION: Self = Self(205);

    // ── Runtime errors (E300–E399) ──
    pub const TYPE_MISMATCH: Self = Self(300);
    pub const UNDEFINED_VARIABLE: Self = Self(301);
    pub const INDEX_OUT_OF_RANGE: Self = Self(302);
    pub const MISSING_FIELD: Self = Self(303);
    pub const INVALID_ASSIGNMENT: Self = Self(304);
    pub const TOO_FEW_VALUES: Self = Self(305);
    pub const COMMAND_FAILED: Self = Self(306);
    pub const PROCESS_ERROR: Self = Self(307);
    pub const HTTP_ERROR: Self = Self(308);
    pub const HEALTHCHECK_TIMEOUT: Self = Self(309);
    pub const INVALID_EXPRESSION: Self = Self(310);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Lex,
            200..=299 => ErrorCategory::Parse,
            _ => ErrorCategory::Runtime,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured SAT error.
///
/// Every lex, parse and runtime failure aborts the run and surfaces as one of
/// these. Failed assertions are not errors; they are reported through the
/// test feedback instead.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{location}: {code} [{category}] {message}")]
pub struct SatError {
    /// Error code (e.g., E301).
    pub code: ErrorCode,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Source location.
    pub location: Location,
    /// The exact source line for context, filled in by the pipeline runner.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_line: String,
    /// Exit code of a failed `run:` command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl SatError {
    /// Create a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>, location: Location) -> Self {
        Self {
            code,
            category: code.category(),
            message: message.into(),
            location,
            source_line: String::new(),
            exit_code: None,
        }
    }

    /// Attach the exit code of the command that caused this error.
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = Some(exit_code);
        self
    }

    /// Fill in the source line this error points at.
    pub fn with_source(mut self, source: &SourceFile) -> Self {
        if let Some(line) = source.line(self.location.row) {
            self.source_line = line.to_string();
        }
        self
    }
}
