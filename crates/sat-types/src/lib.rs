//! Shared types for the SAT interpreter.
//!
//! This crate defines source locations, the error type, interpreter
//! configuration, the expression tree, runtime primitives and the scope
//! arena used across all pipeline stages.

mod config;
mod error;
mod location;
pub mod ast;
pub mod scope;

pub use config::{Config, HealthcheckConfig};
pub use error::{ErrorCategory, ErrorCode, SatError};
pub use location::{Location, SourceFile};

/// Result type used throughout the SAT pipeline.
pub type Result<T> = std::result::Result<T, SatError>;
