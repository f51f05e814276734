//! SAT tree-walking evaluator.
//!
//! Executes a parsed [`Program`](sat_types::ast::Program) statement by
//! statement: binds variables, records assertion outcomes, runs shell
//! commands, manages spawned processes and performs HTTP requests. Test
//! outcomes are collected into a [`Feedback`] report.

mod equality;
pub mod evaluator;
pub mod feedback;
pub mod http;
pub mod json;
pub mod process;

pub use evaluator::{run, Evaluator};
pub use feedback::{Feedback, TestOutcome};
pub use http::{HttpClient, HttpError, HttpResponse, UreqClient};
