//! SAT runner: orchestrates the full pipeline.
//!
//! ```text
//! SAT Source → Lexer → Parser → Evaluator → Feedback
//! ```
//!
//! Every stage shares one [`Config`]. Errors returned from here carry the
//! offending source line.

use sat_eval::Evaluator;
use sat_lexer::{Lexer, TokenStream};
use sat_types::ast::Program;
use sat_types::{Config, Result, SourceFile};

pub use sat_eval::{Feedback, HttpClient, HttpError, HttpResponse, TestOutcome, UreqClient};
pub use sat_types::{ErrorCategory, ErrorCode, HealthcheckConfig, Location, SatError};

/// Split a source file into statements.
pub fn lex_source(source: &SourceFile, config: &Config) -> Result<Vec<TokenStream>> {
    Lexer::new(&source.name, &source.source, config)
        .lex()
        .map_err(|e| e.with_source(source))
}

/// Lex and parse a source file.
pub fn parse_source(source: &SourceFile, config: &Config) -> Result<Program> {
    let statements = lex_source(source, config)?;
    sat_parser::parse(statements, config).map_err(|e| e.with_source(source))
}

/// Lex, parse and run a source file with real HTTP access.
pub fn run_source(source: &SourceFile, config: &Config) -> Result<Feedback> {
    execute(source, config, Evaluator::new(config))
}

/// [`run_source`] with a custom HTTP client.
pub fn run_source_with_client(
    source: &SourceFile,
    config: &Config,
    client: impl HttpClient + 'static,
) -> Result<Feedback> {
    execute(source, config, Evaluator::new(config).with_http_client(client))
}

/// Run source text held in memory. `name` is used in locations.
pub fn run_str(name: &str, contents: &str, config: &Config) -> Result<Feedback> {
    run_source(&SourceFile::new(name, contents), config)
}

fn execute(source: &SourceFile, config: &Config, mut evaluator: Evaluator<'_>) -> Result<Feedback> {
    let program = parse_source(source, config)?;
    let feedback = evaluator.run(program).map_err(|e| e.with_source(source))?;
    log::info!(
        target: "sat",
        "{}: {} passed, {} failed",
        source.name,
        feedback.passed(),
        feedback.failed()
    );
    Ok(feedback)
}
