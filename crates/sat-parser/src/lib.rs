//! SAT parser: builds an expression tree and its scope arena from the
//! lexer's statement streams.

mod parse_expr;
mod parse_keyword;
pub mod parser;

pub use parser::{parse, Parser};
