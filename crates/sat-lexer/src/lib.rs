//! SAT lexer: converts source text into nested token streams.

pub mod lexer;
pub mod reader;
pub mod token;

pub use lexer::{lex, Lexer};
pub use reader::Reader;
pub use token::{Special, Token, TokenKind, TokenStream, KEYWORDS};
