//! SDL front end for schemac.
//!
//! This crate provides:
//! - `token`: Token kinds and token structures
//! - `lexer`: Tokenization
//! - `string`: String and block string values
//! - `parser`: Recursive descent parser producing raw declarations

pub mod lexer;
pub mod parser;
pub mod string;
pub mod token;

pub use lexer::Lexer;
pub use parser::{parse_schema, parse_value, Parser};
pub use token::{Token, TokenKind};
