//! SQL front end
//!
//! Lexer, token definitions, AST and the single-statement parser.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::Statement;
pub use lexer::{tokenize, Lexer};
pub use parser::{parse, Parser};
pub use token::{Keyword, Token, TokenKind};
