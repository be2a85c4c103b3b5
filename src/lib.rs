//! # Introduction
//!
//! cfront is the front end of a small compiler for a C-family language. It
//! scans source text into tokens and parses them into an abstract syntax tree,
//! resolving along the way whether each identifier names a type or a value.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser (+ ScopeContext) → AST
//! ```
//!
//! 1. [`parser::lexer`]: one pass over the buffer, always ending in an `End`
//!    token; problems are collected rather than aborting.
//! 2. [`parser::scope`]: a stack of per-depth declaration maps consulted to
//!    decide whether a statement is a declaration.
//! 3. [`parser::parse`]: recursive descent over statements, precedence
//!    climbing over expressions; the first error aborts the parse.
//! 4. [`parser::ast`]: the tree handed to later compiler stages, printable
//!    through [`parser::printer`].
//!
//! ```
//! use cfront::parser::ast::Node;
//! use cfront::parser::parse::Parser;
//!
//! let program = Parser::parse_source("typedef int myint; myint x = 1 + 2;").unwrap();
//! assert!(matches!(program, Node::Block { .. }));
//! ```

pub mod parser;

pub use parser::ast::Node;
pub use parser::parse::{ParseError, Parser};
