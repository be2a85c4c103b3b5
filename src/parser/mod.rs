//! C source code front end
//!
//! This module transforms C source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`scope`]: Per-depth type and name table used during parsing
//! - [`parse`]: Parser entry points, token cursor, and errors (tokens → AST)
//! - [`ast`]: AST node definitions
//! - [`printer`]: Indented debug dump of a tree
//!
//! # Supported C Subset
//!
//! - Types: built-in names (`int`, `char`, `void`), typedef names, structs, pointers
//! - Statements: declarations, `typedef`, control flow (`if`, `while`, `do`, `for`),
//!   `return`, `break`, `continue`, nested blocks
//! - Expressions: arithmetic, comparison, logical, assignment, member access, calls
//! - No preprocessor, arrays, unions, enums, or function pointers
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! Typedef names are resolved through [`scope::ScopeContext`] while parsing, which is
//! what lets `name * other;` be told apart from a multiplication.

pub mod ast;
pub mod config;
pub mod constants;
mod declarations;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod printer;
pub mod scope;
mod statements;
