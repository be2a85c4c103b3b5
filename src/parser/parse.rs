//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, the token cursor, helper methods, and the main
//! parse entry points.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, [`TokenCursor`], helper methods, and coordination
//! - `declarations`: types, struct types, variable and function declarations
//! - `statements`: blocks and statements (if, while, for, typedef, etc.)
//! - `expressions`: expressions with precedence climbing
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! Every error is fatal: the first mismatch aborts the parse and is returned
//! as a [`ParseError`]. There is no re-synchronization.

use crate::parser::ast::*;
use crate::parser::config::ParserConfig;
use crate::parser::constants::TOP_LEVEL_DEPTH;
use crate::parser::lexer::{self, LexError, Token, TokenKind};
use crate::parser::scope::ScopeContext;
use std::fmt;
use thiserror::Error;

/// What the parser was looking for when it gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Token(TokenKind),
    OneOf(&'static [TokenKind]),
    Statement,
    Expression,
    Type,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::OneOf(kinds) => {
                write!(f, "one of ")?;
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", kind)?;
                }
                Ok(())
            }
            Expected::Statement => write!(f, "statement"),
            Expected::Expression => write!(f, "expression"),
            Expected::Type => write!(f, "type"),
        }
    }
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Parse error at {location}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: Expected,
        found: TokenKind,
        location: SourceLocation,
    },

    #[error("Parse error at {location}: unknown type '{name}'")]
    UnknownType {
        name: String,
        location: SourceLocation,
    },

    #[error("Parse error at {location}: use of undeclared name '{name}'")]
    UndeclaredName {
        name: String,
        location: SourceLocation,
    },

    #[error("Parse error at {location}: invalid integer literal {text}")]
    InvalidNumber {
        text: String,
        location: SourceLocation,
    },

    #[error("Parse error at {location}: nesting exceeds {limit} levels")]
    NestingTooDeep {
        limit: usize,
        location: SourceLocation,
    },

    #[error(transparent)]
    Lex(#[from] LexError),
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::UnexpectedToken { location, .. }
            | ParseError::UnknownType { location, .. }
            | ParseError::UndeclaredName { location, .. }
            | ParseError::InvalidNumber { location, .. }
            | ParseError::NestingTooDeep { location, .. } => *location,
            ParseError::Lex(err) => err.location,
        }
    }
}

static END_OF_INPUT: Token = Token {
    kind: TokenKind::End,
    text: String::new(),
    location: SourceLocation { line: 0, column: 0 },
};

/// Read position over a borrowed token sequence
///
/// The cursor only moves forward, one token at a time, and never steps past
/// the terminating [`TokenKind::End`]. Reading beyond the slice (which only
/// happens for a sequence that lacks its `End`) yields a synthetic `End`.
#[derive(Debug, Clone)]
pub struct TokenCursor<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> TokenCursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn peek(&self) -> &'t Token {
        self.peek_ahead(0)
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub fn peek_ahead(&self, n: usize) -> &'t Token {
        self.tokens.get(self.position + n).unwrap_or(&END_OF_INPUT)
    }

    /// Consume the current token and return it
    pub fn advance(&mut self) -> &'t Token {
        let token = self.peek();
        if token.kind != TokenKind::End {
            self.position += 1;
        }
        token
    }

    pub fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::End
    }
}

/// Recursive descent parser for the C subset
pub struct Parser<'t> {
    pub(crate) cursor: TokenCursor<'t>,
    pub(crate) scopes: ScopeContext,
    pub(crate) config: ParserConfig,
    nesting: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self::with_config(tokens, ParserConfig::default())
    }

    pub fn with_config(tokens: &'t [Token], config: ParserConfig) -> Self {
        Self::with_scopes(tokens, config, ScopeContext::new())
    }

    /// Start from a pre-populated scope table, e.g. one carrying typedefs
    /// from a previously parsed header.
    pub fn with_scopes(tokens: &'t [Token], config: ParserConfig, scopes: ScopeContext) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            scopes,
            config,
            nesting: 0,
        }
    }

    /// Lex and parse a whole translation unit with the default configuration.
    pub fn parse_source(source: &str) -> Result<Node, ParseError> {
        Self::parse_source_with(source, ParserConfig::default())
    }

    /// Lex and parse a whole translation unit.
    ///
    /// Unknown characters are logged and skipped; an unterminated string or
    /// comment fails the parse before any token is consumed.
    pub fn parse_source_with(source: &str, config: ParserConfig) -> Result<Node, ParseError> {
        let lexed = lexer::tokenize(source);
        if let Some(err) = lexed.first_fatal() {
            return Err(err.clone().into());
        }
        for err in &lexed.errors {
            log::warn!("{}", err);
        }

        Parser::with_config(&lexed.tokens, config).parse_program()
    }

    pub fn scopes(&self) -> &ScopeContext {
        &self.scopes
    }

    /// Parse the entire program into one `Block` ending in [`Node::End`]
    pub fn parse_program(&mut self) -> Result<Node, ParseError> {
        // Top-level declarations carried in through `with_scopes` stay visible
        self.scopes.reopen_scope(TOP_LEVEL_DEPTH);
        log::debug!("parsing translation unit at depth {}", TOP_LEVEL_DEPTH);

        let mut statements = self.parse_statements(TokenKind::End)?;
        self.expect(TokenKind::End)?;
        statements.push(Node::End);

        Ok(Node::block(statements))
    }

    // ===== Helper methods =====

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.cursor.peek_kind() == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.cursor.peek().location
    }

    /// Current block depth
    pub(crate) fn depth(&self) -> usize {
        self.scopes.depth()
    }

    pub(crate) fn unexpected(&self, expected: Expected) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.cursor.peek_kind(),
            location: self.current_location(),
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<&'t Token, ParseError> {
        if self.check(kind) {
            Ok(self.cursor.advance())
        } else {
            Err(self.unexpected(Expected::Token(kind)))
        }
    }

    pub(crate) fn expect_name(&mut self) -> Result<String, ParseError> {
        Ok(self.expect(TokenKind::Name)?.text.clone())
    }

    /// Count one more level of block or expression nesting
    pub(crate) fn descend(&mut self) -> Result<(), ParseError> {
        self.nesting += 1;
        if self.nesting > self.config.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.config.max_depth,
                location: self.current_location(),
            });
        }
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    #[test]
    fn test_parse_simple_function() {
        let program = Parser::parse_source("int main() { return 0; }").unwrap();
        let statements = program.statements().unwrap();

        assert_eq!(statements.len(), 2);
        match &statements[0] {
            Node::FunctionDeclaration {
                ty,
                name,
                parameters,
                body: Some(body),
                ..
            } => {
                assert_eq!(name, "main");
                assert!(parameters.is_empty());
                assert_eq!(**ty, Node::type_name("int"));
                assert_eq!(body.statements().map(|s| s.len()), Some(1));
            }
            other => panic!("Expected function declaration, got {:?}", other),
        }
        assert_eq!(statements[1], Node::End);
    }

    #[test]
    fn test_empty_program() {
        let program = Parser::parse_source("").unwrap();
        assert_eq!(program, Node::block(vec![Node::End]));
    }

    #[test]
    fn test_cursor_stops_at_end() {
        let lexed = tokenize("x");
        let mut cursor = TokenCursor::new(&lexed.tokens);
        assert_eq!(cursor.advance().kind, TokenKind::Name);
        assert_eq!(cursor.advance().kind, TokenKind::End);
        assert_eq!(cursor.advance().kind, TokenKind::End);
        assert_eq!(cursor.position(), 1);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_cursor_without_end_token() {
        let cursor = TokenCursor::new(&[]);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_fatal_lex_error_stops_parse() {
        let err = Parser::parse_source("int x; \"open").unwrap_err();
        assert!(matches!(err, ParseError::Lex(_)));
    }

    #[test]
    fn test_unknown_character_is_not_fatal() {
        let program = Parser::parse_source("int x; @").unwrap();
        assert_eq!(program.statements().map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_scopes_carry_over_between_parses() {
        let header = tokenize("typedef int myint; int counter;");
        let mut first = Parser::new(&header.tokens);
        first.parse_program().unwrap();
        assert!(first.scopes().is_type(TOP_LEVEL_DEPTH, "myint"));

        let body = tokenize("myint x = counter;");
        let mut second =
            Parser::with_scopes(&body.tokens, ParserConfig::default(), first.scopes().clone());
        let program = second.parse_program().unwrap();
        assert_eq!(
            program.statements().map(|s| &s[0]),
            Some(&Node::VariableDeclaration {
                ty: Box::new(Node::type_name("myint")),
                name: "x".to_string(),
                value: Some(Box::new(Node::variable("counter"))),
            })
        );
    }

    #[test]
    fn test_expected_display() {
        let expected = Expected::OneOf(&[TokenKind::Equals, TokenKind::Semicolon]);
        assert_eq!(expected.to_string(), "one of '=', ';'");
        assert_eq!(Expected::Token(TokenKind::RightBrace).to_string(), "'}'");
    }

    #[test]
    fn test_error_message_names_expected_token() {
        let err = Parser::parse_source("int x = 1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 10: expected ';', found end of file"
        );
    }
}
