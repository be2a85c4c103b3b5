//! Statement parsing implementation
//!
//! This module handles blocks and every statement form:
//!
//! - Declarations led by a type name: `int x = 42;`, `myint f(int a) { ... }`
//! - `typedef` and `struct` statements
//! - Control flow: `if`/`else`, `while`, `do`/`while`, `for`
//! - Jumps: `return`, `break`, `continue`
//! - Nested blocks and expression statements
//!
//! # Grammar
//!
//! ```text
//! block     ::= "{" statement* "}"
//! statement ::= typedef | struct_stmt | if_stmt | while_stmt | do_stmt
//!             | for_stmt | return_stmt | "break" ";" | "continue" ";"
//!             | block | ";" | declaration | expression ";"
//! body      ::= block | statement
//! ```
//!
//! Whether a statement that starts with a name is a declaration or an
//! expression is decided by the scope table alone: if the name is a visible
//! type, a declaration follows.

use crate::parser::ast::*;
use crate::parser::expressions::{starts_expression, Precedence};
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Expected, ParseError, Parser};
use crate::parser::scope::TypedefEntry;

impl<'t> Parser<'t> {
    /// Parse statements until `terminator`, which is left unconsumed
    pub(crate) fn parse_statements(
        &mut self,
        terminator: TokenKind,
    ) -> Result<Vec<Node>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(terminator) {
            if self.cursor.is_at_end() {
                return Err(self.unexpected(Expected::Token(terminator)));
            }
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }

        Ok(statements)
    }

    /// Parse `{ ... }` as a nested block one level deeper
    pub(crate) fn parse_block(&mut self) -> Result<Node, ParseError> {
        self.scopes.enter_scope(self.depth() + 1);
        let block = self.parse_braced_statements()?;
        self.scopes.leave_scope();
        Ok(block)
    }

    /// Parse `{ ... }` in the scope that is already current
    pub(crate) fn parse_braced_statements(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::LeftBrace)?;
        self.descend()?;
        let statements = self.parse_statements(TokenKind::RightBrace)?;
        self.expect(TokenKind::RightBrace)?;
        self.ascend();
        Ok(Node::block(statements))
    }

    /// Parse the body of a control statement: a block, or a single
    /// statement wrapped in a block of its own
    fn parse_body(&mut self) -> Result<Node, ParseError> {
        if self.check(TokenKind::LeftBrace) {
            return self.parse_block();
        }

        self.scopes.enter_scope(self.depth() + 1);
        self.descend()?;
        let statement = self.parse_statement()?;
        self.ascend();
        self.scopes.leave_scope();

        Ok(Node::block(statement.into_iter().collect()))
    }

    /// Parse a statement; `None` for an empty statement (`;`)
    pub(crate) fn parse_statement(&mut self) -> Result<Option<Node>, ParseError> {
        let token = self.cursor.peek();
        log::trace!("statement at {} starts with {}", token.location, token.kind);

        let node = match token.kind {
            TokenKind::Typedef => self.parse_typedef()?,
            TokenKind::Struct => self.parse_struct_statement()?,
            TokenKind::If => self.parse_if_statement()?,
            TokenKind::While => self.parse_while_statement()?,
            TokenKind::Do => self.parse_do_while_statement()?,
            TokenKind::For => self.parse_for_statement()?,
            TokenKind::Return => self.parse_return_statement()?,
            TokenKind::Break | TokenKind::Continue => {
                self.cursor.advance();
                self.expect(TokenKind::Semicolon)?;
                if token.kind == TokenKind::Break {
                    Node::Break
                } else {
                    Node::Continue
                }
            }
            TokenKind::LeftBrace => self.parse_block()?,
            TokenKind::Semicolon => {
                self.cursor.advance();
                return Ok(None);
            }
            TokenKind::Name if self.scopes.is_type(self.depth(), &token.text) => {
                self.parse_declaration()?
            }
            kind if starts_expression(kind) => {
                let expr = self.parse_expression(Precedence::Assignment)?;
                self.expect(TokenKind::Semicolon)?;
                expr
            }
            _ => return Err(self.unexpected(Expected::Statement)),
        };

        Ok(Some(node))
    }

    /// Parse typedef: typedef type name;
    fn parse_typedef(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Typedef)?;
        let ty = self.parse_type()?;
        let name = self.expect_name()?;
        self.expect(TokenKind::Semicolon)?;

        let depth = self.depth();
        let size = self.scopes.size_of(depth, &ty).unwrap_or(0);
        log::debug!("typedef '{}' ({} bytes) at depth {}", name, size, depth);
        self.scopes.declare_type(
            depth,
            &name,
            TypedefEntry {
                name: name.clone(),
                declared_type: Some(ty.clone()),
                size,
            },
        );

        Ok(Node::Typedef {
            ty: Box::new(ty),
            name,
        })
    }

    /// Parse a statement led by `struct`: either a bare struct type
    /// (`struct point { int x; };`) or a declaration using it
    fn parse_struct_statement(&mut self) -> Result<Node, ParseError> {
        let ty = self.parse_type()?;

        if self.match_token(TokenKind::Semicolon) {
            return Ok(ty);
        }

        self.parse_declaration_rest(ty)
    }

    /// Parse if statement
    fn parse_if_statement(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::If)?;
        let condition = self.parse_condition()?;
        let success = self.parse_body()?;

        let fail = if self.match_token(TokenKind::Else) {
            Some(Box::new(self.parse_body()?))
        } else {
            None
        };

        Ok(Node::If {
            condition: Box::new(condition),
            success: Box::new(success),
            fail,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::While)?;
        let condition = self.parse_condition()?;
        let body = self.parse_body()?;

        Ok(Node::While {
            condition: Box::new(condition),
            body: Box::new(body),
        })
    }

    /// Parse do-while statement
    fn parse_do_while_statement(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Do)?;
        let body = self.parse_body()?;
        self.expect(TokenKind::While)?;
        let condition = self.parse_condition()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Node::DoWhile {
            body: Box::new(body),
            condition: Box::new(condition),
        })
    }

    /// Parse for statement. The header gets its own scope so a declaration
    /// in the init clause is visible in the condition, step and body only.
    fn parse_for_statement(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LeftParen)?;
        self.scopes.enter_scope(self.depth() + 1);

        // Init (optional); a declaration consumes its own ';'
        let init = if self.match_token(TokenKind::Semicolon) {
            None
        } else if self.at_type_name() {
            Some(Box::new(self.parse_declaration()?))
        } else {
            let expr = self.parse_expression(Precedence::Assignment)?;
            self.expect(TokenKind::Semicolon)?;
            Some(Box::new(expr))
        };

        // Condition (optional)
        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression(Precedence::Assignment)?))
        };
        self.expect(TokenKind::Semicolon)?;

        // Step (optional)
        let step = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(Box::new(self.parse_expression(Precedence::Assignment)?))
        };
        self.expect(TokenKind::RightParen)?;

        let body = self.parse_body()?;
        self.scopes.leave_scope();

        Ok(Node::For {
            init,
            condition,
            step,
            body: Box::new(body),
        })
    }

    /// Parse return statement
    fn parse_return_statement(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Return)?;

        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression(Precedence::Assignment)?))
        };
        self.expect(TokenKind::Semicolon)?;

        Ok(Node::Return { value })
    }

    /// Parse a parenthesized condition: ( expr )
    fn parse_condition(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expression(Precedence::Assignment)?;
        self.expect(TokenKind::RightParen)?;
        Ok(condition)
    }

    /// True when the current token starts a declaration
    fn at_type_name(&self) -> bool {
        let token = self.cursor.peek();
        match token.kind {
            TokenKind::Struct => true,
            TokenKind::Name => self.scopes.is_type(self.depth(), &token.text),
            _ => false,
        }
    }
}
