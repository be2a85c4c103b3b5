//! Expression parsing implementation
//!
//! This module handles parsing of C expressions using precedence climbing.
//! A single loop in [`Parser::parse_expression`] covers every binary level;
//! prefix operators and primaries are handled by recursive descent.
//!
//! # Supported Expressions
//!
//! - Literals: numbers, strings, `true`, `false`, `NULL`
//! - Declared variable and function names
//! - Binary operators: arithmetic, comparison, logical
//! - Prefix: `-`, `+`, `!`, `*`, `&`, `++`, `--`
//! - Suffixes: `.`, `->`, `()`, `++`, `--`
//! - Assignment: `=`, `+=`, `-=`
//!
//! # Desugaring
//!
//! Increments and compound assignments never reach the AST as such:
//! `x++`, `++x` and `x += 1` all become `x = x + 1`. `a->b` becomes a member
//! get on the dereferenced pointer.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Expected, ParseError, Parser};

/// Binding strength of operators, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    Assignment, // = += -= ++ --
    Or,         // ||
    And,        // &&
    Equality,   // == !=
    Comparison, // < > <= >=
    Term,       // + -
    Factor,     // * / %
    Unary,      // ! - + * &
    Call,       // . -> ()
    Primary,
}

impl Precedence {
    /// Precedence of `kind` when it follows a complete operand
    pub fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Equals | TokenKind::PlusEquals | TokenKind::MinusEquals => {
                Precedence::Assignment
            }
            TokenKind::Or => Precedence::Or,
            TokenKind::And => Precedence::And,
            TokenKind::EqualsEquals | TokenKind::NotEquals => Precedence::Equality,
            TokenKind::LessThan
            | TokenKind::LessThanEquals
            | TokenKind::GreaterThan
            | TokenKind::GreaterThanEquals => Precedence::Comparison,
            TokenKind::Plus | TokenKind::Minus => Precedence::Term,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Precedence::Factor,
            TokenKind::Dot
            | TokenKind::Arrow
            | TokenKind::LeftParen
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus => Precedence::Call,
            _ => Precedence::None,
        }
    }

    /// The next tighter level; `Primary` is its own successor
    pub fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Assignment,
            Precedence::Assignment => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary => Precedence::Call,
            Precedence::Call | Precedence::Primary => Precedence::Primary,
        }
    }
}

fn binary_operator(kind: TokenKind) -> Option<Operator> {
    let operator = match kind {
        TokenKind::Plus => Operator::Add,
        TokenKind::Minus => Operator::Subtract,
        TokenKind::Star => Operator::Multiply,
        TokenKind::Slash => Operator::Divide,
        TokenKind::Percent => Operator::Modulo,
        TokenKind::EqualsEquals => Operator::Equal,
        TokenKind::NotEquals => Operator::NotEqual,
        TokenKind::LessThan => Operator::Less,
        TokenKind::LessThanEquals => Operator::LessEqual,
        TokenKind::GreaterThan => Operator::Greater,
        TokenKind::GreaterThanEquals => Operator::GreaterEqual,
        TokenKind::And => Operator::And,
        TokenKind::Or => Operator::Or,
        _ => return None,
    };
    Some(operator)
}

/// Tokens that may begin an expression statement
pub(crate) fn starts_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Number
            | TokenKind::String
            | TokenKind::Name
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::LeftParen
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Not
            | TokenKind::Star
            | TokenKind::Ampersand
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus
    )
}

impl<'t> Parser<'t> {
    /// Parse an expression whose operators all bind at least as tightly as
    /// `min`. Use [`Precedence::Assignment`] for a full expression.
    pub fn parse_expression(&mut self, min: Precedence) -> Result<Node, ParseError> {
        self.descend()?;
        let mut left = self.parse_unary()?;

        loop {
            let kind = self.cursor.peek_kind();
            let precedence = Precedence::of(kind);
            if precedence == Precedence::None || precedence < min {
                break;
            }

            left = match kind {
                // Right-associative: the right side recurses at the same level
                TokenKind::Equals => {
                    self.cursor.advance();
                    let value = self.parse_expression(Precedence::Assignment)?;
                    Node::binary(Operator::Assign, left, value)
                }
                TokenKind::PlusEquals | TokenKind::MinusEquals => {
                    self.cursor.advance();
                    let value = self.parse_expression(Precedence::Assignment)?;
                    let operator = if kind == TokenKind::PlusEquals {
                        Operator::Add
                    } else {
                        Operator::Subtract
                    };
                    Node::desugared_assignment(left, operator, value)
                }
                TokenKind::Dot
                | TokenKind::Arrow
                | TokenKind::LeftParen
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus => self.parse_suffix(left)?,
                _ => {
                    let operator = binary_operator(kind)
                        .ok_or_else(|| self.unexpected(Expected::Expression))?;
                    self.cursor.advance();
                    let right = self.parse_expression(precedence.next())?;
                    Node::binary(operator, left, right)
                }
            };
        }

        self.ascend();
        Ok(left)
    }

    /// Parse prefix operators, then a primary
    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        let operator = match self.cursor.peek_kind() {
            TokenKind::Minus => Operator::Negate,
            TokenKind::Not => Operator::Not,
            TokenKind::Star => Operator::Dereference,
            TokenKind::Ampersand => Operator::AddressOf,
            TokenKind::Plus => {
                // Unary plus: just the operand
                self.cursor.advance();
                return self.parse_expression(Precedence::Unary);
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let step = if self.cursor.advance().kind == TokenKind::PlusPlus {
                    Operator::Add
                } else {
                    Operator::Subtract
                };
                let target = self.parse_expression(Precedence::Unary)?;
                return Ok(Node::desugared_assignment(target, step, Node::number(1)));
            }
            _ => return self.parse_primary(),
        };

        self.cursor.advance();
        let operand = self.parse_expression(Precedence::Unary)?;
        Ok(Node::unary(operator, operand))
    }

    /// Parse one suffix applied to `target`: member access, call, or
    /// postfix increment
    fn parse_suffix(&mut self, target: Node) -> Result<Node, ParseError> {
        let token = self.cursor.advance();

        match token.kind {
            TokenKind::Dot => Ok(Node::StructMemberGet {
                from: Box::new(target),
                name: self.expect_name()?,
            }),
            TokenKind::Arrow => Ok(Node::StructMemberGet {
                from: Box::new(Node::unary(Operator::Dereference, target)),
                name: self.expect_name()?,
            }),
            TokenKind::LeftParen => {
                let arguments = self.parse_argument_list()?;
                self.expect(TokenKind::RightParen)?;
                Ok(Node::FunctionCall {
                    callee: Box::new(target),
                    arguments,
                })
            }
            TokenKind::PlusPlus => Ok(Node::desugared_assignment(
                target,
                Operator::Add,
                Node::number(1),
            )),
            TokenKind::MinusMinus => Ok(Node::desugared_assignment(
                target,
                Operator::Subtract,
                Node::number(1),
            )),
            found => Err(ParseError::UnexpectedToken {
                expected: Expected::Expression,
                found,
                location: token.location,
            }),
        }
    }

    /// Parse argument list: expr, expr, ... (without the parentheses)
    fn parse_argument_list(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut arguments = Vec::new();

        if self.check(TokenKind::RightParen) {
            return Ok(arguments);
        }

        loop {
            arguments.push(self.parse_expression(Precedence::Assignment)?);

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        Ok(arguments)
    }

    /// Parse primary (literals, names, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let token = self.cursor.peek();

        let node = match token.kind {
            TokenKind::Number => {
                let value = token.text.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
                    text: token.text.clone(),
                    location: token.location,
                })?;
                Node::number(value)
            }
            TokenKind::String => Node::StringLiteral {
                text: token.text.clone(),
            },
            TokenKind::True => Node::number(1),
            TokenKind::False => Node::number(0),
            TokenKind::Null => Node::Null,
            TokenKind::Name => {
                self.check_value_name(&token.text)?;
                Node::variable(token.text.clone())
            }
            TokenKind::LeftParen => {
                self.cursor.advance();
                let inner = self.parse_expression(Precedence::Assignment)?;
                self.expect(TokenKind::RightParen)?;
                return Ok(inner);
            }
            _ => return Err(self.unexpected(Expected::Expression)),
        };

        self.cursor.advance();
        Ok(node)
    }

    /// A name in value position must be a declared variable, parameter or
    /// function, unless the configuration says otherwise.
    fn check_value_name(&self, name: &str) -> Result<(), ParseError> {
        let depth = self.depth();
        if self.scopes.is_value(depth, name) {
            return Ok(());
        }
        if self.scopes.is_type(depth, name) {
            return Err(self.unexpected(Expected::Expression));
        }
        if self.config.require_declared_names {
            return Err(ParseError::UndeclaredName {
                name: name.to_string(),
                location: self.current_location(),
            });
        }
        Ok(())
    }
}
