//! Declaration parsing implementation
//!
//! This module handles types and the declarations that use them:
//!
//! - Types: a known type name or a struct type, then any number of `*`
//! - Struct types: `struct Name`, `struct Name { members }`, `struct { members }`
//! - Variable declarations: `type name;` and `type name = expr;`
//! - Function declarations: `type name(params) { body }` and prototypes
//!
//! # Grammar
//!
//! ```text
//! type        ::= (type_name | struct_type) "*"*
//! struct_type ::= "struct" identifier? ("{" (type identifier ";")* "}")?
//! declaration ::= type identifier ( "=" expression ";" | ";" | function_rest )
//! function_rest ::= "(" params ")" ( block | ";" )
//! params      ::= "" | "void" | param ("," param)* ("," "...")?
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::expressions::Precedence;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Expected, ParseError, Parser};
use crate::parser::scope::TypedefEntry;

const AFTER_DECLARATOR: &[TokenKind] = &[
    TokenKind::Equals,
    TokenKind::Semicolon,
    TokenKind::LeftParen,
];

const AFTER_PARAMETERS: &[TokenKind] = &[TokenKind::LeftBrace, TokenKind::Semicolon];

impl<'t> Parser<'t> {
    /// Parse type: (type_name | struct_type) [*]*
    pub(crate) fn parse_type(&mut self) -> Result<Node, ParseError> {
        let token = self.cursor.peek();

        let mut ty = match token.kind {
            TokenKind::Struct => self.parse_struct_type()?,
            TokenKind::Name => {
                if !self.scopes.is_type(self.depth(), &token.text) {
                    return Err(ParseError::UnknownType {
                        name: token.text.clone(),
                        location: token.location,
                    });
                }
                self.cursor.advance();
                Node::type_name(token.text.clone())
            }
            _ => return Err(self.unexpected(Expected::Type)),
        };

        while self.match_token(TokenKind::Star) {
            ty = Node::pointer_to(ty);
        }

        Ok(ty)
    }

    /// Parse struct type: struct [Name] [{ members }]
    ///
    /// A struct with both a name and a member list registers its tag in the
    /// current scope so later references have a size.
    fn parse_struct_type(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Struct)?;

        let name = if self.check(TokenKind::Name) {
            Some(self.expect_name()?)
        } else {
            None
        };

        if !self.check(TokenKind::LeftBrace) {
            if name.is_none() {
                return Err(self.unexpected(Expected::Token(TokenKind::Name)));
            }
            return Ok(Node::StructType {
                name,
                members: None,
            });
        }

        self.expect(TokenKind::LeftBrace)?;
        self.descend()?;
        let mut members = Vec::new();
        while !self.check(TokenKind::RightBrace) {
            let ty = self.parse_type()?;
            let member = self.expect_name()?;
            self.expect(TokenKind::Semicolon)?;

            members.push(Node::VariableDeclaration {
                ty: Box::new(ty),
                name: member,
                value: None,
            });
        }
        self.expect(TokenKind::RightBrace)?;
        self.ascend();

        let ty = Node::StructType {
            name,
            members: Some(members),
        };

        if let Node::StructType { name: Some(tag), .. } = &ty {
            let depth = self.depth();
            let size = self.scopes.size_of(depth, &ty).unwrap_or(0);
            log::debug!("struct '{}' ({} bytes) at depth {}", tag, size, depth);
            self.scopes.declare_struct(
                depth,
                tag,
                TypedefEntry {
                    name: tag.clone(),
                    declared_type: Some(ty.clone()),
                    size,
                },
            );
        }

        Ok(ty)
    }

    /// Parse a declaration starting at its type
    pub(crate) fn parse_declaration(&mut self) -> Result<Node, ParseError> {
        let ty = self.parse_type()?;
        self.parse_declaration_rest(ty)
    }

    /// Parse what follows the type of a declaration: the name, then an
    /// initializer, a bare ';', or a parameter list
    pub(crate) fn parse_declaration_rest(&mut self, ty: Node) -> Result<Node, ParseError> {
        let name = self.expect_name()?;
        let depth = self.depth();

        match self.cursor.peek_kind() {
            TokenKind::Equals => {
                self.cursor.advance();
                self.scopes.declare_value(depth, &name);
                let value = self.parse_expression(Precedence::Assignment)?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Node::VariableDeclaration {
                    ty: Box::new(ty),
                    name,
                    value: Some(Box::new(value)),
                })
            }
            TokenKind::Semicolon => {
                self.cursor.advance();
                self.scopes.declare_value(depth, &name);
                Ok(Node::VariableDeclaration {
                    ty: Box::new(ty),
                    name,
                    value: None,
                })
            }
            TokenKind::LeftParen => self.parse_function_rest(ty, name),
            _ => Err(self.unexpected(Expected::OneOf(AFTER_DECLARATOR))),
        }
    }

    /// Parse function definition or prototype after its name:
    /// (params) { body } | (params);
    ///
    /// The name is declared before the body so the function can call itself;
    /// parameters live in the body's scope.
    fn parse_function_rest(&mut self, ty: Node, name: String) -> Result<Node, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let depth = self.depth();
        self.scopes.declare_value(depth, &name);

        self.scopes.enter_scope(depth + 1);
        let (parameters, variadic) = self.parse_parameter_list()?;
        self.expect(TokenKind::RightParen)?;

        for parameter in &parameters {
            self.scopes.declare_value(depth + 1, &parameter.name);
        }

        let body = match self.cursor.peek_kind() {
            TokenKind::Semicolon => {
                self.cursor.advance();
                None
            }
            TokenKind::LeftBrace => Some(Box::new(self.parse_braced_statements()?)),
            _ => return Err(self.unexpected(Expected::OneOf(AFTER_PARAMETERS))),
        };
        self.scopes.leave_scope();

        log::debug!(
            "function '{}' with {} parameter(s){}",
            name,
            parameters.len(),
            if body.is_some() { "" } else { " (prototype)" }
        );

        Ok(Node::FunctionDeclaration {
            ty: Box::new(ty),
            name,
            parameters,
            variadic,
            body,
        })
    }

    /// Parse parameter list: type name, type name, ... [, ...]
    /// Returns the parameters and whether the list ends in `...`.
    fn parse_parameter_list(&mut self) -> Result<(Vec<Parameter>, bool), ParseError> {
        let mut parameters = Vec::new();

        if self.check(TokenKind::RightParen) {
            return Ok((parameters, false));
        }

        // Special case: (void) means no parameters
        let token = self.cursor.peek();
        if token.kind == TokenKind::Name
            && token.text == "void"
            && self.cursor.peek_ahead(1).kind == TokenKind::RightParen
        {
            self.cursor.advance();
            return Ok((parameters, false));
        }

        loop {
            if !parameters.is_empty() && self.match_token(TokenKind::Ellipsis) {
                return Ok((parameters, true));
            }

            let ty = self.parse_type()?;
            let name = self.expect_name()?;
            parameters.push(Parameter {
                ty: Box::new(ty),
                name,
            });

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        Ok((parameters, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_statement(source: &str) -> Result<Node, ParseError> {
        let program = Parser::parse_source(source)?;
        match program {
            Node::Block { mut statements } => Ok(statements.remove(0)),
            other => panic!("Expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_pointer_declaration() {
        let node = first_statement("char ** argv;").unwrap();
        assert_eq!(
            node,
            Node::VariableDeclaration {
                ty: Box::new(Node::pointer_to(Node::pointer_to(Node::type_name("char")))),
                name: "argv".to_string(),
                value: None,
            }
        );
    }

    #[test]
    fn test_function_with_parameters() {
        let node = first_statement("int add(int a, char *b) { return a + *b; }").unwrap();
        match node {
            Node::FunctionDeclaration {
                name,
                parameters,
                variadic,
                body: Some(_),
                ..
            } => {
                assert_eq!(name, "add");
                assert!(!variadic);
                let names: Vec<_> = parameters.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["a", "b"]);
                assert_eq!(parameters[1].ty.pointer_depth(), 1);
            }
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_void_parameter_list_and_prototype() {
        let node = first_statement("int f(void);").unwrap();
        assert!(matches!(
            node,
            Node::FunctionDeclaration {
                ref parameters,
                body: None,
                ..
            } if parameters.is_empty()
        ));
    }

    #[test]
    fn test_variadic_parameters() {
        let node = first_statement("int printf(char *format, ...);").unwrap();
        assert!(matches!(
            node,
            Node::FunctionDeclaration {
                ref parameters,
                variadic: true,
                ..
            } if parameters.len() == 1
        ));
    }

    #[test]
    fn test_ellipsis_needs_a_named_parameter() {
        let err = first_statement("int f(...);").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Type,
                found: TokenKind::Ellipsis,
                ..
            }
        ));
    }

    #[test]
    fn test_recursive_function_sees_itself() {
        assert!(first_statement("int fact(int n) { return n * fact(n - 1); }").is_ok());
    }

    #[test]
    fn test_parameters_not_visible_after_function() {
        let err = Parser::parse_source("int f(int n) { return n; } int g() { return n; }")
            .unwrap_err();
        assert!(matches!(err, ParseError::UndeclaredName { ref name, .. } if name == "n"));
    }

    #[test]
    fn test_struct_definition() {
        let node = first_statement("struct point { int x; int y; };").unwrap();
        match node {
            Node::StructType {
                name: Some(name),
                members: Some(members),
            } => {
                assert_eq!(name, "point");
                assert_eq!(members.len(), 2);
                assert!(matches!(
                    members[1],
                    Node::VariableDeclaration { ref name, value: None, .. } if name == "y"
                ));
            }
            other => panic!("Expected struct type, got {:?}", other),
        }
    }

    #[test]
    fn test_struct_variable_and_typedef() {
        let source = "struct point { int x; int y; } origin; typedef struct point *point_ref; point_ref p;";
        let program = Parser::parse_source(source).unwrap();
        let statements = program.statements().unwrap();
        assert!(matches!(
            statements[0],
            Node::VariableDeclaration { ref name, .. } if name == "origin"
        ));
        assert!(matches!(statements[1], Node::Typedef { .. }));
        assert!(matches!(
            statements[2],
            Node::VariableDeclaration { ref ty, .. } if **ty == Node::type_name("point_ref")
        ));
    }

    #[test]
    fn test_anonymous_struct() {
        let node = first_statement("struct { char c; } holder;").unwrap();
        match node {
            Node::VariableDeclaration { ty, .. } => {
                assert!(matches!(*ty, Node::StructType { name: None, members: Some(_) }));
            }
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_struct_needs_name_or_members() {
        let err = first_statement("struct;").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Token(TokenKind::Name),
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_member_type() {
        let err = first_statement("struct s { widget w; };").unwrap_err();
        assert!(matches!(err, ParseError::UnknownType { ref name, .. } if name == "widget"));
    }

    #[test]
    fn test_bad_declarator_follow() {
        let err = first_statement("int x 5;").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::OneOf(_),
                found: TokenKind::Number,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_parameter_list() {
        let err = first_statement("int f(int a int b) { }").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Token(TokenKind::RightParen),
                found: TokenKind::Name,
                ..
            }
        ));
    }
}
