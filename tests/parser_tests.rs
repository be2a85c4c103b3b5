// Integration tests for the parser

use cfront::parser::ast::{Node, Operator};
use cfront::parser::config::ParserConfig;
use cfront::parser::expressions::Precedence;
use cfront::parser::lexer::{tokenize, TokenKind};
use cfront::parser::parse::{Expected, ParseError, Parser};

fn statements(program: &Node) -> &[Node] {
    program.statements().expect("program should be a block")
}

#[test]
fn test_multiplication_binds_tighter() {
    let lexed = tokenize("1+2*3");
    let mut parser = Parser::new(&lexed.tokens);
    let expr = parser
        .parse_expression(Precedence::Assignment)
        .expect("Parsing failed");

    assert_eq!(
        expr,
        Node::binary(
            Operator::Add,
            Node::number(1),
            Node::binary(Operator::Multiply, Node::number(2), Node::number(3)),
        )
    );
}

#[test]
fn test_top_level_variable() {
    let program = Parser::parse_source("int x = 5;").expect("Parsing failed");
    assert_eq!(
        statements(&program),
        &[
            Node::VariableDeclaration {
                ty: Box::new(Node::type_name("int")),
                name: "x".to_string(),
                value: Some(Box::new(Node::number(5))),
            },
            Node::End,
        ]
    );
}

#[test]
fn test_typedef_visible_in_nested_block() {
    let source = r#"
        typedef int myint;
        int main() {
            {
                myint y;
            }
            return 0;
        }
    "#;
    let program = Parser::parse_source(source).expect("Parsing failed");
    let text = program.to_string();
    assert!(text.contains("VariableDeclaration y\n"), "{}", text);
    assert!(text.contains("type: TypeName myint"), "{}", text);
}

#[test]
fn test_typedef_order_matters() {
    let err = Parser::parse_source("int f() { myint y; return 0; } typedef int myint;")
        .unwrap_err();
    assert!(matches!(err, ParseError::UndeclaredName { ref name, .. } if name == "myint"));
}

#[test]
fn test_typedef_makes_star_a_declaration() {
    let program = Parser::parse_source("typedef int myint; myint * p;").expect("Parsing failed");
    match &statements(&program)[1] {
        Node::VariableDeclaration { ty, name, value } => {
            assert_eq!(name, "p");
            assert_eq!(**ty, Node::pointer_to(Node::type_name("myint")));
            assert!(value.is_none());
        }
        other => panic!("Expected declaration, got {:?}", other),
    }
}

#[test]
fn test_star_without_typedef_is_multiplication() {
    let program = Parser::parse_source("int a; int b; a * b;").expect("Parsing failed");
    assert_eq!(
        statements(&program)[2],
        Node::binary(Operator::Multiply, Node::variable("a"), Node::variable("b"))
    );
}

#[test]
fn test_unknown_leading_token_reports_expectation() {
    let err = Parser::parse_source(")").unwrap_err();
    match err {
        ParseError::UnexpectedToken {
            expected, found, ..
        } => {
            assert_eq!(expected, Expected::Statement);
            assert_eq!(found, TokenKind::RightParen);
        }
        other => panic!("Expected unexpected-token error, got {:?}", other),
    }
}

#[test]
fn test_malformed_inputs_name_expected_token() {
    let cases = [
        ("int x = 1", Expected::Token(TokenKind::Semicolon)),
        ("int f(int a { }", Expected::Token(TokenKind::RightParen)),
        ("while (1 { }", Expected::Token(TokenKind::RightParen)),
        ("struct point { int x; ", Expected::Type),
        ("int f(void) return 0;", Expected::OneOf(&[TokenKind::LeftBrace, TokenKind::Semicolon])),
    ];
    for (source, expected) in cases {
        match Parser::parse_source(source).unwrap_err() {
            ParseError::UnexpectedToken { expected: got, .. } => {
                assert_eq!(got, expected, "{}", source)
            }
            other => panic!("{}: expected unexpected-token error, got {:?}", source, other),
        }
    }
}

#[test]
fn test_unknown_type_in_parameter() {
    let err = Parser::parse_source("int f(widget w);").unwrap_err();
    assert!(matches!(err, ParseError::UnknownType { ref name, .. } if name == "widget"));
}

#[test]
fn test_whole_program() {
    let source = r#"
        struct node {
            int value;
            struct node *next;
        };

        typedef struct node node_t;

        int printf(char *format, ...);

        int sum(node_t *head) {
            int total = 0;
            while (head != NULL) {
                total += head->value;
                head = head->next;
            }
            return total;
        }

        int main(void) {
            int i;
            for (i = 0; i < 10; i++) {
                if (i % 2 == 0) continue;
                else if (i > 7) break;
            }
            do { i--; } while (i > 0 && !false);
            printf("%d\n", sum(NULL));
            return 0;
        }
    "#;
    let program = Parser::parse_source(source).expect("Parsing failed");
    let statements = statements(&program);

    assert_eq!(statements.len(), 6);
    assert!(matches!(statements[0], Node::StructType { .. }));
    assert!(matches!(statements[1], Node::Typedef { ref name, .. } if name == "node_t"));
    assert!(matches!(
        statements[2],
        Node::FunctionDeclaration { variadic: true, body: None, .. }
    ));
    assert!(matches!(
        statements[4],
        Node::FunctionDeclaration { ref parameters, body: Some(_), .. } if parameters.is_empty()
    ));
    assert_eq!(statements[5], Node::End);
}

#[test]
fn test_lenient_mode_accepts_undeclared_names() {
    let source = "int main() { return missing(1); }";
    assert!(matches!(
        Parser::parse_source(source),
        Err(ParseError::UndeclaredName { .. })
    ));
    assert!(Parser::parse_source_with(source, ParserConfig::default().lenient()).is_ok());
}

#[test]
fn test_nesting_limit() {
    let source = format!("int x = {}1{};", "(".repeat(64), ")".repeat(64));
    let config = ParserConfig::default().with_max_depth(16);
    let err = Parser::parse_source_with(&source, config).unwrap_err();
    assert!(matches!(err, ParseError::NestingTooDeep { limit: 16, .. }));
    assert!(Parser::parse_source(&source).is_ok());
}

fn nested_structs(levels: usize) -> String {
    let mut source = "int x;".to_string();
    for _ in 0..levels {
        source = format!("struct {{ {} }} m;", source);
    }
    source
}

#[test]
fn test_nested_struct_definitions_count_toward_limit() {
    let config = ParserConfig::default().with_max_depth(16);

    let err = Parser::parse_source_with(&nested_structs(200), config).unwrap_err();
    assert!(matches!(err, ParseError::NestingTooDeep { limit: 16, .. }));

    let program = Parser::parse_source_with(&nested_structs(8), config).expect("Parsing failed");
    assert!(matches!(
        statements(&program)[0],
        Node::VariableDeclaration { ref name, .. } if name == "m"
    ));
}
