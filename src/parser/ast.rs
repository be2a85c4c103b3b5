// AST (Abstract Syntax Tree) definitions for the C front end

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Operators carried by [`Node::Equation`]
///
/// Binary operators use both operands; `Negate`, `Not`, `Dereference` and
/// `AddressOf` are unary and leave `right` empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Assign,
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    // Comparison
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    // Logical
    And,
    Or,
    // Unary
    Negate,
    Not,
    Dereference,
    AddressOf,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operator::Assign => "assign",
            Operator::Add => "add",
            Operator::Subtract => "subtract",
            Operator::Multiply => "multiply",
            Operator::Divide => "divide",
            Operator::Modulo => "modulo",
            Operator::Equal => "equal",
            Operator::NotEqual => "not equal",
            Operator::Less => "less than",
            Operator::LessEqual => "less than or equal",
            Operator::Greater => "greater than",
            Operator::GreaterEqual => "greater than or equal",
            Operator::And => "logical and",
            Operator::Or => "logical or",
            Operator::Negate => "negate",
            Operator::Not => "not",
            Operator::Dereference => "dereference",
            Operator::AddressOf => "address of",
        };
        f.write_str(label)
    }
}

/// Function parameter: a (type, name) pair
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub ty: Box<Node>,
    pub name: String,
}

/// AST nodes representing statements, expressions and types
///
/// Every node owns its children outright; the tree has no sharing and no
/// back-edges, so a subtree can be moved or cloned freely once parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Block {
        statements: Vec<Node>,
    },
    /// Marks the end of the translation unit
    End,

    // Expressions
    NumberLiteral {
        value: i64,
    },
    StringLiteral {
        text: String,
    },
    Null,
    Variable {
        name: String,
    },
    Equation {
        operator: Operator,
        left: Box<Node>,
        right: Option<Box<Node>>,
    },
    StructMemberGet {
        from: Box<Node>,
        name: String,
    },
    FunctionCall {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },

    // Control flow
    If {
        condition: Box<Node>,
        success: Box<Node>,
        fail: Option<Box<Node>>,
    },
    While {
        condition: Box<Node>,
        body: Box<Node>,
    },
    DoWhile {
        body: Box<Node>,
        condition: Box<Node>,
    },
    For {
        init: Option<Box<Node>>,
        condition: Option<Box<Node>>,
        step: Option<Box<Node>>,
        body: Box<Node>,
    },
    Return {
        value: Option<Box<Node>>,
    },
    Break,
    Continue,

    // Declarations
    VariableDeclaration {
        ty: Box<Node>,
        name: String,
        value: Option<Box<Node>>,
    },
    FunctionDeclaration {
        ty: Box<Node>,
        name: String,
        parameters: Vec<Parameter>,
        variadic: bool,
        /// `None` for a prototype (`int f(int a);`)
        body: Option<Box<Node>>,
    },
    Typedef {
        ty: Box<Node>,
        name: String,
    },

    // Types
    TypeName {
        name: String,
    },
    PointerTo {
        inner: Box<Node>,
    },
    StructType {
        name: Option<String>,
        /// `None` when the struct is only referenced by name
        members: Option<Vec<Node>>,
    },
}

impl Node {
    pub fn block(statements: Vec<Node>) -> Self {
        Node::Block { statements }
    }

    pub fn number(value: i64) -> Self {
        Node::NumberLiteral { value }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Node::Variable { name: name.into() }
    }

    pub fn type_name(name: impl Into<String>) -> Self {
        Node::TypeName { name: name.into() }
    }

    pub fn pointer_to(inner: Node) -> Self {
        Node::PointerTo {
            inner: Box::new(inner),
        }
    }

    pub fn binary(operator: Operator, left: Node, right: Node) -> Self {
        Node::Equation {
            operator,
            left: Box::new(left),
            right: Some(Box::new(right)),
        }
    }

    pub fn unary(operator: Operator, operand: Node) -> Self {
        Node::Equation {
            operator,
            left: Box::new(operand),
            right: None,
        }
    }

    /// `target = target <op> rhs`, the shape every compound assignment and
    /// increment is lowered to.
    pub fn desugared_assignment(target: Node, operator: Operator, rhs: Node) -> Self {
        let value = Node::binary(operator, target.clone(), rhs);
        Node::binary(Operator::Assign, target, value)
    }

    /// Short label used by the debug printer
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Block { .. } => "Block",
            Node::End => "End",
            Node::NumberLiteral { .. } => "NumberLiteral",
            Node::StringLiteral { .. } => "StringLiteral",
            Node::Null => "Null",
            Node::Variable { .. } => "Variable",
            Node::Equation { .. } => "Equation",
            Node::StructMemberGet { .. } => "StructMemberGet",
            Node::FunctionCall { .. } => "FunctionCall",
            Node::If { .. } => "If",
            Node::While { .. } => "While",
            Node::DoWhile { .. } => "DoWhile",
            Node::For { .. } => "For",
            Node::Return { .. } => "Return",
            Node::Break => "Break",
            Node::Continue => "Continue",
            Node::VariableDeclaration { .. } => "VariableDeclaration",
            Node::FunctionDeclaration { .. } => "FunctionDeclaration",
            Node::Typedef { .. } => "Typedef",
            Node::TypeName { .. } => "TypeName",
            Node::PointerTo { .. } => "PointerTo",
            Node::StructType { .. } => "StructType",
        }
    }

    /// Statements of a block, or `None` for any other node
    pub fn statements(&self) -> Option<&[Node]> {
        match self {
            Node::Block { statements } => Some(statements),
            _ => None,
        }
    }

    /// Number of `PointerTo` layers wrapped around a type node
    pub fn pointer_depth(&self) -> usize {
        match self {
            Node::PointerTo { inner } => 1 + inner.pointer_depth(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desugared_assignment_shape() {
        let node = Node::desugared_assignment(
            Node::variable("i"),
            Operator::Add,
            Node::number(1),
        );

        match node {
            Node::Equation {
                operator: Operator::Assign,
                left,
                right: Some(right),
            } => {
                assert_eq!(*left, Node::variable("i"));
                assert_eq!(
                    *right,
                    Node::binary(Operator::Add, Node::variable("i"), Node::number(1))
                );
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_pointer_depth() {
        let ty = Node::pointer_to(Node::pointer_to(Node::type_name("char")));
        assert_eq!(ty.pointer_depth(), 2);
        assert_eq!(Node::type_name("int").pointer_depth(), 0);
    }
}
