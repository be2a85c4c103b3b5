//! Indented debug dump of the AST
//!
//! One line per node, children indented two spaces below their parent and
//! prefixed with the field they occupy:
//!
//! ```text
//! Block
//!   VariableDeclaration x
//!     type: TypeName int
//!     value: NumberLiteral 5
//!   End
//! ```

use super::ast::{Node, Parameter};
use std::fmt::{self, Write};

/// Writes a tree to any [`fmt::Write`] sink
pub struct TreePrinter<W: Write> {
    out: W,
    indent_width: usize,
}

impl<W: Write> TreePrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent_width: 2,
        }
    }

    pub fn print(&mut self, node: &Node) -> fmt::Result {
        self.node(None, node, 0)
    }

    fn line(&mut self, label: Option<&str>, text: &str, depth: usize) -> fmt::Result {
        write!(self.out, "{:width$}", "", width = depth * self.indent_width)?;
        if let Some(label) = label {
            write!(self.out, "{}: ", label)?;
        }
        writeln!(self.out, "{}", text)
    }

    fn optional(&mut self, label: &str, node: Option<&Node>, depth: usize) -> fmt::Result {
        match node {
            Some(node) => self.node(Some(label), node, depth),
            None => self.line(Some(label), "none", depth),
        }
    }

    fn parameter(&mut self, parameter: &Parameter, depth: usize) -> fmt::Result {
        self.line(Some("parameter"), &parameter.name, depth)?;
        self.node(Some("type"), &parameter.ty, depth + 1)
    }

    fn node(&mut self, label: Option<&str>, node: &Node, depth: usize) -> fmt::Result {
        let kind = node.kind_name();
        let child = depth + 1;

        match node {
            Node::Block { statements } => {
                self.line(label, kind, depth)?;
                for statement in statements {
                    self.node(None, statement, child)?;
                }
                Ok(())
            }
            Node::End | Node::Null | Node::Break | Node::Continue => self.line(label, kind, depth),
            Node::NumberLiteral { value } => {
                self.line(label, &format!("{} {}", kind, value), depth)
            }
            Node::StringLiteral { text } => {
                self.line(label, &format!("{} {:?}", kind, text), depth)
            }
            Node::Variable { name } | Node::TypeName { name } => {
                self.line(label, &format!("{} {}", kind, name), depth)
            }
            Node::Equation {
                operator,
                left,
                right,
            } => {
                self.line(label, &format!("{} ({})", kind, operator), depth)?;
                self.node(Some("left"), left, child)?;
                if let Some(right) = right {
                    self.node(Some("right"), right, child)?;
                }
                Ok(())
            }
            Node::StructMemberGet { from, name } => {
                self.line(label, &format!("{} {}", kind, name), depth)?;
                self.node(Some("from"), from, child)
            }
            Node::FunctionCall { callee, arguments } => {
                self.line(label, kind, depth)?;
                self.node(Some("callee"), callee, child)?;
                for argument in arguments {
                    self.node(Some("argument"), argument, child)?;
                }
                Ok(())
            }
            Node::If {
                condition,
                success,
                fail,
            } => {
                self.line(label, kind, depth)?;
                self.node(Some("condition"), condition, child)?;
                self.node(Some("success"), success, child)?;
                self.optional("fail", fail.as_deref(), child)
            }
            Node::While { condition, body } => {
                self.line(label, kind, depth)?;
                self.node(Some("condition"), condition, child)?;
                self.node(Some("body"), body, child)
            }
            Node::DoWhile { body, condition } => {
                self.line(label, kind, depth)?;
                self.node(Some("body"), body, child)?;
                self.node(Some("condition"), condition, child)
            }
            Node::For {
                init,
                condition,
                step,
                body,
            } => {
                self.line(label, kind, depth)?;
                self.optional("init", init.as_deref(), child)?;
                self.optional("condition", condition.as_deref(), child)?;
                self.optional("step", step.as_deref(), child)?;
                self.node(Some("body"), body, child)
            }
            Node::Return { value } => {
                self.line(label, kind, depth)?;
                if let Some(value) = value {
                    self.node(Some("value"), value, child)?;
                }
                Ok(())
            }
            Node::VariableDeclaration { ty, name, value } => {
                self.line(label, &format!("{} {}", kind, name), depth)?;
                self.node(Some("type"), ty, child)?;
                if let Some(value) = value {
                    self.node(Some("value"), value, child)?;
                }
                Ok(())
            }
            Node::FunctionDeclaration {
                ty,
                name,
                parameters,
                variadic,
                body,
            } => {
                let suffix = if *variadic { " (variadic)" } else { "" };
                self.line(label, &format!("{} {}{}", kind, name, suffix), depth)?;
                self.node(Some("type"), ty, child)?;
                for parameter in parameters {
                    self.parameter(parameter, child)?;
                }
                self.optional("body", body.as_deref(), child)
            }
            Node::Typedef { ty, name } => {
                self.line(label, &format!("{} {}", kind, name), depth)?;
                self.node(Some("type"), ty, child)
            }
            Node::PointerTo { inner } => {
                self.line(label, kind, depth)?;
                self.node(Some("inner"), inner, child)
            }
            Node::StructType { name, members } => {
                let name = name.as_deref().unwrap_or("<anonymous>");
                self.line(label, &format!("{} {}", kind, name), depth)?;
                for member in members.iter().flatten() {
                    self.node(Some("member"), member, child)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TreePrinter::new(f).print(self)
    }
}
