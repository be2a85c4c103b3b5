//! Scope/type table used to resolve the typedef ambiguity
//!
//! C cannot be parsed without knowing which identifiers currently name types:
//! `myint * p;` is a declaration when `myint` is a typedef and a
//! multiplication otherwise. [`ScopeContext`] answers that question while the
//! parser descends through nested blocks.
//!
//! # Layout
//!
//! One [`Scope`] per block depth, stored in a `Vec` and indexed directly by
//! depth. A name declared at depth *d* is visible at every depth ≥ *d*.
//! Because a single top-down parse nests blocks strictly like a stack, a
//! scope is simply cleared when its depth is entered again; nothing is popped.
//!
//! Depth 0 holds the built-in types and is never cleared by the parser.

use super::ast::Node;
use super::constants::{BUILTIN_TYPES, POINTER_SIZE};
use rustc_hash::{FxHashMap, FxHashSet};

/// A named type visible to the parser
#[derive(Debug, Clone, PartialEq)]
pub struct TypedefEntry {
    pub name: String,
    /// The aliased type; `None` for built-ins
    pub declared_type: Option<Node>,
    pub size: usize,
}

impl TypedefEntry {
    pub fn builtin(name: &str, size: usize) -> Self {
        Self {
            name: name.to_string(),
            declared_type: None,
            size,
        }
    }
}

/// Declarations made at one block depth
#[derive(Debug, Clone, Default)]
pub struct Scope {
    types: FxHashMap<String, TypedefEntry>,
    structs: FxHashMap<String, TypedefEntry>,
    /// Variables, parameters and functions
    values: FxHashSet<String>,
}

impl Scope {
    fn clear(&mut self) {
        self.types.clear();
        self.structs.clear();
        self.values.clear();
    }
}

/// Per-depth declaration stack threaded through one parse
#[derive(Debug, Clone)]
pub struct ScopeContext {
    scopes: Vec<Scope>,
    depth: usize,
}

impl ScopeContext {
    /// Create a context with the built-in types declared at depth 0
    pub fn new() -> Self {
        let mut context = Self::empty();
        for &(name, size) in BUILTIN_TYPES {
            context.declare_type(0, name, TypedefEntry::builtin(name, size));
        }
        context
    }

    /// Create a context with no declarations at all
    pub fn empty() -> Self {
        Self {
            scopes: vec![Scope::default()],
            depth: 0,
        }
    }

    /// Current block depth (the last depth entered)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Make `depth` the current depth with an empty scope
    pub fn enter_scope(&mut self, depth: usize) {
        self.ensure_depth(depth);
        self.scopes[depth].clear();
        self.depth = depth;
        log::trace!("entered scope at depth {}", depth);
    }

    /// Make `depth` the current depth, keeping whatever it already holds
    pub fn reopen_scope(&mut self, depth: usize) {
        self.ensure_depth(depth);
        self.depth = depth;
        log::trace!("reopened scope at depth {}", depth);
    }

    /// Return to the enclosing depth. The scope being left keeps its entries
    /// until its depth is entered again, but lookups from the enclosing depth
    /// no longer reach it.
    pub fn leave_scope(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Bind a type name at `depth`; an existing binding at the same depth is
    /// replaced.
    pub fn declare_type(&mut self, depth: usize, name: &str, entry: TypedefEntry) {
        self.ensure_depth(depth);
        if self.scopes[depth].types.insert(name.to_string(), entry).is_some() {
            log::debug!("type '{}' redeclared at depth {}", name, depth);
        }
    }

    /// True iff `name` is a type at `depth` or any enclosing depth
    pub fn is_type(&self, depth: usize, name: &str) -> bool {
        self.lookup_type(depth, name).is_some()
    }

    /// Innermost visible type binding for `name`
    pub fn lookup_type(&self, depth: usize, name: &str) -> Option<&TypedefEntry> {
        self.visible(depth).find_map(|scope| scope.types.get(name))
    }

    pub fn declare_struct(&mut self, depth: usize, tag: &str, entry: TypedefEntry) {
        self.ensure_depth(depth);
        self.scopes[depth].structs.insert(tag.to_string(), entry);
    }

    pub fn lookup_struct(&self, depth: usize, tag: &str) -> Option<&TypedefEntry> {
        self.visible(depth).find_map(|scope| scope.structs.get(tag))
    }

    /// Bind a variable, parameter or function name at `depth`
    pub fn declare_value(&mut self, depth: usize, name: &str) {
        self.ensure_depth(depth);
        self.scopes[depth].values.insert(name.to_string());
    }

    pub fn is_value(&self, depth: usize, name: &str) -> bool {
        self.visible(depth).any(|scope| scope.values.contains(name))
    }

    /// Size in bytes of a type node, as seen from `depth`.
    ///
    /// Returns `None` for nodes that are not types and for struct tags that
    /// have not been defined yet. Struct members are laid out without padding.
    pub fn size_of(&self, depth: usize, ty: &Node) -> Option<usize> {
        match ty {
            Node::TypeName { name } => self.lookup_type(depth, name).map(|e| e.size),
            Node::PointerTo { .. } => Some(POINTER_SIZE),
            Node::StructType {
                members: Some(members),
                ..
            } => members.iter().try_fold(0, |total, member| match member {
                Node::VariableDeclaration { ty, .. } => {
                    Some(total + self.size_of(depth, ty)?)
                }
                _ => None,
            }),
            Node::StructType {
                name: Some(tag),
                members: None,
            } => self.lookup_struct(depth, tag).map(|e| e.size),
            _ => None,
        }
    }

    /// Scopes visible from `depth`, innermost first
    fn visible(&self, depth: usize) -> impl Iterator<Item = &Scope> {
        let end = (depth + 1).min(self.scopes.len());
        self.scopes[..end].iter().rev()
    }

    fn ensure_depth(&mut self, depth: usize) {
        if self.scopes.len() <= depth {
            self.scopes.resize_with(depth + 1, Scope::default);
        }
    }
}

impl Default for ScopeContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias(name: &str, ty: Node, size: usize) -> TypedefEntry {
        TypedefEntry {
            name: name.to_string(),
            declared_type: Some(ty),
            size,
        }
    }

    #[test]
    fn test_builtins_visible_everywhere() {
        let context = ScopeContext::new();
        assert!(context.is_type(0, "int"));
        assert!(context.is_type(5, "char"));
        assert!(!context.is_type(5, "myint"));
    }

    #[test]
    fn test_outer_visible_inner_not() {
        let mut context = ScopeContext::new();
        context.enter_scope(1);
        context.declare_type(1, "outer", alias("outer", Node::type_name("int"), 4));
        context.enter_scope(2);
        context.declare_type(2, "inner", alias("inner", Node::type_name("int"), 4));

        assert!(context.is_type(2, "outer"));
        assert!(context.is_type(2, "inner"));
        assert!(context.is_type(1, "outer"));
        assert!(!context.is_type(1, "inner"));
    }

    #[test]
    fn test_reentering_depth_clears_it() {
        let mut context = ScopeContext::new();
        context.enter_scope(1);
        context.enter_scope(2);
        context.declare_type(2, "gone", alias("gone", Node::type_name("int"), 4));
        context.declare_value(2, "x");

        context.leave_scope();
        assert_eq!(context.depth(), 1);
        assert!(!context.is_type(context.depth(), "gone"));

        context.enter_scope(2);
        assert!(!context.is_type(2, "gone"));
        assert!(!context.is_value(2, "x"));
        assert_eq!(context.depth(), 2);
    }

    #[test]
    fn test_reopen_keeps_entries() {
        let mut context = ScopeContext::new();
        context.enter_scope(1);
        context.declare_type(1, "kept", alias("kept", Node::type_name("int"), 4));
        context.declare_value(1, "x");
        context.leave_scope();

        context.reopen_scope(1);
        assert_eq!(context.depth(), 1);
        assert!(context.is_type(1, "kept"));
        assert!(context.is_value(1, "x"));
    }

    #[test]
    fn test_redeclaration_overwrites() {
        let mut context = ScopeContext::new();
        context.declare_type(1, "t", alias("t", Node::type_name("char"), 1));
        context.declare_type(1, "t", alias("t", Node::type_name("int"), 4));
        assert_eq!(context.lookup_type(1, "t").map(|e| e.size), Some(4));
    }

    #[test]
    fn test_inner_shadows_outer() {
        let mut context = ScopeContext::new();
        context.declare_type(1, "t", alias("t", Node::type_name("char"), 1));
        context.declare_type(2, "t", alias("t", Node::type_name("int"), 4));
        assert_eq!(context.lookup_type(2, "t").map(|e| e.size), Some(4));
        assert_eq!(context.lookup_type(1, "t").map(|e| e.size), Some(1));
    }

    #[test]
    fn test_size_of() {
        let mut context = ScopeContext::new();
        let point = Node::StructType {
            name: Some("point".to_string()),
            members: Some(vec![
                Node::VariableDeclaration {
                    ty: Box::new(Node::type_name("int")),
                    name: "x".to_string(),
                    value: None,
                },
                Node::VariableDeclaration {
                    ty: Box::new(Node::type_name("char")),
                    name: "tag".to_string(),
                    value: None,
                },
            ]),
        };
        assert_eq!(context.size_of(1, &point), Some(5));

        context.declare_struct(1, "point", alias("point", point, 5));
        let by_name = Node::StructType {
            name: Some("point".to_string()),
            members: None,
        };
        assert_eq!(context.size_of(1, &by_name), Some(5));
        assert_eq!(context.size_of(0, &by_name), None);
        assert_eq!(
            context.size_of(0, &Node::pointer_to(Node::type_name("char"))),
            Some(POINTER_SIZE)
        );
    }

    #[test]
    fn test_empty_context_has_no_builtins() {
        let context = ScopeContext::empty();
        assert!(!context.is_type(0, "int"));
    }
}
