// Constants for the C front end

/// Size in bytes of any pointer type
pub const POINTER_SIZE: usize = 8;

/// Types every translation unit starts with, declared at depth 0
/// before parsing begins: (name, size in bytes)
pub const BUILTIN_TYPES: &[(&str, usize)] = &[("int", 4), ("char", 1), ("void", 0)];

/// Default bound on combined block and expression nesting
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Depth of the translation unit's own block; depth 0 holds the built-ins
pub const TOP_LEVEL_DEPTH: usize = 1;
