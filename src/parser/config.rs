//! Parser configuration
//!
//! [`ParserConfig`] carries the knobs a hosting tool may want to turn; the
//! defaults match what the command-line driver uses without flags.

use super::constants::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum combined nesting of blocks and sub-expressions. Recursion is
    /// proportional to this, so it bounds stack use on hostile input.
    pub max_depth: usize,
    /// Reject identifiers in expressions that were never declared as a
    /// variable, parameter or function.
    pub require_declared_names: bool,
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Accept undeclared names in expressions, e.g. calls to library
    /// functions that have no prototype in the file.
    pub fn lenient(mut self) -> Self {
        self.require_declared_names = false;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            require_declared_names: true,
        }
    }
}
