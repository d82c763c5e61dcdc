// Interpreter configuration

/// Maximum number of simultaneously active function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 4000;

/// Execution limits for an [`Interpreter`](crate::interpreter::engine::Interpreter)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// A call made while this many calls are active fails with
    /// `RecursionLimitExceeded`
    pub max_call_depth: usize,
}

impl InterpreterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}
