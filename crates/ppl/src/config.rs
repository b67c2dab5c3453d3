//! Parser limits

/// Resource limits applied to a single parse call
///
/// ```
/// use ppl::ParserConfig;
///
/// let config = ParserConfig::new().with_max_depth(32).with_max_tokens(1_000);
/// assert_eq!(config.max_depth, 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting of parentheses, function calls and prefix operators
    pub max_depth: usize,
    /// Maximum binary operators stacked along one expression path, counting
    /// the operators of enclosing chains
    pub max_chain: usize,
    pub max_input_bytes: usize,
    pub max_tokens: usize,
}

pub const DEFAULT_MAX_DEPTH: usize = 128;
pub const DEFAULT_MAX_CHAIN: usize = 1024;
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;
pub const DEFAULT_MAX_TOKENS: usize = 100_000;

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_chain: DEFAULT_MAX_CHAIN,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }

    pub fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}
