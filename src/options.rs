/// The most variables the search can enumerate: candidates are indexed by a `u64`.
pub const MAX_SEARCH_VARIABLES: usize = 63;

const DEFAULT_OPTIMIZE: bool = true;
const DEFAULT_PARALLEL: bool = false;

#[derive(Debug, Clone)]
pub struct Options {
    /// Whether to rewrite the formula to its fixed point before lowering it.
    /// The search gives the same answer either way, but usually over fewer
    /// variables and operations when optimized.
    pub optimize: bool,
    /// Whether to spread the search over all cores.
    pub parallel: bool,
    /// Refuse formulas with more free variables than this, since the search
    /// takes `2^k` steps. Never more than [`MAX_SEARCH_VARIABLES`].
    pub max_variables: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            optimize: DEFAULT_OPTIMIZE,
            parallel: DEFAULT_PARALLEL,
            max_variables: None,
        }
    }
}

impl Options {
    pub fn variable_limit(&self) -> usize {
        self.max_variables
            .map_or(MAX_SEARCH_VARIABLES, |max| max.min(MAX_SEARCH_VARIABLES))
    }
}
