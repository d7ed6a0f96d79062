//! Evaluation limits.

/// Environment variable overriding [`EvalConfig::max_depth`].
const MAX_DEPTH_VAR: &str = "CARDEX_MAX_DEPTH";

/// Limits applied while evaluating a tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EvalConfig {
    /// Deepest node nesting an evaluation may reach before failing with a
    /// `StackOverflow` calculation error.
    pub max_depth: usize,
}

impl EvalConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 1024;

    /// Default limits, overridden by `CARDEX_MAX_DEPTH` when it holds a
    /// positive integer.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(MAX_DEPTH_VAR) {
            match parse_depth(&raw) {
                Some(depth) => config.max_depth = depth,
                None => tracing::warn!(
                    value = %raw,
                    "ignoring invalid {MAX_DEPTH_VAR}, using {}",
                    config.max_depth
                ),
            }
        }
        config
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

fn parse_depth(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|&depth| depth > 0)
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
