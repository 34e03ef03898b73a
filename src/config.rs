//! Tunables for a [`PatternMask`](crate::PatternMask).

use crate::pattern::parser::DEFAULT_MAX_NESTING_DEPTH;

/// Stand-in length for an unbounded element when a concrete count is needed.
pub const DEFAULT_UNBOUNDED_CONSUME_LIMIT: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskConfig {
    /// Punctuation kept by the input filter in addition to alphanumerics.
    pub allowed_punctuation: Vec<char>,
    /// Safety ceiling used in place of an unbounded length.
    pub unbounded_consume_limit: usize,
    /// Group nesting beyond this depth makes the pattern unanalyzable.
    pub max_nesting_depth: usize,
    /// Character standing for one input position in [`expected_format`].
    ///
    /// [`expected_format`]: crate::PatternMask::expected_format
    pub placeholder: char,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            allowed_punctuation: Vec::new(),
            unbounded_consume_limit: DEFAULT_UNBOUNDED_CONSUME_LIMIT,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            placeholder: '#',
        }
    }
}

impl MaskConfig {
    pub fn with_allowed_punctuation(mut self, punctuation: impl IntoIterator<Item = char>) -> Self {
        self.allowed_punctuation = punctuation.into_iter().collect();
        self
    }

    pub fn with_unbounded_consume_limit(mut self, limit: usize) -> Self {
        self.unbounded_consume_limit = limit.max(1);
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_placeholder(mut self, placeholder: char) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// True for characters the input filter keeps.
    pub fn keeps(&self, ch: char) -> bool {
        ch.is_alphanumeric() || self.allowed_punctuation.contains(&ch)
    }

    /// `text` with every character the filter drops removed.
    pub fn filter(&self, text: &str) -> String {
        text.chars().filter(|&c| self.keeps(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keeps_only_alphanumerics() {
        let config = MaskConfig::default();
        assert_eq!(config.filter("(555) 123-4567"), "5551234567");
        assert_eq!(config.filter("Ab9é"), "Ab9é");
    }

    #[test]
    fn allowed_punctuation_survives() {
        let config = MaskConfig::default().with_allowed_punctuation(['-', '.']);
        assert_eq!(config.filter("1-2.3/4"), "1-2.34");
    }

    #[test]
    fn consume_limit_is_positive() {
        assert_eq!(
            MaskConfig::default()
                .with_unbounded_consume_limit(0)
                .unbounded_consume_limit,
            1
        );
    }
}
