//! Fuzzy matching for list filters.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Case-insensitive fuzzy matcher; characters of the pattern must appear in
/// order but need not be consecutive.
pub struct Matcher {
    inner: SkimMatcherV2,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            inner: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// An empty pattern matches everything.
    pub fn matches(&self, text: &str, pattern: &str) -> bool {
        pattern.is_empty() || self.inner.fuzzy_match(text, pattern).is_some()
    }

    /// Indices of `texts` that match `pattern`, in their original order.
    pub fn filter<'a>(&self, texts: impl IntoIterator<Item = &'a str>, pattern: &str) -> Vec<usize> {
        texts
            .into_iter()
            .enumerate()
            .filter(|(_, text)| self.matches(text, pattern))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_match() {
        let matcher = Matcher::new();

        assert!(matcher.matches("Orthopedics: Hip Tray", "ortho"));
        assert!(matcher.matches("Orthopedics: Hip Tray", "hptr"));
        assert!(matcher.matches("ENT: Tonsil Set", "ENT"));
        assert!(matcher.matches("ent: tonsil set", "TONSIL"));
        assert!(!matcher.matches("ENT: Tonsil Set", "xyz"));
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        let matcher = Matcher::new();
        assert!(matcher.matches("", ""));
        assert!(matcher.matches("Cardiology", ""));
    }

    #[test]
    fn test_filter_keeps_order() {
        let matcher = Matcher::new();
        let rows = ["ENT: ToolA", "Ortho: Tray1", "Ortho: Tray2", "Cardio: Tray9"];
        assert_eq!(matcher.filter(rows, "tray"), vec![1, 2, 3]);
        assert_eq!(matcher.filter(rows, "ortho"), vec![1, 2]);
        assert_eq!(matcher.filter(rows, ""), vec![0, 1, 2, 3]);
    }
}
