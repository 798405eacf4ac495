use std::path::Path;

/// Substrings that exclude a path (and its whole subtree) from discovery.
///
/// Built once per invocation and never mutated afterwards. A candidate path
/// is excluded when any entry occurs anywhere in its string form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    patterns: Vec<String>,
}

impl ExclusionSet {
    /// Create an empty exclusion set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from individual patterns. Blank entries are dropped, since an
    /// empty substring would match every path.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for pattern in patterns {
            set.push(pattern.as_ref());
        }
        set
    }

    /// Parse a comma-separated list such as `node_modules,target,vendor`
    pub fn parse(list: &str) -> Self {
        Self::from_patterns(list.split(','))
    }

    /// Merge another set into this one, keeping first-seen order
    pub fn extend(&mut self, other: &ExclusionSet) {
        for pattern in &other.patterns {
            self.push(pattern);
        }
    }

    fn push(&mut self, pattern: &str) {
        let pattern = pattern.trim();
        if !pattern.is_empty() && !self.patterns.iter().any(|p| p == pattern) {
            self.patterns.push(pattern.to_string());
        }
    }

    /// Whether the given path matches any pattern
    pub fn excludes(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let path = path.to_string_lossy();
        self.patterns.iter().any(|pattern| path.contains(pattern.as_str()))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
