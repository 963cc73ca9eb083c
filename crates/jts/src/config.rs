use regex::Regex;

/// Default bound on domain and array type resolution.
pub const DEFAULT_RECURSION_LIMIT: usize = 8;

/// Options for an introspection run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tables whose name matches any of these patterns are skipped, together
    /// with every foreign key pointing at them
    pub exclude_tables: Vec<Regex>,

    /// Comment components matching any of these patterns are parsed for
    /// comment-declared references. Empty disables weak reference parsing.
    pub relation_patterns: Vec<Regex>,

    /// Maximum number of domain/array steps followed when mapping a type
    pub recursion_limit: usize,
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip tables whose name matches `pattern`
    pub fn exclude_table(mut self, pattern: Regex) -> Self {
        self.exclude_tables.push(pattern);
        self
    }

    /// Parse comment components matching `pattern` for references
    pub fn relation_pattern(mut self, pattern: Regex) -> Self {
        self.relation_patterns.push(pattern);
        self
    }

    /// Set the type resolution bound
    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn is_excluded(&self, table: &str) -> bool {
        self.exclude_tables.iter().any(|re| re.is_match(table))
    }

    pub fn parses_weak_references(&self) -> bool {
        !self.relation_patterns.is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude_tables: vec![],
            relation_patterns: vec![],
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusion_patterns() {
        let config = Config::new()
            .exclude_table(Regex::new("^tmp_").unwrap())
            .exclude_table(Regex::new("_old$").unwrap());

        assert!(config.is_excluded("tmp_import"));
        assert!(config.is_excluded("users_old"));
        assert!(!config.is_excluded("users"));
    }

    #[test]
    fn defaults() {
        let config = Config::new();
        assert_eq!(config.recursion_limit, 8);
        assert!(!config.parses_weak_references());
    }
}
