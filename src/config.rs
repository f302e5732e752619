//! Tunables for the checker and the code generator.

/// Type checker configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Warn when a function without a declared return type has more `return`s than this. The distinct-type reduction
    /// over them is quadratic.
    pub return_warning_threshold: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            return_warning_threshold: 4,
        }
    }
}

impl CheckerConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the return-count warning threshold
    pub fn with_return_warning_threshold(mut self, threshold: usize) -> Self {
        self.return_warning_threshold = threshold;
        self
    }
}

/// Code generation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    /// Number of spaces per indentation level
    pub indent_width: usize,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self { indent_width: 2 }
    }
}

impl EmitConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Default config tests
    // ========================================

    #[test]
    fn test_default_return_warning_threshold() {
        assert_eq!(CheckerConfig::default().return_warning_threshold, 4);
    }

    #[test]
    fn test_default_indent_width() {
        assert_eq!(EmitConfig::default().indent_width, 2);
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(CheckerConfig::new(), CheckerConfig::default());
        assert_eq!(EmitConfig::new(), EmitConfig::default());
    }

    // ========================================
    // Builder tests
    // ========================================

    #[test]
    fn test_with_return_warning_threshold() {
        let config = CheckerConfig::new().with_return_warning_threshold(16);
        assert_eq!(config.return_warning_threshold, 16);
    }

    #[test]
    fn test_with_indent_width() {
        let config = EmitConfig::new().with_indent_width(4);
        assert_eq!(config.indent_width, 4);
    }
}
