//! Report rendering options.

/// Options for rendering a report as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Number of most recent periods shown per series
    pub tail: usize,

    /// Decimal places for values
    pub precision: usize,

    /// Include the per-category section
    pub include_categories: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            tail: 3,
            precision: 3,
            include_categories: true,
        }
    }
}

impl ReportOptions {
    /// Create new report options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many trailing periods are shown.
    pub fn with_tail(mut self, tail: usize) -> Self {
        self.tail = tail.max(1);
        self
    }

    /// Set decimal places, at most 12.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision.min(12);
        self
    }

    /// Include or omit the per-category section.
    pub fn with_categories(mut self, include: bool) -> Self {
        self.include_categories = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ReportOptions::default();
        assert_eq!(opts.tail, 3);
        assert_eq!(opts.precision, 3);
        assert!(opts.include_categories);
    }

    #[test]
    fn test_builder_clamps() {
        let opts = ReportOptions::new()
            .with_tail(0)
            .with_precision(40)
            .with_categories(false);

        assert_eq!(opts.tail, 1);
        assert_eq!(opts.precision, 12);
        assert!(!opts.include_categories);
    }
}
