//! Column configuration for the aggregation passes.

use serde::{Deserialize, Serialize};

/// What to do with a non-empty cell in a numeric column that is not a
/// number. Empty cells always read as `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    /// Fail with [`Error::InvalidNumber`](crate::Error::InvalidNumber).
    #[default]
    Strict,
    /// Read it as `0.0`.
    Lenient,
}

/// Header names of the columns the aggregators read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Integer year of the row's period
    pub year: String,
    /// Integer month (1-12) of the row's period
    pub month: String,
    /// Weight of the row's metric, e.g. a count
    pub weight: String,
    /// The averaged metric
    pub metric: String,
    /// Category (operator) name
    pub category: String,
    /// Magnitude summed per category for ranking
    pub magnitude: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            year: "bet_year".to_string(),
            month: "bet_month".to_string(),
            weight: "count_of_bets".to_string(),
            metric: "avg_leg_count_inclusiveofstraightbets".to_string(),
            category: "name".to_string(),
            magnitude: "total_bet_handle".to_string(),
        }
    }
}

/// Column names plus the numeric parsing policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub columns: ColumnNames,
    pub numeric: NumericPolicy,
}

impl Schema {
    /// Create the default schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column names.
    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    /// Set the numeric policy.
    pub fn with_numeric_policy(mut self, numeric: NumericPolicy) -> Self {
        self.numeric = numeric;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let schema: Schema =
            serde_json::from_str(r#"{"columns": {"metric": "avg_odds"}, "numeric": "lenient"}"#)
                .unwrap();
        assert_eq!(schema.columns.metric, "avg_odds");
        assert_eq!(schema.columns.year, "bet_year");
        assert_eq!(schema.numeric, NumericPolicy::Lenient);
    }

    #[test]
    fn test_empty_config_is_default() {
        let schema: Schema = serde_json::from_str("{}").unwrap();
        assert_eq!(schema, Schema::default());
    }
}
