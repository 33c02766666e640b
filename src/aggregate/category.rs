//! Per-category weighted and trailing averages.

use crate::error::Result;
use crate::model::{ColumnIndex, Row, Series};
use crate::schema::Schema;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use super::numeric::MetricFields;
use super::trailing::trailing_average;
use super::weighted::MonthlyAccumulator;

/// Trailing series per category name.
pub type CategorySeries = BTreeMap<String, Series>;

/// Weighted monthly averages for the selected categories, each smoothed
/// over `window` periods.
///
/// Rows of other categories are skipped without parsing their numeric
/// cells, though every row must still be as wide as the header. Every selected category has an entry in the result; one that never
/// appears in the rows maps to an empty series.
pub fn per_category_trailing<I>(
    rows: I,
    index: &ColumnIndex,
    schema: &Schema,
    categories: &[String],
    window: usize,
) -> Result<CategorySeries>
where
    I: IntoIterator<Item = Result<Row>>,
{
    let fields = MetricFields::resolve(index, schema)?;
    let category = index.position(&schema.columns.category)?;

    let mut monthly: HashMap<&str, MonthlyAccumulator> = categories
        .iter()
        .map(|name| (name.as_str(), MonthlyAccumulator::new()))
        .collect();

    for row in rows {
        let row = row?;
        index.check_width(&row)?;
        if let Some(acc) = monthly.get_mut(row.get(category)) {
            let (period, weight, metric) = fields.extract(&row)?;
            acc.add(period, weight, metric);
        }
    }

    debug!(categories = monthly.len(), window, "aggregated category series");
    Ok(monthly
        .into_iter()
        .map(|(name, acc)| (name.to_string(), trailing_average(&acc.finish(), window)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Period;

    fn header() -> Row {
        [
            "name",
            "bet_year",
            "bet_month",
            "count_of_bets",
            "avg_leg_count_inclusiveofstraightbets",
        ]
        .into_iter()
        .collect()
    }

    fn rows(data: &[[&str; 5]]) -> Vec<Result<Row>> {
        data.iter()
            .map(|cells| Ok(cells.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn test_per_category() {
        let index = ColumnIndex::from_header(&header());
        let data = rows(&[
            ["A", "2024", "1", "2", "10"],
            ["B", "2024", "1", "1", "3"],
            ["A", "2024", "1", "1", "4"],
            ["A", "2024", "2", "1", "2"],
            ["skipped", "not a year", "x", "x", "x"],
        ]);
        let selected = vec!["A".to_string(), "B".to_string(), "Ghost".to_string()];

        let result =
            per_category_trailing(data, &index, &Schema::default(), &selected, 12).unwrap();

        assert_eq!(result.len(), 3);
        let a = &result["A"];
        assert_eq!(a[&Period::new(2024, 1)], 8.0);
        assert_eq!(a[&Period::new(2024, 2)], 5.0);
        assert_eq!(result["B"][&Period::new(2024, 1)], 3.0);
        assert!(result["Ghost"].is_empty());
    }

    #[test]
    fn test_zero_weight_category() {
        let index = ColumnIndex::from_header(&header());
        let data = rows(&[["A", "2024", "1", "0", "9"]]);
        let selected = vec!["A".to_string()];

        let result =
            per_category_trailing(data, &index, &Schema::default(), &selected, 12).unwrap();
        assert_eq!(result["A"][&Period::new(2024, 1)], 0.0);
    }

    #[test]
    fn test_short_row_is_an_error() {
        let index = ColumnIndex::from_header(&header());
        let mut data = rows(&[["A", "2024", "1", "2", "10"]]);
        data.push(Ok(["other", "2024", "1"].into_iter().collect()));
        let selected = vec!["A".to_string()];

        let err =
            per_category_trailing(data, &index, &Schema::default(), &selected, 12).unwrap_err();
        assert!(matches!(err, crate::error::Error::MalformedContainer(_)));
    }
}
