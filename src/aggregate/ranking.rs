//! Top categories by summed magnitude.

use crate::error::Result;
use crate::model::{ColumnIndex, Row};
use crate::schema::Schema;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

use super::numeric::parse_or_zero;

/// Default number of categories kept by [`rank`].
pub const DEFAULT_TOP_K: usize = 10;

/// Per-category running totals, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct CategoryTotals {
    totals: Vec<(String, f64)>,
    positions: HashMap<String, usize>,
}

impl CategoryTotals {
    /// Create empty totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to a category's total.
    pub fn add(&mut self, category: &str, amount: f64) {
        match self.positions.get(category) {
            Some(&pos) => self.totals[pos].1 += amount,
            None => {
                self.positions
                    .insert(category.to_string(), self.totals.len());
                self.totals.push((category.to_string(), amount));
            }
        }
    }

    /// Total of one category.
    pub fn get(&self, category: &str) -> Option<f64> {
        self.positions.get(category).map(|&pos| self.totals[pos].1)
    }

    /// All totals in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.totals.iter().map(|(name, total)| (name.as_str(), *total))
    }

    /// Number of distinct categories.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// The `k` largest categories, largest first.
    ///
    /// Equal totals keep their order of first appearance. A `NaN` total
    /// ranks below every number.
    pub fn top(mut self, k: usize) -> Vec<String> {
        self.totals.sort_by(|a, b| descending(a.1, b.1));
        self.totals.truncate(k);
        self.totals.into_iter().map(|(name, _)| name).collect()
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Rank categories by the sum of the magnitude column over data rows.
///
/// `rows` must not include the header, and every row must be as wide as
/// the header.
pub fn rank<I>(rows: I, index: &ColumnIndex, schema: &Schema, k: usize) -> Result<Vec<String>>
where
    I: IntoIterator<Item = Result<Row>>,
{
    let columns = &schema.columns;
    let category = index.position(&columns.category)?;
    let magnitude = index.position(&columns.magnitude)?;

    let mut totals = CategoryTotals::new();
    for row in rows {
        let row = row?;
        index.check_width(&row)?;
        let amount = parse_or_zero(&columns.magnitude, row.get(magnitude), schema.numeric)?;
        totals.add(row.get(category), amount);
    }

    debug!(categories = totals.len(), k, "ranked categories");
    Ok(totals.top(k))
}
