//! Weighted monthly averages.

use crate::error::Result;
use crate::model::{ColumnIndex, Period, Row, Series};
use crate::schema::Schema;
use std::collections::BTreeMap;
use tracing::debug;

use super::numeric::MetricFields;

/// Running `sum(metric * weight)` and `sum(weight)` for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedAccumulator {
    pub weighted_sum: f64,
    pub weight: f64,
}

impl WeightedAccumulator {
    /// Add one observation.
    pub fn add(&mut self, metric: f64, weight: f64) {
        self.weighted_sum += metric * weight;
        self.weight += weight;
    }

    /// The weighted average, or `0.0` when the total weight is zero.
    pub fn average(&self) -> f64 {
        if self.weight == 0.0 {
            0.0
        } else {
            self.weighted_sum / self.weight
        }
    }
}

/// One [`WeightedAccumulator`] per period.
#[derive(Debug, Clone, Default)]
pub struct MonthlyAccumulator {
    periods: BTreeMap<Period, WeightedAccumulator>,
}

impl MonthlyAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation to its period, starting the period at zero on
    /// first touch.
    pub fn add(&mut self, period: Period, weight: f64, metric: f64) {
        self.periods.entry(period).or_default().add(metric, weight);
    }

    /// State of one period.
    pub fn get(&self, period: &Period) -> Option<&WeightedAccumulator> {
        self.periods.get(period)
    }

    /// Number of periods seen.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Check if no rows were added.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Finalize every period to its weighted average.
    pub fn finish(&self) -> Series {
        self.periods
            .iter()
            .map(|(period, acc)| (*period, acc.average()))
            .collect()
    }
}

/// Weighted monthly average of the metric column over data rows.
///
/// `rows` must not include the header, and every row must be exactly as
/// wide as the header. Column names are resolved against
/// `index` before the first row is read, so a missing column fails with
/// [`Error::UnknownColumn`](crate::Error::UnknownColumn) without consuming
/// the stream.
pub fn aggregate<I>(rows: I, index: &ColumnIndex, schema: &Schema) -> Result<Series>
where
    I: IntoIterator<Item = Result<Row>>,
{
    let fields = MetricFields::resolve(index, schema)?;
    let mut monthly = MonthlyAccumulator::new();
    let mut count = 0usize;

    for row in rows {
        let row = row?;
        let (period, weight, metric) = fields.extract(&row)?;
        monthly.add(period, weight, metric);
        count += 1;
    }

    debug!(rows = count, periods = monthly.len(), "aggregated monthly averages");
    Ok(monthly.finish())
}
