//! Cell text to number conversion.

use crate::error::{Error, Result};
use crate::model::row::ensure_width;
use crate::model::{ColumnIndex, Period, Row};
use crate::schema::{NumericPolicy, Schema};

/// Parse a numeric cell, reading an empty (or all-whitespace) cell as `0.0`.
///
/// Non-numeric text, including `NaN` and infinities, is an
/// [`Error::InvalidNumber`] under [`NumericPolicy::Strict`] and `0.0` under
/// [`NumericPolicy::Lenient`].
pub fn parse_or_zero(column: &str, text: &str, policy: NumericPolicy) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match (trimmed.parse::<f64>(), policy) {
        (Ok(value), _) if value.is_finite() => Ok(value),
        (_, NumericPolicy::Lenient) => Ok(0.0),
        (_, NumericPolicy::Strict) => Err(invalid(column, text)),
    }
}

/// Parse an integer-valued cell.
///
/// Spreadsheet writers sometimes store whole numbers as `2024.0`; those are
/// accepted. Empty or fractional values are an error regardless of policy.
pub fn parse_integer(column: &str, text: &str) -> Result<i64> {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => Ok(value as i64),
        _ => Err(invalid(column, text)),
    }
}

fn invalid(column: &str, text: &str) -> Error {
    Error::InvalidNumber {
        column: column.to_string(),
        value: text.to_string(),
    }
}

/// Resolved positions of the period, weight and metric columns.
#[derive(Debug, Clone)]
pub(crate) struct MetricFields<'s> {
    year: (usize, &'s str),
    month: (usize, &'s str),
    weight: (usize, &'s str),
    metric: (usize, &'s str),
    policy: NumericPolicy,
    width: usize,
}

impl<'s> MetricFields<'s> {
    pub(crate) fn resolve(index: &ColumnIndex, schema: &'s Schema) -> Result<Self> {
        let columns = &schema.columns;
        let lookup = |name: &'s String| index.position(name).map(|pos| (pos, name.as_str()));
        Ok(Self {
            year: lookup(&columns.year)?,
            month: lookup(&columns.month)?,
            weight: lookup(&columns.weight)?,
            metric: lookup(&columns.metric)?,
            policy: schema.numeric,
            width: index.width(),
        })
    }

    /// Extract `(period, weight, metric)` from a data row.
    ///
    /// A row that is not exactly as wide as the header is an error.
    pub(crate) fn extract(&self, row: &Row) -> Result<(Period, f64, f64)> {
        ensure_width(self.width, row)?;
        let (pos, name) = self.year;
        let year = parse_integer(name, row.get(pos))?;
        let (pos, name) = self.month;
        let month = parse_integer(name, row.get(pos))?;
        let period = Period::new(
            i32::try_from(year).map_err(|_| invalid(self.year.1, row.get(self.year.0)))?,
            u32::try_from(month).map_err(|_| invalid(self.month.1, row.get(self.month.0)))?,
        );

        let (pos, name) = self.weight;
        let weight = parse_or_zero(name, row.get(pos), self.policy)?;
        let (pos, name) = self.metric;
        let metric = parse_or_zero(name, row.get(pos), self.policy)?;

        Ok((period, weight, metric))
    }
}
