//! Trailing-window averages.

use crate::model::{Period, Series};
use std::borrow::Borrow;
use std::collections::VecDeque;

/// Default trailing window, in periods.
pub const DEFAULT_WINDOW: usize = 12;

/// FIFO of the most recent values plus their running sum.
#[derive(Debug, Clone)]
pub struct TrailingWindow {
    capacity: usize,
    values: VecDeque<f64>,
    total: f64,
}

impl TrailingWindow {
    /// Create a window holding up to `capacity` values (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
            total: 0.0,
        }
    }

    /// Push the next value and return the average of the values now held.
    ///
    /// Until the window fills, this averages over fewer than `capacity`
    /// values.
    pub fn push(&mut self, value: f64) -> f64 {
        self.values.push_back(value);
        self.total += value;
        if self.values.len() > self.capacity {
            if let Some(oldest) = self.values.pop_front() {
                self.total -= oldest;
            }
        }
        self.total / self.values.len() as f64
    }

    /// Number of values currently held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for TrailingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// Trailing average of a series over `window` periods.
///
/// Periods are sorted before windowing, whatever order the input yields
/// them in. The `i`-th period (from zero) is divided by `min(i + 1, window)`.
/// A `window` of zero is treated as one.
///
/// # Example
///
/// ```
/// use rollsheet::aggregate::trailing_average;
/// use rollsheet::{Period, Series};
///
/// let series: Series = [
///     (Period::new(2024, 3), 3.0),
///     (Period::new(2024, 1), 1.0),
///     (Period::new(2024, 2), 2.0),
/// ]
/// .into_iter()
/// .collect();
///
/// let trailing = trailing_average(&series, 12);
/// assert_eq!(trailing[&Period::new(2024, 3)], 2.0);
/// ```
pub fn trailing_average<I, P, V>(series: I, window: usize) -> Series
where
    I: IntoIterator<Item = (P, V)>,
    P: Borrow<Period>,
    V: Borrow<f64>,
{
    let mut points: Vec<(Period, f64)> = series
        .into_iter()
        .map(|(p, v)| (*p.borrow(), *v.borrow()))
        .collect();
    points.sort_by_key(|(period, _)| *period);

    let mut trailing = TrailingWindow::new(window);
    points
        .into_iter()
        .map(|(period, value)| (period, trailing.push(value)))
        .collect()
}
