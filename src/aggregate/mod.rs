//! Aggregation over sheet rows.
//!
//! All functions here take data rows only (the header has already been
//! split off and turned into a [`ColumnIndex`](crate::ColumnIndex)) and
//! make a single pass over them.
//!
//! # Example
//!
//! ```
//! use rollsheet::aggregate::{aggregate, trailing_average, DEFAULT_WINDOW};
//! use rollsheet::{ColumnIndex, Period, Row, Schema};
//!
//! let header: Row = ["bet_year", "bet_month", "count_of_bets", "avg_leg_count_inclusiveofstraightbets"]
//!     .into_iter()
//!     .collect();
//! let rows = vec![
//!     Ok(["2024", "1", "2", "10"].into_iter().collect::<Row>()),
//!     Ok(["2024", "1", "1", "4"].into_iter().collect::<Row>()),
//! ];
//!
//! let monthly = aggregate(rows, &ColumnIndex::from_header(&header), &Schema::default())?;
//! assert_eq!(monthly[&Period::new(2024, 1)], 8.0);
//!
//! let trailing = trailing_average(&monthly, DEFAULT_WINDOW);
//! assert_eq!(trailing[&Period::new(2024, 1)], 8.0);
//! # Ok::<(), rollsheet::Error>(())
//! ```

mod category;
mod numeric;
mod ranking;
mod trailing;
mod weighted;

pub use category::{per_category_trailing, CategorySeries};
pub use numeric::{parse_integer, parse_or_zero};
pub use ranking::{rank, CategoryTotals, DEFAULT_TOP_K};
pub use trailing::{trailing_average, TrailingWindow, DEFAULT_WINDOW};
pub use weighted::{aggregate, MonthlyAccumulator, WeightedAccumulator};
