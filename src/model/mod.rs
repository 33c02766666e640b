//! Data model shared by the reader and the aggregators.
//!
//! Rows come out of the sheet reader as plain cell text; periods and series
//! are what the aggregators produce from them.

mod period;
pub(crate) mod row;

pub use period::*;
pub use row::*;
