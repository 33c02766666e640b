//! # rollsheet
//!
//! Streaming XLSX reader with weighted monthly and trailing-window
//! aggregation.
//!
//! Sheets are read one row at a time straight out of the compressed archive,
//! with shared-string cells resolved on the fly. The rows feed weighted
//! monthly averages, trailing averages over a fixed window, and a
//! per-category breakdown of the largest categories.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rollsheet::xlsx::{SheetMap, Workbook};
//! use rollsheet::{analyze, AnalysisOptions};
//!
//! let sheets = SheetMap::new()
//!     .with_sheet("All", "xl/worksheets/sheet1.xml")
//!     .with_sheet("Live", "xl/worksheets/sheet2.xml");
//! let mut workbook = Workbook::open("report.xlsx", sheets)?;
//!
//! let report = analyze(&mut workbook, &AnalysisOptions::default())?;
//! for (period, value) in &report.all.trailing {
//!     println!("{} {:.3}", period, value);
//! }
//! # Ok::<(), rollsheet::Error>(())
//! ```
//!
//! ## Single passes
//!
//! ```no_run
//! use rollsheet::xlsx::{SheetMap, Workbook};
//! use rollsheet::aggregate::trailing_average;
//! use rollsheet::{monthly_weighted, Schema};
//!
//! let sheets = SheetMap::new().with_sheet("All", "xl/worksheets/sheet1.xml");
//! let mut workbook = Workbook::open("report.xlsx", sheets)?;
//!
//! let monthly = monthly_weighted(&mut workbook, "All", &Schema::default())?;
//! let trailing = trailing_average(&monthly, 12);
//! # Ok::<(), rollsheet::Error>(())
//! ```

pub mod aggregate;
pub mod analysis;
pub mod container;
pub mod error;
pub mod model;
pub mod render;
pub mod schema;
pub mod xlsx;

// Re-exports
pub use analysis::{
    analyze, category_trailing, monthly_weighted, subtract_series, top_categories,
    AnalysisOptions, Report, SeriesPair,
};
pub use container::XlsxContainer;
pub use error::{Error, Result};
pub use model::{ColumnIndex, Period, Row, Series};
pub use schema::{ColumnNames, NumericPolicy, Schema};
pub use xlsx::{RowSource, RowStream, SheetMap, Workbook};

use std::path::Path;

/// Open a workbook, discover its sheets and compute the full report.
///
/// # Example
///
/// ```no_run
/// let report = rollsheet::analyze_file("report.xlsx", &rollsheet::AnalysisOptions::default())?;
/// println!("Top: {}", report.top_categories.join(", "));
/// # Ok::<(), rollsheet::Error>(())
/// ```
pub fn analyze_file(path: impl AsRef<Path>, options: &AnalysisOptions) -> Result<Report> {
    let mut workbook = Workbook::open_discovered(path)?;
    analyze(&mut workbook, options)
}
