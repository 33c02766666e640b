//! XLSX workbook reading.
//!
//! A [`Workbook`] loads the shared-string table once and then streams any
//! number of passes over its sheets, one row at a time.
//!
//! # Example
//!
//! ```no_run
//! use rollsheet::xlsx::{SheetMap, Workbook};
//!
//! let sheets = SheetMap::new()
//!     .with_sheet("All", "xl/worksheets/sheet1.xml")
//!     .with_sheet("Live", "xl/worksheets/sheet2.xml");
//! let mut workbook = Workbook::open("report.xlsx", sheets)?;
//!
//! let rows = workbook.stream_rows("Live")?.count();
//! println!("Live has {} rows", rows);
//! # Ok::<(), rollsheet::Error>(())
//! ```

mod rows;
mod shared_strings;
mod workbook;

pub use rows::RowStream;
pub use shared_strings::{SharedStrings, SHARED_STRINGS_PART};
pub use workbook::{MemorySheets, RowSource, SheetMap, Workbook};
