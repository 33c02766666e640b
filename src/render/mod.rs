//! Output rendering for reports.
//!
//! # Example
//!
//! ```no_run
//! use rollsheet::render::{to_json, to_text, JsonFormat, ReportOptions};
//! use rollsheet::xlsx::Workbook;
//! use rollsheet::{analyze, AnalysisOptions};
//!
//! let mut workbook = Workbook::open_discovered("report.xlsx")?;
//! let report = analyze(&mut workbook, &AnalysisOptions::default())?;
//!
//! println!("{}", to_text(&report, &ReportOptions::default())?);
//! std::fs::write("report.json", to_json(&report, JsonFormat::Pretty)?)?;
//! # Ok::<(), rollsheet::Error>(())
//! ```

mod json;
mod options;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::ReportOptions;
pub use text::to_text;
