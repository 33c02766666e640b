//! Multi-pass analysis over a [`RowSource`].
//!
//! Each function here starts a fresh pass over one sheet, splits off the
//! header row and hands the data rows to the aggregators.

use crate::aggregate::{
    aggregate, per_category_trailing, rank, trailing_average, CategorySeries, DEFAULT_TOP_K,
    DEFAULT_WINDOW,
};
use crate::error::{Error, Result};
use crate::model::{ColumnIndex, Row, Series};
use crate::schema::Schema;
use crate::xlsx::RowSource;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Options for [`analyze`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Trailing window, in periods
    pub window: usize,
    /// Number of top categories to break out
    pub top_k: usize,
    /// Sheet holding every row
    pub all_sheet: String,
    /// Sheet holding the live subset, if there is one
    pub live_sheet: Option<String>,
    /// Column names and numeric policy
    pub schema: Schema,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            top_k: DEFAULT_TOP_K,
            all_sheet: "All".to_string(),
            live_sheet: Some("Live".to_string()),
            schema: Schema::default(),
        }
    }
}

impl AnalysisOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the trailing window.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set how many top categories to break out.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the sheet holding every row.
    pub fn with_all_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.all_sheet = sheet.into();
        self
    }

    /// Set (or clear) the live sheet.
    pub fn with_live_sheet(mut self, sheet: Option<String>) -> Self {
        self.live_sheet = sheet;
        self
    }

    /// Set the schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }
}

/// A monthly series and its trailing average.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesPair {
    pub monthly: Series,
    pub trailing: Series,
}

impl SeriesPair {
    fn smooth(monthly: Series, window: usize) -> Self {
        let trailing = trailing_average(&monthly, window);
        Self { monthly, trailing }
    }
}

/// Everything [`analyze`] computes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Trailing window used
    pub window: usize,
    /// All rows
    pub all: SeriesPair,
    /// Live rows, when a live sheet was configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<SeriesPair>,
    /// All minus live, per month, then smoothed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_live: Option<SeriesPair>,
    /// Largest categories, largest first
    pub top_categories: Vec<String>,
    /// Trailing series per top category
    pub categories: CategorySeries,
}

/// Take the header off a fresh row stream.
fn split_header<I>(rows: &mut I, sheet: &str) -> Result<ColumnIndex>
where
    I: Iterator<Item = Result<Row>>,
{
    match rows.next() {
        Some(header) => Ok(ColumnIndex::from_header(&header?)),
        None => Err(Error::MalformedContainer(format!(
            "sheet {} has no header row",
            sheet
        ))),
    }
}

/// Weighted monthly average of one sheet.
#[instrument(skip_all, fields(sheet = %sheet))]
pub fn monthly_weighted<S: RowSource>(
    source: &mut S,
    sheet: &str,
    schema: &Schema,
) -> Result<Series> {
    let mut rows = source.rows(sheet)?;
    let index = split_header(&mut rows, sheet)?;
    aggregate(rows, &index, schema)
}

/// Per-period `all - live`, over the periods of `all`.
///
/// A period missing from `live` counts as zero there.
pub fn subtract_series(all: &Series, live: &Series) -> Series {
    all.iter()
        .map(|(period, value)| (*period, value - live.get(period).copied().unwrap_or(0.0)))
        .collect()
}

/// The `k` largest categories of one sheet.
#[instrument(skip_all, fields(sheet = %sheet, k = k))]
pub fn top_categories<S: RowSource>(
    source: &mut S,
    sheet: &str,
    schema: &Schema,
    k: usize,
) -> Result<Vec<String>> {
    let mut rows = source.rows(sheet)?;
    let index = split_header(&mut rows, sheet)?;
    rank(rows, &index, schema, k)
}

/// Trailing series for each of `categories` in one sheet.
#[instrument(skip_all, fields(sheet = %sheet, categories = categories.len()))]
pub fn category_trailing<S: RowSource>(
    source: &mut S,
    sheet: &str,
    schema: &Schema,
    categories: &[String],
    window: usize,
) -> Result<CategorySeries> {
    let mut rows = source.rows(sheet)?;
    let index = split_header(&mut rows, sheet)?;
    per_category_trailing(rows, &index, schema, categories, window)
}

/// Compute the full report.
///
/// Streams the all-rows sheet three times (monthly series, ranking,
/// per-category series) and the live sheet once.
///
/// # Example
///
/// ```no_run
/// use rollsheet::xlsx::{SheetMap, Workbook};
/// use rollsheet::{analyze, AnalysisOptions};
///
/// let sheets = SheetMap::new()
///     .with_sheet("All", "xl/worksheets/sheet1.xml")
///     .with_sheet("Live", "xl/worksheets/sheet2.xml");
/// let mut workbook = Workbook::open("report.xlsx", sheets)?;
///
/// let report = analyze(&mut workbook, &AnalysisOptions::default())?;
/// println!("Top: {:?}", report.top_categories);
/// # Ok::<(), rollsheet::Error>(())
/// ```
pub fn analyze<S: RowSource>(source: &mut S, options: &AnalysisOptions) -> Result<Report> {
    let schema = &options.schema;
    let window = options.window;

    let all_monthly = monthly_weighted(source, &options.all_sheet, schema)?;

    let (live, non_live) = match &options.live_sheet {
        Some(sheet) => {
            let live_monthly = monthly_weighted(source, sheet, schema)?;
            let non_live_monthly = subtract_series(&all_monthly, &live_monthly);
            (
                Some(SeriesPair::smooth(live_monthly, window)),
                Some(SeriesPair::smooth(non_live_monthly, window)),
            )
        }
        None => (None, None),
    };

    let top = top_categories(source, &options.all_sheet, schema, options.top_k)?;
    let categories = category_trailing(source, &options.all_sheet, schema, &top, window)?;

    info!(
        periods = all_monthly.len(),
        categories = top.len(),
        "analysis complete"
    );

    Ok(Report {
        window,
        all: SeriesPair::smooth(all_monthly, window),
        live,
        non_live,
        top_categories: top,
        categories,
    })
}
