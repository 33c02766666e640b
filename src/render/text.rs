//! Plain text renderer implementation.

use crate::analysis::Report;
use crate::error::Result;
use crate::model::{Period, Series};
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

use super::options::ReportOptions;

/// Convert a report to plain text.
///
/// Shows the last `tail` periods of the trailing all/live/non-live series,
/// then the top categories and the last `tail` trailing values of each.
pub fn to_text(report: &Report, options: &ReportOptions) -> Result<String> {
    let mut output = String::new();
    write_summary(&mut output, report, options)?;

    if options.include_categories && !report.top_categories.is_empty() {
        output.push('\n');
        write_categories(&mut output, report, options)?;
    }

    Ok(output.trim_end().to_string())
}

fn write_summary(out: &mut String, report: &Report, options: &ReportOptions) -> Result<()> {
    let precision = options.precision;
    let has_live = report.live.is_some();
    let w = (precision + 4).max("non_live".len());

    writeln!(
        out,
        "Trailing {}-month averages - last {} months:",
        report.window, options.tail
    )
    .map_err(render_error)?;

    let mut header = format!("{:<7}  {:>w$}", "period", "all");
    if has_live {
        write!(header, "  {:>w$}  {:>w$}", "live", "non_live").map_err(render_error)?;
    }
    writeln!(out, "{}", header.trim_end()).map_err(render_error)?;

    for period in tail_periods(&report.all.trailing, options.tail) {
        let mut line = format!(
            "{}  {:>w$.p$}",
            period,
            report.all.trailing[&period],
            w = w,
            p = precision
        );
        if has_live {
            let live = value_at(report.live.as_ref().map(|s| &s.trailing), &period);
            let non_live = value_at(report.non_live.as_ref().map(|s| &s.trailing), &period);
            write!(
                line,
                "  {:>w$.p$}  {:>w$.p$}",
                live,
                non_live,
                w = w,
                p = precision
            )
            .map_err(render_error)?;
        }
        writeln!(out, "{}", line).map_err(render_error)?;
    }

    Ok(())
}

fn write_categories(out: &mut String, report: &Report, options: &ReportOptions) -> Result<()> {
    writeln!(out, "Top categories: {}", report.top_categories.join(", ")).map_err(render_error)?;

    let name_width = report
        .top_categories
        .iter()
        .map(|name| name.width())
        .max()
        .unwrap_or(0);

    for name in &report.top_categories {
        let mut line = pad(name, name_width);
        match report.categories.get(name) {
            Some(series) if !series.is_empty() => {
                for period in tail_periods(series, options.tail) {
                    write!(
                        line,
                        "  {} {:.p$}",
                        period,
                        series[&period],
                        p = options.precision
                    )
                    .map_err(render_error)?;
                }
            }
            _ => line.push_str("  (no data)"),
        }
        writeln!(out, "{}", line.trim_end()).map_err(render_error)?;
    }

    Ok(())
}

/// The last `n` periods of a series, oldest first.
fn tail_periods(series: &Series, n: usize) -> Vec<Period> {
    let skip = series.len().saturating_sub(n);
    series.keys().skip(skip).copied().collect()
}

fn value_at(series: Option<&Series>, period: &Period) -> f64 {
    series
        .and_then(|s| s.get(period))
        .copied()
        .unwrap_or(0.0)
}

/// Left-align by display width, so wide characters line up.
fn pad(text: &str, width: usize) -> String {
    let mut padded = text.to_string();
    padded.push_str(&" ".repeat(width.saturating_sub(text.width())));
    padded
}

fn render_error(err: std::fmt::Error) -> crate::error::Error {
    crate::error::Error::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SeriesPair;

    fn series(values: &[(u32, f64)]) -> Series {
        values
            .iter()
            .map(|(m, v)| (Period::new(2024, *m), *v))
            .collect()
    }

    fn report() -> Report {
        let all = series(&[(1, 1.0), (2, 1.5), (3, 2.0), (4, 2.5)]);
        let live = series(&[(2, 0.5), (3, 1.0), (4, 1.25)]);
        let non_live = series(&[(1, 1.0), (2, 1.0), (3, 1.0), (4, 1.25)]);
        Report {
            window: 12,
            all: SeriesPair {
                monthly: all.clone(),
                trailing: all,
            },
            live: Some(SeriesPair {
                monthly: live.clone(),
                trailing: live,
            }),
            non_live: Some(SeriesPair {
                monthly: non_live.clone(),
                trailing: non_live,
            }),
            top_categories: vec!["Acme".to_string(), "日本".to_string(), "Ghost".to_string()],
            categories: [
                ("Acme".to_string(), series(&[(3, 4.0), (4, 5.0)])),
                ("日本".to_string(), series(&[(4, 2.0)])),
                ("Ghost".to_string(), Series::new()),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn test_summary_tail() {
        let text = to_text(&report(), &ReportOptions::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Trailing 12-month averages - last 3 months:");
        assert_eq!(lines[1], "period        all      live  non_live");
        assert_eq!(lines[2], "2024-02     1.500     0.500     1.000");
        assert_eq!(lines[4], "2024-04     2.500     1.250     1.250");
        assert!(!text.contains("2024-01 "));
    }

    #[test]
    fn test_categories_section() {
        let text = to_text(&report(), &ReportOptions::default()).unwrap();

        assert!(text.contains("Top categories: Acme, 日本, Ghost"));
        assert!(text.contains("Acme   2024-03 4.000  2024-04 5.000"));
        assert!(text.contains("日本   2024-04 2.000"));
        assert!(text.contains("Ghost  (no data)"));
    }

    #[test]
    fn test_without_live_or_categories() {
        let mut report = report();
        report.live = None;
        report.non_live = None;

        let options = ReportOptions::new().with_categories(false).with_precision(1);
        let text = to_text(&report, &options).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "period        all");
        assert_eq!(lines[2], "2024-02       1.5");
        assert!(!text.contains("Top categories"));
    }

    #[test]
    fn test_live_gap_reads_zero() {
        let mut report = report();
        report.live.as_mut().unwrap().trailing.remove(&Period::new(2024, 2));
        let text = to_text(&report, &ReportOptions::default()).unwrap();
        assert!(text.contains("2024-02     1.500     0.000     1.000"));
    }
}
