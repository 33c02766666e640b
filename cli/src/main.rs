//! rollsheet CLI - trailing averages from XLSX workbooks
//!
//! Streams the configured sheets of a workbook and prints weighted monthly
//! trailing averages, overall and for the largest categories.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rollsheet::render::{JsonFormat, ReportOptions};
use rollsheet::{AnalysisOptions, Schema, SheetMap, Workbook, XlsxContainer};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Weighted monthly and trailing averages from XLSX workbooks
#[derive(Parser)]
#[command(
    name = "rollsheet",
    version,
    about = "Trailing averages from XLSX workbooks",
    long_about = "rollsheet - streaming XLSX aggregation.\n\n\
                  Computes weighted monthly averages and trailing-window averages \
                  for a workbook's sheets and its largest categories."
)]
struct Cli {
    /// Log progress to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute and print the trailing-average report
    Report {
        /// Input workbook path
        input: PathBuf,

        /// Map a sheet name to a part path, e.g. All=xl/worksheets/sheet1.xml
        /// (default: discover sheets from the workbook)
        #[arg(short, long = "sheet", value_parser = parse_sheet_mapping)]
        sheets: Vec<(String, String)>,

        /// JSON file with column names and numeric policy
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Sheet holding every row
        #[arg(long, default_value = "All")]
        all_sheet: String,

        /// Sheet holding the live subset
        #[arg(long, default_value = "Live")]
        live_sheet: String,

        /// Skip the live / non-live split
        #[arg(long)]
        no_live: bool,

        /// Trailing window in months
        #[arg(short, long, default_value = "12")]
        window: usize,

        /// Number of top categories to break out
        #[arg(short, long, default_value = "10")]
        top: usize,

        /// Months shown per series in text output
        #[arg(long, default_value = "3")]
        tail: usize,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,

        /// Output compact JSON (no indentation)
        #[arg(long, requires = "json")]
        compact: bool,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the sheets and parts of a workbook
    Sheets {
        /// Input workbook path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn parse_sheet_mapping(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((name, part)) if !name.is_empty() && !part.is_empty() => {
            Ok((name.to_string(), part.to_string()))
        }
        _ => Err(format!("expected NAME=PART, got {:?}", value)),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Report {
            input,
            sheets,
            config,
            all_sheet,
            live_sheet,
            no_live,
            window,
            top,
            tail,
            json,
            compact,
            output,
        } => {
            let schema = match config {
                Some(path) => load_schema(&path)?,
                None => Schema::default(),
            };

            let options = AnalysisOptions::new()
                .with_window(window)
                .with_top_k(top)
                .with_all_sheet(all_sheet)
                .with_live_sheet((!no_live).then_some(live_sheet))
                .with_schema(schema);

            let pb = create_spinner("Opening workbook...");
            let mut workbook = if sheets.is_empty() {
                Workbook::open_discovered(&input)?
            } else {
                Workbook::open(&input, sheets.into_iter().collect())?
            };

            pb.set_message("Streaming sheets...");
            let report = rollsheet::analyze(&mut workbook, &options)?;
            pb.finish_and_clear();

            let rendered = if json {
                let format = if compact {
                    JsonFormat::Compact
                } else {
                    JsonFormat::Pretty
                };
                rollsheet::render::to_json(&report, format)?
            } else {
                rollsheet::render::to_text(&report, &ReportOptions::new().with_tail(tail))?
            };

            write_output(output.as_ref(), &rendered)?;

            if let Some(path) = output {
                println!(
                    "{} Report written to {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Sheets { input } => {
            let mut container = XlsxContainer::open(&input)?;
            let sheets = SheetMap::discover(&mut container)?;

            println!("{}", "Workbook Sheets".cyan().bold());
            println!("{}", "─".repeat(40));
            if sheets.is_empty() {
                println!("{} No sheets found in workbook", "!".yellow().bold());
            }
            for (name, part) in sheets.iter() {
                let marker = if container.exists(part) {
                    "✓".green().bold()
                } else {
                    "✗".red().bold()
                };
                println!("{} {}: {}", marker, name.bold(), part);
            }

            if !container.exists(rollsheet::xlsx::SHARED_STRINGS_PART) {
                println!(
                    "{} No shared-string table; this workbook cannot be streamed",
                    "!".yellow().bold()
                );
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn load_schema(path: &Path) -> Result<Schema, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let schema = serde_json::from_str(&content)
        .map_err(|e| format!("invalid config {}: {}", path.display(), e))?;
    Ok(schema)
}

fn print_version() {
    println!("{} {}", "rollsheet".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Weighted monthly and trailing averages from XLSX workbooks");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sheet_mapping() {
        assert_eq!(
            parse_sheet_mapping("All=xl/worksheets/sheet1.xml").unwrap(),
            ("All".to_string(), "xl/worksheets/sheet1.xml".to_string())
        );
        assert!(parse_sheet_mapping("All").is_err());
        assert!(parse_sheet_mapping("=xl/worksheets/sheet1.xml").is_err());
    }

    #[test]
    fn test_report_args() {
        let cli = Cli::parse_from([
            "rollsheet",
            "report",
            "book.xlsx",
            "--sheet",
            "All=xl/worksheets/sheet1.xml",
            "--no-live",
            "--json",
            "--compact",
        ]);
        match cli.command {
            Commands::Report {
                sheets,
                no_live,
                compact,
                window,
                ..
            } => {
                assert_eq!(sheets.len(), 1);
                assert!(no_live);
                assert!(compact);
                assert_eq!(window, 12);
            }
            _ => panic!("expected report command"),
        }
    }
}
