//! Utility to explore XLSX structure for development
use rollsheet::container::XlsxContainer;
use rollsheet::xlsx::{SheetMap, Workbook};

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or("test-files/sample.xlsx".to_string());
    let rows_per_sheet: usize = std::env::args()
        .nth(2)
        .and_then(|n| n.parse().ok())
        .unwrap_or(5);

    let mut container = XlsxContainer::open(&path).expect("Failed to open file");

    println!("=== Parts in archive ===");
    for file in container.list_files() {
        println!("  {}", file);
    }

    let sheets = SheetMap::discover(&mut container).expect("Failed to read workbook");
    println!("\n=== Sheets ===");
    for (name, part) in sheets.iter() {
        println!("  {} -> {}", name, part);
    }

    let mut workbook = Workbook::from_container(container, sheets.clone())
        .expect("Failed to load shared strings");
    println!(
        "\n=== Shared strings: {} ===",
        workbook.shared_strings().len()
    );

    for (name, _) in sheets.iter() {
        println!("\n=== {} (first {} rows) ===", name, rows_per_sheet);
        match workbook.stream_rows(name) {
            Ok(rows) => {
                for row in rows.take(rows_per_sheet) {
                    match row {
                        Ok(row) => println!("  {:?}", row.cells),
                        Err(e) => {
                            println!("  ERROR: {}", e);
                            break;
                        }
                    }
                }
            }
            Err(e) => println!("  ERROR: {}", e),
        }
    }
}
