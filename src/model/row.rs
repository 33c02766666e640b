//! Sheet rows and header-derived column lookup.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One sheet row: cell text values in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    /// Create a row from its cell values.
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Text of the cell at `position`, or `""` past the end.
    pub fn get(&self, position: usize) -> &str {
        self.cells.get(position).map(String::as_str).unwrap_or("")
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Column name to position, built once from a header row.
///
/// The header's width is kept too: every data row read against the index
/// must have exactly that many cells.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
    width: usize,
}

impl ColumnIndex {
    /// Build the index from a header row.
    ///
    /// If a name repeats, the rightmost column wins.
    pub fn from_header(header: &Row) -> Self {
        let positions = header
            .cells
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            positions,
            width: header.len(),
        }
    }

    /// Number of cells in the header row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Fail with [`Error::MalformedContainer`] unless `row` is exactly as
    /// wide as the header.
    pub fn check_width(&self, row: &Row) -> Result<()> {
        ensure_width(self.width, row)
    }

    /// Position of a named column.
    pub fn position(&self, name: &str) -> Result<usize> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    /// Check if a column is present.
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Number of distinct column names.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the header had no columns.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

pub(crate) fn ensure_width(expected: usize, row: &Row) -> Result<()> {
    if row.len() == expected {
        Ok(())
    } else {
        Err(Error::MalformedContainer(format!(
            "data row has {} cells, header has {}",
            row.len(),
            expected
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        let header: Row = ["bet_year", "bet_month", "name"].into_iter().collect();
        let index = ColumnIndex::from_header(&header);

        assert_eq!(index.len(), 3);
        assert_eq!(index.width(), 3);
        assert_eq!(index.position("bet_month").unwrap(), 1);
        assert!(index.contains("name"));
        assert!(matches!(
            index.position("count_of_bets"),
            Err(Error::UnknownColumn(name)) if name == "count_of_bets"
        ));
    }

    #[test]
    fn test_duplicate_header_rightmost_wins() {
        let header: Row = ["a", "b", "a"].into_iter().collect();
        let index = ColumnIndex::from_header(&header);
        assert_eq!(index.position("a").unwrap(), 2);
    }

    #[test]
    fn test_row_get() {
        let row: Row = ["x", "y"].into_iter().collect();
        assert_eq!(row.get(1), "y");
        assert_eq!(row.get(5), "");
    }

    #[test]
    fn test_check_width() {
        let header: Row = ["a", "b", "a"].into_iter().collect();
        let index = ColumnIndex::from_header(&header);
        assert_eq!(index.len(), 2);
        assert_eq!(index.width(), 3);

        assert!(index.check_width(&["1", "2", "3"].into_iter().collect()).is_ok());
        let short: Row = ["1", "2"].into_iter().collect();
        match index.check_width(&short) {
            Err(Error::MalformedContainer(msg)) => assert!(msg.contains("2 cells")),
            other => panic!("unexpected result: {:?}", other),
        }
        let long: Row = ["1", "2", "3", "4"].into_iter().collect();
        assert!(index.check_width(&long).is_err());
    }
}
