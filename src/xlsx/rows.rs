//! Streaming worksheet reader.

use crate::error::{Error, Result};
use crate::model::Row;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{BufRead, BufReader, Read};
use tracing::{debug, trace};

use super::shared_strings::SharedStrings;

/// How a cell's raw `<v>` text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    /// `t="s"`: the value is an index into the shared-string table.
    SharedString,
    /// Anything else: the value is used verbatim.
    Literal,
}

impl CellKind {
    fn from_start(e: &BytesStart<'_>) -> Self {
        let shared = e
            .attributes()
            .flatten()
            .any(|attr| attr.key.as_ref() == b"t" && attr.value.as_ref() == b"s");
        if shared {
            CellKind::SharedString
        } else {
            CellKind::Literal
        }
    }
}

/// Lazy, single-pass sequence of rows from one worksheet part.
///
/// Only the row being assembled is held in memory: the XML is consumed as a
/// stream of events and each row's cells are handed to the caller as soon
/// as its closing tag is read. Cells are positional; the first row fixes the
/// width and any later row with a different cell count is an error.
///
/// After the first error the stream is fused and yields nothing further.
pub struct RowStream<'a, B = BufReader<Box<dyn Read + 'a>>> {
    reader: Reader<B>,
    shared_strings: &'a SharedStrings,
    part: String,
    buf: Vec<u8>,
    value: String,
    width: Option<usize>,
    rows_read: usize,
    finished: bool,
}

impl<'a> RowStream<'a> {
    /// Stream rows from an opened worksheet part.
    pub(crate) fn from_part(
        part: Box<dyn Read + 'a>,
        shared_strings: &'a SharedStrings,
        part_name: &str,
    ) -> Self {
        Self::new(BufReader::new(part), shared_strings, part_name)
    }
}

impl<'a, B: BufRead> RowStream<'a, B> {
    /// Stream rows from any buffered XML source.
    pub fn new(input: B, shared_strings: &'a SharedStrings, part_name: &str) -> Self {
        Self {
            reader: Reader::from_reader(input),
            shared_strings,
            part: part_name.to_string(),
            buf: Vec::new(),
            value: String::new(),
            width: None,
            rows_read: 0,
            finished: false,
        }
    }

    /// Name of the part being streamed.
    pub fn part(&self) -> &str {
        &self.part
    }

    /// Number of rows yielded so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        let mut cells: Vec<String> = Vec::new();
        let mut in_row = false;
        let mut cell: Option<CellKind> = None;
        let mut in_value = false;

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"row" => {
                        in_row = true;
                        cells.clear();
                    }
                    b"c" if in_row => {
                        cell = Some(CellKind::from_start(&e));
                        self.value.clear();
                    }
                    b"v" if cell.is_some() => in_value = true,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"row" => trace!(part = %self.part, "skipping empty row"),
                    b"c" if in_row => cells.push(String::new()),
                    _ => {}
                },
                Event::Text(e) => {
                    if in_value {
                        self.value.push_str(&e.unescape()?);
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"v" => in_value = false,
                    b"c" => {
                        if let Some(kind) = cell.take() {
                            let text = match kind {
                                CellKind::SharedString => {
                                    self.shared_strings.resolve(&self.value)?.to_string()
                                }
                                CellKind::Literal => std::mem::take(&mut self.value),
                            };
                            cells.push(text);
                        }
                    }
                    b"row" => {
                        in_row = false;
                        if cells.is_empty() {
                            trace!(part = %self.part, "skipping empty row");
                            continue;
                        }
                        check_width(
                            &mut self.width,
                            cells.len(),
                            self.rows_read + 1,
                            &self.part,
                        )?;
                        self.rows_read += 1;
                        return Ok(Some(Row::new(cells)));
                    }
                    _ => {}
                },
                Event::Eof => {
                    if in_row {
                        return Err(Error::MalformedContainer(format!(
                            "{} ended inside a row",
                            self.part
                        )));
                    }
                    debug!(part = %self.part, rows = self.rows_read, "finished streaming part");
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

/// The first row fixes the width; every later row must match it.
fn check_width(width: &mut Option<usize>, len: usize, row: usize, part: &str) -> Result<()> {
    match *width {
        None => {
            *width = Some(len);
            Ok(())
        }
        Some(expected) if expected == len => Ok(()),
        Some(expected) => Err(Error::MalformedContainer(format!(
            "row {} of {} has {} cells, expected {}",
            row, part, len, expected
        ))),
    }
}

impl<B: BufRead> Iterator for RowStream<'_, B> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<B: BufRead> std::iter::FusedIterator for RowStream<'_, B> {}

impl<B> std::fmt::Debug for RowStream<'_, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStream")
            .field("part", &self.part)
            .field("rows_read", &self.rows_read)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings() -> SharedStrings {
        ["bet_year", "bet_month", "name", "Acme"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn collect(xml: &str, shared: &SharedStrings) -> Result<Vec<Row>> {
        RowStream::new(xml.as_bytes(), shared, "xl/worksheets/sheet1.xml").collect()
    }

    #[test]
    fn test_stream_rows() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1">
      <c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="s"><v>2</v></c>
    </row>
    <row r="2">
      <c r="A2"><v>2024</v></c><c r="B2"><v>1</v></c><c r="C2" t="s"><v>3</v></c>
    </row>
    <row r="3">
      <c r="A3"><v>2024</v></c><c r="B3"/><c r="C3" t="str"><v>a &lt; b</v></c>
    </row>
  </sheetData>
</worksheet>"#;

        let shared = strings();
        let rows = collect(xml, &shared).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].cells, vec!["bet_year", "bet_month", "name"]);
        assert_eq!(rows[1].cells, vec!["2024", "1", "Acme"]);
        assert_eq!(rows[2].cells, vec!["2024", "", "a < b"]);
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let xml = r#"<worksheet><sheetData>
    <row r="1"><c><v>a</v></c></row>
    <row r="2"/>
    <row r="3"></row>
    <row r="4"><c><v>b</v></c></row>
</sheetData></worksheet>"#;

        let shared = SharedStrings::default();
        let rows = collect(xml, &shared).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get(0), "b");
    }

    #[test]
    fn test_shared_string_out_of_range() {
        let xml = r#"<worksheet><sheetData>
    <row r="1"><c t="s"><v>0</v></c></row>
    <row r="2"><c t="s"><v>99</v></c></row>
</sheetData></worksheet>"#;

        let shared = strings();
        let mut stream = RowStream::new(xml.as_bytes(), &shared, "sheet");
        assert_eq!(stream.next().unwrap().unwrap().get(0), "bet_year");
        assert!(matches!(
            stream.next(),
            Some(Err(Error::CorruptReference { .. }))
        ));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        let xml = r#"<worksheet><sheetData>
    <row r="1"><c><v>a</v></c><c><v>b</v></c></row>
    <row r="2"><c><v>1</v></c></row>
</sheetData></worksheet>"#;

        let shared = SharedStrings::default();
        let err = collect(xml, &shared).unwrap_err();
        match err {
            Error::MalformedContainer(msg) => assert!(msg.contains("row 2")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_truncated_part() {
        let xml = r#"<worksheet><sheetData><row r="1"><c><v>a</v></c>"#;
        let shared = SharedStrings::default();
        assert!(matches!(
            collect(xml, &shared),
            Err(Error::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_rows_read_counter() {
        let xml = r#"<worksheet><sheetData>
    <row><c><v>1</v></c></row><row><c><v>2</v></c></row>
</sheetData></worksheet>"#;
        let shared = SharedStrings::default();
        let mut stream = RowStream::new(xml.as_bytes(), &shared, "sheet");
        while let Some(row) = stream.next() {
            row.unwrap();
        }
        assert_eq!(stream.rows_read(), 2);
        assert_eq!(stream.part(), "sheet");
    }
}
