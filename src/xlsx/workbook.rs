//! Workbook: an opened archive, its shared strings and its sheet map.

use crate::container::XlsxContainer;
use crate::error::{Error, Result};
use crate::model::Row;
use quick_xml::events::Event;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

use super::rows::RowStream;
use super::shared_strings::{SharedStrings, SHARED_STRINGS_PART};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";

/// Logical sheet name to worksheet part path.
///
/// Part paths are full archive paths such as `xl/worksheets/sheet1.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetMap {
    parts: BTreeMap<String, String>,
}

impl SheetMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet, builder style.
    pub fn with_sheet(mut self, name: impl Into<String>, part: impl Into<String>) -> Self {
        self.insert(name, part);
        self
    }

    /// Add or replace a sheet.
    pub fn insert(&mut self, name: impl Into<String>, part: impl Into<String>) {
        self.parts.insert(name.into(), part.into());
    }

    /// Part path for a logical sheet name.
    pub fn part(&self, name: &str) -> Result<&str> {
        self.parts
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownSheet(name.to_string()))
    }

    /// Iterate `(name, part)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parts.iter().map(|(n, p)| (n.as_str(), p.as_str()))
    }

    /// Number of sheets.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Discover sheet names and parts from `xl/workbook.xml` and its
    /// relationships.
    ///
    /// Sheets whose relationship cannot be resolved are left out.
    pub fn discover<R: Read + Seek>(container: &mut XlsxContainer<R>) -> Result<Self> {
        let targets = parse_workbook_rels(&container.read_xml(WORKBOOK_RELS_PART)?)?;
        let sheets = parse_workbook_sheets(&container.read_xml(WORKBOOK_PART)?)?;

        let mut map = Self::new();
        for (name, rel_id) in sheets {
            match targets.get(&rel_id) {
                Some(target) => {
                    let part = XlsxContainer::<R>::resolve_path(WORKBOOK_PART, target);
                    map.insert(name, part);
                }
                None => debug!(sheet = %name, rel_id = %rel_id, "sheet has no relationship target"),
            }
        }
        Ok(map)
    }
}

impl<N: Into<String>, P: Into<String>> FromIterator<(N, P)> for SheetMap {
    fn from_iter<I: IntoIterator<Item = (N, P)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, part) in iter {
            map.insert(name, part);
        }
        map
    }
}

/// Parse workbook relationships into relationship id -> target.
fn parse_workbook_rels(xml: &str) -> Result<HashMap<String, String>> {
    let mut rels = HashMap::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Empty(e) | Event::Start(e) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut id = String::new();
                    let mut target = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = attr.unescape_value()?.into_owned(),
                            b"Target" => target = attr.unescape_value()?.into_owned(),
                            _ => {}
                        }
                    }

                    if !id.is_empty() && !target.is_empty() {
                        rels.insert(id, target);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rels)
}

/// Parse `<sheet name=".." r:id=".."/>` entries in workbook order.
fn parse_workbook_sheets(xml: &str) -> Result<Vec<(String, String)>> {
    let mut sheets = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Empty(e) | Event::Start(e) => {
                if e.local_name().as_ref() == b"sheet" {
                    let mut name = String::new();
                    let mut rel_id = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => name = attr.unescape_value()?.into_owned(),
                            b"r:id" => rel_id = attr.unescape_value()?.into_owned(),
                            _ => {}
                        }
                    }

                    if !name.is_empty() {
                        sheets.push((name, rel_id));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(sheets)
}

/// Something that can produce a fresh row stream for a named sheet.
///
/// Every call starts from the first row of the sheet, so a source can be
/// consumed by any number of independent passes.
pub trait RowSource {
    /// The row sequence for one pass.
    type Rows<'a>: Iterator<Item = Result<Row>>
    where
        Self: 'a;

    /// Start a new pass over the named sheet.
    fn rows(&mut self, sheet: &str) -> Result<Self::Rows<'_>>;
}

/// An opened XLSX workbook ready to stream sheets.
///
/// # Example
///
/// ```no_run
/// use rollsheet::xlsx::{SheetMap, Workbook};
///
/// let sheets = SheetMap::new().with_sheet("All", "xl/worksheets/sheet1.xml");
/// let mut workbook = Workbook::open("report.xlsx", sheets)?;
///
/// for row in workbook.stream_rows("All")? {
///     println!("{:?}", row?.cells);
/// }
/// # Ok::<(), rollsheet::Error>(())
/// ```
pub struct Workbook<R> {
    container: XlsxContainer<R>,
    shared_strings: SharedStrings,
    sheets: SheetMap,
}

impl Workbook<BufReader<File>> {
    /// Open a workbook file with a caller-supplied sheet map.
    pub fn open(path: impl AsRef<Path>, sheets: SheetMap) -> Result<Self> {
        Self::from_container(XlsxContainer::open(path)?, sheets)
    }

    /// Open a workbook file and discover its sheets from the workbook part.
    pub fn open_discovered(path: impl AsRef<Path>) -> Result<Self> {
        let mut container = XlsxContainer::open(path)?;
        let sheets = SheetMap::discover(&mut container)?;
        Self::from_container(container, sheets)
    }
}

impl Workbook<Cursor<Vec<u8>>> {
    /// Create a workbook from bytes.
    pub fn from_bytes(data: Vec<u8>, sheets: SheetMap) -> Result<Self> {
        Self::from_container(XlsxContainer::from_bytes(data)?, sheets)
    }
}

impl<R: Read + Seek> Workbook<R> {
    /// Create a workbook from an opened container.
    ///
    /// The shared-string table is loaded here, so a workbook without one
    /// fails before any sheet is streamed.
    pub fn from_container(mut container: XlsxContainer<R>, sheets: SheetMap) -> Result<Self> {
        let shared_strings = {
            let part = container.open_part(SHARED_STRINGS_PART)?;
            SharedStrings::from_reader(BufReader::new(part))?
        };
        debug!(
            strings = shared_strings.len(),
            sheets = sheets.len(),
            "loaded shared strings"
        );

        Ok(Self {
            container,
            shared_strings,
            sheets,
        })
    }

    /// Stream the rows of a named sheet.
    pub fn stream_rows(&mut self, sheet: &str) -> Result<RowStream<'_>> {
        let Self {
            container,
            shared_strings,
            sheets,
        } = self;
        let part_name = sheets.part(sheet)?;
        let part = container.open_part(part_name)?;
        Ok(RowStream::from_part(part, shared_strings, part_name))
    }

    /// The shared-string table.
    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }

    /// The sheet map.
    pub fn sheets(&self) -> &SheetMap {
        &self.sheets
    }

    /// Get a reference to the container.
    pub fn container(&self) -> &XlsxContainer<R> {
        &self.container
    }
}

impl<R: Read + Seek> RowSource for Workbook<R> {
    type Rows<'a>
        = RowStream<'a>
    where
        Self: 'a;

    fn rows(&mut self, sheet: &str) -> Result<Self::Rows<'_>> {
        self.stream_rows(sheet)
    }
}

impl<R: Read + Seek> std::fmt::Debug for Workbook<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("container", &self.container)
            .field("shared_strings", &self.shared_strings.len())
            .field("sheets", &self.sheets)
            .finish()
    }
}

/// In-memory sheets, for callers that already hold their rows.
///
/// The first row of each sheet is its header.
#[derive(Debug, Clone, Default)]
pub struct MemorySheets {
    sheets: HashMap<String, Vec<Row>>,
}

impl MemorySheets {
    /// Create an empty set of sheets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet, builder style.
    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.sheets.insert(name.into(), rows);
        self
    }
}

impl RowSource for MemorySheets {
    type Rows<'a>
        = std::iter::Map<std::slice::Iter<'a, Row>, fn(&Row) -> Result<Row>>
    where
        Self: 'a;

    fn rows(&mut self, sheet: &str) -> Result<Self::Rows<'_>> {
        let rows = self
            .sheets
            .get(sheet)
            .ok_or_else(|| Error::UnknownSheet(sheet.to_string()))?;
        let clone_row: fn(&Row) -> Result<Row> = |row| Ok(row.clone());
        Ok(rows.iter().map(clone_row))
    }
}
