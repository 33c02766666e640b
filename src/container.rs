//! ZIP container abstraction for XLSX workbooks.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Decode XML bytes read from a small part.
///
/// Parts are expected to be UTF-8; a leading byte order mark is dropped and
/// invalid sequences are replaced rather than rejected.
pub fn decode_xml_bytes(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// XLSX container over a ZIP archive.
///
/// The underlying store only has to be seekable: each call to
/// [`open_part`](Self::open_part) decompresses a part from its start, so the
/// same sheet can be streamed any number of times.
pub struct XlsxContainer<R> {
    archive: zip::ZipArchive<R>,
}

impl XlsxContainer<BufReader<File>> {
    /// Open a container from a file path.
    ///
    /// The file is read lazily through a buffered handle; it is never loaded
    /// into memory as a whole.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rollsheet::container::XlsxContainer;
    ///
    /// let container = XlsxContainer::open("workbook.xlsx")?;
    /// # Ok::<(), rollsheet::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }
}

impl XlsxContainer<Cursor<Vec<u8>>> {
    /// Create a container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }
}

impl<R: Read + Seek> XlsxContainer<R> {
    /// Create a container from any seekable reader.
    pub fn from_reader(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        debug!(parts = archive.len(), "opened archive");
        Ok(Self { archive })
    }

    /// Open a part for streaming.
    ///
    /// The returned reader decompresses on demand and releases the part when
    /// dropped.
    pub fn open_part(&mut self, path: &str) -> Result<Box<dyn Read + '_>> {
        let file = self
            .archive
            .by_name(path)
            .map_err(|_| Error::MalformedContainer(format!("missing part {}", path)))?;
        debug!(part = path, size = file.size(), "opened part");
        Ok(Box::new(file))
    }

    /// Read a small XML part (workbook, relationships) as a string.
    pub fn read_xml(&mut self, path: &str) -> Result<String> {
        let mut part = self.open_part(path)?;
        let mut bytes = Vec::new();
        part.read_to_end(&mut bytes)?;
        Ok(decode_xml_bytes(&bytes))
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.file_names().any(|n| n == path)
    }

    /// List all parts in the archive.
    pub fn list_files(&self) -> Vec<String> {
        let mut files: Vec<String> = self.archive.file_names().map(String::from).collect();
        files.sort();
        files
    }

    /// Resolve a relationship target relative to the part that declares it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_path = Path::new(base);
        let base_dir = base_path.parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

impl<R: Read + Seek> std::fmt::Debug for XlsxContainer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxContainer")
            .field("parts", &self.archive.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn archive_with(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default();
            for (name, content) in parts {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            XlsxContainer::<Cursor<Vec<u8>>>::resolve_path("xl/workbook.xml", "worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            XlsxContainer::<Cursor<Vec<u8>>>::resolve_path(
                "xl/worksheets/sheet1.xml",
                "../sharedStrings.xml"
            ),
            "xl/sharedStrings.xml"
        );
        assert_eq!(
            XlsxContainer::<Cursor<Vec<u8>>>::resolve_path("xl/workbook.xml", "/xl/worksheets/sheet2.xml"),
            "xl/worksheets/sheet2.xml"
        );
    }

    #[test]
    fn test_open_part_missing() {
        let data = archive_with(&[("xl/workbook.xml", "<workbook/>")]);
        let mut container = XlsxContainer::from_bytes(data).unwrap();
        assert!(container.exists("xl/workbook.xml"));
        assert!(!container.exists("xl/sharedStrings.xml"));

        let err = container.open_part("xl/sharedStrings.xml").err().unwrap();
        match err {
            Error::MalformedContainer(msg) => assert!(msg.contains("xl/sharedStrings.xml")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_read_xml_twice() {
        let data = archive_with(&[("xl/workbook.xml", "\u{feff}<workbook/>")]);
        let mut container = XlsxContainer::from_bytes(data).unwrap();
        assert_eq!(container.read_xml("xl/workbook.xml").unwrap(), "<workbook/>");
        assert_eq!(container.read_xml("xl/workbook.xml").unwrap(), "<workbook/>");
        assert_eq!(container.list_files(), vec!["xl/workbook.xml".to_string()]);
    }

    #[test]
    fn test_not_a_zip() {
        let err = XlsxContainer::from_bytes(b"plain text".to_vec()).unwrap_err();
        assert!(matches!(err, Error::MalformedContainer(_)));
    }

    #[test]
    fn test_decode_xml_bytes() {
        assert_eq!(decode_xml_bytes(b"\xEF\xBB\xBF<?xml>"), "<?xml>");
        assert_eq!(decode_xml_bytes(b"<?xml>"), "<?xml>");
    }
}
