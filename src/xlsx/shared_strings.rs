//! XLSX shared strings parsing.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::BufRead;

/// Default location of the shared-string part inside an XLSX archive.
pub const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Shared strings table.
///
/// Immutable once loaded; cells reference entries by position.
#[derive(Debug, Clone, Default)]
pub struct SharedStrings {
    /// All strings in document order
    strings: Vec<String>,
}

impl SharedStrings {
    /// Parse shared strings from XML content.
    pub fn parse(xml: &str) -> Result<Self> {
        Self::from_reader(xml.as_bytes())
    }

    /// Parse shared strings from a streaming reader.
    ///
    /// Each `<si>` entry becomes one string: plain `<t>` text, or the
    /// concatenation of its rich-text runs. Phonetic runs (`<rPh>`) are not
    /// part of the displayed value and are skipped.
    pub fn from_reader<B: BufRead>(input: B) -> Result<Self> {
        let mut strings = Vec::new();
        let mut reader = Reader::from_reader(input);

        let mut buf = Vec::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut phonetic_depth = 0usize;
        let mut current_text = String::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_text.clear();
                    }
                    b"rPh" if in_si => phonetic_depth += 1,
                    b"t" if in_si && phonetic_depth == 0 => in_t = true,
                    _ => {}
                },
                Event::Empty(e) => {
                    if e.local_name().as_ref() == b"si" {
                        strings.push(String::new());
                    }
                }
                Event::Text(e) => {
                    if in_t {
                        let text = e.unescape()?;
                        current_text.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    if in_t {
                        current_text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(std::mem::take(&mut current_text));
                        in_si = false;
                    }
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    b"t" => in_t = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if in_si {
            return Err(Error::MalformedContainer(
                "shared strings ended inside an <si> entry".to_string(),
            ));
        }

        Ok(Self { strings })
    }

    /// Get a string by index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Resolve the raw text of a shared-string cell.
    ///
    /// An empty reference stays empty. Anything that is not an index into
    /// the table is a [`Error::CorruptReference`].
    pub fn resolve(&self, reference: &str) -> Result<&str> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Ok("");
        }
        reference
            .parse::<usize>()
            .ok()
            .and_then(|idx| self.get(idx))
            .ok_or_else(|| Error::CorruptReference {
                reference: reference.to_string(),
                available: self.strings.len(),
            })
    }

    /// Get the count of shared strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl FromIterator<String> for SharedStrings {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            strings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shared_strings() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="5" uniqueCount="3">
    <si><t>bet_year</t></si>
    <si><t>Acme &amp; Co</t></si>
    <si><t xml:space="preserve"> padded </t></si>
</sst>"#;

        let ss = SharedStrings::parse(xml).unwrap();
        assert_eq!(ss.len(), 3);
        assert_eq!(ss.get(0), Some("bet_year"));
        assert_eq!(ss.get(1), Some("Acme & Co"));
        assert_eq!(ss.get(2), Some(" padded "));
        assert_eq!(ss.get(3), None);
    }

    #[test]
    fn test_rich_text_and_phonetic_runs() {
        let xml = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <si>
        <r><t>Hello</t></r>
        <r><t xml:space="preserve"> World</t></r>
        <rPh sb="0" eb="1"><t>ignored</t></rPh>
    </si>
    <si/>
    <si><t>Last</t></si>
</sst>"#;

        let ss = SharedStrings::parse(xml).unwrap();
        assert_eq!(ss.len(), 3);
        assert_eq!(ss.get(0), Some("Hello World"));
        assert_eq!(ss.get(1), Some(""));
        assert_eq!(ss.get(2), Some("Last"));
    }

    #[test]
    fn test_resolve() {
        let ss: SharedStrings = vec!["a".to_string(), "b".to_string()].into_iter().collect();
        assert_eq!(ss.resolve("1").unwrap(), "b");
        assert_eq!(ss.resolve("").unwrap(), "");
        assert!(matches!(
            ss.resolve("2"),
            Err(Error::CorruptReference { available: 2, .. })
        ));
        assert!(matches!(
            ss.resolve("x"),
            Err(Error::CorruptReference { .. })
        ));
    }

    #[test]
    fn test_malformed_xml() {
        let err = SharedStrings::parse("<sst><si><t>open</si></sst>").unwrap_err();
        assert!(matches!(err, Error::MalformedContainer(_)));
    }
}
