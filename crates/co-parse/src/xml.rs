//! Shared `quick-xml` plumbing for the three parsers.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::BytesStart;

use crate::{ParseError, ParseResult};

/// A reader configured the same way for every input document.
pub(crate) fn reader<R: BufRead>(source: R) -> Reader<R> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);
    reader
}

/// All attributes of one element, unescaped, in document order.
pub(crate) struct ElementAttrs {
    element:  &'static str,
    position: u64,
    pairs:    Vec<(String, String)>,
}

impl ElementAttrs {
    pub(crate) fn read(element: &'static str, start: &BytesStart<'_>, position: u64) -> ParseResult<Self> {
        let mut pairs = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            pairs.push((key, value));
        }
        Ok(Self { element, position, pairs })
    }

    pub(crate) fn optional(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn required(&self, name: &'static str) -> ParseResult<String> {
        self.optional(name)
            .map(str::to_owned)
            .ok_or(ParseError::MissingAttribute {
                element:   self.element,
                attribute: name,
                position:  self.position,
            })
    }

    pub(crate) fn misplaced(&self, expected: &'static str) -> ParseError {
        ParseError::Misplaced {
            element: self.element,
            expected,
            position: self.position,
        }
    }

    pub(crate) fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub(crate) fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}
