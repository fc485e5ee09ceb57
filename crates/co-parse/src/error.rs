use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed input: <{element}> at byte {position} is missing required attribute `{attribute}`")]
    MissingAttribute {
        element:   &'static str,
        attribute: &'static str,
        position:  u64,
    },

    #[error("malformed input: <{element}> at byte {position} is not nested inside {expected}")]
    Misplaced {
        element:  &'static str,
        expected: &'static str,
        position: u64,
    },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("cannot open {path}: {source}")]
    Open {
        path:   PathBuf,
        source: std::io::Error,
    },
}

impl ParseError {
    /// `true` for structurally valid documents with missing or misplaced
    /// vehicle/trip data, as opposed to XML syntax or I/O failures.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, ParseError::MissingAttribute { .. } | ParseError::Misplaced { .. })
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
