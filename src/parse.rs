//! Parsing a [`Document`] from source text.
//!
//! Raw [String] == split into `[Name]` blocks ==> [`SourceLine`]s of each block == [`SectionHandler`] ==>
//! [`SectionValue`] (in [`Document`])
//!
//! The first error aborts the parse, no partial document is returned.

use std::io::Read;

use thiserror::Error;

use crate::{
    codec::{FieldError, FieldKind},
    config::Config,
    mixin::{SourceLine, SourceLineMixinExt},
    model::{Document, RecordError},
    section::{RawSection, SectionHandler},
};

/// An error occurred when parsing the source text.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseError {
    /// A field could not be decoded as its kind.
    #[error("[{section}] line {line}: `{key}` expected {expected} but found {raw:?}")]
    MalformedField {
        /// Name of the section.
        section: String,
        /// Line number, 1-based.
        line: usize,
        /// Property key or record field name.
        key: String,
        /// The offending token.
        raw: String,
        /// What the token should have been.
        expected: FieldKind,
    },
    /// The type bits of a hit object selected no known variant.
    #[error("[{section}] line {line}: unknown hit object type {type_bits:#010b}")]
    UnknownHitObjectVariant {
        /// Name of the section.
        section: String,
        /// Line number, 1-based.
        line: usize,
        /// The `type` field.
        type_bits: i64,
    },
    /// A slider curve started with an unknown tag.
    #[error("[{section}] line {line}: unknown slider curve type `{tag}`")]
    UnknownCurveType {
        /// Name of the section.
        section: String,
        /// Line number, 1-based.
        line: usize,
        /// The unknown tag.
        tag: String,
    },
    /// A record ended before its required fields.
    #[error("[{section}] line {line}: expected at least {expected} fields but found {found}")]
    TooFewFields {
        /// Name of the section.
        section: String,
        /// Line number, 1-based.
        line: usize,
        /// Count of required fields.
        expected: usize,
        /// Count of fields found.
        found: usize,
    },
    /// The file could not be split into sections, such as an unterminated `[` header.
    #[error("line {line}: {message}")]
    StructuralError {
        /// Line number, 1-based.
        line: usize,
        /// What was wrong.
        message: String,
    },
}

impl ParseError {
    /// Creates [`ParseError::MalformedField`] from a codec error.
    #[must_use]
    pub fn malformed(section: &str, line: usize, key: &str, error: FieldError) -> Self {
        Self::MalformedField {
            section: section.to_string(),
            line,
            key: key.to_string(),
            raw: error.raw,
            expected: error.expected,
        }
    }

    /// Locates a record error at the line of the section.
    #[must_use]
    pub fn from_record(section: &str, line: usize, error: RecordError) -> Self {
        let section = section.to_string();
        match error {
            RecordError::Field { field, error } => Self::MalformedField {
                section,
                line,
                key: field,
                raw: error.raw,
                expected: error.expected,
            },
            RecordError::TooFewFields { expected, found } => Self::TooFewFields {
                section,
                line,
                expected,
                found,
            },
            RecordError::UnknownHitObjectVariant(type_bits) => Self::UnknownHitObjectVariant {
                section,
                line,
                type_bits,
            },
            RecordError::UnknownCurveType(tag) => Self::UnknownCurveType { section, line, tag },
        }
    }

    /// The line number of the error, 1-based.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::MalformedField { line, .. }
            | Self::UnknownHitObjectVariant { line, .. }
            | Self::UnknownCurveType { line, .. }
            | Self::TooFewFields { line, .. }
            | Self::StructuralError { line, .. } => *line,
        }
    }

    /// The section of the error, if it occurred inside one.
    #[must_use]
    pub fn section(&self) -> Option<&str> {
        match self {
            Self::MalformedField { section, .. }
            | Self::UnknownHitObjectVariant { section, .. }
            | Self::UnknownCurveType { section, .. }
            | Self::TooFewFields { section, .. } => Some(section),
            Self::StructuralError { .. } => None,
        }
    }
}

/// An error occurred when reading and parsing a source.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ReadError {
    /// The source could not be read as UTF-8 text.
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
    /// The text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Removes blank lines at both ends.
fn trim_blank_lines<'a, 'b>(lines: &'b [SourceLine<'a>]) -> &'b [SourceLine<'a>] {
    let start = lines
        .iter()
        .position(|line| !line.is_blank())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !line.is_blank())
        .map_or(start, |idx| idx + 1);
    &lines[start..end]
}

fn is_header(line: &SourceLine<'_>) -> bool {
    line.text().trim_start().starts_with('[')
}

/// Reads the section name of a header line.
fn header_name<'a>(line: &SourceLine<'a>) -> Result<&'a str, ParseError> {
    let structural = |message: &str| ParseError::StructuralError {
        line: line.line(),
        message: message.to_string(),
    };
    let name = line
        .text()
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| structural("section header must end with `]`"))?
        .trim();
    if name.is_empty() {
        return Err(structural("section header must have a name"));
    }
    Ok(name)
}

/// Parses the source text with the configuration.
///
/// A leading byte order mark is skipped, trailing whitespace of every line is ignored, so `\r\n` line breaks
/// are accepted. Sections without a handler are kept verbatim as [`SectionValue::Raw`](crate::model::SectionValue::Raw).
///
/// # Example
///
/// ```
/// use osufile::{config::Config, codec::Value};
///
/// let source = "osu file format v14\n\n[Metadata]\nTitle:Example\n\n[TimingPoints]\n852,468.75,4,2,1,60,1,0\n";
/// let doc = osufile::parse(source, &Config::default()).unwrap();
/// assert_eq!(doc.format_version(), Some(14));
/// assert_eq!(doc.property("Metadata", "Title"), Ok(&Value::Str("Example".into())));
/// assert_eq!(doc.timing_points().unwrap()[0].volume, 60);
/// ```
///
/// # Errors
///
/// Fails on a malformed header or the first line a section handler rejects.
pub fn parse(source: &str, config: &Config) -> Result<Document, ParseError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let lines: Vec<SourceLine<'_>> = source
        .split('\n')
        .map(str::trim_end)
        .enumerate()
        .map(|(idx, line)| line.into_wrapper_line(idx + 1))
        .collect();

    let first_header = lines.iter().position(is_header).unwrap_or(lines.len());
    let mut document = Document {
        preamble: trim_blank_lines(&lines[..first_header])
            .iter()
            .map(|line| line.text().to_string())
            .collect(),
        ..Default::default()
    };

    let mut rest = &lines[first_header..];
    while let Some((header, body)) = rest.split_first() {
        let name = header_name(header)?;
        let end = body.iter().position(is_header).unwrap_or(body.len());
        let block = trim_blank_lines(&body[..end]);
        rest = &body[end..];

        let value = match config.handler(name) {
            Some(handler) => {
                tracing::debug!(section = name, lines = block.len(), "parsing section");
                handler.parse(config.codec(), name, block)?
            }
            None => RawSection.parse(config.codec(), name, block)?,
        };
        if document.sections.insert(name, value).is_some() {
            tracing::warn!(
                section = name,
                line = header.line(),
                "duplicate section replaces the earlier one"
            );
        }
    }
    Ok(document)
}

/// Reads the whole source as UTF-8 text and parses it.
///
/// # Errors
///
/// Fails if reading fails, the source is not UTF-8, or [`parse`] fails.
pub fn parse_reader(mut reader: impl Read, config: &Config) -> Result<Document, ReadError> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    Ok(parse(&source, config)?)
}

impl Document {
    /// Parses the source text with the default configuration.
    ///
    /// # Errors
    ///
    /// Fails as [`parse`] does.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        parse(source, &Config::default())
    }
}
