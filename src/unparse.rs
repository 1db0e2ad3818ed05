//! Writing a [`Document`] back to text.
//!
//! The preamble comes first, then every section in order as its `[Name]` header and body, with exactly one
//! blank line between them. Lines end with the [`LineEnding`](crate::config::LineEnding) of the
//! configuration.

use std::io::Write;

use thiserror::Error;

use crate::{
    config::Config,
    model::{Document, SectionValue},
    section::{LineSink, RawSection, SectionHandler},
};

/// An error occurred when writing a [`Document`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum WriteError {
    /// Writing to the sink failed.
    #[error("failed to write: {0}")]
    Io(#[from] std::io::Error),
    /// The handler of the section does not produce this kind of value.
    #[error("section [{section}] should hold {expected}")]
    UnexpectedValue {
        /// Name of the section.
        section: String,
        /// What the handler writes.
        expected: &'static str,
    },
    /// The section holds a typed value but no handler is registered for it.
    #[error("no handler is registered for section [{0}]")]
    NoHandler(String),
}

/// Builds every output line, without line breaks.
fn unparse_lines(document: &Document, config: &Config) -> Result<Vec<String>, WriteError> {
    let mut sink = LineSink::new();
    sink.extend(document.preamble.iter().map(String::as_str));
    for (name, value) in document.sections.iter() {
        if !sink.lines().is_empty() {
            sink.push("");
        }
        sink.push(format!("[{name}]"));
        match (value, config.handler(name)) {
            (SectionValue::Raw(_), _) => RawSection.write(config.codec(), &mut sink, name, value)?,
            (_, Some(handler)) => handler.write(config.codec(), &mut sink, name, value)?,
            (_, None) => return Err(WriteError::NoHandler(name.clone())),
        }
    }
    Ok(sink.into_lines())
}

/// Writes the document to the writer.
///
/// Nothing is written if a section cannot be written.
///
/// # Errors
///
/// Fails if a section value does not match its handler, a typed section has no handler, or writing fails.
pub fn write(mut writer: impl Write, document: &Document, config: &Config) -> Result<(), WriteError> {
    let lines = unparse_lines(document, config)?;
    let line_ending = config.line_ending().as_str();
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(line_ending.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the document into a string.
///
/// # Errors
///
/// Fails if a section value does not match its handler or a typed section has no handler.
pub fn write_string(document: &Document, config: &Config) -> Result<String, WriteError> {
    let line_ending = config.line_ending().as_str();
    Ok(unparse_lines(document, config)?
        .into_iter()
        .map(|line| line + line_ending)
        .collect())
}

impl Document {
    /// Writes the document with the default configuration.
    ///
    /// # Errors
    ///
    /// Fails if a section value does not match its default handler.
    pub fn unparse(&self) -> Result<String, WriteError> {
        write_string(self, &Config::default())
    }
}
