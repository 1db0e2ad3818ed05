//! Section handlers, which turn the lines of one `[Name]` block into a [`SectionValue`] and back.
//!
//! The built-in handlers are [`PropertySection`] for `Key: Value` sections, [`ListSection`] for one record per
//! line, [`ValueListSection`] for plain values per line and [`RawSection`] for lines kept verbatim. Any other
//! [`SectionHandler`] can be registered on a [`Config`](crate::config::Config), replacing a built-in one or
//! adding a new section.

pub mod list;
pub mod property;

use crate::{
    codec::{Codec, FieldKind},
    mixin::SourceLine,
    model::SectionValue,
    parse::ParseError,
    unparse::WriteError,
};

pub use self::{
    list::{ListRecord, ListSection},
    property::PropertySection,
};

/// Parses and writes the body of a section.
///
/// Handlers must not hold state changed by a call, one handler is shared by every parse and write with the same
/// configuration, possibly from many threads at once.
pub trait SectionHandler: Send + Sync {
    /// Parses the lines between the header and the next header. Leading and trailing blank lines are already
    /// removed.
    ///
    /// # Errors
    ///
    /// Fails if a line cannot be read, the error should carry the line number of [`SourceLine`].
    fn parse(
        &self,
        codec: &Codec,
        section: &str,
        lines: &[SourceLine<'_>],
    ) -> Result<SectionValue, ParseError>;

    /// Writes the body lines of the section, without the header.
    ///
    /// # Errors
    ///
    /// Fails if the value is not one the handler produces.
    fn write(
        &self,
        codec: &Codec,
        sink: &mut LineSink,
        section: &str,
        value: &SectionValue,
    ) -> Result<(), WriteError>;
}

/// Collects the lines written by a handler. Line endings are added by the writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSink {
    lines: Vec<String>,
}

impl LineSink {
    /// Creates an empty sink.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: vec![] }
    }

    /// Appends a line. It must not contain a line break.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Returns the lines written so far.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Takes the lines out.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl<S: Into<String>> Extend<S> for LineSink {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        self.lines.extend(iter.into_iter().map(Into::into));
    }
}

/// Keeps the lines verbatim as [`SectionValue::Raw`]. Unknown sections are read with this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RawSection;

impl SectionHandler for RawSection {
    fn parse(
        &self,
        _codec: &Codec,
        section: &str,
        lines: &[SourceLine<'_>],
    ) -> Result<SectionValue, ParseError> {
        tracing::debug!(section, lines = lines.len(), "keeping section verbatim");
        Ok(SectionValue::Raw(
            lines.iter().map(|line| line.text().to_string()).collect(),
        ))
    }

    fn write(
        &self,
        _codec: &Codec,
        sink: &mut LineSink,
        section: &str,
        value: &SectionValue,
    ) -> Result<(), WriteError> {
        let SectionValue::Raw(lines) = value else {
            return Err(WriteError::UnexpectedValue {
                section: section.to_string(),
                expected: "raw lines",
            });
        };
        sink.extend(lines.iter().map(String::as_str));
        Ok(())
    }
}

/// Reads one value of the same kind per line into [`SectionValue::Values`].
///
/// ```
/// use osufile::{codec::{FieldKind, Value}, config::Config, model::SectionValue, section::ValueListSection};
///
/// let config = Config::default().with_handler("Numbers", ValueListSection::new(FieldKind::Int));
/// let doc = osufile::parse("osu file format v14\n\n[Numbers]\n3\n-5\n", &config).unwrap();
/// assert_eq!(
///     doc.section("Numbers"),
///     Ok(&SectionValue::Values(vec![Value::Int(3), Value::Int(-5)]))
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueListSection {
    kind: FieldKind,
}

impl ValueListSection {
    /// Creates a handler reading values of the kind.
    #[must_use]
    pub const fn new(kind: FieldKind) -> Self {
        Self { kind }
    }
}

impl SectionHandler for ValueListSection {
    fn parse(
        &self,
        codec: &Codec,
        section: &str,
        lines: &[SourceLine<'_>],
    ) -> Result<SectionValue, ParseError> {
        lines
            .iter()
            .filter(|line| !line.is_blank() && !line.is_comment())
            .map(|line| {
                codec
                    .decode(self.kind, line.text())
                    .map_err(|error| ParseError::malformed(section, line.line(), "value", error))
            })
            .collect::<Result<_, _>>()
            .map(SectionValue::Values)
    }

    fn write(
        &self,
        codec: &Codec,
        sink: &mut LineSink,
        section: &str,
        value: &SectionValue,
    ) -> Result<(), WriteError> {
        let SectionValue::Values(values) = value else {
            return Err(WriteError::UnexpectedValue {
                section: section.to_string(),
                expected: "values",
            });
        };
        sink.extend(values.iter().map(|value| codec.encode(value)));
        Ok(())
    }
}
