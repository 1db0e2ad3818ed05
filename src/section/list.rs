//! Sections holding one [`Record`] per line, such as `[TimingPoints]`, `[HitObjects]` and `[Events]`.

use std::marker::PhantomData;

use crate::{
    codec::Codec,
    mixin::SourceLine,
    model::{Event, HitObject, Record, SectionValue, TimingPoint},
    parse::ParseError,
    unparse::WriteError,
};

use super::{LineSink, SectionHandler};

/// A [`Record`] stored as a list in one [`SectionValue`] variant.
pub trait ListRecord: Record + Send + Sync {
    /// Name of the records in error messages.
    const KIND_NAME: &'static str;

    /// Wraps the records into the section value.
    fn wrap(records: Vec<Self>) -> SectionValue;

    /// Borrows the records out of the section value, if it is the matching variant.
    fn unwrap(value: &SectionValue) -> Option<&[Self]>;
}

impl ListRecord for TimingPoint {
    const KIND_NAME: &'static str = "timing points";

    fn wrap(records: Vec<Self>) -> SectionValue {
        SectionValue::TimingPoints(records)
    }

    fn unwrap(value: &SectionValue) -> Option<&[Self]> {
        match value {
            SectionValue::TimingPoints(records) => Some(records),
            _ => None,
        }
    }
}

impl ListRecord for HitObject {
    const KIND_NAME: &'static str = "hit objects";

    fn wrap(records: Vec<Self>) -> SectionValue {
        SectionValue::HitObjects(records)
    }

    fn unwrap(value: &SectionValue) -> Option<&[Self]> {
        match value {
            SectionValue::HitObjects(records) => Some(records),
            _ => None,
        }
    }
}

impl ListRecord for Event {
    const KIND_NAME: &'static str = "events";

    fn wrap(records: Vec<Self>) -> SectionValue {
        SectionValue::Events(records)
    }

    fn unwrap(value: &SectionValue) -> Option<&[Self]> {
        match value {
            SectionValue::Events(records) => Some(records),
            _ => None,
        }
    }
}

/// Parses every line which is neither blank nor a `//` comment as an `R`, keeping the input order.
#[derive(Debug)]
pub struct ListSection<R> {
    _record: PhantomData<fn() -> R>,
}

impl<R> ListSection<R> {
    /// Creates the handler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<R> Default for ListSection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for ListSection<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for ListSection<R> {}

impl<R: ListRecord> SectionHandler for ListSection<R> {
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
                R::parse_record(codec, line.text())
                    .map_err(|error| ParseError::from_record(section, line.line(), error))
            })
            .collect::<Result<_, _>>()
            .map(R::wrap)
    }

    fn write(
        &self,
        codec: &Codec,
        sink: &mut LineSink,
        section: &str,
        value: &SectionValue,
    ) -> Result<(), WriteError> {
        let records = R::unwrap(value).ok_or_else(|| WriteError::UnexpectedValue {
            section: section.to_string(),
            expected: R::KIND_NAME,
        })?;
        sink.extend(records.iter().map(|record| record.write_record(codec)));
        Ok(())
    }
}
