//! Typed records of the list sections, and the [`Document`] holding every section.

pub mod colour;
pub mod document;
pub mod event;
pub mod hit_object;
pub mod timing_point;

use thiserror::Error;

use crate::codec::{Codec, FieldError};

pub use self::{
    colour::Colour,
    document::{Document, DocumentError, OrderedMap, Properties, SectionValue},
    event::Event,
    hit_object::{CurveType, HitObject, HitObjectKind, HitSample, Slider},
    timing_point::TimingPoint,
};

/// A record parsed from one line of a list section.
pub trait Record: Sized {
    /// Parses the record from the line.
    ///
    /// # Errors
    ///
    /// Fails if the line has too few fields or a field cannot be decoded.
    fn parse_record(codec: &Codec, line: &str) -> Result<Self, RecordError>;

    /// Writes the record back as one line.
    fn write_record(&self, codec: &Codec) -> String;
}

/// An error occurred when parsing a record.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecordError {
    /// A field of the record could not be decoded.
    #[error("field `{field}`: {error}")]
    Field {
        /// Name of the field.
        field: String,
        /// The underlying codec error.
        error: FieldError,
    },
    /// The record ended before its required fields.
    #[error("expected at least {expected} fields but found {found}")]
    TooFewFields {
        /// Count of required fields.
        expected: usize,
        /// Count of fields found.
        found: usize,
    },
    /// The type bits of a hit object selected no known variant.
    #[error("unknown hit object type {0:#010b}")]
    UnknownHitObjectVariant(i64),
    /// The curve descriptor of a slider started with an unknown tag.
    #[error("unknown slider curve type `{0}`")]
    UnknownCurveType(String),
}

/// Attaches a field name to a codec result.
pub(crate) trait FieldResultExt<T> {
    fn field(self, name: &str) -> Result<T, RecordError>;
}

impl<T> FieldResultExt<T> for Result<T, FieldError> {
    fn field(self, name: &str) -> Result<T, RecordError> {
        self.map_err(|error| RecordError::Field {
            field: name.to_string(),
            error,
        })
    }
}

/// Returns an error unless there are at least `expected` tokens.
pub(crate) const fn require_fields(tokens: &[&str], expected: usize) -> Result<(), RecordError> {
    if tokens.len() < expected {
        return Err(RecordError::TooFewFields {
            expected,
            found: tokens.len(),
        });
    }
    Ok(())
}
