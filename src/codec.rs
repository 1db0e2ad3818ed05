//! Conversions between field tokens and typed values.
//!
//! Every integer and float in a beatmap goes through an [`IntCodec`] or a [`FloatCodec`]. Both are held by
//! [`Codec`], which is handed to every section handler and record, so replacing one of them changes how
//! numbers are read and written across the whole file:
//!
//! ```
//! use osufile::codec::{Codec, DecimalFloatCodec, FieldKind, Float, Value};
//!
//! let codec = Codec::default().with_float_codec(DecimalFloatCodec);
//! let value = codec.decode(FieldKind::Float, "9.5").unwrap();
//! assert!(matches!(value, Value::Float(Float::Decimal(_))));
//! assert_eq!(codec.encode(&value), "9.5");
//! ```

pub mod decimal;

use std::{fmt, sync::Arc};

use fraction::ToPrimitive;
use itertools::Itertools;
use thiserror::Error;

use crate::model::colour::Colour;

pub use self::decimal::{Decimal, DecimalFloatCodec, format_decimal, parse_decimal};

/// The kind of a field, which determines how its token is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldKind {
    /// An integer.
    Int,
    /// A floating point number.
    Float,
    /// A boolean written as `0` or `1`.
    Bool,
    /// A string kept as is.
    Str,
    /// Integers separated by `,`, such as `Bookmarks`.
    IntList,
    /// Words separated by spaces, such as `Tags`.
    Words,
    /// A `red,green,blue` triple.
    Colour,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "integer",
            Self::Float => "float",
            Self::Bool => "boolean",
            Self::Str => "string",
            Self::IntList => "list of integers",
            Self::Words => "list of words",
            Self::Colour => "colour",
        };
        f.write_str(name)
    }
}

/// A floating point value, whose representation depends on the [`FloatCodec`] which read it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Float {
    /// A binary floating point number, produced by [`DefaultFloatCodec`].
    Binary(f64),
    /// An exact decimal number, produced by [`DecimalFloatCodec`].
    Decimal(Decimal),
}

impl Float {
    /// Returns the value as `f64`, rounding a decimal if needed.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Binary(value) => *value,
            Self::Decimal(decimal) => decimal.to_f64().unwrap_or(f64::NAN),
        }
    }
}

impl Default for Float {
    fn default() -> Self {
        Self::Binary(0.0)
    }
}

impl From<f64> for Float {
    fn from(value: f64) -> Self {
        Self::Binary(value)
    }
}

impl From<Decimal> for Float {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

/// A typed value of a property.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(Float),
    /// A boolean.
    Bool(bool),
    /// A raw string.
    Str(String),
    /// Integers separated by `,`.
    IntList(Vec<i64>),
    /// Words separated by spaces.
    Words(Vec<String>),
    /// A combo or skin colour.
    Colour(Colour),
}

impl Value {
    /// Returns the kind of the value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Int(_) => FieldKind::Int,
            Self::Float(_) => FieldKind::Float,
            Self::Bool(_) => FieldKind::Bool,
            Self::Str(_) => FieldKind::Str,
            Self::IntList(_) => FieldKind::IntList,
            Self::Words(_) => FieldKind::Words,
            Self::Colour(_) => FieldKind::Colour,
        }
    }

    /// Returns the integer if the value is [`Value::Int`].
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float if the value is [`Value::Float`].
    #[must_use]
    pub const fn as_float(&self) -> Option<&Float> {
        match self {
            Self::Float(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the boolean if the value is [`Value::Bool`].
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string if the value is [`Value::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the colour if the value is [`Value::Colour`].
    #[must_use]
    pub const fn as_colour(&self) -> Option<Colour> {
        match self {
            Self::Colour(colour) => Some(*colour),
            _ => None,
        }
    }
}

/// A token which could not be decoded as its expected kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("expected {expected} but found {raw:?}")]
pub struct FieldError {
    /// What the token should have been.
    pub expected: FieldKind,
    /// The offending token.
    pub raw: String,
}

impl FieldError {
    /// Creates a new error for the token.
    pub fn new(expected: FieldKind, raw: impl Into<String>) -> Self {
        Self {
            expected,
            raw: raw.into(),
        }
    }
}

/// A pair of conversions between tokens and integers.
pub trait IntCodec: Send + Sync {
    /// Reads an integer from the token, or `None` if it is not an integer.
    fn decode(&self, raw: &str) -> Option<i64>;
    /// Writes the integer as a token.
    fn encode(&self, value: i64) -> String;
}

/// A pair of conversions between tokens and floats.
pub trait FloatCodec: Send + Sync {
    /// Reads a float from the token, or `None` if it is not a float.
    fn decode(&self, raw: &str) -> Option<Float>;
    /// Writes the float as a token.
    fn encode(&self, value: &Float) -> String;
}

/// Reads base-10 integers. A finite float token is accepted too and rounded half to even, because some
/// editors store integral fields such as times with a fractional part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DefaultIntCodec;

impl IntCodec for DefaultIntCodec {
    fn decode(&self, raw: &str) -> Option<i64> {
        let raw = raw.trim();
        if let Ok(value) = raw.parse() {
            return Some(value);
        }
        let float: f64 = raw.parse().ok().filter(|f: &f64| f.is_finite())?;
        let rounded = float.round_ties_even();
        (i64::MIN as f64..=i64::MAX as f64)
            .contains(&rounded)
            .then_some(rounded as i64)
    }

    fn encode(&self, value: i64) -> String {
        value.to_string()
    }
}

/// Reads floats as `f64`, including exponent forms, and writes the shortest representation which reads back
/// to the same `f64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DefaultFloatCodec;

impl FloatCodec for DefaultFloatCodec {
    fn decode(&self, raw: &str) -> Option<Float> {
        raw.trim()
            .parse()
            .ok()
            .filter(|f: &f64| f.is_finite())
            .map(Float::Binary)
    }

    fn encode(&self, value: &Float) -> String {
        match value {
            Float::Binary(binary) => binary.to_string(),
            Float::Decimal(decimal) => format_decimal(decimal),
        }
    }
}

/// The field codec shared by all handlers during a parse or write call.
#[derive(Clone)]
pub struct Codec {
    int: Arc<dyn IntCodec>,
    float: Arc<dyn FloatCodec>,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            int: Arc::new(DefaultIntCodec),
            float: Arc::new(DefaultFloatCodec),
        }
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec").finish_non_exhaustive()
    }
}

impl Codec {
    /// Replaces the integer codec.
    #[must_use]
    pub fn with_int_codec(mut self, codec: impl IntCodec + 'static) -> Self {
        self.int = Arc::new(codec);
        self
    }

    /// Replaces the float codec.
    #[must_use]
    pub fn with_float_codec(mut self, codec: impl FloatCodec + 'static) -> Self {
        self.float = Arc::new(codec);
        self
    }

    /// Decodes an integer.
    ///
    /// # Errors
    ///
    /// Fails if the int codec rejects the token.
    pub fn decode_int(&self, raw: &str) -> Result<i64, FieldError> {
        self.int
            .decode(raw)
            .ok_or_else(|| FieldError::new(FieldKind::Int, raw))
    }

    /// Encodes an integer.
    #[must_use]
    pub fn encode_int(&self, value: i64) -> String {
        self.int.encode(value)
    }

    /// Decodes a float.
    ///
    /// # Errors
    ///
    /// Fails if the float codec rejects the token.
    pub fn decode_float(&self, raw: &str) -> Result<Float, FieldError> {
        self.float
            .decode(raw)
            .ok_or_else(|| FieldError::new(FieldKind::Float, raw))
    }

    /// Encodes a float.
    #[must_use]
    pub fn encode_float(&self, value: &Float) -> String {
        self.float.encode(value)
    }

    /// Decodes a boolean. Any integer is accepted (non-zero is `true`), so are `true` and `false`.
    ///
    /// # Errors
    ///
    /// Fails if the token is neither an integer nor a boolean literal.
    pub fn decode_bool(&self, raw: &str) -> Result<bool, FieldError> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return Ok(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Ok(false);
        }
        self.int
            .decode(trimmed)
            .map(|value| value != 0)
            .ok_or_else(|| FieldError::new(FieldKind::Bool, raw))
    }

    /// Encodes a boolean as `0` or `1`.
    #[must_use]
    pub fn encode_bool(&self, value: bool) -> String {
        self.int.encode(value.into())
    }

    /// Decodes a token as the kind of field.
    ///
    /// # Errors
    ///
    /// Fails if the token cannot be read as `kind`.
    pub fn decode(&self, kind: FieldKind, raw: &str) -> Result<Value, FieldError> {
        let value = match kind {
            FieldKind::Int => Value::Int(self.decode_int(raw)?),
            FieldKind::Float => Value::Float(self.decode_float(raw)?),
            FieldKind::Bool => Value::Bool(self.decode_bool(raw)?),
            FieldKind::Str => Value::Str(raw.trim().to_string()),
            FieldKind::IntList if raw.trim().is_empty() => Value::IntList(vec![]),
            FieldKind::IntList => Value::IntList(
                raw.split(',')
                    .map(|token| self.decode_int(token))
                    .collect::<Result<_, _>>()
                    .map_err(|_| FieldError::new(kind, raw))?,
            ),
            FieldKind::Words => {
                Value::Words(raw.split_whitespace().map(str::to_string).collect())
            }
            FieldKind::Colour => Value::Colour(Colour::parse(self, raw)?),
        };
        Ok(value)
    }

    /// Encodes a value as a token.
    #[must_use]
    pub fn encode(&self, value: &Value) -> String {
        match value {
            Value::Int(int) => self.encode_int(*int),
            Value::Float(float) => self.encode_float(float),
            Value::Bool(boolean) => self.encode_bool(*boolean),
            Value::Str(string) => string.clone(),
            Value::IntList(ints) => ints.iter().map(|&int| self.encode_int(int)).join(","),
            Value::Words(words) => words.join(" "),
            Value::Colour(colour) => colour.write(self),
        }
    }
}
