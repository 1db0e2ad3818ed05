//! Exact decimal numbers and the float codec producing them.

use std::str::FromStr;

use fraction::{GenericDecimal, GenericFraction, One};
use num::BigUint;

use super::{Float, FloatCodec};

/// Arbitrary precision decimal read by [`DecimalFloatCodec`].
///
/// The precision is the count of fractional digits the token was written with, so `3.0` is written back as
/// `3.0` and `83.9999974365235` keeps all of its digits.
pub type Decimal = GenericDecimal<BigUint, usize>;

/// Largest exponent magnitude accepted in the `1.5e3` form.
pub const MAX_EXPONENT: usize = 1024;

/// Largest count of fractional digits a decimal may be written with.
pub const MAX_PRECISION: usize = 1024;

/// Splits `[+-]digits[.digits][(e|E)[+-]digits]` into its parts, checking the limits.
fn split_decimal(raw: &str) -> Option<(bool, &str, &str, i64)> {
    let (number, exponent) = match raw.split_once(['e', 'E']) {
        Some((number, exponent)) => (number, exponent.parse::<i64>().ok()?),
        None => (raw, 0),
    };
    if exponent.unsigned_abs() > MAX_EXPONENT as u64 {
        return None;
    }
    let (negative, unsigned) = match number.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, number.strip_prefix('+').unwrap_or(number)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
    {
        return None;
    }
    Some((negative, int_part, frac_part, exponent))
}

/// Parses a decimal token, keeping the count of fractional digits it was written with.
///
/// Returns `None` if the token is not a plain decimal, or its exponent or precision exceeds
/// [`MAX_EXPONENT`] or [`MAX_PRECISION`].
#[must_use]
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let (negative, int_part, frac_part, exponent) = split_decimal(raw)?;
    let precision = usize::try_from((frac_part.len() as i64 - exponent).max(0)).ok()?;
    if precision > MAX_PRECISION {
        return None;
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let plain = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    };
    let mut fraction = GenericFraction::<BigUint>::from_str(&plain).ok()?;
    let shift = num::pow(BigUint::from(10u8), exponent.unsigned_abs() as usize);
    if exponent > 0 {
        fraction = fraction * GenericFraction::new(shift, BigUint::one());
    } else if exponent < 0 {
        fraction = fraction / GenericFraction::new(shift, BigUint::one());
    }
    if negative {
        fraction = -fraction;
    }
    Some(Decimal::from_fraction(fraction).set_precision(precision))
}

/// Writes the decimal with exactly its precision in fractional digits.
#[must_use]
pub fn format_decimal(decimal: &Decimal) -> String {
    let precision = decimal.get_precision().min(MAX_PRECISION);
    let mut text = format!("{decimal:.precision$}");
    if precision == 0 {
        return text;
    }
    let written = text.split_once('.').map_or(0, |(_, frac)| frac.len());
    if written == 0 && !text.contains('.') {
        text.push('.');
    }
    for _ in written..precision {
        text.push('0');
    }
    text
}

/// A [`FloatCodec`] which reads floats as exact [`Decimal`]s and writes them back with as many fractional
/// digits as they were read with.
///
/// The value is kept exactly, its spelling is not: `.5` is written as `0.5` and `1.5e1` as `15`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DecimalFloatCodec;

impl FloatCodec for DecimalFloatCodec {
    fn decode(&self, raw: &str) -> Option<Float> {
        parse_decimal(raw.trim()).map(Float::Decimal)
    }

    fn encode(&self, value: &Float) -> String {
        match value {
            Float::Decimal(decimal) => format_decimal(decimal),
            Float::Binary(binary) => binary.to_string(),
        }
    }
}
