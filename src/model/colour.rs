//! Colours of the `[Colours]` section.
//!
//! Every line there is `Name : red,green,blue`. Combo colours are named `Combo1` to `Combo8`; other names such
//! as `SliderBorder` or `SliderTrackOverride` are skin overrides.

use std::collections::BTreeMap;

use crate::codec::{Codec, FieldError, FieldKind, Value};

use super::document::Properties;

/// The highest combo colour index read by the reference client.
pub const MAX_COMBO_COLOUR: usize = 8;

const COMBO_PREFIX: &str = "Combo";

/// An RGB colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Colour {
    /// Red component, `0..=255` in valid files.
    pub red: i64,
    /// Green component, `0..=255` in valid files.
    pub green: i64,
    /// Blue component, `0..=255` in valid files.
    pub blue: i64,
}

impl Colour {
    /// Creates a colour from its components.
    #[must_use]
    pub const fn new(red: i64, green: i64, blue: i64) -> Self {
        Self { red, green, blue }
    }

    /// Parses `red,green,blue`. Spaces around the components are allowed and components after the third are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Fails if there are less than three components or one of them is not an integer.
    pub fn parse(codec: &Codec, raw: &str) -> Result<Self, FieldError> {
        let err = || FieldError::new(FieldKind::Colour, raw);
        let mut components = raw.split(',').map(|token| codec.decode_int(token));
        let mut next = || components.next().ok_or_else(err)?.map_err(|_| err());
        Ok(Self::new(next()?, next()?, next()?))
    }

    /// Writes `red,green,blue`.
    #[must_use]
    pub fn write(&self, codec: &Codec) -> String {
        format!(
            "{},{},{}",
            codec.encode_int(self.red),
            codec.encode_int(self.green),
            codec.encode_int(self.blue)
        )
    }
}

/// Returns the combo colour index of a key such as `Combo3`, if it is one the client reads.
fn combo_index(key: &str) -> Option<usize> {
    key.strip_prefix(COMBO_PREFIX)?
        .parse()
        .ok()
        .filter(|index| (1..=MAX_COMBO_COLOUR).contains(index))
}

/// Splits the combo colours off the `[Colours]` section.
///
/// Returns the combo colours ordered by their index, then the remaining entries in their original order.
/// Keys with a non-numeric or out of range index, and entries which are not colours, stay in the remaining
/// entries. Keys naming the same index, such as `Combo1` and `Combo01`, keep the later colour.
#[must_use]
pub fn combo_colours(colours: &Properties) -> (Vec<Colour>, Properties) {
    let combos: BTreeMap<_, _> = colours
        .iter()
        .filter_map(|(key, value)| Some((combo_index(key)?, value.as_colour()?)))
        .collect();
    let others = colours
        .iter()
        .filter(|(key, value)| combo_index(key).is_none() || value.as_colour().is_none())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    (combos.into_values().collect(), others)
}

/// Joins combo colours and the remaining entries back into a `[Colours]` section.
///
/// The combo colours are renumbered from `Combo1` and placed first.
#[must_use]
pub fn join_combo_colours(combos: &[Colour], others: &Properties) -> Properties {
    combos
        .iter()
        .enumerate()
        .map(|(idx, colour)| (format!("{COMBO_PREFIX}{}", idx + 1), Value::Colour(*colour)))
        .chain(others.iter().map(|(key, value)| (key.clone(), value.clone())))
        .collect()
}
