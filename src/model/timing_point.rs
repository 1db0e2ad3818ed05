//! Records of the `[TimingPoints]` section.

use crate::codec::{Codec, Float};

use super::{FieldResultExt, Record, RecordError, require_fields};

/// Effect bit for kiai time.
pub const EFFECT_KIAI: i64 = 1 << 0;
/// Effect bit to omit the first barline in osu!taiko and osu!mania.
pub const EFFECT_OMIT_FIRST_BARLINE: i64 = 1 << 3;

/// A timing point, `time,beatLength,meter,sampleSet,sampleIndex,volume,uninherited,effects`.
///
/// Only `time` and `beatLength` are required, older format revisions omit the rest.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingPoint {
    /// Start time in milliseconds.
    pub time: i64,
    /// For an uninherited point, the duration of a beat in milliseconds. For an inherited point, a negative
    /// inverse slider velocity multiplier in percent.
    pub beat_length: Float,
    /// Beats in a measure.
    pub meter: i64,
    /// Default sample set for hit objects.
    pub sample_set: i64,
    /// Custom sample index for hit objects.
    pub sample_index: i64,
    /// Volume percentage for hit objects.
    pub volume: i64,
    /// Whether the point defines its own tempo.
    pub uninherited: bool,
    /// Effect bits, see [`EFFECT_KIAI`] and [`EFFECT_OMIT_FIRST_BARLINE`].
    pub effects: i64,
}

impl Default for TimingPoint {
    fn default() -> Self {
        Self {
            time: 0,
            beat_length: Float::default(),
            meter: 4,
            sample_set: 0,
            sample_index: 0,
            volume: 100,
            uninherited: true,
            effects: 0,
        }
    }
}

impl TimingPoint {
    /// Whether the point inherits the tempo of a preceding point.
    #[must_use]
    pub const fn is_inherited(&self) -> bool {
        !self.uninherited
    }

    /// Whether kiai time is enabled.
    #[must_use]
    pub const fn is_kiai(&self) -> bool {
        self.effects & EFFECT_KIAI != 0
    }

    /// Whether the first barline is omitted.
    #[must_use]
    pub const fn omits_first_barline(&self) -> bool {
        self.effects & EFFECT_OMIT_FIRST_BARLINE != 0
    }

    /// Beats per minute of an uninherited point.
    #[must_use]
    pub fn bpm(&self) -> Option<f64> {
        let beat_length = self.beat_length.as_f64();
        (self.uninherited && beat_length > 0.0).then(|| 60_000.0 / beat_length)
    }

    /// Slider velocity multiplier of an inherited point, clamped as the reference client does.
    #[must_use]
    pub fn slider_velocity_multiplier(&self) -> f64 {
        let beat_length = self.beat_length.as_f64();
        if self.uninherited || beat_length >= 0.0 {
            1.0
        } else {
            100.0 / (-beat_length).clamp(10.0, 1000.0)
        }
    }
}

impl Record for TimingPoint {
    fn parse_record(codec: &Codec, line: &str) -> Result<Self, RecordError> {
        let tokens: Vec<_> = line.split(',').collect();
        require_fields(&tokens, 2)?;
        let defaults = Self::default();
        let int_or = |idx: usize, name: &str, default: i64| {
            tokens
                .get(idx)
                .map_or(Ok(default), |token| codec.decode_int(token).field(name))
        };
        Ok(Self {
            time: codec.decode_int(tokens[0]).field("time")?,
            beat_length: codec.decode_float(tokens[1]).field("beat_length")?,
            meter: int_or(2, "meter", defaults.meter)?,
            sample_set: int_or(3, "sample_set", defaults.sample_set)?,
            sample_index: int_or(4, "sample_index", defaults.sample_index)?,
            volume: int_or(5, "volume", defaults.volume)?,
            uninherited: tokens.get(6).map_or(Ok(defaults.uninherited), |token| {
                codec.decode_bool(token).field("uninherited")
            })?,
            effects: int_or(7, "effects", defaults.effects)?,
        })
    }

    fn write_record(&self, codec: &Codec) -> String {
        [
            codec.encode_int(self.time),
            codec.encode_float(&self.beat_length),
            codec.encode_int(self.meter),
            codec.encode_int(self.sample_set),
            codec.encode_int(self.sample_index),
            codec.encode_int(self.volume),
            codec.encode_bool(self.uninherited),
            codec.encode_int(self.effects),
        ]
        .join(",")
    }
}
