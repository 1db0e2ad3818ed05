//! Records of the `[HitObjects]` section.
//!
//! Every line starts with `x,y,time,type,hitSound`. The low bits of `type` select the variant, which decides
//! how the remaining fields are read:
//!
//! | bit | variant | remaining fields |
//! |---|---|---|
//! | `1` | circle | `hitSample` |
//! | `2` | slider | `curveType\|curvePoints,slides,length,edgeSounds,edgeSets,hitSample` |
//! | `8` | spinner | `endTime,hitSample` |
//! | `128` | hold | `endTime:hitSample` |
//!
//! When more than one of these bits is set, the lowest wins.

use itertools::Itertools;

use crate::codec::{Codec, FieldError, FieldKind, Float};

use super::{FieldResultExt, Record, RecordError, require_fields};

/// Type bit of a hit circle.
pub const TYPE_CIRCLE: i64 = 1 << 0;
/// Type bit of a slider.
pub const TYPE_SLIDER: i64 = 1 << 1;
/// Type bit starting a new combo.
pub const TYPE_NEW_COMBO: i64 = 1 << 2;
/// Type bit of a spinner.
pub const TYPE_SPINNER: i64 = 1 << 3;
/// Type bits holding how many combo colours to skip.
pub const TYPE_COMBO_SKIP: i64 = 0b0111_0000;
/// Type bit of an osu!mania hold note.
pub const TYPE_HOLD: i64 = 1 << 7;
/// All type bits which select a variant.
pub const VARIANT_MASK: i64 = TYPE_CIRCLE | TYPE_SLIDER | TYPE_SPINNER | TYPE_HOLD;

/// Hit sound bit of the normal sound.
pub const HIT_SOUND_NORMAL: i64 = 1 << 0;
/// Hit sound bit of the whistle.
pub const HIT_SOUND_WHISTLE: i64 = 1 << 1;
/// Hit sound bit of the finish.
pub const HIT_SOUND_FINISH: i64 = 1 << 2;
/// Hit sound bit of the clap.
pub const HIT_SOUND_CLAP: i64 = 1 << 3;

const HEADER_LEN: usize = 5;

/// Selects the variant bit of a `type` field, in the order circle, slider, spinner, hold.
#[must_use]
pub fn variant_bit(type_bits: i64) -> Option<i64> {
    [TYPE_CIRCLE, TYPE_SLIDER, TYPE_SPINNER, TYPE_HOLD]
        .into_iter()
        .find(|bit| type_bits & bit != 0)
}

/// Sample settings of a hit object, `normalSet:additionSet:index:volume:filename`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitSample {
    /// Sample set of the normal sound.
    pub normal_set: i64,
    /// Sample set of the whistle, finish and clap sounds.
    pub addition_set: i64,
    /// Index of the sample.
    pub index: i64,
    /// Volume of the sample, `0` to use the timing point volume.
    pub volume: i64,
    /// Custom filename of the addition sound.
    pub filename: String,
}

impl HitSample {
    /// Parses the colon separated sample. The filename may be omitted, anything after it is ignored.
    ///
    /// # Errors
    ///
    /// Fails if one of the four numeric fields is missing or not an integer.
    pub fn parse(codec: &Codec, raw: &str) -> Result<Self, RecordError> {
        let mut tokens = raw.split(':');
        let mut int = |name: &str| {
            let token = tokens.next().unwrap_or("");
            codec.decode_int(token).field(name)
        };
        let normal_set = int("sample.normal_set")?;
        let addition_set = int("sample.addition_set")?;
        let index = int("sample.index")?;
        let volume = int("sample.volume")?;
        Ok(Self {
            normal_set,
            addition_set,
            index,
            volume,
            filename: tokens.next().unwrap_or("").to_string(),
        })
    }

    /// Writes the sample with all five fields.
    #[must_use]
    pub fn write(&self, codec: &Codec) -> String {
        format!(
            "{}:{}:{}:{}:{}",
            codec.encode_int(self.normal_set),
            codec.encode_int(self.addition_set),
            codec.encode_int(self.index),
            codec.encode_int(self.volume),
            self.filename
        )
    }
}

/// The curve algorithm of a slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveType {
    /// `B`
    Bezier,
    /// `C`
    CatmullRom,
    /// `L`
    Linear,
    /// `P`
    PerfectCircle,
}

impl CurveType {
    /// Reads the one letter tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "B" => Self::Bezier,
            "C" => Self::CatmullRom,
            "L" => Self::Linear,
            "P" => Self::PerfectCircle,
            _ => return None,
        })
    }

    /// Returns the one letter tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Bezier => "B",
            Self::CatmullRom => "C",
            Self::Linear => "L",
            Self::PerfectCircle => "P",
        }
    }
}

/// Fields of a slider following the shared prefix.
///
/// `length`, `edge_sounds`, `edge_sets` and `sample` are optional in the file. Missing edge lists are kept
/// empty and are not written back unless one of the trailing fields is set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slider {
    /// How the anchor points are joined.
    pub curve_type: CurveType,
    /// Anchor points after the head of the slider.
    pub curve_points: Vec<(i64, i64)>,
    /// How many times the slider is traversed.
    pub slides: i64,
    /// Visual length in osu! pixels.
    pub length: Float,
    /// Hit sound bits of each edge.
    pub edge_sounds: Vec<i64>,
    /// `normalSet:additionSet` of each edge.
    pub edge_sets: Vec<(i64, i64)>,
    /// Sample of the slider.
    pub sample: HitSample,
}

/// Reads `a:b`, ignoring anything after `b`.
fn parse_pair(codec: &Codec, raw: &str, name: &str) -> Result<(i64, i64), RecordError> {
    let err = || RecordError::Field {
        field: name.to_string(),
        error: FieldError::new(FieldKind::Int, raw),
    };
    let mut tokens = raw.split(':');
    let mut next = || {
        tokens
            .next()
            .and_then(|token| codec.decode_int(token).ok())
            .ok_or_else(err)
    };
    Ok((next()?, next()?))
}

impl Slider {
    fn parse(codec: &Codec, params: &[&str]) -> Result<Self, RecordError> {
        let mut curve = params[0].split('|');
        let tag = curve.next().unwrap_or("").trim();
        let curve_type = CurveType::from_tag(tag)
            .ok_or_else(|| RecordError::UnknownCurveType(tag.to_string()))?;
        let curve_points = curve
            .map(|point| parse_pair(codec, point, "curve_points"))
            .collect::<Result<_, _>>()?;
        let slides = codec.decode_int(params[1]).field("slides")?;
        let length = match params.get(2) {
            Some(token) => codec.decode_float(token).field("length")?,
            None => {
                tracing::warn!(
                    "slider length is missing, it cannot be calculated here so it is set to 0"
                );
                Float::default()
            }
        };
        let edge_sounds = params
            .get(3)
            .filter(|token| !token.trim().is_empty())
            .map(|token| {
                token
                    .split('|')
                    .map(|sound| codec.decode_int(sound).unwrap_or(0))
                    .collect()
            })
            .unwrap_or_default();
        let edge_sets = match params.get(4).filter(|token| !token.trim().is_empty()) {
            Some(token) => token
                .split('|')
                .map(|set| parse_pair(codec, set, "edge_sets"))
                .collect::<Result<_, _>>()?,
            None => vec![],
        };
        let sample = match params.get(5).filter(|token| !token.trim().is_empty()) {
            Some(token) => HitSample::parse(codec, token)?,
            None => HitSample::default(),
        };
        Ok(Self {
            curve_type,
            curve_points,
            slides,
            length,
            edge_sounds,
            edge_sets,
            sample,
        })
    }

    fn write(&self, codec: &Codec) -> Vec<String> {
        let curve = std::iter::once(self.curve_type.tag().to_string())
            .chain(
                self.curve_points
                    .iter()
                    .map(|&(x, y)| format!("{}:{}", codec.encode_int(x), codec.encode_int(y))),
            )
            .join("|");
        let mut params = vec![
            curve,
            codec.encode_int(self.slides),
            codec.encode_float(&self.length),
        ];
        if !self.edge_sounds.is_empty()
            || !self.edge_sets.is_empty()
            || self.sample != HitSample::default()
        {
            params.push(
                self.edge_sounds
                    .iter()
                    .map(|&sound| codec.encode_int(sound))
                    .join("|"),
            );
            params.push(
                self.edge_sets
                    .iter()
                    .map(|&(normal, addition)| {
                        format!("{}:{}", codec.encode_int(normal), codec.encode_int(addition))
                    })
                    .join("|"),
            );
            params.push(self.sample.write(codec));
        }
        params
    }
}

/// The variant of a hit object with its own fields.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitObjectKind {
    /// A hit circle.
    Circle {
        /// Sample of the circle.
        sample: HitSample,
    },
    /// A slider.
    Slider(Slider),
    /// A spinner.
    Spinner {
        /// End time in milliseconds.
        end_time: i64,
        /// Sample of the spinner.
        sample: HitSample,
    },
    /// An osu!mania hold note.
    Hold {
        /// End time in milliseconds.
        end_time: i64,
        /// Sample of the hold.
        sample: HitSample,
    },
}

impl HitObjectKind {
    /// The type bit selecting this variant.
    #[must_use]
    pub const fn type_bit(&self) -> i64 {
        match self {
            Self::Circle { .. } => TYPE_CIRCLE,
            Self::Slider(_) => TYPE_SLIDER,
            Self::Spinner { .. } => TYPE_SPINNER,
            Self::Hold { .. } => TYPE_HOLD,
        }
    }

    /// Sample of the object.
    #[must_use]
    pub const fn sample(&self) -> &HitSample {
        match self {
            Self::Circle { sample }
            | Self::Spinner { sample, .. }
            | Self::Hold { sample, .. }
            | Self::Slider(Slider { sample, .. }) => sample,
        }
    }
}

/// A hit object, `x,y,time,type,hitSound,...`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitObject {
    /// Horizontal position in osu! pixels.
    pub x: i64,
    /// Vertical position in osu! pixels.
    pub y: i64,
    /// Time in milliseconds.
    pub time: i64,
    /// Type bits other than the variant ones, such as [`TYPE_NEW_COMBO`] and [`TYPE_COMBO_SKIP`].
    ///
    /// Variant bits set here are ignored on write, the variant is always taken from `kind`.
    pub flags: i64,
    /// Hit sound bits, see [`HIT_SOUND_NORMAL`] and the others.
    pub hit_sound: i64,
    /// The variant and its fields.
    pub kind: HitObjectKind,
}

impl HitObject {
    /// The `type` field as written to the file.
    #[must_use]
    pub const fn type_bits(&self) -> i64 {
        (self.flags & !VARIANT_MASK) | self.kind.type_bit()
    }

    /// Whether the object starts a new combo.
    #[must_use]
    pub const fn is_new_combo(&self) -> bool {
        self.flags & TYPE_NEW_COMBO != 0
    }

    /// How many combo colours to skip.
    #[must_use]
    pub const fn combo_colour_skip(&self) -> i64 {
        (self.flags & TYPE_COMBO_SKIP) >> 4
    }

    /// End time of spinners and holds, otherwise the start time.
    #[must_use]
    pub const fn end_time(&self) -> i64 {
        match self.kind {
            HitObjectKind::Spinner { end_time, .. } | HitObjectKind::Hold { end_time, .. } => {
                end_time
            }
            HitObjectKind::Circle { .. } | HitObjectKind::Slider(_) => self.time,
        }
    }
}

impl Record for HitObject {
    fn parse_record(codec: &Codec, line: &str) -> Result<Self, RecordError> {
        let tokens: Vec<_> = line.split(',').collect();
        require_fields(&tokens, HEADER_LEN)?;
        let x = codec.decode_int(tokens[0]).field("x")?;
        let y = codec.decode_int(tokens[1]).field("y")?;
        let time = codec.decode_int(tokens[2]).field("time")?;
        let type_bits = codec.decode_int(tokens[3]).field("type")?;
        let hit_sound = codec.decode_int(tokens[4]).field("hit_sound")?;
        let variant =
            variant_bit(type_bits).ok_or(RecordError::UnknownHitObjectVariant(type_bits))?;

        let params = &tokens[HEADER_LEN..];
        let kind = match variant {
            TYPE_CIRCLE => HitObjectKind::Circle {
                sample: match params.first().filter(|token| !token.trim().is_empty()) {
                    Some(token) => HitSample::parse(codec, token)?,
                    None => HitSample::default(),
                },
            },
            TYPE_SLIDER => {
                require_fields(&tokens, HEADER_LEN + 2)?;
                HitObjectKind::Slider(Slider::parse(codec, params)?)
            }
            TYPE_SPINNER => {
                require_fields(&tokens, HEADER_LEN + 2)?;
                HitObjectKind::Spinner {
                    end_time: codec.decode_int(params[0]).field("end_time")?,
                    sample: HitSample::parse(codec, params[1])?,
                }
            }
            _ => {
                require_fields(&tokens, HEADER_LEN + 1)?;
                let (end_time, sample) = params[0].split_once(':').unwrap_or((params[0], ""));
                HitObjectKind::Hold {
                    end_time: codec.decode_int(end_time).field("end_time")?,
                    sample: HitSample::parse(codec, sample)?,
                }
            }
        };
        Ok(Self {
            x,
            y,
            time,
            flags: type_bits & !VARIANT_MASK,
            hit_sound,
            kind,
        })
    }

    fn write_record(&self, codec: &Codec) -> String {
        let header = [
            codec.encode_int(self.x),
            codec.encode_int(self.y),
            codec.encode_int(self.time),
            codec.encode_int(self.type_bits()),
            codec.encode_int(self.hit_sound),
        ];
        let params = match &self.kind {
            HitObjectKind::Circle { sample } => vec![sample.write(codec)],
            HitObjectKind::Slider(slider) => slider.write(codec),
            HitObjectKind::Spinner { end_time, sample } => {
                vec![codec.encode_int(*end_time), sample.write(codec)]
            }
            HitObjectKind::Hold { end_time, sample } => {
                vec![format!("{}:{}", codec.encode_int(*end_time), sample.write(codec))]
            }
        };
        header.into_iter().chain(params).join(",")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(line: &str) -> Result<HitObject, RecordError> {
        HitObject::parse_record(&Codec::default(), line)
    }

    fn sample(normal_set: i64, addition_set: i64, index: i64, volume: i64) -> HitSample {
        HitSample {
            normal_set,
            addition_set,
            index,
            volume,
            filename: String::new(),
        }
    }

    #[test]
    fn test_hit_sample() {
        let codec = Codec::default();
        assert_eq!(
            HitSample::parse(&codec, "1:2:3:4:hi.wav:adsfasdf"),
            Ok(HitSample {
                filename: "hi.wav".into(),
                ..sample(1, 2, 3, 4)
            })
        );
        assert_eq!(HitSample::parse(&codec, "0:0:0:0"), Ok(HitSample::default()));
        assert_eq!(
            HitSample::parse(&codec, "1:2:3"),
            Err(RecordError::Field {
                field: "sample.volume".into(),
                error: FieldError::new(FieldKind::Int, "")
            })
        );
    }

    #[test]
    fn test_circle() {
        let expected = HitObject {
            x: 200,
            y: 100,
            time: 10000,
            flags: 0,
            hit_sound: 0,
            kind: HitObjectKind::Circle {
                sample: HitSample::default(),
            },
        };
        for line in [
            "200,100,10000,1,0,0:0:0:0:",
            "200,100,10000,1,0,0:0:0:0:,asdfasdf",
            "200,100,10000,1,0",
            "200,100,10000,1,0,",
        ] {
            assert_eq!(parse(line), Ok(expected.clone()), "{line}");
        }
        assert_eq!(
            expected.write_record(&Codec::default()),
            "200,100,10000,1,0,0:0:0:0:"
        );
    }

    #[test]
    fn test_header_errors() {
        assert_eq!(
            parse("200,100,10000,1"),
            Err(RecordError::TooFewFields {
                expected: 5,
                found: 4
            })
        );
        assert!(matches!(
            parse("200,100,asdf,1,0,0:0:0:0:"),
            Err(RecordError::Field { field, .. }) if field == "time"
        ));
    }

    #[test]
    fn test_hold() {
        let hold = parse("200,100,10000,128,0,11000:1:2:3:4:").unwrap();
        assert_eq!(
            hold.kind,
            HitObjectKind::Hold {
                end_time: 11000,
                sample: sample(1, 2, 3, 4)
            }
        );
        assert_eq!(hold.end_time(), 11000);
        assert_eq!(
            parse("200,100,10000,128,0,11000:1:2:3:4::hi").map(|obj| obj.kind),
            Ok(hold.kind.clone())
        );
        assert!(parse("200,100,10000,128,0").is_err());
        assert!(parse("200,100,10000,128,0,asdf:1:2:3:4:").is_err());
        assert_eq!(
            hold.write_record(&Codec::default()),
            "200,100,10000,128,0,11000:1:2:3:4:"
        );
    }

    #[test]
    fn test_spinner() {
        let spinner = parse("256,192,5000,12,0,6000,0:0:0:0:").unwrap();
        assert!(spinner.is_new_combo());
        assert_eq!(spinner.flags, TYPE_NEW_COMBO);
        assert_eq!(
            spinner.kind,
            HitObjectKind::Spinner {
                end_time: 6000,
                sample: HitSample::default()
            }
        );
        assert_eq!(
            parse("256,192,5000,12,0,6000,0:0:0:0:,14"),
            Ok(spinner.clone())
        );
        for line in [
            "256,192,5000,12,0,6000",
            "256,192,5000,12,0",
            "256,192,5000,12,0,",
            "256,192,5000,12,0,6000,",
            "256,192,5000,12,asdf,0:0:0:0:",
        ] {
            assert!(parse(line).is_err(), "{line}");
        }
        assert_eq!(
            spinner.write_record(&Codec::default()),
            "256,192,5000,12,0,6000,0:0:0:0:"
        );
    }

    #[test]
    fn test_slider() {
        let slider = parse("442,316,10170,2,0,P|459:276|452:220,1,83.9999974365235,2|0,0:0|0:0,0:0:0:0:")
            .unwrap();
        assert_eq!(
            slider.kind,
            HitObjectKind::Slider(Slider {
                curve_type: CurveType::PerfectCircle,
                curve_points: vec![(459, 276), (452, 220)],
                slides: 1,
                length: Float::Binary(83.9999974365235),
                edge_sounds: vec![2, 0],
                edge_sets: vec![(0, 0), (0, 0)],
                sample: HitSample::default(),
            })
        );
        assert_eq!(
            slider.write_record(&Codec::default()),
            "442,316,10170,2,0,P|459:276|452:220,1,83.9999974365235,2|0,0:0|0:0,0:0:0:0:"
        );
    }

    #[test]
    fn test_slider_optional_fields() {
        let short = parse("56,7,11670,2,0,L|152:-2,1").unwrap();
        let HitObjectKind::Slider(slider) = &short.kind else {
            panic!("expected slider, got {:?}", short.kind);
        };
        assert_eq!(slider.length, Float::Binary(0.0));
        assert!(slider.edge_sounds.is_empty());
        assert_eq!(
            short.write_record(&Codec::default()),
            "56,7,11670,2,0,L|152:-2,1,0"
        );

        let edges_only = parse("56,7,11670,2,0,L|152:-2,1,70,2|0").unwrap();
        let written = edges_only.write_record(&Codec::default());
        assert_eq!(written, "56,7,11670,2,0,L|152:-2,1,70,2|0,,0:0:0:0:");
        assert_eq!(parse(&written), Ok(edges_only));

        assert!(parse("56,7,11670,2,0,L|152:-2").is_err());
    }

    #[test]
    fn test_slider_edges() {
        let edge_sounds = |line: &str| match parse(line).unwrap().kind {
            HitObjectKind::Slider(slider) => slider.edge_sounds,
            other => panic!("expected slider, got {other:?}"),
        };
        assert_eq!(
            edge_sounds("343,300,12570,2,0,P|308:266|266:254,1,84,2|asdf,2:2|0:0,0:0:0:0:"),
            vec![2, 0]
        );
        assert!(parse("343,300,12570,2,0,P|308:266|266:254,1,84,2|0,2:2|ohno,0:0:0:0:").is_err());
        assert!(parse("343,300,12570,2,0,P|308:266|266:254,1,84,2|0,2|0,0:0:0:0:").is_err());
        assert!(parse("343,300,12570,2,0,P|308:266|266:254,1,84,2|0,2:2:4|0:0:1,0:0:0:0:").is_ok());
        assert_eq!(
            parse("343,300,12570,2,0,X|308:266,1,84"),
            Err(RecordError::UnknownCurveType("X".into()))
        );
    }

    #[test]
    fn test_variant_precedence() {
        let cases = [
            (TYPE_CIRCLE, Some(TYPE_CIRCLE)),
            (TYPE_SLIDER, Some(TYPE_SLIDER)),
            (TYPE_SPINNER, Some(TYPE_SPINNER)),
            (TYPE_HOLD, Some(TYPE_HOLD)),
            (TYPE_CIRCLE | TYPE_SLIDER, Some(TYPE_CIRCLE)),
            (TYPE_CIRCLE | TYPE_HOLD, Some(TYPE_CIRCLE)),
            (TYPE_SLIDER | TYPE_SPINNER, Some(TYPE_SLIDER)),
            (TYPE_SPINNER | TYPE_HOLD, Some(TYPE_SPINNER)),
            (TYPE_NEW_COMBO | TYPE_COMBO_SKIP, None),
            (0, None),
        ];
        for (type_bits, expected) in cases {
            assert_eq!(variant_bit(type_bits), expected, "{type_bits:#b}");
        }
        assert_eq!(
            parse("256,192,5000,4,0"),
            Err(RecordError::UnknownHitObjectVariant(4))
        );
    }

    #[test]
    fn test_flags_survive_and_variant_bits_normalize() {
        let obj = parse("200,100,10000,55,0,0:0:0:0:").unwrap();
        assert_eq!(obj.combo_colour_skip(), 3);
        assert!(obj.is_new_combo());
        assert_eq!(obj.type_bits(), 53);
        let mixed = parse("200,100,10000,3,0").unwrap();
        assert_eq!(mixed.type_bits(), TYPE_CIRCLE);
        assert_eq!(parse(&mixed.write_record(&Codec::default())), Ok(mixed));
    }
}
