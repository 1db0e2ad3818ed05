//! `Key: Value` sections such as `[General]`, `[Metadata]` and `[Colours]`.

use std::collections::HashMap;

use crate::{
    codec::{Codec, FieldKind},
    mixin::SourceLine,
    model::{Properties, SectionValue},
    parse::ParseError,
    unparse::WriteError,
};

use super::{LineSink, SectionHandler};

const GENERAL: &[(&str, FieldKind)] = &[
    ("AudioLeadIn", FieldKind::Int),
    ("PreviewTime", FieldKind::Int),
    ("Countdown", FieldKind::Int),
    ("StackLeniency", FieldKind::Float),
    ("Mode", FieldKind::Int),
    ("LetterboxInBreaks", FieldKind::Bool),
    ("StoryFireInFront", FieldKind::Bool),
    ("UseSkinSprites", FieldKind::Bool),
    ("AlwaysShowPlayfield", FieldKind::Bool),
    ("EpilepsyWarning", FieldKind::Bool),
    ("CountdownOffset", FieldKind::Int),
    ("SpecialStyle", FieldKind::Bool),
    ("WidescreenStoryboard", FieldKind::Bool),
    ("SamplesMatchPlaybackRate", FieldKind::Bool),
];

const EDITOR: &[(&str, FieldKind)] = &[
    ("Bookmarks", FieldKind::IntList),
    ("DistanceSpacing", FieldKind::Float),
    ("BeatDivisor", FieldKind::Int),
    ("GridSize", FieldKind::Int),
    ("TimelineZoom", FieldKind::Float),
];

const METADATA: &[(&str, FieldKind)] = &[
    ("Tags", FieldKind::Words),
    ("BeatmapID", FieldKind::Int),
    ("BeatmapSetID", FieldKind::Int),
];

const DIFFICULTY: &[(&str, FieldKind)] = &[
    ("HPDrainRate", FieldKind::Float),
    ("CircleSize", FieldKind::Float),
    ("OverallDifficulty", FieldKind::Float),
    ("ApproachRate", FieldKind::Float),
    ("SliderMultiplier", FieldKind::Float),
    ("SliderTickRate", FieldKind::Float),
];

/// Reads `Key: Value` lines into [`SectionValue::Properties`].
///
/// The kind of each value is looked up by key, keys missing from the table use the fallback kind. A repeated
/// key keeps its first position and takes the last value. Lines are written back as
/// `Key{separator}Value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySection {
    table: HashMap<String, FieldKind>,
    fallback: FieldKind,
    separator: String,
}

impl PropertySection {
    /// Creates a handler with an empty table, reading every value as a string.
    #[must_use]
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            table: HashMap::new(),
            fallback: FieldKind::Str,
            separator: separator.into(),
        }
    }

    /// Sets the kind of a key.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, kind: FieldKind) -> Self {
        self.table.insert(key.into(), kind);
        self
    }

    /// Sets the kind of keys missing from the table.
    #[must_use]
    pub fn with_fallback(mut self, kind: FieldKind) -> Self {
        self.fallback = kind;
        self
    }

    fn from_table(separator: &str, table: &[(&str, FieldKind)]) -> Self {
        table
            .iter()
            .fold(Self::new(separator), |handler, &(key, kind)| {
                handler.with_field(key, kind)
            })
    }

    /// `[General]`, written as `Key: Value`.
    #[must_use]
    pub fn general() -> Self {
        Self::from_table(": ", GENERAL)
    }

    /// `[Editor]`, written as `Key: Value`.
    #[must_use]
    pub fn editor() -> Self {
        Self::from_table(": ", EDITOR)
    }

    /// `[Metadata]`, written as `Key:Value`.
    #[must_use]
    pub fn metadata() -> Self {
        Self::from_table(":", METADATA)
    }

    /// `[Difficulty]`, written as `Key:Value`.
    #[must_use]
    pub fn difficulty() -> Self {
        Self::from_table(":", DIFFICULTY)
    }

    /// `[Colours]`, every value is a colour, written as `Key : r,g,b`.
    #[must_use]
    pub fn colours() -> Self {
        Self::new(" : ").with_fallback(FieldKind::Colour)
    }

    /// Returns the kind used for the key.
    #[must_use]
    pub fn kind_of(&self, key: &str) -> FieldKind {
        self.table.get(key).copied().unwrap_or(self.fallback)
    }
}

impl SectionHandler for PropertySection {
    fn parse(
        &self,
        codec: &Codec,
        section: &str,
        lines: &[SourceLine<'_>],
    ) -> Result<SectionValue, ParseError> {
        let mut properties = Properties::new();
        for line in lines {
            if line.is_blank() || line.is_comment() {
                continue;
            }
            let Some((key, raw)) = line.text().split_once(':') else {
                tracing::warn!(section, line = line.line(), text = line.text(), "skipping property line without `:`");
                continue;
            };
            let key = key.trim();
            let value = codec
                .decode(self.kind_of(key), raw.trim())
                .map_err(|error| ParseError::malformed(section, line.line(), key, error))?;
            properties.insert(key, value);
        }
        Ok(SectionValue::Properties(properties))
    }

    fn write(
        &self,
        codec: &Codec,
        sink: &mut LineSink,
        section: &str,
        value: &SectionValue,
    ) -> Result<(), WriteError> {
        let SectionValue::Properties(properties) = value else {
            return Err(WriteError::UnexpectedValue {
                section: section.to_string(),
                expected: "properties",
            });
        };
        sink.extend(
            properties
                .iter()
                .map(|(key, value)| format!("{key}{}{}", self.separator, codec.encode(value))),
        );
        Ok(())
    }
}
