//! Prelude module for the crate.
//!
//! You can use `use osufile::prelude::*;` to import the commonly used types at once.

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{SimpleSource, ToAriadne, emit_parse_error};

pub use crate::{
    codec::{
        Codec, Decimal, DecimalFloatCodec, DefaultFloatCodec, DefaultIntCodec, FieldError,
        FieldKind, Float, FloatCodec, IntCodec, Value, format_decimal, parse_decimal,
    },
    config::{Config, LineEnding},
    mixin::{SourceLine, SourceLineMixin, SourceLineMixinExt},
    model::{
        Colour, CurveType, Document, DocumentError, Event, HitObject, HitObjectKind, HitSample,
        OrderedMap, Properties, Record, RecordError, SectionValue, Slider, TimingPoint,
        colour::{combo_colours, join_combo_colours},
    },
    parse::{ParseError, ReadError, parse, parse_reader},
    section::{
        LineSink, ListRecord, ListSection, PropertySection, RawSection, SectionHandler,
        ValueListSection,
    },
    unparse::{WriteError, write, write_string},
    util::default_filename,
};
