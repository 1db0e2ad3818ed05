//! Round-trippable parser and writer of the osu! beatmap (.osu) format.
//!
//! A beatmap is a line-oriented text file. After a preamble line such as `osu file format v14`, it consists of
//! `[Name]` sections. Some hold `Key: Value` properties (`[General]`, `[Metadata]`, ...), others hold one record
//! per line (`[TimingPoints]`, `[HitObjects]`, `[Events]`).
//!
//! Parsing splits the text into sections and routes each one to the [`section::SectionHandler`] registered for
//! its name in a [`config::Config`]. Handlers decode every number through the [`codec::Codec`] of the
//! configuration, so both the conversions and the set of known sections can be replaced without touching the
//! engine. Sections without a handler are kept verbatim, and writing a parsed [`Document`] reproduces a file the
//! reference client reads identically.
//!
//! In detail, our policies are:
//!
//! - Support only UTF-8 (as required `String` to input).
//! - Fail at the first malformed line instead of dropping it, with its line number.
//! - Keep the order of sections and properties as read.
//! - Do not validate gameplay semantics, such as overlapping objects or out of range difficulty values.
//!
//! # Example
//!
//! ```
//! use osufile::{Document, codec::Value, model::HitObjectKind};
//!
//! let source = "\
//! osu file format v14
//!
//! [Difficulty]
//! ApproachRate:9.5
//!
//! [HitObjects]
//! 256,192,1000,5,0,0:0:0:0:
//! ";
//! let doc = Document::parse(source).unwrap();
//! assert_eq!(doc.property("Difficulty", "ApproachRate").unwrap().as_float().unwrap().as_f64(), 9.5);
//! let circle = &doc.hit_objects().unwrap()[0];
//! assert!(circle.is_new_combo());
//! assert!(matches!(circle.kind, HitObjectKind::Circle { .. }));
//! assert_eq!(doc.unparse().unwrap(), source);
//! ```

pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod mixin;
pub mod model;
pub mod parse;
pub mod prelude;
pub mod section;
pub mod unparse;
pub mod util;

pub use self::{
    config::Config,
    model::Document,
    parse::{ParseError, ReadError, parse, parse_reader},
    unparse::{WriteError, write, write_string},
};
