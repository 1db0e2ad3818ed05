//! The immutable configuration of a parse or write call.
//!
//! A [`Config`] bundles the [`Codec`] with the registry of [`SectionHandler`]s. It is built once with the
//! `with_*` methods and then only read, so one configuration can be shared by every thread.
//!
//! ```
//! use osufile::{codec::DecimalFloatCodec, config::{Config, LineEnding}};
//!
//! let config = Config::default()
//!     .with_float_codec(DecimalFloatCodec)
//!     .with_line_ending(LineEnding::CrLf)
//!     .without_handler("Events");
//! assert!(config.handler("General").is_some());
//! assert!(config.handler("Events").is_none());
//! ```

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    codec::{Codec, FloatCodec, IntCodec},
    model::{Event, HitObject, TimingPoint},
    section::{ListSection, PropertySection, SectionHandler},
};

/// The line break written after every line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`, as the reference client writes.
    CrLf,
}

impl LineEnding {
    /// Returns the line break.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Codecs, section handlers and output settings.
#[derive(Clone)]
pub struct Config {
    codec: Codec,
    handlers: HashMap<String, Arc<dyn SectionHandler>>,
    line_ending: LineEnding,
}

impl Default for Config {
    /// The default codecs, with handlers for `General`, `Editor`, `Metadata`, `Difficulty`, `Colours`,
    /// `Events`, `TimingPoints` and `HitObjects`.
    fn default() -> Self {
        Self::empty()
            .with_handler("General", PropertySection::general())
            .with_handler("Editor", PropertySection::editor())
            .with_handler("Metadata", PropertySection::metadata())
            .with_handler("Difficulty", PropertySection::difficulty())
            .with_handler("Events", ListSection::<Event>::new())
            .with_handler("TimingPoints", ListSection::<TimingPoint>::new())
            .with_handler("Colours", PropertySection::colours())
            .with_handler("HitObjects", ListSection::<HitObject>::new())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sections: Vec<_> = self.handlers.keys().collect();
        sections.sort();
        f.debug_struct("Config")
            .field("codec", &self.codec)
            .field("sections", &sections)
            .field("line_ending", &self.line_ending)
            .finish()
    }
}

impl Config {
    /// The default codecs without any section handler, so every section is kept verbatim.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            codec: Codec::default(),
            handlers: HashMap::new(),
            line_ending: LineEnding::default(),
        }
    }

    /// Replaces the int codec used by every handler.
    #[must_use]
    pub fn with_int_codec(mut self, codec: impl IntCodec + 'static) -> Self {
        self.codec = self.codec.with_int_codec(codec);
        self
    }

    /// Replaces the float codec used by every handler.
    #[must_use]
    pub fn with_float_codec(mut self, codec: impl FloatCodec + 'static) -> Self {
        self.codec = self.codec.with_float_codec(codec);
        self
    }

    /// Registers the handler for the section, replacing the one registered before.
    #[must_use]
    pub fn with_handler(
        mut self,
        section: impl Into<String>,
        handler: impl SectionHandler + 'static,
    ) -> Self {
        self.handlers.insert(section.into(), Arc::new(handler));
        self
    }

    /// Removes the handler of the section, so it is kept verbatim.
    #[must_use]
    pub fn without_handler(mut self, section: &str) -> Self {
        self.handlers.remove(section);
        self
    }

    /// Sets the line break used when writing.
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Returns the codec.
    #[must_use]
    pub const fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Returns the handler registered for the section.
    #[must_use]
    pub fn handler(&self, section: &str) -> Option<&dyn SectionHandler> {
        self.handlers.get(section).map(|handler| &**handler)
    }

    /// Returns the line break used when writing.
    #[must_use]
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Config>();
    }

    #[test]
    fn test_registry() {
        let config = Config::default();
        for section in [
            "General",
            "Editor",
            "Metadata",
            "Difficulty",
            "Events",
            "TimingPoints",
            "Colours",
            "HitObjects",
        ] {
            assert!(config.handler(section).is_some(), "{section}");
        }
        assert!(config.handler("general").is_none());
        assert!(Config::empty().handler("General").is_none());
        assert_eq!(config.line_ending().as_str(), "\n");
    }
}
