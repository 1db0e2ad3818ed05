//! Fancy diagnostics support using `ariadne`.
//!
//! [`ParseError`] carries the line number of the offending line, this module turns it into an
//! `ariadne::Report` labelling that line of the source.
//!
//! # Usage Example
//!
//! ```rust
//! # #[cfg(feature = "diagnostics")]
//! # {
//! use osufile::{config::Config, diagnostics::emit_parse_error};
//!
//! let source = "osu file format v14\n\n[TimingPoints]\n0,abc\n";
//! if let Err(err) = osufile::parse(source, &Config::default()) {
//!     emit_parse_error("map.osu", source, &err);
//! }
//! # }
//! ```

#[cfg(feature = "diagnostics")]
use ariadne::{Color, Label, Report, ReportKind, Source};

#[cfg(feature = "diagnostics")]
use crate::parse::ParseError;

/// Simple source container that holds the filename and source text.
///
/// ```rust
/// use osufile::diagnostics::SimpleSource;
///
/// let source = SimpleSource::new("map.osu", "osu file format v14\n\n[General]\nMode: 0\n");
/// assert_eq!(source.line_range(3), Some(21..30));
/// assert_eq!(source.line_range(9), None);
/// ```
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Character range of the 1-based line, without its line break.
    #[must_use]
    pub fn line_range(&self, line: usize) -> Option<std::ops::Range<usize>> {
        let mut start = 0;
        for (idx, text) in self.text.split('\n').enumerate() {
            let len = text.chars().count();
            if idx + 1 == line {
                let content = text.trim_end_matches('\r').chars().count();
                return Some(start..start + content);
            }
            start += len + 1;
        }
        None
    }
}

/// Trait for converting located errors to `ariadne::Report`.
#[cfg(feature = "diagnostics")]
pub trait ToAriadne {
    /// Convert error to ariadne Report.
    ///
    /// # Parameters
    /// * `src` - Source file container, used for the filename and to locate the line
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

/// Helper to build a styled ariadne `Report` consistently.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: std::ops::Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, std::ops::Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

#[cfg(feature = "diagnostics")]
impl ToAriadne for ParseError {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        let range = src.line_range(self.line()).unwrap_or(0..0);
        let title = self
            .section()
            .map_or_else(|| "malformed file".to_string(), |section| format!("malformed [{section}] section"));
        build_report(src, ReportKind::Error, range, &title, self, Color::Red)
    }
}

/// Prints the error with the offending line of the source.
///
/// # Parameters
/// * `name` - Name of the source file, used for display in diagnostic information
/// * `source` - Complete source text
/// * `error` - The error returned by parsing `source`
#[cfg(feature = "diagnostics")]
pub fn emit_parse_error(name: &str, source: &str, error: &ParseError) {
    let simple = SimpleSource::new(name, source);
    let report = error.to_report(&simple);
    let _ = report.eprint((name.to_string(), Source::from(source)));
}
