//! Mixin types for structures.
//!
//! - `SourceLineMixin` is a generic wrapper that attaches the source line number to a value.
//! - `SourceLineMixinExt` is a trait that provides extension methods to create `SourceLineMixin` instances more conveniently.

/// A generic wrapper that attaches a line number of the source text to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLineMixin<T> {
    /// Wrapped content value
    content: T,
    /// Line number in the source text (1-based)
    line: usize,
}

/// A line of the source text with its line number.
pub type SourceLine<'a> = SourceLineMixin<&'a str>;

impl<T> SourceLineMixin<T> {
    /// Instances a new `SourceLineMixin`
    pub const fn new(content: T, line: usize) -> Self {
        Self { content, line }
    }

    /// Returns the line number, starts with 1.
    pub const fn line(&self) -> usize {
        self.line
    }
}

impl<'a> SourceLineMixin<&'a str> {
    /// Returns the line text.
    pub const fn text(&self) -> &'a str {
        self.content
    }

    /// Whether the line has no content except whitespace.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Whether the line is a `//` comment.
    pub fn is_comment(&self) -> bool {
        self.content.trim_start().starts_with("//")
    }
}

/// Extension methods for `SourceLineMixin`.
pub trait SourceLineMixinExt {
    /// Instances a new `SourceLineMixin` with a given line number.
    fn into_wrapper_line(self, line: usize) -> SourceLineMixin<Self>
    where
        Self: Sized,
    {
        SourceLineMixin::new(self, line)
    }
}

impl<T> SourceLineMixinExt for T {}
