//! Helpers built on top of a parsed [`Document`].

use crate::{
    codec::Codec,
    model::{Document, DocumentError},
};

/// Returns the filename the reference client gives the beatmap, `Artist - Title (Creator) [Version].osu`.
///
/// The romanised `Artist` and `Title` are used, not their unicode variants.
///
/// # Errors
///
/// Fails if `[Metadata]` or one of the four keys is missing.
pub fn default_filename(document: &Document) -> Result<String, DocumentError> {
    let codec = Codec::default();
    let field = |key: &str| {
        document
            .property("Metadata", key)
            .map(|value| codec.encode(value))
    };
    Ok(format!(
        "{} - {} ({}) [{}].osu",
        field("Artist")?,
        field("Title")?,
        field("Creator")?,
        field("Version")?
    ))
}
