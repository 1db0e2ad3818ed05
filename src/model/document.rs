//! The top-level [`Document`] and the values of its sections.

use thiserror::Error;

use crate::codec::Value;

use super::{event::Event, hit_object::HitObject, timing_point::TimingPoint};

/// A map from names to values which remembers the insertion order.
///
/// Inserting an existing key replaces the value but keeps the key at its first position, like re-assigning
/// a key of an insertion-ordered dictionary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self { entries: vec![] }
    }
}

impl<V> OrderedMap<V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: vec![] }
    }

    /// Returns the count of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there is no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Returns the value of the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    /// Returns the value of the key mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.position(key).map(|idx| &mut self.entries[idx].1)
    }

    /// Returns whether the key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Inserts a value, returning the older one if the key existed. A new key is appended at the end.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Removes the key, keeping the order of the other entries.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.position(key).map(|idx| self.entries.remove(idx).1)
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&String, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterates over the entries in order, with mutable values.
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = (&String, &mut V)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for OrderedMap<V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// The `Key: Value` entries of a property section such as `[General]` or `[Colours]`.
pub type Properties = OrderedMap<Value>;

/// The parsed content of one section.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionValue {
    /// `Key: Value` entries.
    Properties(Properties),
    /// `[TimingPoints]` records.
    TimingPoints(Vec<TimingPoint>),
    /// `[HitObjects]` records.
    HitObjects(Vec<HitObject>),
    /// `[Events]` records.
    Events(Vec<Event>),
    /// A list of plain values, for sections defined by the caller.
    Values(Vec<Value>),
    /// Lines of a section without a handler, kept verbatim.
    Raw(Vec<String>),
}

/// An error occurred when looking up a required part of a [`Document`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DocumentError {
    /// The section does not exist.
    #[error("missing section [{0}]")]
    MissingSection(String),
    /// The section exists but the key does not.
    #[error("missing key `{key}` in [{section}]")]
    MissingKey {
        /// The section searched.
        section: String,
        /// The missing key.
        key: String,
    },
    /// The section holds another kind of value.
    #[error("section [{section}] does not hold {expected}")]
    UnexpectedValue {
        /// The section searched.
        section: String,
        /// What the section should have held.
        expected: &'static str,
    },
}

/// A parsed beatmap: lines before the first section, then the sections in file order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    /// Lines before the first section header, usually `osu file format v14`.
    pub preamble: Vec<String>,
    /// Sections keyed by their name.
    pub sections: OrderedMap<SectionValue>,
}

impl Document {
    /// Returns the format version declared by the preamble, such as `14` for `osu file format v14`.
    #[must_use]
    pub fn format_version(&self) -> Option<u32> {
        self.preamble.iter().find_map(|line| {
            line.trim()
                .strip_prefix("osu file format v")
                .and_then(|version| version.trim().parse().ok())
        })
    }

    /// Returns the section.
    ///
    /// # Errors
    ///
    /// Fails with [`DocumentError::MissingSection`] if the section does not exist.
    pub fn section(&self, name: &str) -> Result<&SectionValue, DocumentError> {
        self.sections
            .get(name)
            .ok_or_else(|| DocumentError::MissingSection(name.to_string()))
    }

    /// Returns the entries of a property section.
    ///
    /// # Errors
    ///
    /// Fails if the section does not exist or is not a property section.
    pub fn properties(&self, name: &str) -> Result<&Properties, DocumentError> {
        match self.section(name)? {
            SectionValue::Properties(properties) => Ok(properties),
            _ => Err(DocumentError::UnexpectedValue {
                section: name.to_string(),
                expected: "properties",
            }),
        }
    }

    /// Returns the entries of a property section mutably.
    ///
    /// # Errors
    ///
    /// Fails if the section does not exist or is not a property section.
    pub fn properties_mut(&mut self, name: &str) -> Result<&mut Properties, DocumentError> {
        match self.sections.get_mut(name) {
            Some(SectionValue::Properties(properties)) => Ok(properties),
            Some(_) => Err(DocumentError::UnexpectedValue {
                section: name.to_string(),
                expected: "properties",
            }),
            None => Err(DocumentError::MissingSection(name.to_string())),
        }
    }

    /// Returns a value of a property section.
    ///
    /// # Errors
    ///
    /// Fails if the section or the key does not exist.
    pub fn property(&self, section: &str, key: &str) -> Result<&Value, DocumentError> {
        self.properties(section)?
            .get(key)
            .ok_or_else(|| DocumentError::MissingKey {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    /// Returns the records of `[TimingPoints]`.
    ///
    /// # Errors
    ///
    /// Fails if the section does not exist or holds other values.
    pub fn timing_points(&self) -> Result<&[TimingPoint], DocumentError> {
        match self.section("TimingPoints")? {
            SectionValue::TimingPoints(points) => Ok(points),
            _ => Err(DocumentError::UnexpectedValue {
                section: "TimingPoints".into(),
                expected: "timing points",
            }),
        }
    }

    /// Returns the records of `[HitObjects]`.
    ///
    /// # Errors
    ///
    /// Fails if the section does not exist or holds other values.
    pub fn hit_objects(&self) -> Result<&[HitObject], DocumentError> {
        match self.section("HitObjects")? {
            SectionValue::HitObjects(objects) => Ok(objects),
            _ => Err(DocumentError::UnexpectedValue {
                section: "HitObjects".into(),
                expected: "hit objects",
            }),
        }
    }

    /// Returns the records of `[Events]`.
    ///
    /// # Errors
    ///
    /// Fails if the section does not exist or holds other values.
    pub fn events(&self) -> Result<&[Event], DocumentError> {
        match self.section("Events")? {
            SectionValue::Events(events) => Ok(events),
            _ => Err(DocumentError::UnexpectedValue {
                section: "Events".into(),
                expected: "events",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_ordered_map_reinsert_keeps_position() {
        let mut map: OrderedMap<i64> = [("b", 1), ("a", 2)].into_iter().collect();
        assert_eq!(map.insert("b", 3), Some(1));
        map.insert("c", 4);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(map.get("b"), Some(&3));
        assert_eq!(map.remove("a"), Some(2));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_missing_parts_are_reported_on_use() {
        let mut doc = Document::default();
        assert_eq!(
            doc.properties("Metadata"),
            Err(DocumentError::MissingSection("Metadata".into()))
        );
        doc.sections
            .insert("Metadata", SectionValue::Properties(Properties::new()));
        assert_eq!(
            doc.property("Metadata", "Title"),
            Err(DocumentError::MissingKey {
                section: "Metadata".into(),
                key: "Title".into()
            })
        );
        doc.sections.insert("HitObjects", SectionValue::Raw(vec![]));
        assert_eq!(
            doc.hit_objects(),
            Err(DocumentError::UnexpectedValue {
                section: "HitObjects".into(),
                expected: "hit objects"
            })
        );
    }

    #[test]
    fn test_format_version() {
        let doc = Document {
            preamble: vec!["osu file format v14".into()],
            ..Default::default()
        };
        assert_eq!(doc.format_version(), Some(14));
        assert_eq!(Document::default().format_version(), None);
    }
}
