//! Core types used throughout the project.

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::MalformedCatalogError;

/// A source-code provenance record (`<location filename=".." line=".."/>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

impl Location {
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self { file: file.into(), line }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Ordered set of locations. Insertion order is kept; a `(file, line)` pair
/// appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSet(Vec<Location>);

impl LocationSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a location. Returns `false` if it was already present.
    pub fn insert(&mut self, location: Location) -> bool {
        if self.0.contains(&location) {
            return false;
        }
        self.0.push(location);
        true
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Location] {
        &self.0
    }
}

impl FromIterator<Location> for LocationSet {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Location> for LocationSet {
    fn extend<I: IntoIterator<Item = Location>>(&mut self, iter: I) {
        for location in iter {
            self.insert(location);
        }
    }
}

impl<'a> IntoIterator for &'a LocationSet {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Translation state of a message.
///
/// The file format leaves `Finished` implicit (no `type` attribute); in memory
/// it is always an explicit variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    Unfinished,
    #[default]
    Finished,
    Vanished,
    Obsolete,
}

impl Status {
    /// Parses the `type` attribute of a `<translation>` element.
    ///
    /// # Errors
    /// Returns [`MalformedCatalogError::UnknownStatus`] for values other than
    /// `unfinished`, `vanished` and `obsolete`.
    pub fn from_type_attr(
        value: Option<&str>,
        source_text: &str,
    ) -> Result<Self, MalformedCatalogError> {
        match value {
            None => Ok(Self::Finished),
            Some("unfinished") => Ok(Self::Unfinished),
            Some("vanished") => Ok(Self::Vanished),
            Some("obsolete") => Ok(Self::Obsolete),
            Some(other) => Err(MalformedCatalogError::UnknownStatus {
                value: other.to_string(),
                source_text: source_text.to_string(),
            }),
        }
    }

    /// Value of the `type` attribute, `None` for `Finished`.
    #[must_use]
    pub const fn type_attr(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Vanished => Some("vanished"),
            Self::Obsolete => Some("obsolete"),
        }
    }

    /// Whether the message counts towards active-translation completeness.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Unfinished | Self::Finished)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unfinished => "unfinished",
            Self::Finished => "finished",
            Self::Vanished => "vanished",
            Self::Obsolete => "obsolete",
        };
        f.write_str(name)
    }
}

/// Attributes the engine does not interpret, kept in document order.
pub type Attributes = Vec<(String, String)>;
