//! Extraction list input definitions.
//!
//! An extraction list is what a source scanner found in the code base: a flat
//! JSON array of messages with their context and locations.

use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::CatalogError;
use crate::model::MessageKey;
use crate::types::Location;

/// One message found in source code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedMessage {
    pub context: String,
    pub source: String,
    /// Disambiguation comment.
    pub comment: Option<String>,
    /// Developer note for translators.
    pub extra_comment: Option<String>,
    pub locations: Vec<Location>,
    pub numerus: bool,
}

impl ExtractedMessage {
    #[must_use]
    pub fn new(context: impl Into<String>, source: impl Into<String>) -> Self {
        Self { context: context.into(), source: source.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_extra_comment(mut self, extra_comment: impl Into<String>) -> Self {
        self.extra_comment = Some(extra_comment.into());
        self
    }

    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.locations.push(Location::new(file, line));
        self
    }

    #[must_use]
    pub const fn numerus(mut self) -> Self {
        self.numerus = true;
        self
    }

    #[must_use]
    pub fn key(&self) -> MessageKey<'_> {
        MessageKey::new(&self.source, self.comment.as_deref(), self.numerus)
    }
}

/// Parses an extraction list from JSON text.
///
/// # Errors
/// Returns [`CatalogError::Extraction`] if the text is not a valid list.
pub fn parse_extraction(text: &str) -> Result<Vec<ExtractedMessage>, CatalogError> {
    Ok(serde_json::from_str(text)?)
}

/// Reads an extraction list file.
///
/// # Errors
/// Returns [`CatalogError::Io`] if the file cannot be read, or
/// [`CatalogError::Extraction`] if its content is invalid.
pub fn load_extraction(path: &Path) -> Result<Vec<ExtractedMessage>, CatalogError> {
    let text = std::fs::read_to_string(path)?;
    let messages = parse_extraction(&text)?;
    tracing::debug!(path = %path.display(), count = messages.len(), "Extraction list loaded");
    Ok(messages)
}
