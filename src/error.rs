//! Error taxonomy of the catalog engine.

use thiserror::Error;

/// Structural failure while reading a catalog. Fatal: no partial model is
/// returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedCatalogError {
    /// The XML itself could not be read (unclosed tag, bad entity, invalid bytes...).
    #[error("XML syntax error: {0}")]
    Syntax(String),

    #[error("Unexpected root element <{0}>, expected <TS>")]
    UnexpectedRoot(String),

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Unsupported encoding '{0}' declared")]
    UnsupportedEncoding(String),

    #[error("Unknown translation type '{value}' on message '{source_text}'")]
    UnknownStatus { value: String, source_text: String },

    #[error("Unexpected element <{element}> inside <{parent}>")]
    UnexpectedElement { element: String, parent: String },

    #[error("Unexpected text inside <{0}>")]
    UnexpectedText(String),

    #[error("Missing <{element}> inside <{parent}>")]
    MissingElement { element: String, parent: String },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute { element: String, attribute: String, value: String },

    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute { element: String, attribute: String },
}

/// Plural-category lookup for a language the resolver does not know.
///
/// Recoverable: callers fall back to a single-category policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported language '{0}' for plural rules")]
pub struct UnsupportedLanguageError(pub String);

/// Two messages in one context share source, disambiguation and numerus flag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Duplicate message '{source_text}' in context '{context}'{}", format_comment(.comment.as_deref()))]
pub struct DuplicateMessageError {
    pub context: String,
    pub source_text: String,
    pub comment: Option<String>,
}

fn format_comment(comment: Option<&str>) -> String {
    comment.map_or_else(String::new, |c| format!(" (comment: '{c}')"))
}

/// A character XML 1.0 cannot carry inside an attribute value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Attribute '{attribute}' cannot hold character U+{code:04X}")]
pub struct UnwritableAttributeError {
    pub attribute: String,
    pub code: u32,
}

/// Top-level error for catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Malformed catalog: {0}")]
    Malformed(#[from] MalformedCatalogError),

    #[error("Cannot write catalog: {0}")]
    Unwritable(#[from] UnwritableAttributeError),

    #[error(transparent)]
    UnsupportedLanguage(#[from] UnsupportedLanguageError),

    #[error("Failed to access catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse extraction list: {0}")]
    Extraction(#[from] serde_json::Error),
}
