use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::error::{
    DuplicateMessageError,
    UnsupportedLanguageError,
};
use crate::model::Catalog;

/// Knobs for a merge pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeOptions {
    /// Delete messages that disappear from the extraction without ever having
    /// been translated, instead of keeping them as vanished.
    pub prune_untranslated_vanished: bool,
    /// Drop every vanished message once the pass is done.
    pub no_obsolete: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self { prune_untranslated_vanished: true, no_obsolete: false }
    }
}

/// Non-fatal condition found while merging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeWarning {
    /// The catalog already held the same message twice; the first one is kept.
    #[error(transparent)]
    Duplicate(#[from] DuplicateMessageError),

    /// The extraction listed one message both with and without plural forms.
    #[error("Message '{source_text}' in context '{context}' extracted with conflicting numerus flags; keeping the first")]
    ConflictingExtraction { context: String, source_text: String },

    /// The message switched between plural and singular in the source code.
    #[error("Message '{source_text}' in context '{context}' changed numerus to '{numerus}'; old translation retired")]
    NumerusChanged { context: String, source_text: String, numerus: bool },

    /// A plural message holds more translated forms than the language has.
    #[error("Message '{source_text}' in context '{context}' has {found} plural forms, language expects {expected}")]
    PluralFormSurplus { context: String, source_text: String, expected: usize, found: usize },

    /// No plural rules for the catalog language; one form per message is assumed.
    #[error("{0}; assuming a single plural form")]
    UnsupportedLanguage(#[from] UnsupportedLanguageError),
}

/// What a merge pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    pub updated: usize,
    pub vanished: usize,
    pub revived: usize,
    pub deleted: usize,
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} new, {} updated, {} vanished, {} revived, {} deleted",
            self.added, self.updated, self.vanished, self.revived, self.deleted
        )
    }
}

/// Result of [`merge`](super::merge).
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub catalog: Catalog,
    pub warnings: Vec<MergeWarning>,
    pub report: MergeReport,
}
