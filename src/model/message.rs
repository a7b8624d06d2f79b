//! A single translatable unit.

use crate::plural::PluralRules;
use crate::types::{
    Attributes,
    LocationSet,
    Status,
};

/// One `<numerusform>` slot of a plural translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumerusForm {
    pub text: String,
    /// Per-form sub-status (`<numerusform type="unfinished">`).
    pub unfinished: bool,
    pub attributes: Attributes,
}

impl NumerusForm {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), unfinished: false, attributes: Attributes::new() }
    }
}

/// Translation payload: a single text, or one text per plural category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Single(String),
    Plural(Vec<NumerusForm>),
}

impl Default for Translation {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl Translation {
    /// Empty translation shaped for a message: `forms` empty slots when numerus.
    #[must_use]
    pub fn empty(numerus: bool, forms: usize) -> Self {
        if numerus {
            Self::Plural(vec![NumerusForm::default(); forms.max(1)])
        } else {
            Self::Single(String::new())
        }
    }

    /// True if at least one text is non-empty.
    #[must_use]
    pub fn has_text(&self) -> bool {
        match self {
            Self::Single(text) => !text.is_empty(),
            Self::Plural(forms) => forms.iter().any(|form| !form.text.is_empty()),
        }
    }

    /// True if every slot carries text.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Single(text) => !text.is_empty(),
            Self::Plural(forms) => {
                !forms.is_empty() && forms.iter().all(|form| !form.text.is_empty())
            }
        }
    }

    #[must_use]
    pub fn forms(&self) -> Option<&[NumerusForm]> {
        match self {
            Self::Single(_) => None,
            Self::Plural(forms) => Some(forms),
        }
    }
}

/// A verbatim `extra-*` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extra {
    /// Element name including the `extra-` prefix.
    pub name: String,
    pub content: String,
}

/// Borrowed identity of a message inside its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageKey<'a> {
    pub source: &'a str,
    pub comment: Option<&'a str>,
    pub numerus: bool,
}

impl<'a> MessageKey<'a> {
    /// An empty disambiguation comment is the same as none.
    #[must_use]
    pub fn new(source: &'a str, comment: Option<&'a str>, numerus: bool) -> Self {
        Self { source, comment: comment.filter(|c| !c.is_empty()), numerus }
    }
}

/// A translatable message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub id: Option<String>,
    pub source: String,
    pub old_source: Option<String>,
    /// Disambiguation comment; part of the message identity.
    pub comment: Option<String>,
    pub old_comment: Option<String>,
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
    pub locations: LocationSet,
    /// `Plural` only when `numerus` is set; the writer emits a single text
    /// (the first form) otherwise.
    pub translation: Translation,
    pub status: Status,
    pub numerus: bool,
    pub userdata: Option<String>,
    pub extras: Vec<Extra>,
    pub attributes: Attributes,
    pub translation_attributes: Attributes,
}

impl Message {
    /// New untranslated message.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into(), status: Status::Unfinished, ..Self::default() }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_translation(mut self, text: impl Into<String>) -> Self {
        self.translation = Translation::Single(text.into());
        self
    }

    #[must_use]
    pub fn with_forms<I, S>(mut self, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numerus = true;
        self.translation = Translation::Plural(forms.into_iter().map(NumerusForm::new).collect());
        self
    }

    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn key(&self) -> MessageKey<'_> {
        MessageKey::new(&self.source, self.comment.as_deref(), self.numerus)
    }

    /// Translation text for a non-plural message, `None` for numerus messages.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.translation {
            Translation::Single(text) => Some(text),
            Translation::Plural(_) => None,
        }
    }

    /// Picks the plural form for `n`. Empty or missing slots yield `None`.
    #[must_use]
    pub fn plural_text(&self, rules: &PluralRules, n: u64) -> Option<&str> {
        match &self.translation {
            Translation::Single(text) => Some(text.as_str()).filter(|t| !t.is_empty()),
            Translation::Plural(forms) => forms
                .get(rules.form_index(n))
                .map(|form| form.text.as_str())
                .filter(|t| !t.is_empty()),
        }
    }
}
