//! Reconciles a catalog with a fresh extraction list.
//!
//! Matched messages keep their translations and pick up the new locations;
//! new messages arrive unfinished; messages gone from the source code become
//! vanished (or are deleted when nothing was ever translated). Running the
//! same merge twice changes nothing the second time.

mod types;

use std::collections::HashSet;

use indexmap::IndexMap;
use indexmap::map::Entry;

pub use types::{
    MergeOptions,
    MergeOutcome,
    MergeReport,
    MergeWarning,
};

use crate::error::DuplicateMessageError;
use crate::input::ExtractedMessage;
use crate::model::{
    Catalog,
    Message,
    MessageKey,
    NumerusForm,
    Translation,
};
use crate::plural::PluralRules;
use crate::types::{
    LocationSet,
    Status,
};

/// `(context, source, comment)`: identity of an extracted message without its numerus flag.
type ExtractionKey = (String, String, Option<String>);

/// Extracted messages folded by identity.
#[derive(Debug)]
struct ExtractedEntry {
    numerus: bool,
    locations: LocationSet,
    extra_comment: Option<String>,
}

/// Merges `extraction` into `catalog`.
///
/// Never fails: conditions worth reporting (duplicates, numerus flips, plural
/// form surplus, unknown language) are returned as warnings next to the
/// merged catalog.
#[must_use]
pub fn merge(
    mut catalog: Catalog,
    extraction: &[ExtractedMessage],
    options: &MergeOptions,
) -> MergeOutcome {
    let mut warnings = Vec::new();
    let mut report = MergeReport::default();

    let rules = PluralRules::for_language(&catalog.language).unwrap_or_else(|e| {
        warnings.push(MergeWarning::from(e));
        PluralRules::single()
    });

    drop_duplicates(&mut catalog, &mut warnings);
    let entries = fold_extraction(extraction, &mut warnings);

    let mut present: HashSet<(&str, MessageKey<'_>)> = HashSet::with_capacity(entries.len());
    for ((context_name, source, comment), entry) in &entries {
        let key = MessageKey::new(source, comment.as_deref(), entry.numerus);
        present.insert((context_name.as_str(), key));

        let context = catalog.context_or_insert(context_name);
        if let Some(message) = context.find_mut(key) {
            if update_message(message, entry) {
                report.revived += 1;
            } else {
                report.updated += 1;
            }
            continue;
        }

        let flipped = MessageKey { numerus: !entry.numerus, ..key };
        if context.find(flipped).is_some_and(|m| m.status.is_active()) {
            warnings.push(MergeWarning::NumerusChanged {
                context: context_name.clone(),
                source_text: source.clone(),
                numerus: entry.numerus,
            });
        }

        context.push(Message {
            source: source.clone(),
            comment: comment.clone(),
            extra_comment: entry.extra_comment.clone(),
            locations: entry.locations.clone(),
            numerus: entry.numerus,
            translation: Translation::empty(entry.numerus, rules.count()),
            status: Status::Unfinished,
            ..Message::default()
        });
        report.added += 1;
    }

    retire_absent(&mut catalog, &present, options, &mut report);

    if options.no_obsolete {
        report.deleted += catalog.prune_vanished();
    }

    for context in catalog.contexts_mut() {
        let context_name = context.name.clone();
        for message in context.messages_mut() {
            if let Some(warning) = fit_plural_forms(message, rules.count(), &context_name) {
                warnings.push(warning);
            }
            if message.status == Status::Finished && !message.translation.is_complete() {
                message.status = Status::Unfinished;
            }
        }
    }

    let dropped = catalog.remove_empty_contexts();
    if dropped > 0 {
        tracing::debug!(dropped, "Removed empty contexts");
    }

    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    tracing::info!(language = %catalog.language, "Merged: {report}");

    MergeOutcome { catalog, warnings, report }
}

/// Keeps the first of messages sharing an identity within a context.
fn drop_duplicates(catalog: &mut Catalog, warnings: &mut Vec<MergeWarning>) {
    for context in catalog.contexts_mut() {
        for message in context.take_messages() {
            if context.find(message.key()).is_some() {
                warnings.push(MergeWarning::Duplicate(DuplicateMessageError {
                    context: context.name.clone(),
                    source_text: message.source,
                    comment: message.comment,
                }));
            } else {
                context.push(message);
            }
        }
    }
}

/// Folds repeated extraction entries into one, merging their locations.
fn fold_extraction(
    extraction: &[ExtractedMessage],
    warnings: &mut Vec<MergeWarning>,
) -> IndexMap<ExtractionKey, ExtractedEntry> {
    let mut entries: IndexMap<ExtractionKey, ExtractedEntry> = IndexMap::new();

    for extracted in extraction {
        let comment = extracted.comment.clone().filter(|c| !c.is_empty());
        let key = (extracted.context.clone(), extracted.source.clone(), comment);
        match entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry.numerus != extracted.numerus {
                    warnings.push(MergeWarning::ConflictingExtraction {
                        context: extracted.context.clone(),
                        source_text: extracted.source.clone(),
                    });
                    continue;
                }
                entry.locations.extend(extracted.locations.iter().cloned());
                if entry.extra_comment.is_none() {
                    entry.extra_comment.clone_from(&extracted.extra_comment);
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(ExtractedEntry {
                    numerus: extracted.numerus,
                    locations: extracted.locations.iter().cloned().collect(),
                    extra_comment: extracted.extra_comment.clone(),
                });
            }
        }
    }

    entries
}

/// Applies an extraction match. Returns true if the message was revived.
fn update_message(message: &mut Message, entry: &ExtractedEntry) -> bool {
    message.locations.clone_from(&entry.locations);
    if entry.extra_comment.is_some() {
        message.extra_comment.clone_from(&entry.extra_comment);
    }

    let complete = message.translation.is_complete();
    match message.status {
        Status::Finished if !complete => {
            message.status = Status::Unfinished;
            false
        }
        Status::Finished | Status::Unfinished => false,
        Status::Vanished | Status::Obsolete => {
            tracing::debug!(source = %message.source, "Reviving message");
            message.status = if complete { Status::Finished } else { Status::Unfinished };
            true
        }
    }
}

/// Retires active messages the extraction no longer lists.
fn retire_absent(
    catalog: &mut Catalog,
    present: &HashSet<(&str, MessageKey<'_>)>,
    options: &MergeOptions,
    report: &mut MergeReport,
) {
    for context in catalog.contexts_mut() {
        let context_name = context.name.clone();
        for mut message in context.take_messages() {
            let keep = !message.status.is_active()
                || present.contains(&(context_name.as_str(), message.key()));
            if keep {
                context.push(message);
                continue;
            }

            if !message.translation.has_text() && options.prune_untranslated_vanished {
                tracing::debug!(context = %context_name, source = %message.source, "Deleting untranslated message");
                report.deleted += 1;
                continue;
            }

            message.status = Status::Vanished;
            message.locations.clear();
            report.vanished += 1;
            context.push(message);
        }
    }
}

/// Pads or trims a plural translation to `count` forms.
///
/// Only empty surplus forms are trimmed; translated ones are kept and reported.
/// A non-numerus message holding forms is collapsed to a single text.
fn fit_plural_forms(message: &mut Message, count: usize, context_name: &str) -> Option<MergeWarning> {
    if !message.numerus {
        return collapse_plural(message, context_name);
    }

    if let Translation::Single(text) = &mut message.translation {
        let text = std::mem::take(text);
        message.translation = Translation::Plural(vec![NumerusForm::new(text)]);
    }
    let Translation::Plural(forms) = &mut message.translation else {
        return None;
    };

    if forms.len() < count {
        forms.resize(count, NumerusForm::default());
        return None;
    }

    while forms.len() > count && forms.last().is_some_and(|form| form.text.is_empty()) {
        forms.pop();
    }

    (forms.len() > count).then(|| MergeWarning::PluralFormSurplus {
        context: context_name.to_string(),
        source_text: message.source.clone(),
        expected: count,
        found: forms.len(),
    })
}

/// Turns `Plural` into `Single` on a non-numerus message unless that would
/// drop translated text.
fn collapse_plural(message: &mut Message, context_name: &str) -> Option<MergeWarning> {
    let Translation::Plural(forms) = &mut message.translation else {
        return None;
    };

    if forms.iter().skip(1).any(|form| !form.text.is_empty()) {
        return Some(MergeWarning::PluralFormSurplus {
            context: context_name.to_string(),
            source_text: message.source.clone(),
            expected: 1,
            found: forms.len(),
        });
    }

    let text = forms.first_mut().map(|form| std::mem::take(&mut form.text)).unwrap_or_default();
    message.translation = Translation::Single(text);
    None
}
