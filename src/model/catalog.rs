//! The catalog aggregate root.

use indexmap::IndexMap;
use indexmap::map::Entry;

use super::context::Context;
use super::message::Message;
use crate::types::{
    Attributes,
    Status,
};

/// Format version written when a catalog does not carry one.
pub const DEFAULT_TS_VERSION: &str = "2.1";

/// Ordered collection of contexts for one target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Target locale tag (e.g. `tr`, `pt_BR`).
    pub language: String,
    pub source_language: Option<String>,
    pub version: Option<String>,
    pub attributes: Attributes,
    contexts: IndexMap<String, Context>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new("")
    }
}

impl Catalog {
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            source_language: None,
            version: Some(DEFAULT_TS_VERSION.to_string()),
            attributes: Attributes::new(),
            contexts: IndexMap::new(),
        }
    }

    /// Contexts in insertion order.
    pub fn contexts(&self) -> impl Iterator<Item = &Context> {
        self.contexts.values()
    }

    pub fn contexts_mut(&mut self) -> impl Iterator<Item = &mut Context> {
        self.contexts.values_mut()
    }

    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    pub fn context_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.get_mut(name)
    }

    /// Returns the named context, appending an empty one if missing.
    pub fn context_or_insert(&mut self, name: &str) -> &mut Context {
        self.contexts.entry(name.to_string()).or_insert_with(|| Context::new(name))
    }

    /// Adds a context. A context with the same name absorbs the messages instead,
    /// keeping its position.
    pub fn add_context(&mut self, mut context: Context) {
        match self.contexts.entry(context.name.clone()) {
            Entry::Occupied(mut entry) => {
                tracing::debug!(context = %context.name, "Folding repeated context");
                let existing = entry.get_mut();
                for message in context.take_messages() {
                    existing.push(message);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(context);
            }
        }
    }

    /// Removes a context, keeping the order of the others.
    pub fn remove_context(&mut self, name: &str) -> Option<Context> {
        self.contexts.shift_remove(name)
    }

    /// Every message with the name of the context it belongs to.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts
            .values()
            .flat_map(|ctx| ctx.messages().iter().map(move |m| (ctx.name.as_str(), m)))
    }

    /// Total number of messages across all contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.values().map(Context::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deletes every vanished message. Returns how many were removed.
    pub fn prune_vanished(&mut self) -> usize {
        self.prune(|m| m.status == Status::Vanished)
    }

    /// Deletes every obsolete message. Returns how many were removed.
    pub fn prune_obsolete(&mut self) -> usize {
        self.prune(|m| m.status == Status::Obsolete)
    }

    /// Deletes messages matching `remove` and drops contexts left empty.
    pub fn prune<F>(&mut self, mut remove: F) -> usize
    where
        F: FnMut(&Message) -> bool,
    {
        let mut removed = 0;
        for context in self.contexts.values_mut() {
            removed += context.retain(|m| !remove(m));
        }
        self.remove_empty_contexts();
        tracing::debug!(removed, "Pruned messages");
        removed
    }

    /// Drops contexts without messages. Returns how many were removed.
    pub fn remove_empty_contexts(&mut self) -> usize {
        let before = self.contexts.len();
        self.contexts.retain(|_, ctx| !ctx.is_empty());
        before - self.contexts.len()
    }
}
