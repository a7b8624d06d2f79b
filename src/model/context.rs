//! A named group of messages (one originating component/class).

use super::message::{
    Message,
    MessageKey,
};
use crate::types::Attributes;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub name: String,
    pub comment: Option<String>,
    pub attributes: Attributes,
    messages: Vec<Message>,
}

impl Context {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Messages in insertion order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> std::slice::IterMut<'_, Message> {
        self.messages.iter_mut()
    }

    /// Appends a message without identity checks.
    ///
    /// Used by the reader so that a catalog round-trips as written; the merge
    /// pass is where duplicates are detected and reported.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Appends a message unless one with the same identity exists.
    ///
    /// Returns `false` (and drops `message`) on a duplicate.
    pub fn insert(&mut self, message: Message) -> bool {
        if self.find(message.key()).is_some() {
            return false;
        }
        self.messages.push(message);
        true
    }

    /// First message with the given identity.
    #[must_use]
    pub fn find(&self, key: MessageKey<'_>) -> Option<&Message> {
        self.messages.iter().find(|m| m.key() == key)
    }

    pub fn find_mut(&mut self, key: MessageKey<'_>) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.key() == key)
    }

    /// Removes and returns the first message with the given identity.
    pub fn remove(&mut self, key: MessageKey<'_>) -> Option<Message> {
        let index = self.messages.iter().position(|m| m.key() == key)?;
        Some(self.messages.remove(index))
    }

    /// Keeps only the messages for which `keep` returns true; returns how many were removed.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&Message) -> bool,
    {
        let before = self.messages.len();
        self.messages.retain(keep);
        before - self.messages.len()
    }

    pub(crate) fn take_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::types::Status;

    #[rstest]
    fn insert_rejects_same_identity() {
        let mut context = Context::new("Widget");

        assert!(context.insert(Message::new("Open")));
        assert!(context.insert(Message::new("Open").with_comment("menu")));
        assert!(!context.insert(Message::new("Open").with_translation("Aç")));

        assert_that!(context.len(), eq(2));
    }

    #[rstest]
    fn push_keeps_duplicates_in_order() {
        let mut context = Context::new("Widget");
        context.push(Message::new("Open").with_translation("first"));
        context.push(Message::new("Open").with_translation("second"));

        assert_that!(context.len(), eq(2));
        let found = context.find(Message::new("Open").key());
        assert_that!(found.and_then(Message::text), some(eq("first")));
    }

    #[rstest]
    fn remove_and_retain() {
        let mut context = Context::new("Widget");
        context.push(Message::new("A"));
        context.push(Message::new("B").with_status(Status::Vanished));
        context.push(Message::new("C"));

        let removed = context.remove(Message::new("A").key());
        assert_eq!(removed.map(|m| m.source).as_deref(), Some("A"));

        let dropped = context.retain(|m| m.status != Status::Vanished);
        assert_that!(dropped, eq(1));
        assert_that!(context.messages()[0].source, eq("C"));
    }
}
