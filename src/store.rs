// ratachat — an embeddable chat widget for ratatui terminals
// Copyright (C) 2026  The ratachat developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::message::ChatMessage;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Emitted to every listener once per mutation. Deliberately carries no
/// diff: subscribers re-read the collection and react.
#[derive(Debug, Clone, Copy)]
pub struct CollectionChanged;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no message with id {0}")]
    UnknownMessage(Uuid),
}

/// Receiving end of a store subscription.
///
/// Notifications queue unbounded and are drained one at a time -- rapid
/// mutations stay distinct events, they are never squashed together.
#[derive(Debug)]
pub struct ChangeListener {
    rx: mpsc::UnboundedReceiver<CollectionChanged>,
}

impl ChangeListener {
    /// Pop the next pending notification without blocking.
    pub fn try_next(&mut self) -> Option<CollectionChanged> {
        self.rx.try_recv().ok()
    }
}

/// Externally owned, observable message collection.
///
/// The widget only reads it; the host mutates it. Every mutating call,
/// including size-preserving ones like [`MessageStore::replace`], sends
/// exactly one [`CollectionChanged`] to each live listener.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<ChatMessage>,
    listeners: Vec<mpsc::UnboundedSender<CollectionChanged>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: Vec<ChatMessage>) -> Self {
        Self { messages, listeners: Vec::new() }
    }

    pub fn subscribe(&mut self) -> ChangeListener {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(tx);
        ChangeListener { rx }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.notify();
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        for message in messages {
            self.messages.push(message);
            // One notification per appended message, matching push().
            self.notify();
        }
    }

    /// Swap out a message wholesale, keyed by id. Size-preserving, but
    /// still a mutation: listeners are notified.
    pub fn replace(&mut self, id: Uuid, message: ChatMessage) -> Result<(), StoreError> {
        let slot = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::UnknownMessage(id))?;
        *slot = message;
        self.notify();
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> Result<ChatMessage, StoreError> {
        let idx = self
            .messages
            .iter()
            .position(|m| m.id == id)
            .ok_or(StoreError::UnknownMessage(id))?;
        let removed = self.messages.remove(idx);
        self.notify();
        Ok(removed)
    }

    pub fn set_messages(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
        self.notify();
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.notify();
    }

    fn notify(&mut self) {
        tracing::trace!(count = self.messages.len(), "message collection changed");
        // Drop listeners whose receiving half is gone.
        self.listeners.retain(|tx| tx.send(CollectionChanged).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ChatUser, MessageKind};

    fn text(body: &str) -> ChatMessage {
        ChatMessage::new(ChatUser::new("tester"), MessageKind::Text(body.into()))
    }

    fn drain(listener: &mut ChangeListener) -> usize {
        let mut n = 0;
        while listener.try_next().is_some() {
            n += 1;
        }
        n
    }

    #[test]
    fn every_mutation_fires_exactly_one_notification() {
        let mut store = MessageStore::new();
        let mut listener = store.subscribe();

        store.push(text("a"));
        store.push(text("b"));
        assert_eq!(drain(&mut listener), 2);

        store.clear();
        assert_eq!(drain(&mut listener), 1);
    }

    #[test]
    fn size_preserving_replace_still_notifies() {
        let mut store = MessageStore::with_messages(vec![text("old")]);
        let id = store.messages()[0].id;
        let mut listener = store.subscribe();

        store.replace(id, text("new")).unwrap();
        assert_eq!(drain(&mut listener), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn extend_notifies_once_per_message() {
        let mut store = MessageStore::new();
        let mut listener = store.subscribe();

        store.extend([text("a"), text("b"), text("c")]);
        assert_eq!(drain(&mut listener), 3);
    }

    #[test]
    fn unknown_id_errors_without_notifying() {
        let mut store = MessageStore::with_messages(vec![text("a")]);
        let mut listener = store.subscribe();

        let missing = Uuid::new_v4();
        assert_eq!(store.remove(missing), Err(StoreError::UnknownMessage(missing)));
        assert_eq!(drain(&mut listener), 0);
    }

    #[test]
    fn all_subscribers_see_the_same_events() {
        let mut store = MessageStore::new();
        let mut first = store.subscribe();
        let mut second = store.subscribe();

        store.push(text("a"));
        assert_eq!(drain(&mut first), 1);
        assert_eq!(drain(&mut second), 1);
    }

    #[test]
    fn dropped_listener_is_pruned() {
        let mut store = MessageStore::new();
        let listener = store.subscribe();
        drop(listener);

        store.push(text("a"));
        assert!(store.listeners.is_empty());
    }
}
