//! Direct message repository.

use super::store::StoreAccess;
use super::unit_of_work::UnitOfWork;
use crate::model::message::{Message, MessageDraft};
use crate::model::new_entity_id;
use log::debug;

impl UnitOfWork<'_> {
    /// Messages between the unordered pair `{a, b}`, oldest first.
    pub fn conversation(&mut self, a: &str, b: &str) -> Vec<Message> {
        let mut thread: Vec<Message> = self
            .list::<Message>()
            .iter()
            .filter(|message| message.is_between(a, b))
            .cloned()
            .collect();
        thread.sort_by_key(|message| message.created_at);
        thread
    }

    pub fn send_message(&mut self, draft: MessageDraft) -> Message {
        let message = draft.into_message(new_entity_id(), self.now());
        self.list_mut::<Message>().push(message.clone());
        debug!(
            "event=message_send module=repo status=ok message_id={}",
            message.id
        );
        message
    }

    /// Marks messages sent by `other` to `reader` as read.
    ///
    /// Returns how many flags flipped.
    pub fn mark_conversation_read(&mut self, reader: &str, other: &str) -> usize {
        let unread = |message: &Message| {
            !message.read && message.receiver_id == reader && message.sender_id == other
        };
        if !self.list::<Message>().iter().any(unread) {
            return 0;
        }
        let mut flipped = 0;
        for message in self.list_mut::<Message>().iter_mut() {
            if unread(&*message) {
                message.read = true;
                flipped += 1;
            }
        }
        flipped
    }
}

/// Message persistence contract.
pub trait MessageRepository: StoreAccess {
    fn list_messages(&self) -> Vec<Message> {
        self.unit_of_work(|unit| unit.list::<Message>().to_vec())
    }

    fn replace_messages(&self, messages: Vec<Message>) {
        self.unit_of_work(|unit| unit.replace_all(messages))
    }

    fn conversation(&self, a: &str, b: &str) -> Vec<Message> {
        self.unit_of_work(|unit| unit.conversation(a, b))
    }

    fn send_message(&self, draft: MessageDraft) -> Message {
        self.unit_of_work(|unit| unit.send_message(draft))
    }

    fn mark_conversation_read(&self, reader: &str, other: &str) -> usize {
        self.unit_of_work(|unit| unit.mark_conversation_read(reader, other))
    }
}

impl<S: StoreAccess> MessageRepository for S {}
