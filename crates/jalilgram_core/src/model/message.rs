//! Direct message model.

use super::{AccountId, EntityId, EpochMs};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: EntityId,
    pub sender_id: AccountId,
    pub receiver_id: AccountId,
    pub text: String,
    pub created_at: EpochMs,
    pub read: bool,
}

impl Message {
    /// Whether this message belongs to the unordered pair `{a, b}`.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDraft {
    pub sender_id: AccountId,
    pub receiver_id: AccountId,
    pub text: String,
}

impl MessageDraft {
    pub(crate) fn into_message(self, id: EntityId, created_at: EpochMs) -> Message {
        Message {
            id,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            text: self.text,
            created_at,
            read: false,
        }
    }
}
