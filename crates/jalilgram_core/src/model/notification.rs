//! Activity notification model.
//!
//! # Invariants
//! - `user_id` is the recipient, `from_user_id` the originator.
//! - New notifications start unread.

use super::{AccountId, EntityId, EpochMs};
use serde::{Deserialize, Serialize};

/// Activity category, serialized under the `type` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    Mention,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Follow => "follow",
            Self::Mention => "mention",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: EntityId,
    /// Recipient account.
    pub user_id: AccountId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Object the notification refers to (post id, or account id for follows).
    pub target_id: EntityId,
    pub from_user_id: AccountId,
    pub text: String,
    pub created_at: EpochMs,
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub user_id: AccountId,
    pub kind: NotificationKind,
    pub target_id: EntityId,
    pub from_user_id: AccountId,
    pub text: String,
}

impl NotificationDraft {
    pub(crate) fn into_notification(self, id: EntityId, created_at: EpochMs) -> Notification {
        Notification {
            id,
            user_id: self.user_id,
            kind: self.kind,
            target_id: self.target_id,
            from_user_id: self.from_user_id,
            text: self.text,
            created_at,
            read: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationDraft, NotificationKind};

    #[test]
    fn kind_is_serialized_under_type_key() {
        let notification = NotificationDraft {
            user_id: "alice".to_string(),
            kind: NotificationKind::Follow,
            target_id: "bob".to_string(),
            from_user_id: "bob".to_string(),
            text: "bob started following you".to_string(),
        }
        .into_notification("n1".to_string(), 1);

        let json = serde_json::to_value(&notification).expect("serialize notification");
        assert_eq!(json["type"], "follow");
        assert_eq!(json["fromUserId"], "bob");
        assert_eq!(json["read"], false);
    }
}
