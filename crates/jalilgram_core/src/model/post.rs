//! Post and comment domain model.
//!
//! # Invariants
//! - Comments are embedded in exactly one post and kept in insertion order.
//! - `likes` on posts and comments is an idempotent membership set.

use super::{AccountId, EntityId, EpochMs, IdSet};
use serde::{Deserialize, Serialize};

/// Photo post with its embedded comment thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: EntityId,
    /// Owning account.
    pub user_id: AccountId,
    pub image_url: String,
    pub caption: String,
    pub likes: IdSet,
    pub comments: Vec<Comment>,
    pub created_at: EpochMs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Post {
    pub fn is_liked_by(&self, account_id: &str) -> bool {
        self.likes.contains(account_id)
    }

    pub fn comment_mut(&mut self, comment_id: &str) -> Option<&mut Comment> {
        self.comments
            .iter_mut()
            .find(|comment| comment.id == comment_id)
    }
}

/// Comment embedded in a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: EntityId,
    /// Authoring account.
    pub user_id: AccountId,
    pub text: String,
    pub likes: IdSet,
    pub created_at: EpochMs,
}

/// Caller-supplied fields for a new post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub user_id: AccountId,
    pub image_url: String,
    pub caption: String,
    pub location: Option<String>,
}

impl PostDraft {
    pub(crate) fn into_post(self, id: EntityId, created_at: EpochMs) -> Post {
        Post {
            id,
            user_id: self.user_id,
            image_url: self.image_url,
            caption: self.caption,
            likes: IdSet::new(),
            comments: Vec::new(),
            created_at,
            location: self.location,
        }
    }
}

/// Caller-supplied fields for a new comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    pub user_id: AccountId,
    pub text: String,
}

impl CommentDraft {
    pub(crate) fn into_comment(self, id: EntityId, created_at: EpochMs) -> Comment {
        Comment {
            id,
            user_id: self.user_id,
            text: self.text,
            likes: IdSet::new(),
            created_at,
        }
    }
}
