//! Ephemeral story model.
//!
//! # Invariants
//! - `expires_at == created_at + STORY_TTL_MS`; the duration is fixed.
//! - A story is visible only while `now < expires_at`.

use super::{AccountId, EntityId, EpochMs};
use serde::{Deserialize, Serialize};

/// Lifetime of every story: 24 hours.
pub const STORY_TTL_MS: EpochMs = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: EntityId,
    pub user_id: AccountId,
    pub image_url: String,
    pub created_at: EpochMs,
    pub expires_at: EpochMs,
}

impl Story {
    pub fn is_active_at(&self, now: EpochMs) -> bool {
        now < self.expires_at
    }
}

/// Caller-supplied fields for a new story.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryDraft {
    pub user_id: AccountId,
    pub image_url: String,
}

impl StoryDraft {
    pub(crate) fn into_story(self, id: EntityId, now: EpochMs) -> Story {
        Story {
            id,
            user_id: self.user_id,
            image_url: self.image_url,
            created_at: now,
            expires_at: now + STORY_TTL_MS,
        }
    }
}
