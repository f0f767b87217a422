//! Story repository with lazy expiry pruning.
//!
//! # Invariants
//! - Every read drops stories whose `expires_at` has passed and persists the
//!   pruned collection when anything was removed.
//! - Pruned story ids are also dropped from their owners' `stories` lists.

use super::store::StoreAccess;
use super::unit_of_work::UnitOfWork;
use crate::model::account::Account;
use crate::model::new_entity_id;
use crate::model::story::{Story, StoryDraft};
use log::info;

impl UnitOfWork<'_> {
    /// Active stories in collection order, pruning expired ones first.
    pub fn list_stories(&mut self) -> Vec<Story> {
        self.prune_expired_stories();
        self.list::<Story>().to_vec()
    }

    pub fn list_stories_by_account(&mut self, account_id: &str) -> Vec<Story> {
        self.prune_expired_stories();
        self.list::<Story>()
            .iter()
            .filter(|story| story.user_id == account_id)
            .cloned()
            .collect()
    }

    pub fn create_story(&mut self, draft: StoryDraft) -> Story {
        self.prune_expired_stories();
        let story = draft.into_story(new_entity_id(), self.now());
        self.list_mut::<Story>().push(story.clone());

        let owner_known = self
            .list::<Account>()
            .iter()
            .any(|account| account.id == story.user_id);
        if owner_known {
            if let Some(owner) = self
                .list_mut::<Account>()
                .iter_mut()
                .find(|account| account.id == story.user_id)
            {
                owner.stories.push(story.id.clone());
            }
        }
        info!(
            "event=story_create module=repo status=ok story_id={} expires_at={}",
            story.id, story.expires_at
        );
        story
    }

    fn prune_expired_stories(&mut self) {
        let now = self.now();
        let expired: Vec<String> = self
            .list::<Story>()
            .iter()
            .filter(|story| !story.is_active_at(now))
            .map(|story| story.id.clone())
            .collect();
        if expired.is_empty() {
            return;
        }

        self.list_mut::<Story>()
            .retain(|story| !expired.contains(&story.id));

        let owners_affected = self
            .list::<Account>()
            .iter()
            .any(|account| account.stories.iter().any(|id| expired.contains(id)));
        if owners_affected {
            for account in self.list_mut::<Account>().iter_mut() {
                account.stories.retain(|id| !expired.contains(id));
            }
        }
        info!(
            "event=story_prune module=repo status=ok pruned={}",
            expired.len()
        );
    }
}

/// Story persistence contract.
pub trait StoryRepository: StoreAccess {
    fn list_stories(&self) -> Vec<Story> {
        self.unit_of_work(|unit| unit.list_stories())
    }

    /// Overwrites the stored collection as-is; expired entries are pruned on
    /// the next read.
    fn replace_stories(&self, stories: Vec<Story>) {
        self.unit_of_work(|unit| unit.replace_all(stories))
    }

    /// Creates a story expiring 24 hours from now.
    fn create_story(&self, draft: StoryDraft) -> Story {
        self.unit_of_work(|unit| unit.create_story(draft))
    }

    fn list_stories_by_account(&self, account_id: &str) -> Vec<Story> {
        self.unit_of_work(|unit| unit.list_stories_by_account(account_id))
    }
}

impl<S: StoreAccess> StoryRepository for S {}

#[cfg(test)]
mod tests {
    use super::StoryRepository;
    use crate::clock::ManualClock;
    use crate::kv::{KvStore, MemoryKvStore};
    use crate::model::account::AccountDraft;
    use crate::model::story::{StoryDraft, STORY_TTL_MS};
    use crate::repo::account_repo::AccountRepository;
    use crate::repo::store::SocialStore;
    use crate::repo::unit_of_work::Slot;
    use std::sync::Arc;

    #[test]
    fn expired_stories_are_purged_from_storage_and_owner() {
        let clock = Arc::new(ManualClock::new(0));
        let store = SocialStore::with_clock(MemoryKvStore::new(), clock.clone());
        let owner = store
            .create_account(AccountDraft {
                username: "owner".to_string(),
                ..AccountDraft::default()
            })
            .unwrap();
        let old = store.create_story(StoryDraft {
            user_id: owner.id.clone(),
            image_url: "file:///old.jpg".to_string(),
        });
        clock.advance(STORY_TTL_MS / 2);
        let fresh = store.create_story(StoryDraft {
            user_id: owner.id.clone(),
            image_url: "file:///new.jpg".to_string(),
        });
        assert_eq!(store.find_account(&owner.id).unwrap().stories.len(), 2);

        clock.advance(STORY_TTL_MS / 2);
        let active = store.list_stories();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, fresh.id);

        let raw = store
            .with_backend(|kv| kv.get(Slot::Stories.key()).unwrap())
            .unwrap();
        assert!(!raw.contains(&old.id));
        assert_eq!(
            store.find_account(&owner.id).unwrap().stories,
            vec![fresh.id]
        );
    }
}
