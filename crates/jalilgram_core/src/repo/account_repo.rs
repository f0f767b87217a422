//! Account repository: lookup, creation, profile updates, follow graph.
//!
//! # Invariants
//! - Username uniqueness is checked under the same lock as the insert.
//! - `follow`/`unfollow` update both endpoints in one unit of work.
//! - Following oneself is a no-op.

use super::store::StoreAccess;
use super::unit_of_work::UnitOfWork;
use super::{RepoError, RepoResult};
use crate::model::account::{Account, AccountDraft, AccountUpdate};
use crate::model::new_entity_id;
use log::{debug, info};

impl UnitOfWork<'_> {
    pub fn find_account(&mut self, id: &str) -> Option<Account> {
        self.list::<Account>()
            .iter()
            .find(|account| account.id == id)
            .cloned()
    }

    pub fn find_account_by_username(&mut self, username: &str) -> Option<Account> {
        self.list::<Account>()
            .iter()
            .find(|account| account.has_username(username))
            .cloned()
    }

    pub fn create_account(&mut self, draft: AccountDraft) -> RepoResult<Account> {
        if self.find_account_by_username(&draft.username).is_some() {
            return Err(RepoError::UsernameTaken(draft.username));
        }
        let account = draft.into_account(new_entity_id(), self.now());
        self.list_mut::<Account>().push(account.clone());
        info!("event=account_create module=repo status=ok account_id={}", account.id);
        Ok(account)
    }

    pub fn update_account(&mut self, id: &str, update: AccountUpdate) -> Option<Account> {
        if self.find_account(id).is_none() {
            return None;
        }
        let account = self
            .list_mut::<Account>()
            .iter_mut()
            .find(|account| account.id == id)?;
        update.apply_to(account);
        Some(account.clone())
    }

    /// Adds the follow edge `follower_id -> target_id`.
    ///
    /// Returns whether either side changed.
    pub fn follow(&mut self, follower_id: &str, target_id: &str) -> bool {
        self.edit_follow_edge(follower_id, target_id, true)
    }

    /// Removes the follow edge `follower_id -> target_id`.
    pub fn unfollow(&mut self, follower_id: &str, target_id: &str) -> bool {
        self.edit_follow_edge(follower_id, target_id, false)
    }

    pub fn search_accounts(&mut self, query: &str) -> Vec<Account> {
        let lowered = query.to_lowercase();
        self.list::<Account>()
            .iter()
            .filter(|account| account.matches_query(&lowered))
            .cloned()
            .collect()
    }

    fn edit_follow_edge(&mut self, follower_id: &str, target_id: &str, add: bool) -> bool {
        if follower_id == target_id {
            return false;
        }
        let accounts = self.list::<Account>();
        let follower = accounts.iter().position(|account| account.id == follower_id);
        let target = accounts.iter().position(|account| account.id == target_id);
        let (Some(follower), Some(target)) = (follower, target) else {
            debug!("event=follow_edit module=repo status=skipped reason=account_missing");
            return false;
        };

        let pending = if add {
            !accounts[follower].following.contains(target_id)
                || !accounts[target].followers.contains(follower_id)
        } else {
            accounts[follower].following.contains(target_id)
                || accounts[target].followers.contains(follower_id)
        };
        if !pending {
            return false;
        }

        let accounts = self.list_mut::<Account>();
        if add {
            accounts[follower].following.insert(target_id);
            accounts[target].followers.insert(follower_id);
        } else {
            accounts[follower].following.remove(target_id);
            accounts[target].followers.remove(follower_id);
        }
        true
    }
}

/// Account persistence contract.
pub trait AccountRepository: StoreAccess {
    /// Loads the whole account collection.
    fn list_accounts(&self) -> Vec<Account> {
        self.unit_of_work(|unit| unit.list::<Account>().to_vec())
    }

    /// Overwrites the whole account collection.
    fn replace_accounts(&self, accounts: Vec<Account>) {
        self.unit_of_work(|unit| unit.replace_all(accounts))
    }

    fn find_account(&self, id: &str) -> Option<Account> {
        self.unit_of_work(|unit| unit.find_account(id))
    }

    /// Case-insensitive exact username lookup.
    fn find_account_by_username(&self, username: &str) -> Option<Account> {
        self.unit_of_work(|unit| unit.find_account_by_username(username))
    }

    /// Assigns id and creation time, then appends the account.
    ///
    /// # Errors
    /// - `RepoError::UsernameTaken` when a case-insensitive match exists.
    fn create_account(&self, draft: AccountDraft) -> RepoResult<Account> {
        self.unit_of_work(|unit| unit.create_account(draft))
    }

    /// Applies `update` to the matching account; `None` when id is unknown.
    fn update_account(&self, id: &str, update: AccountUpdate) -> Option<Account> {
        self.unit_of_work(|unit| unit.update_account(id, update))
    }

    fn follow(&self, follower_id: &str, target_id: &str) -> bool {
        self.unit_of_work(|unit| unit.follow(follower_id, target_id))
    }

    fn unfollow(&self, follower_id: &str, target_id: &str) -> bool {
        self.unit_of_work(|unit| unit.unfollow(follower_id, target_id))
    }

    /// Case-insensitive substring search over username and display name,
    /// in collection order.
    fn search_accounts(&self, query: &str) -> Vec<Account> {
        self.unit_of_work(|unit| unit.search_accounts(query))
    }
}

impl<S: StoreAccess> AccountRepository for S {}

#[cfg(test)]
mod tests {
    use super::AccountRepository;
    use crate::kv::MemoryKvStore;
    use crate::model::account::{AccountDraft, AccountUpdate};
    use crate::repo::store::SocialStore;
    use crate::repo::RepoError;

    fn draft(username: &str, full_name: &str) -> AccountDraft {
        AccountDraft {
            username: username.to_string(),
            full_name: full_name.to_string(),
            email: format!("{username}@example.com"),
            password: "secret1".to_string(),
            ..AccountDraft::default()
        }
    }

    #[test]
    fn create_rejects_case_variant_username() {
        let store = SocialStore::new(MemoryKvStore::new());
        store.create_account(draft("alice", "Alice")).unwrap();
        let err = store.create_account(draft("ALICE", "Other")).unwrap_err();
        assert_eq!(err, RepoError::UsernameTaken("ALICE".to_string()));
        assert_eq!(store.list_accounts().len(), 1);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let store = SocialStore::new(MemoryKvStore::new());
        let update = AccountUpdate {
            bio: Some("x".to_string()),
            ..AccountUpdate::default()
        };
        assert!(store.update_account("missing", update).is_none());
        assert!(store.list_accounts().is_empty());
    }

    #[test]
    fn follow_missing_account_is_noop() {
        let store = SocialStore::new(MemoryKvStore::new());
        let alice = store.create_account(draft("alice", "Alice")).unwrap();
        assert!(!store.follow(&alice.id, "ghost"));
        let reloaded = store.find_account(&alice.id).unwrap();
        assert!(reloaded.following.is_empty());
    }

    #[test]
    fn self_follow_is_noop() {
        let store = SocialStore::new(MemoryKvStore::new());
        let alice = store.create_account(draft("alice", "Alice")).unwrap();
        assert!(!store.follow(&alice.id, &alice.id));
        assert!(store.find_account(&alice.id).unwrap().followers.is_empty());
    }

    #[test]
    fn search_matches_username_or_display_name_in_collection_order() {
        let store = SocialStore::new(MemoryKvStore::new());
        store.create_account(draft("bob_builder", "Robert")).unwrap();
        store.create_account(draft("carol", "Bobbie Carol")).unwrap();
        store.create_account(draft("dave", "Dave")).unwrap();

        let hits = store.search_accounts("BOB");
        let names: Vec<_> = hits.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(names, vec!["bob_builder", "carol"]);
    }
}
