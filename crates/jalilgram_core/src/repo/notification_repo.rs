//! Notification repository.
//!
//! # Invariants
//! - Per-account listings are sorted by `created_at` descending; equal
//!   timestamps list the later insert first.
//! - The store never decides whether to notify; callers own that policy.

use super::store::StoreAccess;
use super::unit_of_work::UnitOfWork;
use crate::model::new_entity_id;
use crate::model::notification::{Notification, NotificationDraft};
use log::debug;

impl UnitOfWork<'_> {
    pub fn list_notifications_by_account(&mut self, account_id: &str) -> Vec<Notification> {
        let mut inbox: Vec<Notification> = self
            .list::<Notification>()
            .iter()
            .rev()
            .filter(|notification| notification.user_id == account_id)
            .cloned()
            .collect();
        inbox.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        inbox
    }

    pub fn create_notification(&mut self, draft: NotificationDraft) -> Notification {
        let notification = draft.into_notification(new_entity_id(), self.now());
        self.list_mut::<Notification>().push(notification.clone());
        debug!(
            "event=notification_create module=repo status=ok kind={} notification_id={}",
            notification.kind.as_str(),
            notification.id
        );
        notification
    }

    pub fn mark_notification_read(&mut self, id: &str) -> bool {
        let Some(index) = self
            .list::<Notification>()
            .iter()
            .position(|notification| notification.id == id)
        else {
            return false;
        };
        if self.list::<Notification>()[index].read {
            return false;
        }
        self.list_mut::<Notification>()[index].read = true;
        true
    }
}

/// Notification persistence contract.
pub trait NotificationRepository: StoreAccess {
    fn list_notifications(&self) -> Vec<Notification> {
        self.unit_of_work(|unit| unit.list::<Notification>().to_vec())
    }

    fn replace_notifications(&self, notifications: Vec<Notification>) {
        self.unit_of_work(|unit| unit.replace_all(notifications))
    }

    /// Notifications addressed to `account_id`, newest first.
    fn list_notifications_by_account(&self, account_id: &str) -> Vec<Notification> {
        self.unit_of_work(|unit| unit.list_notifications_by_account(account_id))
    }

    /// Unread subset of [`Self::list_notifications_by_account`].
    fn list_unread_notifications(&self, account_id: &str) -> Vec<Notification> {
        let mut inbox = self.list_notifications_by_account(account_id);
        inbox.retain(|notification| !notification.read);
        inbox
    }

    fn create_notification(&self, draft: NotificationDraft) -> Notification {
        self.unit_of_work(|unit| unit.create_notification(draft))
    }

    /// Sets the read flag. Returns `false` for unknown or already-read ids.
    fn mark_notification_read(&self, id: &str) -> bool {
        self.unit_of_work(|unit| unit.mark_notification_read(id))
    }
}

impl<S: StoreAccess> NotificationRepository for S {}

#[cfg(test)]
mod tests {
    use super::NotificationRepository;
    use crate::kv::MemoryKvStore;
    use crate::repo::store::SocialStore;

    #[test]
    fn mark_unknown_notification_is_noop() {
        let store = SocialStore::new(MemoryKvStore::new());
        assert!(!store.mark_notification_read("missing"));
        assert!(store.list_notifications().is_empty());
    }
}
