//! Lock-held working set for one store operation.
//!
//! # Responsibility
//! - Lazily load each slot the operation touches, at most once.
//! - Track which slots were mutated and write only those on commit.
//!
//! # Invariants
//! - A slot that is missing or cannot be decoded loads as an empty collection.
//! - Write failures are logged and never surface to callers.
//! - `now` is sampled once per unit, so every record created in one unit
//!   shares the same timestamp source reading.

use crate::kv::KvStore;
use crate::model::account::Account;
use crate::model::message::Message;
use crate::model::notification::Notification;
use crate::model::post::Post;
use crate::model::story::Story;
use crate::model::{AccountId, EpochMs};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Persisted key-value slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Accounts,
    Posts,
    Stories,
    Messages,
    Notifications,
    Session,
}

impl Slot {
    /// Storage key of the slot.
    pub fn key(self) -> &'static str {
        match self {
            Self::Accounts => "@jalilgram_users",
            Self::Posts => "@jalilgram_posts",
            Self::Stories => "@jalilgram_stories",
            Self::Messages => "@jalilgram_messages",
            Self::Notifications => "@jalilgram_notifications",
            Self::Session => "@jalilgram_current_user",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::Posts => "posts",
            Self::Stories => "stories",
            Self::Messages => "messages",
            Self::Notifications => "notifications",
            Self::Session => "session",
        }
    }
}

/// Entity persisted as a JSON array in one slot.
pub trait Stored: Serialize + DeserializeOwned {
    const SLOT: Slot;

    #[doc(hidden)]
    fn staged(staging: &mut Staging) -> &mut Staged<Self>;
}

#[doc(hidden)]
pub struct Staged<T> {
    items: Option<Vec<T>>,
    dirty: bool,
}

impl<T> Default for Staged<T> {
    fn default() -> Self {
        Self {
            items: None,
            dirty: false,
        }
    }
}

#[doc(hidden)]
#[derive(Default)]
pub struct Staging {
    accounts: Staged<Account>,
    posts: Staged<Post>,
    stories: Staged<Story>,
    messages: Staged<Message>,
    notifications: Staged<Notification>,
    /// `Some(None)` clears the pointer, `Some(Some(id))` sets it.
    session: Option<Option<AccountId>>,
}

impl Stored for Account {
    const SLOT: Slot = Slot::Accounts;

    fn staged(staging: &mut Staging) -> &mut Staged<Self> {
        &mut staging.accounts
    }
}

impl Stored for Post {
    const SLOT: Slot = Slot::Posts;

    fn staged(staging: &mut Staging) -> &mut Staged<Self> {
        &mut staging.posts
    }
}

impl Stored for Story {
    const SLOT: Slot = Slot::Stories;

    fn staged(staging: &mut Staging) -> &mut Staged<Self> {
        &mut staging.stories
    }
}

impl Stored for Message {
    const SLOT: Slot = Slot::Messages;

    fn staged(staging: &mut Staging) -> &mut Staged<Self> {
        &mut staging.messages
    }
}

impl Stored for Notification {
    const SLOT: Slot = Slot::Notifications;

    fn staged(staging: &mut Staging) -> &mut Staged<Self> {
        &mut staging.notifications
    }
}

/// Working set of one store operation. Entity operations live in the
/// `*_repo` modules as `impl UnitOfWork` blocks.
pub struct UnitOfWork<'a> {
    kv: &'a mut dyn KvStore,
    now: EpochMs,
    staging: Staging,
}

impl<'a> UnitOfWork<'a> {
    pub(crate) fn new(kv: &'a mut dyn KvStore, now: EpochMs) -> Self {
        Self {
            kv,
            now,
            staging: Staging::default(),
        }
    }

    /// Clock reading taken when the unit started.
    pub fn now(&self) -> EpochMs {
        self.now
    }

    /// Returns the full collection of `T`.
    pub fn list<T: Stored>(&mut self) -> &[T] {
        self.load::<T>()
    }

    /// Returns the full collection of `T` for mutation and marks it dirty.
    pub fn list_mut<T: Stored>(&mut self) -> &mut Vec<T> {
        T::staged(&mut self.staging).dirty = true;
        self.load::<T>()
    }

    /// Overwrites the whole collection of `T`.
    pub fn replace_all<T: Stored>(&mut self, items: Vec<T>) {
        let staged = T::staged(&mut self.staging);
        staged.items = Some(items);
        staged.dirty = true;
    }

    pub(crate) fn session_pointer(&mut self) -> Option<AccountId> {
        if let Some(pending) = &self.staging.session {
            return pending.clone();
        }
        match self.kv.get(Slot::Session.key()) {
            Ok(value) => value.filter(|id| !id.is_empty()),
            Err(err) => {
                warn!("event=slot_read module=store status=error slot=session error={err}");
                None
            }
        }
    }

    pub(crate) fn set_session_pointer(&mut self, account_id: Option<AccountId>) {
        self.staging.session = Some(account_id);
    }

    fn load<T: Stored>(&mut self) -> &mut Vec<T> {
        let kv = &*self.kv;
        T::staged(&mut self.staging)
            .items
            .get_or_insert_with(|| read_slot::<T>(kv))
    }

    /// Writes every dirty slot. Failures are logged per slot.
    pub(crate) fn commit(mut self) {
        let mut written = Vec::new();
        flush::<Account>(self.kv, &mut self.staging, &mut written);
        flush::<Post>(self.kv, &mut self.staging, &mut written);
        flush::<Story>(self.kv, &mut self.staging, &mut written);
        flush::<Message>(self.kv, &mut self.staging, &mut written);
        flush::<Notification>(self.kv, &mut self.staging, &mut written);

        if let Some(pending) = self.staging.session.take() {
            let result = match pending {
                Some(id) => self.kv.set(Slot::Session.key(), &id),
                None => self.kv.remove(Slot::Session.key()),
            };
            match result {
                Ok(()) => written.push(Slot::Session.label()),
                Err(err) => {
                    error!("event=slot_write module=store status=error slot=session error={err}")
                }
            }
        }

        if !written.is_empty() {
            debug!(
                "event=store_commit module=store status=ok slots={}",
                written.join(",")
            );
        }
    }
}

fn read_slot<T: Stored>(kv: &dyn KvStore) -> Vec<T> {
    let slot = T::SLOT;
    let raw = match kv.get(slot.key()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(
                "event=slot_read module=store status=error slot={} error={err}",
                slot.label()
            );
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(err) => {
            warn!(
                "event=slot_decode module=store status=error slot={} bytes={} error={err}",
                slot.label(),
                raw.len()
            );
            Vec::new()
        }
    }
}

fn flush<T: Stored>(kv: &mut dyn KvStore, staging: &mut Staging, written: &mut Vec<&'static str>) {
    let staged = T::staged(staging);
    if !staged.dirty {
        return;
    }
    staged.dirty = false;
    let Some(items) = staged.items.as_ref() else {
        return;
    };
    let slot = T::SLOT;
    let encoded = match serde_json::to_string(items) {
        Ok(encoded) => encoded,
        Err(err) => {
            error!(
                "event=slot_encode module=store status=error slot={} error={err}",
                slot.label()
            );
            return;
        }
    };
    match kv.set(slot.key(), &encoded) {
        Ok(()) => written.push(slot.label()),
        Err(err) => error!(
            "event=slot_write module=store status=error slot={} error={err}",
            slot.label()
        ),
    }
}
