//! Persisted domain model for the social client.
//!
//! # Responsibility
//! - Define the JSON shapes stored in each key-value slot.
//! - Provide draft types that carry caller-supplied fields only.
//!
//! # Invariants
//! - Every entity is identified by an opaque string id minted by
//!   [`new_entity_id`].
//! - Timestamps are Unix epoch milliseconds.
//! - Liking/follower/following sets never contain duplicates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod account;
pub mod message;
pub mod notification;
pub mod post;
pub mod story;

/// Opaque identifier shared by all entities.
pub type EntityId = String;

/// Identifier of an [`account::Account`].
pub type AccountId = EntityId;

/// Unix epoch milliseconds.
pub type EpochMs = i64;

/// Mints a new timestamp-ordered entity id.
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7().to_string()
}

/// Insertion-ordered set of ids persisted as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdSet(Vec<EntityId>);

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` unless already present. Returns whether the set changed.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id.to_string());
        true
    }

    /// Removes `id` if present. Returns whether the set changed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|member| member != id);
        before != self.0.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|member| member == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<EntityId>> FromIterator<S> for IdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = IdSet::new();
        for id in iter {
            let id = id.into();
            set.insert(&id);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::{new_entity_id, IdSet};

    #[test]
    fn id_set_insert_is_idempotent() {
        let mut set = IdSet::new();
        assert!(set.insert("a"));
        assert!(!set.insert("a"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn id_set_remove_absent_is_noop() {
        let mut set: IdSet = ["a", "b"].into_iter().collect();
        assert!(!set.remove("c"));
        assert!(set.remove("a"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn id_set_serializes_as_plain_array() {
        let set: IdSet = ["x", "y", "x"].into_iter().collect();
        let json = serde_json::to_string(&set).expect("serialize id set");
        assert_eq!(json, r#"["x","y"]"#);
    }

    #[test]
    fn entity_ids_are_unique() {
        assert_ne!(new_entity_id(), new_entity_id());
    }
}
