//! Account domain model.
//!
//! # Responsibility
//! - Define the persisted account record and its follow-graph sets.
//! - Define the creation draft and the explicit update command.
//!
//! # Invariants
//! - `username` is unique under case-insensitive comparison.
//! - Follow edges are mirrored: `a.following ∋ b` iff `b.followers ∋ a`.
//! - `password` is stored in plain text; this client has no auth security.

use super::{AccountId, EntityId, EpochMs, IdSet};
use serde::{Deserialize, Serialize};

/// Registered identity with credentials and social-graph membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    /// Display name.
    pub full_name: String,
    pub email: String,
    pub password: String,
    /// Avatar URI.
    pub profile_picture: String,
    pub bio: String,
    pub followers: IdSet,
    pub following: IdSet,
    /// Owned post ids in creation order.
    pub posts: Vec<EntityId>,
    /// Owned story ids in creation order.
    pub stories: Vec<EntityId>,
    pub created_at: EpochMs,
}

impl Account {
    /// Case-insensitive username comparison used by lookups and uniqueness.
    pub fn has_username(&self, username: &str) -> bool {
        self.username.to_lowercase() == username.to_lowercase()
    }

    /// Case-insensitive substring match on username or display name.
    ///
    /// `lowered_query` must already be lowercase.
    pub fn matches_query(&self, lowered_query: &str) -> bool {
        self.username.to_lowercase().contains(lowered_query)
            || self.full_name.to_lowercase().contains(lowered_query)
    }
}

/// Caller-supplied fields for a new account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountDraft {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub profile_picture: String,
    pub bio: String,
}

impl AccountDraft {
    pub(crate) fn into_account(self, id: AccountId, created_at: EpochMs) -> Account {
        Account {
            id,
            username: self.username,
            full_name: self.full_name,
            email: self.email,
            password: self.password,
            profile_picture: self.profile_picture,
            bio: self.bio,
            followers: IdSet::new(),
            following: IdSet::new(),
            posts: Vec::new(),
            stories: Vec::new(),
            created_at,
        }
    }
}

/// Profile fields that may be revised after creation.
///
/// `None` leaves the stored value untouched. Identity, graph and ownership
/// lists change only through their own operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
}

impl AccountUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.profile_picture.is_none()
            && self.bio.is_none()
    }

    pub(crate) fn apply_to(self, account: &mut Account) {
        if let Some(full_name) = self.full_name {
            account.full_name = full_name;
        }
        if let Some(email) = self.email {
            account.email = email;
        }
        if let Some(password) = self.password {
            account.password = password;
        }
        if let Some(profile_picture) = self.profile_picture {
            account.profile_picture = profile_picture;
        }
        if let Some(bio) = self.bio {
            account.bio = bio;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AccountDraft, AccountUpdate};

    fn sample() -> super::Account {
        AccountDraft {
            username: "Alice_W".to_string(),
            full_name: "Alice Wonder".to_string(),
            ..AccountDraft::default()
        }
        .into_account("a1".to_string(), 10)
    }

    #[test]
    fn username_comparison_ignores_case() {
        let account = sample();
        assert!(account.has_username("alice_w"));
        assert!(account.has_username("ALICE_W"));
        assert!(!account.has_username("alice"));
    }

    #[test]
    fn query_matches_username_or_display_name() {
        let account = sample();
        assert!(account.matches_query("ice_"));
        assert!(account.matches_query("wonder"));
        assert!(!account.matches_query("bob"));
    }

    #[test]
    fn update_touches_only_provided_fields() {
        let mut account = sample();
        AccountUpdate {
            bio: Some("hello".to_string()),
            ..AccountUpdate::default()
        }
        .apply_to(&mut account);
        assert_eq!(account.bio, "hello");
        assert_eq!(account.full_name, "Alice Wonder");
    }

    #[test]
    fn persisted_shape_uses_camel_case_keys() {
        let json = serde_json::to_value(sample()).expect("serialize account");
        assert_eq!(json["fullName"], "Alice Wonder");
        assert_eq!(json["createdAt"], 10);
        assert!(json["followers"].as_array().is_some());
    }
}
