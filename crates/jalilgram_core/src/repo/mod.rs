//! Repository layer over the key-value provider.
//!
//! # Responsibility
//! - Own every persisted collection (accounts, posts, stories, messages,
//!   notifications) and the session pointer.
//! - Expose per-entity CRUD and relationship operations as traits.
//!
//! # Invariants
//! - Each operation is one unit of work: load touched slots, mutate in
//!   memory, write dirty slots, under the store lock.
//! - Storage read/decode failures read as empty collections; write failures
//!   are logged. Neither is reported to callers.
//! - Unknown ids resolve to `None` or a no-op, never an error.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_repo;
pub mod message_repo;
pub mod notification_repo;
pub mod post_repo;
pub mod session_repo;
pub mod store;
pub mod story_repo;
pub mod unit_of_work;

pub type RepoResult<T> = Result<T, RepoError>;

/// Rejections raised by the store itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// Another account already uses this username (case-insensitive).
    UsernameTaken(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UsernameTaken(username) => write!(f, "username already exists: {username}"),
        }
    }
}

impl Error for RepoError {}

/// Every repository contract in one bound, for services.
pub trait SocialRepository:
    account_repo::AccountRepository
    + session_repo::SessionRepository
    + post_repo::PostRepository
    + story_repo::StoryRepository
    + message_repo::MessageRepository
    + notification_repo::NotificationRepository
{
}

impl<T> SocialRepository for T where
    T: account_repo::AccountRepository
        + session_repo::SessionRepository
        + post_repo::PostRepository
        + story_repo::StoryRepository
        + message_repo::MessageRepository
        + notification_repo::NotificationRepository
{
}
