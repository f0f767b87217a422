//! Data layer for the JalilGram social client.
//! This crate is the single source of truth for persisted social state.

pub mod clock;
pub mod config;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StoreConfig;
pub use kv::{KvError, KvResult, KvStore, MemoryKvStore, SqliteKvStore};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::account::{Account, AccountDraft, AccountUpdate};
pub use model::message::{Message, MessageDraft};
pub use model::notification::{Notification, NotificationDraft, NotificationKind};
pub use model::post::{Comment, CommentDraft, Post, PostDraft};
pub use model::story::{Story, StoryDraft, STORY_TTL_MS};
pub use model::{AccountId, EntityId, EpochMs, IdSet};
pub use repo::account_repo::AccountRepository;
pub use repo::message_repo::MessageRepository;
pub use repo::notification_repo::NotificationRepository;
pub use repo::post_repo::PostRepository;
pub use repo::session_repo::SessionRepository;
pub use repo::store::{SocialStore, StoreAccess};
pub use repo::story_repo::StoryRepository;
pub use repo::unit_of_work::UnitOfWork;
pub use repo::{RepoError, RepoResult, SocialRepository};
pub use service::auth_service::{AuthError, AuthService, SessionEvent, SignUpRequest, SubscriptionId};
pub use service::demo_seed::seed_demo_data;
pub use service::social_service::{
    FollowState, LikeState, Profile, SocialError, SocialResult, SocialService,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
