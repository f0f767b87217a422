//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Flatten core entities into plain envelopes the UI can render.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens the device store at the configured path; no store
//!   state is cached between calls.
//! - Passwords never leave the core through this surface.

use jalilgram_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    seed_demo_data as seed_demo_data_inner, Account, AccountRepository, AuthService, Comment,
    MessageRepository, Notification, NotificationRepository, Post, PostDraft, PostRepository,
    SignUpRequest, SocialService, SocialStore, SqliteKvStore, StoreConfig, Story, StoryDraft,
    StoryRepository,
};
use log::error;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

type DeviceStore = SocialStore<SqliteKvStore>;

static STORE_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Public account projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountItem {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub profile_picture: String,
    pub bio: String,
    pub follower_count: u32,
    pub following_count: u32,
    pub post_count: u32,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentItem {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub like_count: u32,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostItem {
    pub id: String,
    pub user_id: String,
    pub image_url: String,
    pub caption: String,
    pub location: Option<String>,
    /// Ids of accounts that like the post, in like order.
    pub liked_by: Vec<String>,
    pub comments: Vec<CommentItem>,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryItem {
    pub id: String,
    pub user_id: String,
    pub image_url: String,
    pub created_at_ms: i64,
    pub expires_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageItem {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub text: String,
    pub created_at_ms: i64,
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    pub id: String,
    /// `like|comment|follow|mention`.
    pub kind: String,
    pub target_id: String,
    pub from_user_id: String,
    pub text: String,
    pub created_at_ms: i64,
    pub read: bool,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Optional created or affected entity ID.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Account response envelope for auth flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountResponse {
    pub ok: bool,
    /// Signed-in or requested account; `None` on failure or when signed out.
    pub account: Option<AccountItem>,
    pub message: String,
}

impl AccountResponse {
    fn found(message: impl Into<String>, account: Option<Account>) -> Self {
        Self {
            ok: true,
            account: account.as_ref().map(to_account_item),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            account: None,
            message: message.into(),
        }
    }
}

/// Result of a like or follow toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleResponse {
    pub ok: bool,
    /// Whether the like/follow is in place after the call.
    pub active: bool,
    /// Like count of the post, or follower count of the target.
    pub count: u32,
    pub message: String,
}

impl ToggleResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            active: false,
            count: 0,
            message: message.into(),
        }
    }
}

/// Writes demo accounts and posts when the store has no accounts yet.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `ok=true` both when seeding ran and when it was skipped.
#[flutter_rust_bridge::frb(sync)]
pub fn seed_demo_data() -> ActionResponse {
    match open_store() {
        Ok(store) => {
            if seed_demo_data_inner(store.as_ref()) {
                ActionResponse::success("Demo data seeded.", None)
            } else {
                ActionResponse::success("Store already has accounts.", None)
            }
        }
        Err(err) => ActionResponse::failure(format!("seed_demo_data failed: {err}")),
    }
}

/// Registers an account and signs it in.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Validation failures return `ok=false` with a UI-ready message.
#[flutter_rust_bridge::frb(sync)]
pub fn sign_up(
    username: String,
    full_name: String,
    email: String,
    password: String,
) -> AccountResponse {
    let request = SignUpRequest {
        username,
        full_name,
        email,
        password,
    };
    match with_auth(|auth| auth.sign_up(request).map_err(|err| err.to_string())) {
        Ok(account) => AccountResponse::found("Signed up.", Some(account)),
        Err(err) => AccountResponse::failure(format!("sign_up failed: {err}")),
    }
}

/// Signs in with case-insensitive username and exact password.
#[flutter_rust_bridge::frb(sync)]
pub fn sign_in(username: String, password: String) -> AccountResponse {
    match with_auth(|auth| {
        auth.sign_in(&username, &password)
            .map_err(|err| err.to_string())
    }) {
        Ok(account) => AccountResponse::found("Signed in.", Some(account)),
        Err(err) => AccountResponse::failure(format!("sign_in failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn sign_out() -> ActionResponse {
    match with_auth(|auth| {
        auth.sign_out();
        Ok(())
    }) {
        Ok(()) => ActionResponse::success("Signed out.", None),
        Err(err) => ActionResponse::failure(format!("sign_out failed: {err}")),
    }
}

/// Returns the signed-in account; `account=None` when nobody is signed in.
#[flutter_rust_bridge::frb(sync)]
pub fn current_account() -> AccountResponse {
    match with_auth(|auth| Ok(auth.current_account())) {
        Ok(Some(account)) => AccountResponse::found("Signed in.", Some(account)),
        Ok(None) => AccountResponse::found("Signed out.", None),
        Err(err) => AccountResponse::failure(format!("current_account failed: {err}")),
    }
}

/// Publishes a post; returns its id.
///
/// # FFI contract
/// - Blank `image_url` is rejected; caption and location may be empty.
#[flutter_rust_bridge::frb(sync)]
pub fn create_post(
    user_id: String,
    image_url: String,
    caption: String,
    location: Option<String>,
) -> ActionResponse {
    let image_url = image_url.trim().to_string();
    if image_url.is_empty() {
        return ActionResponse::failure("create_post failed: image_url is empty");
    }
    let draft = PostDraft {
        user_id,
        image_url,
        caption,
        location: location
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()),
    };
    match open_store() {
        Ok(store) => {
            let post = store.create_post(draft);
            ActionResponse::success("Post created.", Some(post.id))
        }
        Err(err) => ActionResponse::failure(format!("create_post failed: {err}")),
    }
}

/// Likes the post, or removes the like when already present.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_like(post_id: String, actor_id: String) -> ToggleResponse {
    match with_social(|social| {
        social
            .toggle_like(&post_id, &actor_id)
            .map_err(|err| err.to_string())
    }) {
        Ok(state) => ToggleResponse {
            ok: true,
            active: state.liked,
            count: count(state.like_count),
            message: if state.liked { "Liked." } else { "Unliked." }.to_string(),
        },
        Err(err) => ToggleResponse::failure(format!("toggle_like failed: {err}")),
    }
}

/// Comments on a post; returns the comment id.
#[flutter_rust_bridge::frb(sync)]
pub fn add_comment(post_id: String, actor_id: String, text: String) -> ActionResponse {
    match with_social(|social| {
        social
            .comment(&post_id, &actor_id, &text)
            .map_err(|err| err.to_string())
    }) {
        Ok(comment) => ActionResponse::success("Comment added.", Some(comment.id)),
        Err(err) => ActionResponse::failure(format!("add_comment failed: {err}")),
    }
}

/// Follows `target_id`, or unfollows when already following.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_follow(actor_id: String, target_id: String) -> ToggleResponse {
    match with_social(|social| {
        social
            .toggle_follow(&actor_id, &target_id)
            .map_err(|err| err.to_string())
    }) {
        Ok(state) => ToggleResponse {
            ok: true,
            active: state.following,
            count: count(state.follower_count),
            message: if state.following {
                "Following."
            } else {
                "Unfollowed."
            }
            .to_string(),
        },
        Err(err) => ToggleResponse::failure(format!("toggle_follow failed: {err}")),
    }
}

/// Case-insensitive search over username and display name.
///
/// # FFI contract
/// - Empty list when nothing matches or the store cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn search_accounts(query: String) -> Vec<AccountItem> {
    read_store("search_accounts", |store| {
        store
            .search_accounts(query.trim())
            .iter()
            .map(to_account_item)
            .collect()
    })
}

/// Home feed, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn feed() -> Vec<PostItem> {
    read_store("feed", |store| {
        SocialService::new(store)
            .feed()
            .iter()
            .map(to_post_item)
            .collect()
    })
}

/// Posts of one account, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn account_posts(account_id: String) -> Vec<PostItem> {
    read_store("account_posts", |store| {
        store
            .list_posts_by_account(&account_id)
            .iter()
            .map(to_post_item)
            .collect()
    })
}

/// Notifications addressed to `account_id`, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn notifications(account_id: String, unread_only: bool) -> Vec<NotificationItem> {
    read_store("notifications", |store| {
        let items = if unread_only {
            store.list_unread_notifications(&account_id)
        } else {
            store.list_notifications_by_account(&account_id)
        };
        items.iter().map(to_notification_item).collect()
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn mark_notification_read(notification_id: String) -> ActionResponse {
    match open_store() {
        Ok(store) => {
            if store.mark_notification_read(&notification_id) {
                ActionResponse::success("Notification marked read.", Some(notification_id))
            } else {
                ActionResponse::failure(
                    "mark_notification_read failed: notification not found or already read",
                )
            }
        }
        Err(err) => ActionResponse::failure(format!("mark_notification_read failed: {err}")),
    }
}

/// Sends a direct message; returns the message id.
#[flutter_rust_bridge::frb(sync)]
pub fn send_message(sender_id: String, receiver_id: String, text: String) -> ActionResponse {
    match with_social(|social| {
        social
            .send_message(&sender_id, &receiver_id, &text)
            .map_err(|err| err.to_string())
    }) {
        Ok(message) => ActionResponse::success("Message sent.", Some(message.id)),
        Err(err) => ActionResponse::failure(format!("send_message failed: {err}")),
    }
}

/// Messages between two accounts, oldest first, in either direction.
#[flutter_rust_bridge::frb(sync)]
pub fn conversation(account_a: String, account_b: String) -> Vec<MessageItem> {
    read_store("conversation", |store| {
        store
            .conversation(&account_a, &account_b)
            .into_iter()
            .map(|message| MessageItem {
                id: message.id,
                sender_id: message.sender_id,
                receiver_id: message.receiver_id,
                text: message.text,
                created_at_ms: message.created_at,
                read: message.read,
            })
            .collect()
    })
}

/// Marks messages sent by `other_id` to `reader_id` as read.
#[flutter_rust_bridge::frb(sync)]
pub fn mark_conversation_read(reader_id: String, other_id: String) -> ActionResponse {
    match open_store() {
        Ok(store) => {
            let changed = store.mark_conversation_read(&reader_id, &other_id);
            ActionResponse::success(format!("{changed} message(s) marked read."), None)
        }
        Err(err) => ActionResponse::failure(format!("mark_conversation_read failed: {err}")),
    }
}

/// Publishes a 24-hour story; returns its id.
#[flutter_rust_bridge::frb(sync)]
pub fn create_story(user_id: String, image_url: String) -> ActionResponse {
    let image_url = image_url.trim().to_string();
    if image_url.is_empty() {
        return ActionResponse::failure("create_story failed: image_url is empty");
    }
    match open_store() {
        Ok(store) => {
            let story = store.create_story(StoryDraft { user_id, image_url });
            ActionResponse::success("Story created.", Some(story.id))
        }
        Err(err) => ActionResponse::failure(format!("create_story failed: {err}")),
    }
}

/// Unexpired stories of every account.
#[flutter_rust_bridge::frb(sync)]
pub fn active_stories() -> Vec<StoryItem> {
    read_store("active_stories", |store| {
        store.list_stories().iter().map(to_story_item).collect()
    })
}

fn resolve_store_path() -> PathBuf {
    STORE_PATH
        .get_or_init(|| StoreConfig::from_env().db_path)
        .clone()
}

fn open_store() -> Result<Arc<DeviceStore>, String> {
    StoreConfig::new(resolve_store_path())
        .open_store()
        .map(Arc::new)
        .map_err(|err| format!("store open failed: {err}"))
}

fn with_auth<T>(
    f: impl FnOnce(&AuthService<DeviceStore>) -> Result<T, String>,
) -> Result<T, String> {
    let store = open_store()?;
    f(&AuthService::new(store))
}

fn with_social<T>(
    f: impl FnOnce(&SocialService<DeviceStore>) -> Result<T, String>,
) -> Result<T, String> {
    let store = open_store()?;
    f(&SocialService::new(store))
}

/// Runs a read-only projection; an unavailable store reads as empty.
fn read_store<T>(operation: &'static str, f: impl FnOnce(Arc<DeviceStore>) -> Vec<T>) -> Vec<T> {
    match open_store() {
        Ok(store) => f(store),
        Err(err) => {
            error!("event={operation} module=ffi status=error error={err}");
            Vec::new()
        }
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

fn to_account_item(account: &Account) -> AccountItem {
    AccountItem {
        id: account.id.clone(),
        username: account.username.clone(),
        full_name: account.full_name.clone(),
        email: account.email.clone(),
        profile_picture: account.profile_picture.clone(),
        bio: account.bio.clone(),
        follower_count: count(account.followers.len()),
        following_count: count(account.following.len()),
        post_count: count(account.posts.len()),
        created_at_ms: account.created_at,
    }
}

fn to_comment_item(comment: &Comment) -> CommentItem {
    CommentItem {
        id: comment.id.clone(),
        user_id: comment.user_id.clone(),
        text: comment.text.clone(),
        like_count: count(comment.likes.len()),
        created_at_ms: comment.created_at,
    }
}

fn to_post_item(post: &Post) -> PostItem {
    PostItem {
        id: post.id.clone(),
        user_id: post.user_id.clone(),
        image_url: post.image_url.clone(),
        caption: post.caption.clone(),
        location: post.location.clone(),
        liked_by: post.likes.iter().map(str::to_string).collect(),
        comments: post.comments.iter().map(to_comment_item).collect(),
        created_at_ms: post.created_at,
    }
}

fn to_story_item(story: &Story) -> StoryItem {
    StoryItem {
        id: story.id.clone(),
        user_id: story.user_id.clone(),
        image_url: story.image_url.clone(),
        created_at_ms: story.created_at,
        expires_at_ms: story.expires_at,
    }
}

fn to_notification_item(notification: &Notification) -> NotificationItem {
    NotificationItem {
        id: notification.id.clone(),
        kind: notification.kind.as_str().to_string(),
        target_id: notification.target_id.clone(),
        from_user_id: notification.from_user_id.clone(),
        text: notification.text.clone(),
        created_at_ms: notification.created_at,
        read: notification.read,
    }
}
