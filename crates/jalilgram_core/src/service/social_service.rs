//! Social actions with notification policy.
//!
//! # Responsibility
//! - Toggle likes and follows, add comments, send messages.
//! - Decide which notifications an action produces.
//!
//! # Invariants
//! - Acting on one's own content never notifies oneself.
//! - An action and the notifications it produces commit in one unit of work.
//! - Mentions (`@username`) notify each existing mentioned account once,
//!   excluding the actor and an owner already notified of the comment.

use crate::model::account::Account;
use crate::model::message::{Message, MessageDraft};
use crate::model::notification::{Notification, NotificationDraft, NotificationKind};
use crate::model::post::{Comment, CommentDraft, Post};
use crate::model::story::Story;
use crate::model::{AccountId, EntityId};
use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::SocialRepository;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z0-9_.]+)").expect("valid mention regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialError {
    AccountNotFound(AccountId),
    PostNotFound(EntityId),
    EmptyText,
    SelfFollow,
}

impl Display for SocialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccountNotFound(id) => write!(f, "account not found: {id}"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::EmptyText => write!(f, "text cannot be empty"),
            Self::SelfFollow => write!(f, "accounts cannot follow themselves"),
        }
    }
}

impl Error for SocialError {}

pub type SocialResult<T> = Result<T, SocialError>;

/// State of a post's like after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: usize,
}

/// State of a follow edge after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowState {
    pub following: bool,
    pub follower_count: usize,
}

/// Profile page projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub account: Account,
    /// Newest first.
    pub posts: Vec<Post>,
    pub stories: Vec<Story>,
}

pub struct SocialService<R: SocialRepository> {
    repo: Arc<R>,
}

impl<R: SocialRepository> SocialService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Likes the post, or unlikes it when `actor_id` already likes it.
    ///
    /// A new like notifies the post owner unless the owner is the actor.
    pub fn toggle_like(&self, post_id: &str, actor_id: &str) -> SocialResult<LikeState> {
        self.repo.unit_of_work(|unit| {
            let actor = require_account(unit, actor_id)?;
            let post = require_post(unit, post_id)?;

            let liked = if post.is_liked_by(actor_id) {
                unit.unlike_post(post_id, actor_id);
                false
            } else {
                unit.like_post(post_id, actor_id);
                if post.user_id != actor.id {
                    unit.create_notification(NotificationDraft {
                        user_id: post.user_id.clone(),
                        kind: NotificationKind::Like,
                        target_id: post.id.clone(),
                        from_user_id: actor.id.clone(),
                        text: format!("{} liked your post", actor.username),
                    });
                }
                true
            };

            let like_count = unit
                .find_post(post_id)
                .map_or(0, |post| post.likes.len());
            Ok(LikeState { liked, like_count })
        })
    }

    /// Appends a comment and notifies the owner and mentioned accounts.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank after trimming.
    pub fn comment(&self, post_id: &str, actor_id: &str, text: &str) -> SocialResult<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SocialError::EmptyText);
        }

        self.repo.unit_of_work(|unit| {
            let actor = require_account(unit, actor_id)?;
            let post = require_post(unit, post_id)?;
            let comment = unit
                .add_comment(
                    post_id,
                    CommentDraft {
                        user_id: actor.id.clone(),
                        text: text.to_string(),
                    },
                )
                .ok_or_else(|| SocialError::PostNotFound(post_id.to_string()))?;

            if post.user_id != actor.id {
                unit.create_notification(NotificationDraft {
                    user_id: post.user_id.clone(),
                    kind: NotificationKind::Comment,
                    target_id: post.id.clone(),
                    from_user_id: actor.id.clone(),
                    text: format!("{} commented: {text}", actor.username),
                });
            }

            let mut notified: Vec<AccountId> = vec![actor.id.clone(), post.user_id.clone()];
            for username in mentioned_usernames(text) {
                let Some(mentioned) = unit.find_account_by_username(&username) else {
                    continue;
                };
                if notified.contains(&mentioned.id) {
                    continue;
                }
                unit.create_notification(NotificationDraft {
                    user_id: mentioned.id.clone(),
                    kind: NotificationKind::Mention,
                    target_id: post.id.clone(),
                    from_user_id: actor.id.clone(),
                    text: format!("{} mentioned you: {text}", actor.username),
                });
                notified.push(mentioned.id);
            }

            info!(
                "event=comment module=service status=ok post_id={post_id} mentions={}",
                notified.len() - 2
            );
            Ok(comment)
        })
    }

    /// Follows `target_id`, or unfollows when already following.
    ///
    /// A new follow notifies the target.
    pub fn toggle_follow(&self, actor_id: &str, target_id: &str) -> SocialResult<FollowState> {
        if actor_id == target_id {
            return Err(SocialError::SelfFollow);
        }

        self.repo.unit_of_work(|unit| {
            let actor = require_account(unit, actor_id)?;
            let target = require_account(unit, target_id)?;

            let following = if target.followers.contains(actor_id) {
                unit.unfollow(actor_id, target_id);
                false
            } else {
                unit.follow(actor_id, target_id);
                unit.create_notification(NotificationDraft {
                    user_id: target.id.clone(),
                    kind: NotificationKind::Follow,
                    target_id: actor.id.clone(),
                    from_user_id: actor.id.clone(),
                    text: format!("{} started following you", actor.username),
                });
                true
            };

            let follower_count = unit
                .find_account(target_id)
                .map_or(0, |target| target.followers.len());
            Ok(FollowState {
                following,
                follower_count,
            })
        })
    }

    /// Sends a direct message to an existing account.
    pub fn send_message(
        &self,
        sender_id: &str,
        receiver_id: &str,
        text: &str,
    ) -> SocialResult<Message> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SocialError::EmptyText);
        }
        self.repo.unit_of_work(|unit| {
            require_account(unit, sender_id)?;
            require_account(unit, receiver_id)?;
            Ok(unit.send_message(MessageDraft {
                sender_id: sender_id.to_string(),
                receiver_id: receiver_id.to_string(),
                text: text.to_string(),
            }))
        })
    }

    /// Home feed: every post, newest first.
    pub fn feed(&self) -> Vec<Post> {
        self.repo.list_posts()
    }

    pub fn inbox(&self, account_id: &str) -> Vec<Notification> {
        self.repo.list_notifications_by_account(account_id)
    }

    pub fn profile(&self, account_id: &str) -> Option<Profile> {
        self.repo.unit_of_work(|unit| {
            let account = unit.find_account(account_id)?;
            let posts = unit.list_posts_by_account(account_id);
            let stories = unit.list_stories_by_account(account_id);
            Some(Profile {
                account,
                posts,
                stories,
            })
        })
    }
}

fn require_account(unit: &mut UnitOfWork<'_>, id: &str) -> SocialResult<Account> {
    unit.find_account(id)
        .ok_or_else(|| SocialError::AccountNotFound(id.to_string()))
}

fn require_post(unit: &mut UnitOfWork<'_>, id: &str) -> SocialResult<Post> {
    unit.find_post(id)
        .ok_or_else(|| SocialError::PostNotFound(id.to_string()))
}

/// Usernames mentioned as `@name`, in order of first appearance.
pub fn mentioned_usernames(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for capture in MENTION_RE.captures_iter(text) {
        let name = capture[1].trim_end_matches('.');
        if name.is_empty() || names.iter().any(|known| known.eq_ignore_ascii_case(name)) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::mentioned_usernames;

    #[test]
    fn mentions_are_deduplicated_and_trailing_dots_dropped() {
        let names = mentioned_usernames("hey @bob. and @carol_1, also @BOB and @ alone");
        assert_eq!(names, vec!["bob", "carol_1"]);
    }

    #[test]
    fn text_without_mentions_yields_nothing() {
        assert!(mentioned_usernames("email me at bob at example").is_empty());
    }
}
