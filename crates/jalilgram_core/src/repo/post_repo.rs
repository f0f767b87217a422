//! Post repository: feed collection, likes and embedded comments.
//!
//! # Invariants
//! - New posts are prepended, so collection order is newest first.
//! - Creating a post appends its id to the owner's `posts` list in the same
//!   unit of work.
//! - Like toggles are idempotent; unknown post/comment ids are no-ops.

use super::store::StoreAccess;
use super::unit_of_work::UnitOfWork;
use crate::model::account::Account;
use crate::model::new_entity_id;
use crate::model::post::{Comment, CommentDraft, Post, PostDraft};
use log::{debug, info};

impl UnitOfWork<'_> {
    pub fn find_post(&mut self, id: &str) -> Option<Post> {
        self.list::<Post>().iter().find(|post| post.id == id).cloned()
    }

    pub fn list_posts_by_account(&mut self, account_id: &str) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .list::<Post>()
            .iter()
            .filter(|post| post.user_id == account_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    pub fn create_post(&mut self, draft: PostDraft) -> Post {
        let post = draft.into_post(new_entity_id(), self.now());
        self.list_mut::<Post>().insert(0, post.clone());

        let owner_known = self
            .list::<Account>()
            .iter()
            .any(|account| account.id == post.user_id);
        if owner_known {
            if let Some(owner) = self
                .list_mut::<Account>()
                .iter_mut()
                .find(|account| account.id == post.user_id)
            {
                owner.posts.push(post.id.clone());
            }
        }
        info!(
            "event=post_create module=repo status=ok post_id={} owner_linked={}",
            post.id, owner_known
        );
        post
    }

    pub fn like_post(&mut self, post_id: &str, account_id: &str) -> bool {
        self.edit_post(post_id, |post| post.likes.insert(account_id))
    }

    pub fn unlike_post(&mut self, post_id: &str, account_id: &str) -> bool {
        self.edit_post(post_id, |post| post.likes.remove(account_id))
    }

    /// Appends a comment to the post thread. `None` when the post is unknown.
    pub fn add_comment(&mut self, post_id: &str, draft: CommentDraft) -> Option<Comment> {
        let comment = draft.into_comment(new_entity_id(), self.now());
        let appended = self.edit_post(post_id, |post| {
            post.comments.push(comment.clone());
            true
        });
        if !appended {
            return None;
        }
        debug!(
            "event=comment_add module=repo status=ok post_id={post_id} comment_id={}",
            comment.id
        );
        Some(comment)
    }

    pub fn like_comment(&mut self, post_id: &str, comment_id: &str, account_id: &str) -> bool {
        self.edit_post(post_id, |post| {
            post.comment_mut(comment_id)
                .is_some_and(|comment| comment.likes.insert(account_id))
        })
    }

    pub fn unlike_comment(&mut self, post_id: &str, comment_id: &str, account_id: &str) -> bool {
        self.edit_post(post_id, |post| {
            post.comment_mut(comment_id)
                .is_some_and(|comment| comment.likes.remove(account_id))
        })
    }

    /// Applies `edit` to a copy of the post and stores it back only when
    /// `edit` reports a change.
    fn edit_post(&mut self, post_id: &str, edit: impl FnOnce(&mut Post) -> bool) -> bool {
        let Some(index) = self.list::<Post>().iter().position(|post| post.id == post_id) else {
            debug!("event=post_edit module=repo status=skipped reason=post_missing");
            return false;
        };
        let mut post = self.list::<Post>()[index].clone();
        if !edit(&mut post) {
            return false;
        }
        self.list_mut::<Post>()[index] = post;
        true
    }
}

/// Post persistence contract.
pub trait PostRepository: StoreAccess {
    /// Whole collection, newest first by insertion.
    fn list_posts(&self) -> Vec<Post> {
        self.unit_of_work(|unit| unit.list::<Post>().to_vec())
    }

    fn replace_posts(&self, posts: Vec<Post>) {
        self.unit_of_work(|unit| unit.replace_all(posts))
    }

    fn find_post(&self, id: &str) -> Option<Post> {
        self.unit_of_work(|unit| unit.find_post(id))
    }

    /// Posts owned by `account_id`, sorted by `created_at` descending.
    fn list_posts_by_account(&self, account_id: &str) -> Vec<Post> {
        self.unit_of_work(|unit| unit.list_posts_by_account(account_id))
    }

    fn create_post(&self, draft: PostDraft) -> Post {
        self.unit_of_work(|unit| unit.create_post(draft))
    }

    /// Returns whether the liking set changed.
    fn like_post(&self, post_id: &str, account_id: &str) -> bool {
        self.unit_of_work(|unit| unit.like_post(post_id, account_id))
    }

    fn unlike_post(&self, post_id: &str, account_id: &str) -> bool {
        self.unit_of_work(|unit| unit.unlike_post(post_id, account_id))
    }

    fn add_comment(&self, post_id: &str, draft: CommentDraft) -> Option<Comment> {
        self.unit_of_work(|unit| unit.add_comment(post_id, draft))
    }

    fn like_comment(&self, post_id: &str, comment_id: &str, account_id: &str) -> bool {
        self.unit_of_work(|unit| unit.like_comment(post_id, comment_id, account_id))
    }

    fn unlike_comment(&self, post_id: &str, comment_id: &str, account_id: &str) -> bool {
        self.unit_of_work(|unit| unit.unlike_comment(post_id, comment_id, account_id))
    }
}

impl<S: StoreAccess> PostRepository for S {}
