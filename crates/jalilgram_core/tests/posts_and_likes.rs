use jalilgram_core::{
    AccountDraft, AccountRepository, CommentDraft, ManualClock, MemoryKvStore, NotificationKind,
    NotificationRepository, PostDraft, PostRepository, SocialError, SocialService, SocialStore,
};
use std::sync::Arc;

struct Fixture {
    clock: Arc<ManualClock>,
    store: Arc<SocialStore<MemoryKvStore>>,
}

impl Fixture {
    fn new() -> Self {
        let clock = Arc::new(ManualClock::new(1_000));
        let store = Arc::new(SocialStore::with_clock(MemoryKvStore::new(), clock.clone()));
        Self { clock, store }
    }

    fn account(&self, username: &str) -> String {
        self.store
            .create_account(AccountDraft {
                username: username.to_string(),
                full_name: username.to_string(),
                email: format!("{username}@example.com"),
                password: "secret1".to_string(),
                ..AccountDraft::default()
            })
            .unwrap()
            .id
    }

    fn post(&self, owner: &str, caption: &str) -> String {
        self.store
            .create_post(PostDraft {
                user_id: owner.to_string(),
                image_url: format!("https://img.example/{caption}.jpg"),
                caption: caption.to_string(),
                location: None,
            })
            .id
    }
}

#[test]
fn like_is_idempotent_and_unlike_of_absent_member_is_noop() {
    let fx = Fixture::new();
    let owner = fx.account("owner");
    let fan = fx.account("fan");
    let post = fx.post(&owner, "first");

    assert!(fx.store.like_post(&post, &fan));
    assert!(!fx.store.like_post(&post, &fan));
    assert_eq!(fx.store.find_post(&post).unwrap().likes.len(), 1);

    assert!(fx.store.unlike_post(&post, &fan));
    assert!(!fx.store.unlike_post(&post, &fan));
    assert!(fx.store.find_post(&post).unwrap().likes.is_empty());

    assert!(!fx.store.like_post("missing", &fan));
}

#[test]
fn posts_by_account_are_newest_first_regardless_of_insert_order() {
    let fx = Fixture::new();
    let owner = fx.account("owner");

    fx.clock.set(1_000);
    let oldest = fx.post(&owner, "oldest");
    fx.clock.set(3_000);
    let newest = fx.post(&owner, "newest");
    fx.clock.set(2_000);
    let middle = fx.post(&owner, "middle");

    let listed: Vec<_> = fx
        .store
        .list_posts_by_account(&owner)
        .into_iter()
        .map(|post| post.id)
        .collect();
    assert_eq!(listed, vec![newest, middle, oldest]);
}

#[test]
fn feed_lists_latest_post_first() {
    let fx = Fixture::new();
    let social = SocialService::new(Arc::clone(&fx.store));
    let a = fx.account("a");
    let b = fx.account("b");

    let first = fx.post(&a, "one");
    fx.clock.advance(10);
    let second = fx.post(&b, "two");

    let feed: Vec<_> = social.feed().into_iter().map(|post| post.id).collect();
    assert_eq!(feed, vec![second.clone(), first]);

    let owner = fx.store.find_account(&b).unwrap();
    assert_eq!(owner.posts, vec![second]);
}

#[test]
fn liking_own_post_does_not_notify() {
    let fx = Fixture::new();
    let social = SocialService::new(Arc::clone(&fx.store));
    let owner = fx.account("owner");
    let post = fx.post(&owner, "selfie");

    let state = social.toggle_like(&post, &owner).unwrap();
    assert!(state.liked);
    assert_eq!(state.like_count, 1);
    assert!(fx.store.list_notifications().is_empty());
}

#[test]
fn comment_notifies_owner_and_mentioned_accounts_once() {
    let fx = Fixture::new();
    let social = SocialService::new(Arc::clone(&fx.store));
    let owner = fx.account("owner");
    let actor = fx.account("actor");
    let friend = fx.account("Friend");
    let post = fx.post(&owner, "trip");

    let comment = social
        .comment(
            &post,
            &actor,
            "  @friend @owner @actor @nobody look, @FRIEND  ",
        )
        .unwrap();
    assert_eq!(comment.text, "@friend @owner @actor @nobody look, @FRIEND");

    let owner_inbox = social.inbox(&owner);
    assert_eq!(owner_inbox.len(), 1);
    assert_eq!(owner_inbox[0].kind, NotificationKind::Comment);
    assert_eq!(
        owner_inbox[0].text,
        "actor commented: @friend @owner @actor @nobody look, @FRIEND"
    );

    let friend_inbox = social.inbox(&friend);
    assert_eq!(friend_inbox.len(), 1);
    assert_eq!(friend_inbox[0].kind, NotificationKind::Mention);
    assert_eq!(friend_inbox[0].target_id, post);

    assert!(social.inbox(&actor).is_empty());

    assert_eq!(
        social.comment(&post, &actor, "   "),
        Err(SocialError::EmptyText)
    );
    assert_eq!(
        social.comment("missing", &actor, "hi"),
        Err(SocialError::PostNotFound("missing".to_string()))
    );
}

#[test]
fn comment_likes_are_tracked_per_comment() {
    let fx = Fixture::new();
    let owner = fx.account("owner");
    let fan = fx.account("fan");
    let post = fx.post(&owner, "pic");
    let comment = fx
        .store
        .add_comment(
            &post,
            CommentDraft {
                user_id: fan.clone(),
                text: "wow".to_string(),
            },
        )
        .unwrap();

    assert!(fx.store.like_comment(&post, &comment.id, &owner));
    assert!(!fx.store.like_comment(&post, &comment.id, &owner));
    assert!(!fx.store.like_comment(&post, "missing", &owner));

    let stored = fx.store.find_post(&post).unwrap();
    assert_eq!(stored.comments[0].likes.len(), 1);
    assert!(stored.likes.is_empty());

    assert!(fx.store.unlike_comment(&post, &comment.id, &owner));
}
