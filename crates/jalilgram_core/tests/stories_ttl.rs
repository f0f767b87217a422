use jalilgram_core::{
    AccountDraft, AccountRepository, ManualClock, MemoryKvStore, SocialService, SocialStore,
    StoryDraft, StoryRepository, STORY_TTL_MS,
};
use std::sync::Arc;

const MINUTE_MS: i64 = 60 * 1000;
const START_MS: i64 = 1_700_000_000_000;

fn fixture() -> (Arc<ManualClock>, Arc<SocialStore<MemoryKvStore>>, String) {
    let clock = Arc::new(ManualClock::new(START_MS));
    let store = Arc::new(SocialStore::with_clock(MemoryKvStore::new(), clock.clone()));
    let owner = store
        .create_account(AccountDraft {
            username: "storyteller".to_string(),
            ..AccountDraft::default()
        })
        .unwrap()
        .id;
    (clock, store, owner)
}

fn draft(owner: &str) -> StoryDraft {
    StoryDraft {
        user_id: owner.to_string(),
        image_url: "https://img.example/story.jpg".to_string(),
    }
}

#[test]
fn story_expires_exactly_one_day_after_creation() {
    let (_, store, owner) = fixture();
    let story = store.create_story(draft(&owner));

    assert_eq!(story.created_at, START_MS);
    assert_eq!(story.expires_at, START_MS + STORY_TTL_MS);
}

#[test]
fn story_is_visible_just_before_expiry_and_gone_just_after() {
    let (clock, store, owner) = fixture();
    let story = store.create_story(draft(&owner));

    clock.set(START_MS + 23 * 60 * MINUTE_MS + 59 * MINUTE_MS);
    let visible = store.list_stories();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, story.id);
    assert_eq!(store.list_stories_by_account(&owner).len(), 1);

    clock.set(START_MS + 24 * 60 * MINUTE_MS + MINUTE_MS);
    assert!(store.list_stories().is_empty());
    assert!(store.list_stories_by_account(&owner).is_empty());

    // Rewinding the clock cannot resurrect a purged story.
    clock.set(START_MS);
    assert!(store.list_stories().is_empty());
    assert!(store.find_account(&owner).unwrap().stories.is_empty());
}

#[test]
fn story_is_hidden_at_the_expiry_instant() {
    let (clock, store, owner) = fixture();
    store.create_story(draft(&owner));

    clock.set(START_MS + STORY_TTL_MS - 1);
    assert_eq!(store.list_stories().len(), 1);
    clock.set(START_MS + STORY_TTL_MS);
    assert!(store.list_stories().is_empty());
}

#[test]
fn creating_a_story_prunes_expired_ones_and_links_owner() {
    let (clock, store, owner) = fixture();
    let old = store.create_story(draft(&owner));

    clock.advance(STORY_TTL_MS + MINUTE_MS);
    let fresh = store.create_story(draft(&owner));

    let account = store.find_account(&owner).unwrap();
    assert_eq!(account.stories, vec![fresh.id.clone()]);
    assert!(!account.stories.contains(&old.id));

    let profile = SocialService::new(Arc::clone(&store))
        .profile(&owner)
        .unwrap();
    assert_eq!(profile.stories.len(), 1);
    assert_eq!(profile.stories[0].id, fresh.id);
}
