//! First-run demo content.
//!
//! # Invariants
//! - Seeding happens only when the account collection is empty.
//! - Seeded follow edges are mirrored on both endpoints.

use crate::model::account::Account;
use crate::model::post::{Comment, Post};
use crate::model::{EpochMs, IdSet};
use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::SocialRepository;
use log::info;

const DEMO_PASSWORD: &str = "demo123";
const HOUR_MS: EpochMs = 60 * 60 * 1000;

/// Writes demo accounts and posts into an empty store.
///
/// Returns whether anything was written.
pub fn seed_demo_data<R: SocialRepository>(repo: &R) -> bool {
    repo.unit_of_work(|unit| {
        if !unit.list::<Account>().is_empty() {
            return false;
        }
        write_demo_content(unit);
        true
    })
}

fn write_demo_content(unit: &mut UnitOfWork<'_>) {
    let now = unit.now();
    // (id, username, full name, bio, avatar color, following)
    let people = [
        ("1", "jalil_user", "Jalil User", "Welcome to JalilGram! 📸", "FF6B6B", vec!["2"]),
        ("2", "demo_user", "Demo User", "Photography enthusiast 📷", "4ECDC4", vec!["1", "3"]),
        ("3", "test_user", "Test User", "Just exploring JalilGram ✨", "95E1D3", vec![]),
    ];

    let mut accounts: Vec<Account> = people
        .iter()
        .map(|(id, username, full_name, bio, color, following)| {
            let initials: String = full_name
                .split_whitespace()
                .filter_map(|part| part.chars().next())
                .collect();
            Account {
                id: (*id).to_string(),
                username: (*username).to_string(),
                full_name: (*full_name).to_string(),
                email: format!("{}@example.com", username.split('_').next().unwrap_or(*username)),
                password: DEMO_PASSWORD.to_string(),
                profile_picture: format!(
                    "https://via.placeholder.com/150/{color}/ffffff?text={initials}"
                ),
                bio: (*bio).to_string(),
                followers: IdSet::new(),
                following: following.iter().copied().collect(),
                posts: Vec::new(),
                stories: Vec::new(),
                created_at: now,
            }
        })
        .collect();

    let edges: Vec<(String, String)> = accounts
        .iter()
        .flat_map(|account| {
            account
                .following
                .iter()
                .map(|target| (account.id.clone(), target.to_string()))
                .collect::<Vec<_>>()
        })
        .collect();
    for (follower, target) in edges {
        if let Some(account) = accounts.iter_mut().find(|account| account.id == target) {
            account.followers.insert(&follower);
        }
    }

    let posts = vec![
        Post {
            id: "1".to_string(),
            user_id: "2".to_string(),
            image_url: "https://via.placeholder.com/400/4ECDC4/ffffff?text=Post+1".to_string(),
            caption: "First post on JalilGram! 🎉".to_string(),
            likes: ["1"].into_iter().collect(),
            comments: Vec::new(),
            created_at: now - HOUR_MS,
            location: None,
        },
        Post {
            id: "2".to_string(),
            user_id: "2".to_string(),
            image_url: "https://via.placeholder.com/400/95E1D3/ffffff?text=Post+2".to_string(),
            caption: "Beautiful day! ☀️".to_string(),
            likes: ["1", "3"].into_iter().collect(),
            comments: vec![Comment {
                id: "1".to_string(),
                user_id: "1".to_string(),
                text: "Amazing photo!".to_string(),
                likes: IdSet::new(),
                created_at: now,
            }],
            created_at: now - 2 * HOUR_MS,
            location: None,
        },
    ];
    if let Some(owner) = accounts.iter_mut().find(|account| account.id == "2") {
        owner.posts = vec!["2".to_string(), "1".to_string()];
    }

    info!(
        "event=demo_seed module=service status=ok accounts={} posts={}",
        accounts.len(),
        posts.len()
    );
    unit.replace_all(accounts);
    unit.replace_all(posts);
}

#[cfg(test)]
mod tests {
    use super::seed_demo_data;
    use crate::kv::MemoryKvStore;
    use crate::repo::account_repo::AccountRepository;
    use crate::repo::post_repo::PostRepository;
    use crate::repo::store::SocialStore;

    #[test]
    fn seeds_once_with_mirrored_follow_graph() {
        let store = SocialStore::new(MemoryKvStore::new());
        assert!(seed_demo_data(&store));
        assert!(!seed_demo_data(&store));

        let accounts = store.list_accounts();
        assert_eq!(accounts.len(), 3);
        for account in &accounts {
            for target in account.following.iter() {
                let other = accounts.iter().find(|a| a.id == target).unwrap();
                assert!(other.followers.contains(&account.id));
            }
        }
        assert_eq!(store.list_posts_by_account("2").len(), 2);
    }
}
