//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `jalilgram_core` linkage.
//! - Open the configured store, seed demo data on first run and print
//!   collection sizes.

use jalilgram_core::{
    AccountRepository, MessageRepository, NotificationRepository, PostRepository, StoreConfig,
    StoryRepository,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("jalilgram_core ping={}", jalilgram_core::ping());
    println!("jalilgram_core version={}", jalilgram_core::core_version());

    let config = StoreConfig::from_env();
    println!("store path={}", config.db_path().display());
    let store = match config.open_store() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("store open failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let seeded = jalilgram_core::seed_demo_data(&store);
    println!("demo seeded={seeded}");
    println!(
        "accounts={} posts={} stories={} messages={} notifications={}",
        store.list_accounts().len(),
        store.list_posts().len(),
        store.list_stories().len(),
        store.list_messages().len(),
        store.list_notifications().len()
    );
    ExitCode::SUCCESS
}
