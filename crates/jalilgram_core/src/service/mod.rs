//! Use-case services invoked by UI callers.
//!
//! # Responsibility
//! - Validate user input before it reaches the store.
//! - Own the notification policy (who is notified, and when not).
//! - Publish session changes to subscribers instead of being polled.

pub mod auth_service;
pub mod demo_seed;
pub mod social_service;
