//! Sign-up, sign-in and session observation.
//!
//! # Responsibility
//! - Validate sign-up input and pre-check username availability.
//! - Drive the persisted session pointer and notify subscribers.
//!
//! # Invariants
//! - Every successful `sign_in`/`sign_up` emits `SessionEvent::SignedIn`.
//! - Every `sign_out` emits `SessionEvent::SignedOut`.
//! - Listeners are invoked outside the registry lock.

use crate::model::account::{Account, AccountDraft};
use crate::repo::{RepoError, SocialRepository};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Minimum accepted password length at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Session change published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Account),
    SignedOut,
}

/// Handle returned by [`AuthService::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

#[derive(Debug)]
pub enum AuthError {
    /// A required field is blank.
    MissingField(&'static str),
    PasswordTooShort { min: usize },
    UsernameTaken(String),
    InvalidCredentials,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::UsernameTaken(username) => write!(f, "username already exists: {username}"),
            Self::InvalidCredentials => write!(f, "invalid username or password"),
        }
    }
}

impl Error for AuthError {}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::UsernameTaken(username) => Self::UsernameTaken(username),
        }
    }
}

/// Sign-up form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpRequest {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

pub struct AuthService<R: SocialRepository> {
    repo: Arc<R>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl<R: SocialRepository> AuthService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Registers a new account and signs it in.
    ///
    /// # Errors
    /// - `MissingField` when username, full name, email or password is blank.
    /// - `PasswordTooShort` below [`MIN_PASSWORD_LEN`] characters.
    /// - `UsernameTaken` on a case-insensitive username collision.
    pub fn sign_up(&self, request: SignUpRequest) -> Result<Account, AuthError> {
        let username = require(&request.username, "username")?;
        let full_name = require(&request.full_name, "full_name")?;
        let email = require(&request.email, "email")?;
        require(&request.password, "password")?;
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }

        if self.repo.find_account_by_username(username).is_some() {
            return Err(AuthError::UsernameTaken(username.to_string()));
        }

        let account = self.repo.create_account(AccountDraft {
            username: username.to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: request.password.clone(),
            profile_picture: placeholder_avatar(username),
            bio: String::new(),
        })?;
        info!(
            "event=sign_up module=service status=ok account_id={}",
            account.id
        );

        self.sign_in(&account.username, &request.password)
    }

    /// Authenticates and publishes `SignedIn`.
    pub fn sign_in(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let account = self
            .repo
            .authenticate(username.trim(), password)
            .ok_or(AuthError::InvalidCredentials)?;
        self.publish(&SessionEvent::SignedIn(account.clone()));
        Ok(account)
    }

    /// Clears the session pointer and publishes `SignedOut`.
    pub fn sign_out(&self) {
        self.repo.end_session();
        self.publish(&SessionEvent::SignedOut);
    }

    pub fn current_account(&self) -> Option<Account> {
        self.repo.current_session()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&SessionEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, Arc::new(listener)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(current, _)| *current != id);
        before != listeners.len()
    }

    fn publish(&self, event: &SessionEvent) {
        let snapshot: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn require<'a>(value: &'a str, field: &'static str) -> Result<&'a str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(trimmed)
}

/// Deterministic placeholder avatar: color from the username, initial as text.
pub fn placeholder_avatar(username: &str) -> String {
    // FNV-1a folded to 24 bits.
    let mut hash: u32 = 0x811c_9dc5;
    for byte in username.to_lowercase().bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    let color = hash & 0x00ff_ffff;
    let initial = username
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();
    format!("https://via.placeholder.com/150/{color:06x}/ffffff?text={initial}")
}

#[cfg(test)]
mod tests {
    use super::{placeholder_avatar, AuthError, AuthService, SessionEvent, SignUpRequest};
    use crate::kv::MemoryKvStore;
    use crate::repo::store::SocialStore;
    use std::sync::{Arc, Mutex};

    fn service() -> AuthService<SocialStore<MemoryKvStore>> {
        AuthService::new(Arc::new(SocialStore::new(MemoryKvStore::new())))
    }

    fn request(username: &str, password: &str) -> SignUpRequest {
        SignUpRequest {
            username: username.to_string(),
            full_name: "Full Name".to_string(),
            email: "x@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn sign_up_validates_fields_and_password_length() {
        let auth = service();
        let err = auth
            .sign_up(SignUpRequest {
                email: "  ".to_string(),
                ..request("alice", "secret1")
            })
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingField("email")));

        let err = auth.sign_up(request("alice", "12345")).unwrap_err();
        assert!(matches!(err, AuthError::PasswordTooShort { min: 6 }));
    }

    #[test]
    fn sign_up_trims_and_signs_in() {
        let auth = service();
        let account = auth.sign_up(request("  alice  ", "secret1")).unwrap();
        assert_eq!(account.username, "alice");
        assert!(account.profile_picture.ends_with("text=A"));
        assert_eq!(auth.current_account().unwrap().id, account.id);
    }

    #[test]
    fn subscribers_observe_sign_in_and_out_until_unsubscribed() {
        let auth = service();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = auth.subscribe(move |event| {
            let label = match event {
                SessionEvent::SignedIn(account) => format!("in:{}", account.username),
                SessionEvent::SignedOut => "out".to_string(),
            };
            sink.lock().unwrap().push(label);
        });

        auth.sign_up(request("alice", "secret1")).unwrap();
        auth.sign_out();
        assert!(auth.sign_in("alice", "wrong-pass").is_err());
        assert!(auth.unsubscribe(id));
        assert!(!auth.unsubscribe(id));
        auth.sign_in("alice", "secret1").unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["in:alice", "out"]);
    }

    #[test]
    fn placeholder_avatar_is_stable_per_username() {
        assert_eq!(placeholder_avatar("bob"), placeholder_avatar("BOB"));
        assert!(placeholder_avatar("").ends_with("text="));
    }
}
