//! Access token persistence.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage;

/// An access token together with the moment it stops being sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    /// Wrap a freshly issued token that stays valid for `ttl`.
    pub fn issue(token: impl Into<String>, ttl: chrono::Duration) -> Self {
        Self {
            token: token.into(),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Whether the token expires within `threshold` from now.
    pub fn needs_refresh(&self, threshold: chrono::Duration) -> bool {
        Utc::now() + threshold >= self.expires_at
    }
}

/// Where the access token lives between page loads.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Option<StoredToken>;
    fn save(&self, token: &StoredToken);
    fn clear(&self);

    /// The token to send, if one is stored and still valid.
    ///
    /// An expired token is dropped from the store.
    fn token(&self) -> Option<String> {
        let stored = self.load()?;
        if stored.is_expired() {
            self.clear();
            return None;
        }
        Some(stored.token)
    }

    fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

/// Token kept in durable client storage under a fixed key.
#[derive(Debug, Clone)]
pub struct PersistentCredentials {
    key: String,
}

impl PersistentCredentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl CredentialStore for PersistentCredentials {
    fn load(&self) -> Option<StoredToken> {
        storage::load(&self.key)
    }

    fn save(&self, token: &StoredToken) {
        if !storage::save(&self.key, token) {
            crate::log_warn!("failed to persist access token under '{}'", self.key);
        }
    }

    fn clear(&self) {
        storage::remove(&self.key);
    }
}

/// In-process token slot. Counts how often it has been cleared.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    slot: Mutex<Option<StoredToken>>,
    clears: AtomicUsize,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: StoredToken) -> Self {
        Self {
            slot: Mutex::new(Some(token)),
            clears: AtomicUsize::new(0),
        }
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl CredentialStore for MemoryCredentials {
    fn load(&self) -> Option<StoredToken> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &StoredToken) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_token_is_returned() {
        let token = StoredToken::issue("abc", chrono::Duration::days(7));
        let creds = MemoryCredentials::with_token(token);
        assert_eq!(creds.token().as_deref(), Some("abc"));
        assert_eq!(creds.clear_count(), 0);
    }

    #[test]
    fn expired_token_is_dropped() {
        let token = StoredToken::issue("old", chrono::Duration::seconds(-1));
        let creds = MemoryCredentials::with_token(token);
        assert_eq!(creds.token(), None);
        assert!(creds.load().is_none());
        assert_eq!(creds.clear_count(), 1);
    }

    #[test]
    fn refresh_threshold() {
        let threshold = chrono::Duration::minutes(5);
        let soon = StoredToken::issue("t", chrono::Duration::minutes(2));
        let later = StoredToken::issue("t", chrono::Duration::days(1));
        assert!(soon.needs_refresh(threshold));
        assert!(!later.needs_refresh(threshold));
    }
}
