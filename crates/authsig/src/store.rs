use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::keys::AuthorizationKey;

/// Default lifetime of a registered authorization key.
pub const DEFAULT_KEY_TTL: Duration = Duration::from_secs(15 * 60);

/// Registry of authorization keys, keyed by wallet id.
///
/// Injected into whatever orchestrates signing. The in-memory implementation
/// loses everything on restart; a persistent store plugs in behind the same
/// trait.
pub trait AuthorizationStore: Send + Sync {
    /// Registers `key` for `wallet_id`, replacing any previous key.
    fn insert(&self, wallet_id: &str, key: AuthorizationKey, ttl: Duration);

    /// The live key for `wallet_id`. Expired keys are never returned.
    fn get(&self, wallet_id: &str) -> Option<AuthorizationKey>;

    /// Revokes the key for `wallet_id`. Returns whether a live key was removed.
    fn remove(&self, wallet_id: &str) -> bool;
}

struct StoredKey {
    key: AuthorizationKey,
    /// `None` when the TTL runs past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl StoredKey {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

#[derive(Default)]
pub struct MemoryAuthorizationStore {
    entries: Mutex<HashMap<String, StoredKey>>,
}

impl MemoryAuthorizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredKey>> {
        // Entries are replaced wholesale, so a panic mid-update cannot leave one half-written.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AuthorizationStore for MemoryAuthorizationStore {
    fn insert(&self, wallet_id: &str, key: AuthorizationKey, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl);
        let mut entries = self.entries();

        let before = entries.len();
        entries.retain(|_, stored| !stored.is_expired(now));
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "swept expired authorization keys");
        }

        entries.insert(wallet_id.to_string(), StoredKey { key, expires_at });
    }

    fn get(&self, wallet_id: &str) -> Option<AuthorizationKey> {
        let mut entries = self.entries();
        if entries.get(wallet_id)?.is_expired(Instant::now()) {
            entries.remove(wallet_id);
            tracing::debug!(wallet_id, "evicted expired authorization key");
            return None;
        }
        entries.get(wallet_id).map(|stored| stored.key.clone())
    }

    fn remove(&self, wallet_id: &str) -> bool {
        self.entries()
            .remove(wallet_id)
            .is_some_and(|stored| !stored.is_expired(Instant::now()))
    }
}
