use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shortly_core::base36;
use shortly_core::store::{LinkDetails, LinkStore, Result};
use shortly_core::{ShortToken, StoreError};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, trace};

/// In-memory implementation of [`LinkStore`] using DashMap.
///
/// DashMap shards its locks, so lookups and registrations of unrelated URLs
/// do not contend. Deduplication holds the reverse-index entry of the URL
/// being registered while the sequence value is taken and both mappings are
/// written, which makes the check-then-insert atomic per URL.
///
/// The sequence counter lives in process memory: two instances never share
/// tokens, so this backend is only correct for a single process.
#[derive(Debug, Default)]
pub struct InMemoryLinkStore {
    targets: DashMap<ShortToken, String>,
    reverse: DashMap<String, ShortToken>,
    clicks: DashMap<ShortToken, u64>,
    sequence: AtomicU64,
}

impl InMemoryLinkStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with room for `capacity` links.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            targets: DashMap::with_capacity(capacity),
            reverse: DashMap::with_capacity(capacity),
            clicks: DashMap::with_capacity(capacity),
            sequence: AtomicU64::new(0),
        }
    }

    /// Number of registered links.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` when no link has been registered.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn register_url(&self, url: &str) -> Result<ShortToken> {
        // Read guard must be released before taking the entry lock on the same shard.
        let existing = self.reverse.get(url).map(|entry| entry.value().clone());
        if let Some(token) = existing {
            trace!(token = %token, url = %url, "url already registered");
            return Ok(token);
        }

        match self.reverse.entry(url.to_owned()) {
            Entry::Occupied(entry) => {
                debug!(token = %entry.get(), url = %url, "lost registration race, reusing token");
                Ok(entry.get().clone())
            }
            Entry::Vacant(entry) => {
                let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
                let token = base36::encode(sequence);

                // Forward mapping first so the token resolves as soon as it is visible.
                self.targets.insert(token.clone(), url.to_owned());
                entry.insert(token.clone());

                info!(token = %token, sequence, url = %url, "minted short token");
                Ok(token)
            }
        }
    }

    async fn resolve(&self, token: &ShortToken) -> Result<String> {
        let Some(url) = self
            .targets
            .get(token.as_str())
            .map(|entry| entry.value().clone())
        else {
            trace!(token = %token, "short token not found");
            return Err(StoreError::NotFound(token.to_string()));
        };

        *self.clicks.entry(token.clone()).or_insert(0) += 1;

        debug!(token = %token, url = %url, "resolved short token");
        Ok(url)
    }

    async fn get_details(&self, token: &ShortToken) -> Result<LinkDetails> {
        let Some(url) = self
            .targets
            .get(token.as_str())
            .map(|entry| entry.value().clone())
        else {
            return Err(StoreError::NotFound(token.to_string()));
        };

        let click_count = self
            .clicks
            .get(token.as_str())
            .map(|count| *count.value())
            .unwrap_or(0);

        Ok(LinkDetails { url, click_count })
    }

    async fn last_sequence(&self) -> Result<u64> {
        Ok(self.sequence.load(Ordering::SeqCst))
    }
}
