use crate::error::StoreError;
use crate::token::ShortToken;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, StoreError>;

/// A link record together with its click counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDetails {
    /// The target URL the token redirects to.
    pub url: String,
    /// Number of successful resolutions of the token so far.
    pub click_count: u64,
}

/// Registry mapping URLs to short tokens and back, with click tracking.
///
/// Implementations own the forward mapping, the reverse mapping used for
/// deduplication, the click counters, and the sequence counter tokens are
/// minted from. They are responsible for their own concurrency safety:
///
/// - concurrent registrations never mint the same token twice;
/// - concurrent registrations of the same URL mint at most one token;
/// - no click increment is ever lost.
///
/// URL validation happens before calling into the store.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Returns the token for `url`, minting a new one on first submission.
    ///
    /// Re-submitting a known URL returns its existing token without consuming
    /// a sequence value.
    async fn register_url(&self, url: &str) -> Result<ShortToken>;

    /// Returns the target URL of `token` and counts one click.
    ///
    /// Fails with [`StoreError::NotFound`] when the token was never issued.
    async fn resolve(&self, token: &ShortToken) -> Result<String>;

    /// Returns the target URL and the current click count, without counting a click.
    async fn get_details(&self, token: &ShortToken) -> Result<LinkDetails>;

    /// Returns the last sequence value handed out, `0` if none.
    async fn last_sequence(&self) -> Result<u64>;
}
