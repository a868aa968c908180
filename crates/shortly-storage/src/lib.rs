//! Storage backends for the Shortly link store.
//!
//! [`InMemoryLinkStore`] keeps everything in process memory and suits tests
//! and single-instance deployments. [`RedisLinkStore`] persists the key space
//! in Redis and can be shared by several gateway instances.

pub mod memory;
pub mod redis;

pub use self::memory::InMemoryLinkStore;
pub use self::redis::{KeySpace, RedisLinkStore};
pub use shortly_core::{LinkDetails, LinkStore, ShortToken, StoreError};
