//! Integration tests for [`RedisLinkStore`] against a real Redis server.
//!
//! They start a container through testcontainers, so they are compiled only
//! with the `docker-tests` feature:
//! `cargo test -p shortly-storage --features docker-tests`.
#![cfg(feature = "docker-tests")]

use std::collections::HashSet;
use std::sync::Arc;

use redis::AsyncCommands;
use shortly_core::base36;
use shortly_storage::{KeySpace, LinkDetails, LinkStore, RedisLinkStore, ShortToken, StoreError};
use shortly_test_infra::redis::{RedisConfig, RedisServer};

struct Fixture {
    redis: RedisServer,
    store: RedisLinkStore,
}

impl Fixture {
    async fn start() -> Self {
        Self::start_with(KeySpace::new()).await
    }

    async fn start_with(keys: KeySpace) -> Self {
        let redis = RedisServer::new(RedisConfig::default())
            .await
            .expect("start redis");
        let conn = redis.connection().await.expect("redis connection");

        Self {
            store: RedisLinkStore::with_key_space(conn, keys),
            redis,
        }
    }

    async fn raw(&self) -> redis::aio::MultiplexedConnection {
        self.redis.connection().await.expect("redis connection")
    }
}

fn token(s: &str) -> ShortToken {
    ShortToken::new_unchecked(s)
}

#[tokio::test]
async fn register_resolve_details_scenario() {
    let fixture = Fixture::start().await;
    let store = &fixture.store;

    let minted = store.register_url("https://example.com").await.unwrap();
    assert_eq!(minted.as_str(), "1");

    assert_eq!(store.resolve(&token("1")).await.unwrap(), "https://example.com");
    assert_eq!(
        store.get_details(&token("1")).await.unwrap(),
        LinkDetails {
            url: "https://example.com".to_string(),
            click_count: 1,
        }
    );
}

#[tokio::test]
async fn persisted_key_layout() {
    let fixture = Fixture::start().await;
    let minted = fixture
        .store
        .register_url("https://example.com/a")
        .await
        .unwrap();
    fixture.store.resolve(&minted).await.unwrap();

    let mut conn = fixture.raw().await;
    let target: String = conn.get("url-target:1").await.unwrap();
    let reverse: String = conn.get("reverse-url:https://example.com/a").await.unwrap();
    let clicks: u64 = conn.get("click-count:1").await.unwrap();
    let sequence: u64 = conn.get("last-url-id").await.unwrap();

    assert_eq!(target, "https://example.com/a");
    assert_eq!(reverse, "1");
    assert_eq!(clicks, 1);
    assert_eq!(sequence, 1);
}

#[tokio::test]
async fn namespace_prefixes_every_key() {
    let fixture = Fixture::start_with(KeySpace::with_namespace("shortly:")).await;
    fixture
        .store
        .register_url("https://example.com")
        .await
        .unwrap();

    let mut conn = fixture.raw().await;
    let target: Option<String> = conn.get("shortly:url-target:1").await.unwrap();
    let bare: Option<String> = conn.get("url-target:1").await.unwrap();

    assert_eq!(target.as_deref(), Some("https://example.com"));
    assert!(bare.is_none());
}

#[tokio::test]
async fn repeated_registration_consumes_one_sequence_value() {
    let fixture = Fixture::start().await;
    let store = &fixture.store;

    let first = store.register_url("https://example.com").await.unwrap();
    assert_eq!(store.last_sequence().await.unwrap(), 1);

    let second = store.register_url("https://example.com").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(store.last_sequence().await.unwrap(), 1);
}

#[tokio::test]
async fn lua_encoding_matches_codec() {
    let fixture = Fixture::start().await;

    let mut conn = fixture.raw().await;
    let _: () = conn.set("last-url-id", 46_655u64).await.unwrap();

    let minted = fixture
        .store
        .register_url("https://example.com/big")
        .await
        .unwrap();

    assert_eq!(minted, base36::encode(46_656));
    assert_eq!(minted.as_str(), "1000");
}

#[tokio::test]
async fn unknown_token_is_not_found_and_not_counted() {
    let fixture = Fixture::start().await;
    let unknown = token("nonexistent-token");

    assert!(matches!(
        fixture.store.resolve(&unknown).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        fixture.store.get_details(&unknown).await,
        Err(StoreError::NotFound(_))
    ));

    let mut conn = fixture.raw().await;
    let exists: bool = conn.exists("click-count:nonexistent-token").await.unwrap();
    assert!(!exists);
}

#[tokio::test]
async fn corrupt_counter_is_invalid_data() {
    let fixture = Fixture::start().await;
    let minted = fixture
        .store
        .register_url("https://example.com")
        .await
        .unwrap();

    let mut conn = fixture.raw().await;
    let _: () = conn.set("click-count:1", "lots").await.unwrap();

    assert!(matches!(
        fixture.store.get_details(&minted).await,
        Err(StoreError::InvalidData(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registration_of_same_url_mints_once() {
    let fixture = Fixture::start().await;
    let store = Arc::new(fixture.store.clone());
    let mut handles = vec![];

    for _ in 0..50 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.register_url("https://example.com/race").await.unwrap()
        }));
    }

    let mut tokens = HashSet::new();
    for handle in handles {
        tokens.insert(handle.await.unwrap());
    }

    assert_eq!(tokens.len(), 1);
    assert_eq!(store.last_sequence().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resolves_lose_no_clicks() {
    let fixture = Fixture::start().await;
    let store = Arc::new(fixture.store.clone());
    let minted = store.register_url("https://example.com").await.unwrap();
    let mut handles = vec![];

    for _ in 0..200 {
        let store = Arc::clone(&store);
        let minted = minted.clone();
        handles.push(tokio::spawn(async move { store.resolve(&minted).await.unwrap() }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), "https://example.com");
    }

    assert_eq!(store.get_details(&minted).await.unwrap().click_count, 200);
}
