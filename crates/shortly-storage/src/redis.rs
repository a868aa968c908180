use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Script};
use shortly_core::base36::{self, ALPHABET};
use shortly_core::store::{LinkDetails, LinkStore, Result};
use shortly_core::{ShortToken, StoreError};
use tracing::{debug, info, trace, warn};

const REGISTER_SCRIPT: &str = include_str!("lua/register.lua");
const RESOLVE_SCRIPT: &str = include_str!("lua/resolve.lua");

/// Layout of the persisted key space.
///
/// ```text
/// url-target:{token}   -> target url
/// reverse-url:{url}    -> token
/// click-count:{token}  -> integer
/// last-url-id          -> integer
/// ```
///
/// Every key is prefixed with the namespace, which is empty by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySpace {
    namespace: String,
}

impl KeySpace {
    /// Key space without a namespace prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Key space whose keys all start with `namespace` (e.g. `"shortly:"`).
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn target(&self, token: &ShortToken) -> String {
        format!("{}{}", self.target_prefix(), token.as_str())
    }

    pub fn reverse(&self, url: &str) -> String {
        format!("{}reverse-url:{}", self.namespace, url)
    }

    pub fn clicks(&self, token: &ShortToken) -> String {
        format!("{}click-count:{}", self.namespace, token.as_str())
    }

    pub fn sequence(&self) -> String {
        format!("{}last-url-id", self.namespace)
    }

    fn target_prefix(&self) -> String {
        format!("{}url-target:", self.namespace)
    }
}

/// Redis implementation of [`LinkStore`].
///
/// Registration runs as a single Lua script: the dedup lookup, the `INCR` of
/// the sequence counter and both mapping writes execute atomically on the
/// server, so concurrent registrations of the same URL mint one token and a
/// crash cannot leave a forward mapping without its reverse entry. Resolution
/// is a second script that counts the click only when the token exists.
///
/// The token encoding inside the registration script is exact while the
/// counter stays below 2^53 (Lua numbers are doubles).
///
/// The url-target key is derived from the minted token inside the script and
/// cannot be declared in `KEYS` up front, so the store needs a standalone
/// Redis: cluster slot routing and ACL key patterns would reject that write.
#[derive(Debug, Clone)]
pub struct RedisLinkStore {
    conn: MultiplexedConnection,
    keys: KeySpace,
    register_script: Script,
    resolve_script: Script,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("timed out") {
        StoreError::Timeout(message)
    } else if lowered.contains("connection") || lowered.contains("broken pipe") {
        StoreError::Unavailable(message)
    } else {
        StoreError::Operation(message)
    }
}

/// Parses a stored counter; a missing key reads as zero.
fn parse_counter(key: &str, raw: Option<String>) -> Result<u64> {
    match raw {
        None => Ok(0),
        Some(value) => value.parse::<u64>().map_err(|e| {
            StoreError::InvalidData(format!("counter '{key}' holds '{value}': {e}"))
        }),
    }
}

impl RedisLinkStore {
    /// Creates a store over an existing multiplexed connection.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self::with_key_space(conn, KeySpace::new())
    }

    /// Creates a store whose keys live under a custom namespace.
    pub fn with_key_space(conn: MultiplexedConnection, keys: KeySpace) -> Self {
        Self {
            conn,
            keys,
            register_script: Script::new(REGISTER_SCRIPT),
            resolve_script: Script::new(RESOLVE_SCRIPT),
        }
    }

    /// Opens a connection to `redis_url` and creates a store on it.
    pub async fn connect(redis_url: &str, keys: KeySpace) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| StoreError::Unavailable(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::with_key_space(conn, keys))
    }
}

#[async_trait]
impl LinkStore for RedisLinkStore {
    async fn register_url(&self, url: &str) -> Result<ShortToken> {
        trace!(url = %url, "registering url");

        let mut conn = self.conn.clone();
        let (sequence, token): (i64, String) = self
            .register_script
            .key(self.keys.reverse(url))
            .key(self.keys.sequence())
            .arg(url)
            .arg(self.keys.target_prefix())
            .arg(&ALPHABET[..])
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Redis error on register");
                map_redis_error("failed to register url in Redis", e)
            })?;

        if token.is_empty() {
            return Err(StoreError::InvalidData(format!(
                "empty token stored for url '{url}'"
            )));
        }
        let token = ShortToken::new_unchecked(token);

        if sequence == 0 {
            trace!(token = %token, url = %url, "url already registered");
        } else {
            // The script encodes in Lua; make sure it agrees with the codec.
            let expected = base36::encode_signed(sequence)?;
            if expected != token {
                return Err(StoreError::InvalidData(format!(
                    "sequence {sequence} was stored as '{token}', expected '{expected}'"
                )));
            }
            info!(token = %token, sequence, url = %url, "minted short token");
        }

        Ok(token)
    }

    async fn resolve(&self, token: &ShortToken) -> Result<String> {
        let mut conn = self.conn.clone();
        let url: Option<String> = self
            .resolve_script
            .key(self.keys.target(token))
            .key(self.keys.clicks(token))
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                warn!(token = %token, error = %e, "Redis error on resolve");
                map_redis_error("failed to resolve token in Redis", e)
            })?;

        match url {
            Some(url) => {
                debug!(token = %token, url = %url, "resolved short token");
                Ok(url)
            }
            None => {
                trace!(token = %token, "short token not found");
                Err(StoreError::NotFound(token.to_string()))
            }
        }
    }

    async fn get_details(&self, token: &ShortToken) -> Result<LinkDetails> {
        let target_key = self.keys.target(token);
        let clicks_key = self.keys.clicks(token);

        let mut conn = self.conn.clone();
        let (url, clicks): (Option<String>, Option<String>) = conn
            .mget::<_, (Option<String>, Option<String>)>(&[&target_key, &clicks_key])
            .await
            .map_err(|e| {
                warn!(token = %token, error = %e, "Redis error on details");
                map_redis_error("failed to read link details from Redis", e)
            })?;

        let Some(url) = url else {
            return Err(StoreError::NotFound(token.to_string()));
        };

        Ok(LinkDetails {
            url,
            click_count: parse_counter(&clicks_key, clicks)?,
        })
    }

    async fn last_sequence(&self) -> Result<u64> {
        let key = self.keys.sequence();

        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(|e| map_redis_error("failed to read sequence from Redis", e))?;

        parse_counter(&key, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> ShortToken {
        ShortToken::new_unchecked(s)
    }

    #[test]
    fn default_key_layout() {
        let keys = KeySpace::new();
        assert_eq!(keys.target(&token("1z")), "url-target:1z");
        assert_eq!(
            keys.reverse("https://example.com"),
            "reverse-url:https://example.com"
        );
        assert_eq!(keys.clicks(&token("1z")), "click-count:1z");
        assert_eq!(keys.sequence(), "last-url-id");
    }

    #[test]
    fn namespaced_key_layout() {
        let keys = KeySpace::with_namespace("shortly:");
        assert_eq!(keys.target(&token("a")), "shortly:url-target:a");
        assert_eq!(keys.reverse("http://x.y"), "shortly:reverse-url:http://x.y");
        assert_eq!(keys.clicks(&token("a")), "shortly:click-count:a");
        assert_eq!(keys.sequence(), "shortly:last-url-id");
        assert_eq!(keys.target_prefix(), "shortly:url-target:");
    }

    #[test]
    fn counters_parse_on_read() {
        assert_eq!(parse_counter("k", None).unwrap(), 0);
        assert_eq!(parse_counter("k", Some("42".to_string())).unwrap(), 42);
        assert!(matches!(
            parse_counter("k", Some("-1".to_string())),
            Err(StoreError::InvalidData(_))
        ));
        assert!(matches!(
            parse_counter("k", Some("many".to_string())),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn error_mapping() {
        let timeout = redis::RedisError::from(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "operation timed out",
        ));
        assert!(matches!(
            map_redis_error("get", timeout),
            StoreError::Timeout(_)
        ));
    }
}
