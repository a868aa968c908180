use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt::Display;

/// A short textual identifier for a shortened URL.
///
/// Tokens minted by a store are always base36 encodings of a sequence value,
/// but lookups accept any non-empty string: an unknown token is a `NotFound`
/// from the store, not a parse failure.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortToken(SmolStr);

impl ShortToken {
    /// Creates a token from caller-supplied text.
    ///
    /// The only requirement is that the text is non-empty.
    pub fn new(token: impl AsRef<str>) -> Result<Self> {
        let token = token.as_ref();
        if token.is_empty() {
            return Err(CoreError::InvalidArgument(
                "token cannot be empty".to_string(),
            ));
        }
        Ok(Self(SmolStr::new(token)))
    }

    /// Creates a token without validation.
    ///
    /// Use this only for text produced by the codec or read back from a store.
    pub fn new_unchecked(token: impl AsRef<str>) -> Self {
        Self(SmolStr::new(token))
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the redirect route for this token, e.g. `/1z`.
    pub fn redirect_path(&self) -> String {
        format!("/{}", self.0)
    }

    /// Path of the details route for this token, e.g. `/1z+`.
    pub fn details_path(&self) -> String {
        format!("/{}+", self.0)
    }
}

impl std::fmt::Debug for ShortToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortToken").field(&self.0).finish()
    }
}

impl Display for ShortToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ShortToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ShortToken {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ShortToken> for String {
    fn from(value: ShortToken) -> Self {
        value.0.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_any_non_empty_text() {
        assert!(ShortToken::new("1").is_ok());
        assert!(ShortToken::new("nonexistent-token").is_ok());
        assert!(ShortToken::new("ABC").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            ShortToken::new(""),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn display_and_paths() {
        let token = ShortToken::new("1z").unwrap();
        assert_eq!(token.to_string(), "1z");
        assert_eq!(token.redirect_path(), "/1z");
        assert_eq!(token.details_path(), "/1z+");
    }

    #[test]
    fn borrows_as_str_for_map_lookups() {
        let mut map = std::collections::HashMap::new();
        map.insert(ShortToken::new("abc").unwrap(), 1);
        assert_eq!(map.get("abc"), Some(&1));
    }
}
