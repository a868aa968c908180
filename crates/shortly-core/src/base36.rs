//! Base36 codec between sequence values and short tokens.
//!
//! Symbols are `0-9` followed by `a-z`, most significant first, with no
//! leading-zero padding. Zero encodes as `"0"`.

use crate::error::{CoreError, Result};
use crate::token::ShortToken;

/// The 36-symbol alphabet, in digit order.
pub const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const BASE: u64 = 36;

/// `u64::MAX` needs 13 base36 digits.
const MAX_DIGITS: usize = 13;

/// Encodes a sequence value as a token.
pub fn encode(mut n: u64) -> ShortToken {
    if n == 0 {
        return ShortToken::new_unchecked("0");
    }

    let mut buf = [0u8; MAX_DIGITS];
    let mut pos = MAX_DIGITS;
    while n != 0 {
        pos -= 1;
        buf[pos] = ALPHABET[(n % BASE) as usize];
        n /= BASE;
    }

    // Every byte comes from ALPHABET, which is ASCII.
    let encoded = std::str::from_utf8(&buf[pos..]).unwrap_or_default();
    ShortToken::new_unchecked(encoded)
}

/// Encodes a signed sequence value, as returned by counters such as Redis `INCR`.
///
/// Negative values are rejected with [`CoreError::InvalidArgument`].
pub fn encode_signed(n: i64) -> Result<ShortToken> {
    u64::try_from(n).map(encode).map_err(|_| {
        CoreError::InvalidArgument(format!("sequence value must be non-negative, got {n}"))
    })
}

/// Decodes a token back into its sequence value.
///
/// Fails on the empty string, on any symbol outside [`ALPHABET`] and on values
/// that overflow `u64`.
pub fn decode(token: &str) -> Result<u64> {
    if token.is_empty() {
        return Err(CoreError::InvalidArgument(
            "token cannot be empty".to_string(),
        ));
    }

    token.bytes().try_fold(0u64, |acc, byte| {
        let digit = digit_value(byte).ok_or_else(|| {
            CoreError::InvalidArgument(format!(
                "'{}' is not a base36 symbol in token '{token}'",
                byte.escape_ascii()
            ))
        })?;

        acc.checked_mul(BASE)
            .and_then(|value| value.checked_add(digit))
            .ok_or_else(|| CoreError::InvalidArgument(format!("token '{token}' overflows u64")))
    })
}

fn digit_value(byte: u8) -> Option<u64> {
    match byte {
        b'0'..=b'9' => Some(u64::from(byte - b'0')),
        b'a'..=b'z' => Some(u64::from(byte - b'a') + 10),
        _ => None,
    }
}
