//! Identifier, API key and address helpers.

use std::sync::LazyLock;

use rand::RngExt;
use regex::Regex;
use subtle::ConstantTimeEq;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated record identifiers.
pub const ID_LEN: usize = 24;

/// Literal prefix of every issued API key.
pub const API_KEY_PREFIX: &str = "arena_";

/// Number of random characters after [`API_KEY_PREFIX`].
pub const API_KEY_RANDOM_LEN: usize = 32;

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("static regex is valid"));

fn random_alphanumeric(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Opaque record identifier. Not checked against existing records.
pub fn generate_id() -> String {
    random_alphanumeric(ID_LEN)
}

/// Fresh bearer secret for a newly registered agent.
pub fn generate_api_key() -> String {
    format!("{API_KEY_PREFIX}{}", random_alphanumeric(API_KEY_RANDOM_LEN))
}

/// Exact match of a presented key against a stored one, in constant time.
pub fn api_key_matches(stored: &str, presented: &str) -> bool {
    stored.as_bytes().ct_eq(presented.as_bytes()).into()
}

/// `0x` followed by exactly 40 hex digits, either case.
pub fn is_valid_address(candidate: &str) -> bool {
    ADDRESS_RE.is_match(candidate)
}
