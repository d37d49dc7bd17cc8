//! CV-upload token generation.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Upload links stay valid for 30 days from generation.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// Length of a generated token.  43 alphanumeric characters carry just
/// over 256 bits of entropy.
const TOKEN_LEN: usize = 43;

/// Generate a URL-safe random upload token.
pub fn upload_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Expiry timestamp for a token generated now.
pub fn token_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(TOKEN_TTL_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_url_safe_and_long_enough() {
        let token = upload_token();
        assert_eq!(token.len(), 43);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(upload_token(), upload_token());
    }
}
