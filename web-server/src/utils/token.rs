// web-server/src/utils/token.rs
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

/// Random alphanumeric string of `length` characters from the thread-local CSPRNG
pub fn generate_secure_token(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Hash a string using SHA-256
pub fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Opaque session identifier handed out in the session cookie
pub fn create_session_id() -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    hash_string(&format!("{}-{}", nanos, generate_secure_token(32)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_secure_token() {
        let token = generate_secure_token(32);
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_hash_string() {
        let hash = hash_string("test string");
        assert_eq!(hash.len(), 64); // SHA-256 produces 64 hex characters
        assert_eq!(hash, hash_string("test string"));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let ids: HashSet<_> = (0..100).map(|_| create_session_id()).collect();
        assert_eq!(ids.len(), 100);
        assert!(ids.iter().all(|id| id.len() == 64));
    }
}
