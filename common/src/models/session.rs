// common/src/models/session.rs
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Login state stored under a session identifier after a successful challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEntry {
    /// Bearer token issued by the auth service
    pub id_token: String,
    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,
}

impl SessionEntry {
    pub fn new(id_token: String) -> Self {
        Self {
            id_token,
            created_at: Utc::now(),
        }
    }

    /// Seconds since the session was created
    pub fn age_seconds(&self) -> i64 {
        Utc::now().signed_duration_since(self.created_at).num_seconds()
    }
}

/// A request that carried a live session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub session_id: String,
    pub id_token: String,
    pub wallet_address: String,
}

impl AuthenticatedSession {
    /// Cache key for the privilege token of one vehicle in this session
    pub fn privilege_key(&self, token_id: i64) -> String {
        privilege_key(&self.session_id, token_id)
    }
}

pub fn privilege_key(session_id: &str, token_id: i64) -> String {
    format!("privilegeToken_{}_{}", session_id, token_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_key_is_per_vehicle() {
        let session = AuthenticatedSession {
            session_id: "abc".to_string(),
            id_token: "tok".to_string(),
            wallet_address: "0x1".to_string(),
        };

        assert_eq!(session.privilege_key(7), "privilegeToken_abc_7");
        assert_ne!(session.privilege_key(7), session.privilege_key(8));
    }

    #[test]
    fn test_new_session_is_fresh() {
        let entry = SessionEntry::new("tok".to_string());
        assert!(entry.age_seconds() <= 1);
    }

    #[test]
    fn test_age_counts_from_creation() {
        let mut entry = SessionEntry::new("tok".to_string());
        entry.created_at = Utc::now() - chrono::Duration::minutes(90);
        assert!((5399..=5401).contains(&entry.age_seconds()));
    }
}
