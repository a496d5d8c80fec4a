/// JWT Claims structure
///
/// Payload carried by both access and refresh tokens: the user id as the
/// standard `sub` claim, expiry and issued-at timestamps, and a per-token
/// `jti` so two tokens minted in the same second never coincide (RFC 7519).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID as decimal string)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Token ID (random UUID)
    pub jti: String,
}

impl Claims {
    /// Create claims for `user_id` expiring `ttl_seconds` after `now`
    ///
    /// Returns `None` if the expiry does not fit in an `i64`.
    pub fn new(user_id: i64, now: i64, ttl_seconds: i64) -> Option<Self> {
        let exp = now.checked_add(ttl_seconds)?;

        Some(Self {
            sub: user_id.to_string(),
            exp,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns `TokenInvalid` if the subject is not an integer. Only reachable
    /// for a correctly signed token minted by something other than this service.
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub.parse::<i64>().map_err(|_| AuthError::TokenInvalid)
    }

    /// A token stays valid through its `exp` second and expires after it
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(42, 1_000, 3600).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iat, 1_000);
        assert_eq!(claims.exp, 4_600);
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn test_overflowing_expiry_is_refused() {
        assert!(Claims::new(42, 1_700_000_000, i64::MAX).is_none());
    }

    #[test]
    fn test_same_second_claims_differ() {
        let first = Claims::new(42, 1_000, 60).unwrap();
        let second = Claims::new(42, 1_000, 60).unwrap();

        assert_ne!(first.jti, second.jti);
        assert_ne!(first, second);
    }

    #[test]
    fn test_user_id_extraction() {
        let claims = Claims::new(7, 0, 60).unwrap();
        assert_eq!(claims.user_id().unwrap(), 7);
    }

    #[test]
    fn test_invalid_user_id() {
        let mut claims = Claims::new(7, 0, 60).unwrap();
        claims.sub = "not-a-number".to_string();

        assert_eq!(claims.user_id(), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_expiry_boundary() {
        let claims = Claims::new(1, 100, 1).unwrap();

        assert!(!claims.is_expired_at(100));
        assert!(!claims.is_expired_at(101));
        assert!(claims.is_expired_at(102));
    }

    #[test]
    fn test_subject_survives_json() {
        let claims = Claims::new(99, 10, 20).unwrap();
        let json = serde_json::to_string(&claims).unwrap();

        assert!(json.contains("\"sub\":\"99\""));
        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(back, claims);
    }
}
