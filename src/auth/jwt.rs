/// JWT Token Issuance and Parsing
///
/// Access and refresh tokens share one format: HS256 JWTs whose claims carry
/// the user id and an absolute expiry. The caller picks the secret and TTL
/// for the token class.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::auth::clock::{Clock, SystemClock};
use crate::error::{AppError, AuthError};

/// Signs and verifies tokens against an injectable clock
#[derive(Clone)]
pub struct TokenCodec {
    clock: Arc<dyn Clock>,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock once the signature holds,
        // so a forged token is never reported as merely expired.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self { clock, validation }
    }

    /// Issue a token for `subject_id` expiring `ttl_seconds` from now
    ///
    /// # Errors
    /// Returns error if the expiry overflows or token encoding fails
    pub fn issue(&self, subject_id: i64, ttl_seconds: i64, secret: &[u8]) -> Result<String, AppError> {
        let claims = Claims::new(subject_id, self.clock.now(), ttl_seconds).ok_or_else(|| {
            AppError::Internal(format!("Token expiry overflows with ttl {}s", ttl_seconds))
        })?;

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Verify the signature, then the expiry, and return the claims
    ///
    /// # Errors
    /// - `TokenInvalid` if the signature does not match `secret` or the token
    ///   is malformed
    /// - `TokenExpired` if the signature matches but the expiry has passed
    pub fn parse(&self, token: &str, secret: &[u8]) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("JWT validation error: {}", e);
                AuthError::TokenInvalid
            })?;

        if claims.is_expired_at(self.clock.now()) {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

impl Default for TokenCodec {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
