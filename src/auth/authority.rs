/// Token Authority
///
/// Orchestrates password hashing, token issuance/parsing and the revocation
/// store to implement sign-up, sign-in, refresh, sign-out and validation.
///
/// Refresh token lifecycle:
/// - Active until it expires or is signed out
/// - Revoked (signed out) tokens are rejected before the signature is looked at
/// - Expired tokens are detected lazily and forgotten by the store on a
///   best-effort basis

use std::sync::Arc;

use crate::auth::clock::{Clock, SystemClock};
use crate::auth::jwt::TokenCodec;
use crate::auth::password::hash_password;
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};
use crate::models::{AuthTokenPair, User};
use crate::repository::{RevocationStore, UserRepository};

/// Outcome of validating a token
///
/// `Rejected` carries the reason so callers can tell an expired token from a
/// forged or revoked one. Infrastructure failures are reported separately as
/// `Err(AppError)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Valid,
    Rejected(AuthError),
}

impl TokenStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenStatus::Valid)
    }

    /// Rejection reason, if any
    pub fn reason(&self) -> Option<AuthError> {
        match self {
            TokenStatus::Valid => None,
            TokenStatus::Rejected(kind) => Some(*kind),
        }
    }
}

pub struct TokenAuthority {
    users: Arc<dyn UserRepository>,
    revocations: Arc<dyn RevocationStore>,
    codec: TokenCodec,
    settings: AuthSettings,
}

impl TokenAuthority {
    /// Build an authority on the system clock
    ///
    /// # Errors
    /// Returns a config error if a secret is empty or a TTL is not positive
    pub fn new(
        users: Arc<dyn UserRepository>,
        revocations: Arc<dyn RevocationStore>,
        settings: AuthSettings,
    ) -> Result<Self, AppError> {
        Self::with_clock(users, revocations, settings, Arc::new(SystemClock))
    }

    pub fn with_clock(
        users: Arc<dyn UserRepository>,
        revocations: Arc<dyn RevocationStore>,
        settings: AuthSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        settings.validate()?;

        Ok(Self {
            users,
            revocations,
            codec: TokenCodec::new(clock),
            settings,
        })
    }

    fn password_hash(&self, password: &str) -> String {
        hash_password(password, self.settings.password_secret.as_bytes())
    }

    /// Register a user and return the storage-assigned id
    ///
    /// # Errors
    /// Returns `AppError::Database` on any persistence failure, including a
    /// login or email that is already taken
    pub async fn create_user(&self, login: &str, email: &str, password: &str) -> Result<i64, AppError> {
        let password_hash = self.password_hash(password);
        let user_id = self.users.create_user(login, email, &password_hash).await?;

        tracing::info!(user_id = user_id, "User created");
        Ok(user_id)
    }

    pub async fn authenticate_by_email(&self, email: &str, password: &str) -> Result<AuthTokenPair, AppError> {
        let user = self
            .users
            .find_by_email(email, &self.password_hash(password))
            .await?;
        self.issue_pair(user)
    }

    pub async fn authenticate_by_login(&self, login: &str, password: &str) -> Result<AuthTokenPair, AppError> {
        let user = self
            .users
            .find_by_login(login, &self.password_hash(password))
            .await?;
        self.issue_pair(user)
    }

    fn issue_pair(&self, user: Option<User>) -> Result<AuthTokenPair, AppError> {
        let user = user.ok_or_else(|| {
            tracing::warn!("Sign-in rejected: no user matches the supplied credentials");
            AppError::Auth(AuthError::InvalidCredentials)
        })?;

        let pair = AuthTokenPair {
            access_token: self.issue_access_token(user.id)?,
            refresh_token: self.codec.issue(
                user.id,
                self.settings.refresh_token_ttl,
                self.settings.refresh_token_secret.as_bytes(),
            )?,
        };

        tracing::info!(user_id = user.id, "User signed in");
        Ok(pair)
    }

    fn issue_access_token(&self, user_id: i64) -> Result<String, AppError> {
        self.codec.issue(
            user_id,
            self.settings.access_token_ttl,
            self.settings.access_token_secret.as_bytes(),
        )
    }

    pub fn validate_access_token(&self, token: &str) -> TokenStatus {
        match self
            .codec
            .parse(token, self.settings.access_token_secret.as_bytes())
        {
            Ok(_) => TokenStatus::Valid,
            Err(kind) => TokenStatus::Rejected(kind),
        }
    }

    /// Check a refresh token against the revocation store, then its
    /// signature and expiry
    ///
    /// # Errors
    /// Returns `AppError::Database` only if the revocation lookup fails
    pub async fn validate_refresh_token(&self, token: &str) -> Result<TokenStatus, AppError> {
        if self.revocations.is_recorded(token).await? {
            tracing::warn!("Attempt to use revoked refresh token");
            return Ok(TokenStatus::Rejected(AuthError::TokenRevoked));
        }

        match self
            .codec
            .parse(token, self.settings.refresh_token_secret.as_bytes())
        {
            Ok(_) => Ok(TokenStatus::Valid),
            Err(AuthError::TokenExpired) => {
                if let Err(e) = self.revocations.forget(token).await {
                    tracing::error!(error = %e, "Failed to clean up expired refresh token");
                }
                Ok(TokenStatus::Rejected(AuthError::TokenExpired))
            }
            Err(kind) => Ok(TokenStatus::Rejected(kind)),
        }
    }

    /// Issue a new access token for the subject of `refresh_token`
    ///
    /// Callers are expected to run `validate_refresh_token` first; this only
    /// re-parses the token. The refresh token itself is left untouched.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AppError> {
        let claims = self
            .codec
            .parse(refresh_token, self.settings.refresh_token_secret.as_bytes())?;
        let user_id = claims.user_id()?;

        tracing::info!(user_id = user_id, "Access token refreshed");
        self.issue_access_token(user_id)
    }

    /// Record `refresh_token` as revoked
    ///
    /// Access tokens issued alongside it stay valid until their own expiry.
    pub async fn sign_out(&self, refresh_token: &str) -> Result<(), AppError> {
        self.revocations.record(refresh_token).await?;

        tracing::info!("Refresh token revoked");
        Ok(())
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        self.users.find_by_id(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.users.list_all().await
    }
}
