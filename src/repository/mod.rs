//! Storage seams used by the token authority.
//!
//! Both stores are traits so the PostgreSQL implementations can be swapped
//! for the in-memory ones in tests.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::User;

mod memory;
mod postgres;

pub use memory::{InMemoryRevocationStore, InMemoryUserRepository};
pub use postgres::{PgRevocationStore, PgUserRepository};

/// External user store
///
/// Credential lookups match on the pre-hashed password. A missing user is
/// `Ok(None)`; `Err` is reserved for storage failures.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return the id assigned by storage
    ///
    /// Uniqueness of `login` and `email` is enforced here, surfacing as
    /// `DatabaseError::UniqueConstraintViolation`.
    async fn create_user(&self, login: &str, email: &str, password_hash: &str)
        -> Result<i64, AppError>;

    async fn find_by_email(&self, email: &str, password_hash: &str)
        -> Result<Option<User>, AppError>;

    async fn find_by_login(&self, login: &str, password_hash: &str)
        -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn list_all(&self) -> Result<Vec<User>, AppError>;
}

/// Persisted set of refresh tokens that must be rejected
///
/// A token that has been recorded and not yet forgotten reports `true` from
/// `is_recorded`. Recording twice and forgetting an absent token are both Ok.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    async fn record(&self, token: &str) -> Result<(), AppError>;

    async fn is_recorded(&self, token: &str) -> Result<bool, AppError>;

    async fn forget(&self, token: &str) -> Result<(), AppError>;
}
