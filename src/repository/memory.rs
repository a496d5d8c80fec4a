//! In-memory stores for tests and local runs without PostgreSQL.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{AppError, DatabaseError};
use crate::models::User;

use super::{RevocationStore, UserRepository};

/// User store keyed by id, enforcing unique login and email like the
/// `users` table does
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<BTreeMap<i64, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(
        &self,
        login: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<i64, AppError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.login == login) {
            return Err(
                DatabaseError::UniqueConstraintViolation("users_login_key".to_string()).into(),
            );
        }
        if users.values().any(|u| u.email == email) {
            return Err(
                DatabaseError::UniqueConstraintViolation("users_email_key".to_string()).into(),
            );
        }

        let id = users.keys().next_back().map_or(1, |last| last + 1);
        users.insert(
            id,
            User {
                id,
                login: login.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
            },
        );

        Ok(id)
    }

    async fn find_by_email(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email == email && u.password_hash == password_hash)
            .cloned())
    }

    async fn find_by_login(
        &self,
        login: &str,
        password_hash: &str,
    ) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.login == login && u.password_hash == password_hash)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.read().await.values().cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemoryRevocationStore {
    tokens: RwLock<HashSet<String>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn record(&self, token: &str) -> Result<(), AppError> {
        self.tokens.write().await.insert(token.to_string());
        Ok(())
    }

    async fn is_recorded(&self, token: &str) -> Result<bool, AppError> {
        Ok(self.tokens.read().await.contains(token))
    }

    async fn forget(&self, token: &str) -> Result<(), AppError> {
        self.tokens.write().await.remove(token);
        Ok(())
    }
}
