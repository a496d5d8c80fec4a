/// Domain models shared by the token authority, the repositories and the routes.

use serde::Serialize;

/// A registered user as read back from the user store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub password_hash: String,
}

/// Tokens handed out on successful sign-in
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthTokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
