use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::TokenAuthority;
use crate::error::{AppError, DatabaseError, ValidationError};
use crate::models::User;

#[derive(Deserialize)]
pub struct UsersQuery {
    pub id: Option<String>,
}

/// Public view of a user; the password hash never leaves the service
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub login: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            login: user.login,
            email: user.email,
        }
    }
}

/// GET /users and GET /users?id=N
///
/// # Errors
/// - 400: `id` is not an integer
/// - 404: No user with that id
pub async fn get_users(
    query: web::Query<UsersQuery>,
    authority: web::Data<TokenAuthority>,
) -> Result<HttpResponse, AppError> {
    let Some(raw_id) = query.id.as_deref() else {
        let users: Vec<UserResponse> = authority
            .list_users()
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect();
        return Ok(HttpResponse::Ok().json(users));
    };

    let id = raw_id
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat("id".to_string()))?;

    let user = authority
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
