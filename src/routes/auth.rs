/// Authentication Routes
///
/// Sign-up, sign-in (by email or login), token refresh, sign-out and access
/// token validation. All token logic lives in `TokenAuthority`; handlers only
/// unpack requests and shape responses.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{TokenAuthority, TokenStatus};
use crate::error::{AppError, ErrorContext, ValidationError};

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub login: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct EmailSignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginSignInRequest {
    pub login: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Deserialize)]
pub struct ValidateRequest {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct SignUpResponse {
    pub id: i64,
}

#[derive(Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }
    Ok(value)
}

/// Turn a rejected refresh token into a 401 carrying the reason
fn ensure_valid(status: TokenStatus) -> Result<(), AppError> {
    match status {
        TokenStatus::Valid => Ok(()),
        TokenStatus::Rejected(kind) => Err(AppError::Auth(kind)),
    }
}

/// POST /sign-up
///
/// # Errors
/// - 400: Empty login, email or password
/// - 409: Login or email already registered
/// - 500: Storage failure
pub async fn sign_up(
    form: web::Json<SignUpRequest>,
    authority: web::Data<TokenAuthority>,
) -> Result<HttpResponse, AppError> {
    let login = require("login", &form.login)?;
    let email = require("email", &form.email)?;
    let password = require("password", &form.password)?;

    let id = authority.create_user(login, email, password).await?;

    Ok(HttpResponse::Created().json(SignUpResponse { id }))
}

/// POST /sign-in-email
///
/// # Errors
/// - 400: Empty email or password
/// - 401: No user matches the email and password
pub async fn sign_in_email(
    form: web::Json<EmailSignInRequest>,
    authority: web::Data<TokenAuthority>,
) -> Result<HttpResponse, AppError> {
    let email = require("email", &form.email)?;
    let password = require("password", &form.password)?;

    let tokens = authority.authenticate_by_email(email, password).await?;
    Ok(HttpResponse::Ok().json(tokens))
}

/// POST /sign-in-login
///
/// # Errors
/// - 400: Empty login or password
/// - 401: No user matches the login and password
pub async fn sign_in_login(
    form: web::Json<LoginSignInRequest>,
    authority: web::Data<TokenAuthority>,
) -> Result<HttpResponse, AppError> {
    let login = require("login", &form.login)?;
    let password = require("password", &form.password)?;

    let tokens = authority.authenticate_by_login(login, password).await?;
    Ok(HttpResponse::Ok().json(tokens))
}

/// POST /refresh
///
/// Validates the refresh token (revocation, signature, expiry) and issues a
/// new access token. The refresh token is not rotated.
///
/// # Errors
/// - 401: Revoked, expired or invalid refresh token
/// - 500: Revocation store failure
pub async fn refresh(
    form: web::Json<RefreshTokenRequest>,
    authority: web::Data<TokenAuthority>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");
    let token = require("refresh_token", &form.refresh_token)?;

    ensure_valid(authority.validate_refresh_token(token).await?)?;
    let access_token = authority.refresh_access_token(token).await?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        "Token refreshed successfully"
    );
    Ok(HttpResponse::Ok().json(AccessTokenResponse { access_token }))
}

/// POST /sign-out
///
/// Only a currently valid refresh token can be signed out.
///
/// # Errors
/// - 401: Revoked, expired or invalid refresh token
/// - 500: Revocation store failure
pub async fn sign_out(
    form: web::Json<RefreshTokenRequest>,
    authority: web::Data<TokenAuthority>,
) -> Result<HttpResponse, AppError> {
    let token = require("refresh_token", &form.refresh_token)?;

    ensure_valid(authority.validate_refresh_token(token).await?)?;
    authority.sign_out(token).await?;

    Ok(HttpResponse::Ok().finish())
}

/// POST /validate
///
/// Always 200 for a well-formed request; the body says whether the access
/// token is valid and, if not, why.
pub async fn validate(
    form: web::Json<ValidateRequest>,
    authority: web::Data<TokenAuthority>,
) -> Result<HttpResponse, AppError> {
    let token = require("access_token", &form.access_token)?;
    let status = authority.validate_access_token(token);

    Ok(HttpResponse::Ok().json(ValidateResponse {
        is_valid: status.is_valid(),
        error: status.reason().map(|kind| kind.to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;

    #[test]
    fn test_require_rejects_blank() {
        assert_eq!(
            require("login", "   "),
            Err(ValidationError::EmptyField("login".to_string()))
        );
        assert_eq!(require("login", "alice"), Ok("alice"));
    }

    #[test]
    fn test_ensure_valid() {
        assert!(ensure_valid(TokenStatus::Valid).is_ok());

        let err = ensure_valid(TokenStatus::Rejected(AuthError::TokenExpired)).unwrap_err();
        assert_eq!(err.auth_kind(), Some(AuthError::TokenExpired));
    }
}
