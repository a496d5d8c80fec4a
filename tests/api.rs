use std::net::TcpListener;
use std::sync::Arc;

use auth_service::auth::TokenAuthority;
use auth_service::configuration::AuthSettings;
use auth_service::repository::{InMemoryRevocationStore, InMemoryUserRepository};
use auth_service::startup::run;
use serde_json::{json, Value};

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(&format!("{}{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    async fn sign_up_alice(&self) -> i64 {
        let response = self
            .post(
                "/sign-up",
                &json!({"login": "alice", "email": "a@x.com", "password": "pw1"}),
            )
            .await;
        assert_eq!(201, response.status().as_u16());
        let body: Value = response.json().await.expect("Failed to parse response");
        body["id"].as_i64().expect("id missing")
    }

    async fn sign_in_alice(&self) -> Value {
        let response = self
            .post("/sign-in-login", &json!({"login": "alice", "password": "pw1"}))
            .await;
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }
}

fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let authority = TokenAuthority::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryRevocationStore::new()),
        AuthSettings {
            access_token_secret: "access-secret".to_string(),
            refresh_token_secret: "refresh-secret".to_string(),
            password_secret: "password-secret".to_string(),
            access_token_ttl: 900,
            refresh_token_ttl: 604800,
        },
    )
    .expect("Failed to build authority");

    let server = run(listener, authority).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        client: reqwest::Client::new(),
    }
}

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app();

    let response = app
        .client
        .get(&format!("{}/health_check", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
}

// --- Sign-up ---

#[tokio::test]
async fn sign_up_returns_201_with_id() {
    let app = spawn_app();
    assert_eq!(app.sign_up_alice().await, 1);
}

#[tokio::test]
async fn sign_up_returns_409_for_duplicate_login() {
    let app = spawn_app();
    app.sign_up_alice().await;

    let response = app
        .post(
            "/sign-up",
            &json!({"login": "alice", "email": "other@x.com", "password": "pw2"}),
        )
        .await;

    assert_eq!(409, response.status().as_u16());
}

#[tokio::test]
async fn sign_up_returns_400_for_empty_fields() {
    let app = spawn_app();

    let cases = vec![
        (json!({"login": "", "email": "a@x.com", "password": "pw1"}), "empty login"),
        (json!({"login": "alice", "email": " ", "password": "pw1"}), "blank email"),
        (json!({"login": "alice", "email": "a@x.com", "password": ""}), "empty password"),
    ];

    for (body, reason) in cases {
        let response = app.post("/sign-up", &body).await;
        assert_eq!(400, response.status().as_u16(), "Should reject {}", reason);
    }
}

// --- Sign-in ---

#[tokio::test]
async fn sign_in_returns_token_pair() {
    let app = spawn_app();
    app.sign_up_alice().await;

    let by_login = app.sign_in_alice().await;
    assert!(by_login["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(by_login["refresh_token"].as_str().is_some_and(|t| !t.is_empty()));

    let response = app
        .post("/sign-in-email", &json!({"email": "a@x.com", "password": "pw1"}))
        .await;
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn sign_in_returns_401_for_wrong_password() {
    let app = spawn_app();
    app.sign_up_alice().await;

    let response = app
        .post("/sign-in-login", &json!({"login": "alice", "password": "wrong"}))
        .await;
    assert_eq!(401, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

// --- Refresh / sign-out / validate ---

#[tokio::test]
async fn refresh_returns_new_valid_access_token() {
    let app = spawn_app();
    app.sign_up_alice().await;
    let tokens = app.sign_in_alice().await;

    let response = app
        .post("/refresh", &json!({"refresh_token": tokens["refresh_token"]}))
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");

    let response = app
        .post("/validate", &json!({"access_token": body["access_token"]}))
        .await;
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["is_valid"], true);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn refresh_returns_401_after_sign_out() {
    let app = spawn_app();
    app.sign_up_alice().await;
    let tokens = app.sign_in_alice().await;
    let refresh = json!({"refresh_token": tokens["refresh_token"]});

    let response = app.post("/sign-out", &refresh).await;
    assert_eq!(200, response.status().as_u16());

    let response = app.post("/refresh", &refresh).await;
    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "TOKEN_REVOKED");

    // signing out twice is rejected too
    let response = app.post("/sign-out", &refresh).await;
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn sign_out_returns_401_for_garbage_token() {
    let app = spawn_app();

    let response = app
        .post("/sign-out", &json!({"refresh_token": "not.a.token"}))
        .await;
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn validate_reports_invalid_tokens() {
    let app = spawn_app();
    app.sign_up_alice().await;
    let tokens = app.sign_in_alice().await;

    // a refresh token is signed with the refresh secret, not the access one
    let response = app
        .post("/validate", &json!({"access_token": tokens["refresh_token"]}))
        .await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["is_valid"], false);
    assert_eq!(body["error"], "Invalid token");
}

// --- Users ---

#[tokio::test]
async fn users_endpoint_never_exposes_password_hash() {
    let app = spawn_app();
    let id = app.sign_up_alice().await;

    let response = app
        .client
        .get(&format!("{}/users", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    let users: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(users.as_array().map(Vec::len), Some(1));
    assert!(users[0].get("password_hash").is_none());

    let response = app
        .client
        .get(&format!("{}/users?id={}", &app.address, id))
        .send()
        .await
        .expect("Failed to execute request.");
    let user: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(user["login"], "alice");
    assert_eq!(user["email"], "a@x.com");
}

#[tokio::test]
async fn users_endpoint_rejects_bad_or_unknown_id() {
    let app = spawn_app();

    let response = app
        .client
        .get(&format!("{}/users?id=abc", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(400, response.status().as_u16());

    let response = app
        .client
        .get(&format!("{}/users?id=42", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, response.status().as_u16());
}
