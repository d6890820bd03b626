//! Sign-up, sign-in and sign-out handlers.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::Response,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{invalidate_auth_cookie, set_auth_cookie},
    db::lock_connection,
    extract::ApiJson,
    password::{PasswordHash, ValidatedPassword},
    response::{no_content, success},
    user::{Name, UserError, Username, create_user, get_user_by_username},
    validation::FieldErrors,
};

/// The state needed to start and end sessions.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SessionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SessionState> for Key {
    fn from_ref(state: &SessionState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

/// The credentials entered at sign-in.
///
/// The password is not validated here since it is only compared against the stored hash.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
struct SignedInUser {
    id: i64,
}

#[derive(Debug, Serialize)]
struct SignedInResponse {
    user: SignedInUser,
}

/// Create an account and sign the new user in.
pub async fn sign_up_endpoint(
    State(state): State<SessionState>,
    jar: PrivateCookieJar,
    ApiJson(request): ApiJson<SignUpRequest>,
) -> Result<(PrivateCookieJar, Response), Error> {
    let mut field_errors = FieldErrors::new();
    let username = field_errors.check("username", Username::new(&request.username));
    let name = field_errors.check("name", Name::new(&request.name));
    let password = field_errors.check("password", ValidatedPassword::new(&request.password));

    let (Some(username), Some(name), Some(password)) = (username, name, password) else {
        return Err(Error::InvalidFields(field_errors));
    };

    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;

    let user = {
        let connection = lock_connection(&state.db_connection)?;
        create_user(username, name, password_hash, &connection)?
    };
    tracing::info!("User {} signed up as {}", user.id, user.username);

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((
        jar,
        success(SignedInResponse {
            user: SignedInUser {
                id: user.id.as_i64(),
            },
        }),
    ))
}

/// Check the credentials and set the auth cookies.
///
/// # Errors
///
/// Returns [UserError::InvalidCredentials] if the username is unknown or the
/// password is wrong, so clients cannot tell the two apart.
pub async fn sign_in_endpoint(
    State(state): State<SessionState>,
    jar: PrivateCookieJar,
    ApiJson(request): ApiJson<SignInRequest>,
) -> Result<(PrivateCookieJar, Response), Error> {
    let user = {
        let connection = lock_connection(&state.db_connection)?;
        get_user_by_username(&request.username, &connection).map_err(|error| match error {
            Error::User(UserError::NotFound) => UserError::InvalidCredentials.into(),
            error => error,
        })?
    };

    let is_password_valid = user
        .password_hash
        .verify(&request.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !is_password_valid {
        tracing::debug!("Wrong password for user {}", user.id);
        return Err(UserError::InvalidCredentials.into());
    }

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((
        jar,
        success(SignedInResponse {
            user: SignedInUser {
                id: user.id.as_i64(),
            },
        }),
    ))
}

/// Clear the auth cookies.
pub async fn sign_out_endpoint(jar: PrivateCookieJar) -> (PrivateCookieJar, Response) {
    (invalidate_auth_cookie(jar), no_content())
}

#[cfg(test)]
mod session_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState,
        auth::cookie::{COOKIE_EXPIRY, COOKIE_USER_ID},
        test_utils::assert_error_body,
    };

    use super::{sign_in_endpoint, sign_out_endpoint, sign_up_endpoint};

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(connection, "foobar").expect("Could not create app state.");

        let app = Router::new()
            .route("/sign-up", post(sign_up_endpoint))
            .route("/sign-in", post(sign_in_endpoint))
            .route("/sign-out", post(sign_out_endpoint))
            .with_state(state);

        TestServer::new(app)
    }

    async fn sign_up(server: &TestServer) {
        server
            .post("/sign-up")
            .json(&json!({
                "username": "pennyway",
                "name": "페니웨이",
                "password": "pennyway123"
            }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn sign_up_sets_auth_cookies() {
        let server = get_test_server();

        let response = server
            .post("/sign-up")
            .json(&json!({
                "username": "pennyway",
                "name": "페니웨이",
                "password": "pennyway123"
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["code"], "2000");
        assert!(body["data"]["user"]["id"].as_i64().is_some());
        response.cookie(COOKIE_USER_ID);
        response.cookie(COOKIE_EXPIRY);
    }

    #[tokio::test]
    async fn sign_up_reports_invalid_fields() {
        let server = get_test_server();

        let response = server
            .post("/sign-up")
            .json(&json!({
                "username": "P",
                "name": "페니웨이",
                "password": "short"
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<Value>();
        assert_eq!(body["code"], "4221");
        assert!(body["fieldErrors"]["username"].is_string());
        assert_eq!(
            body["fieldErrors"]["password"],
            "비밀번호는 8~16자의 영문과 숫자를 모두 포함해야 합니다."
        );
        assert!(body["fieldErrors"]["name"].is_null());
    }

    #[tokio::test]
    async fn sign_up_with_taken_username_is_conflict() {
        let server = get_test_server();
        sign_up(&server).await;

        let response = server
            .post("/sign-up")
            .json(&json!({
                "username": "pennyway",
                "name": "다른사람",
                "password": "another123"
            }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        assert_error_body(&response.json::<Value>(), "4090", "이미 존재하는 아이디입니다.");
    }

    #[tokio::test]
    async fn sign_in_succeeds_with_valid_credentials() {
        let server = get_test_server();
        sign_up(&server).await;

        let response = server
            .post("/sign-in")
            .json(&json!({"username": "pennyway", "password": "pennyway123"}))
            .await;

        response.assert_status_ok();
        response.cookie(COOKIE_USER_ID);
    }

    #[tokio::test]
    async fn sign_in_fails_with_wrong_password_or_unknown_user() {
        let server = get_test_server();
        sign_up(&server).await;

        for credentials in [
            json!({"username": "pennyway", "password": "wrongpass123"}),
            json!({"username": "nobody", "password": "pennyway123"}),
        ] {
            let response = server.post("/sign-in").json(&credentials).await;

            response.assert_status(StatusCode::UNAUTHORIZED);
            assert_error_body(
                &response.json::<Value>(),
                "4010",
                "아이디 또는 비밀번호가 일치하지 않습니다.",
            );
        }
    }

    #[tokio::test]
    async fn sign_in_without_body_is_type_mismatch() {
        let server = get_test_server();

        let response = server
            .post("/sign-in")
            .content_type("application/json")
            .text("not json")
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["code"], "4220");
    }

    #[tokio::test]
    async fn sign_out_clears_cookies() {
        let server = get_test_server();

        let response = server.post("/sign-out").await;

        response.assert_status_ok();
        let cookie = response.cookie(COOKIE_USER_ID);
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert_eq!(cookie.expires_datetime(), Some(time::OffsetDateTime::UNIX_EPOCH));
    }
}
