//! Endpoints for a user managing their own account.

use axum::{Extension, extract::State, response::Response};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::DbState,
    db::lock_connection,
    extract::{ApiJson, ApiQuery},
    response::{no_content, success},
    user::{
        Name, NotifySetting, NotifyType, User, UserID, Username, get_user_by_id, update_name,
        update_notify_setting, update_username,
    },
    validation::FieldErrors,
};

/// The account details shown to the user themselves.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserProfile {
    id: i64,
    username: String,
    name: String,
    notify_setting: NotifySetting,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_i64(),
            username: user.username.to_string(),
            name: user.name.as_ref().to_owned(),
            notify_setting: user.notify_setting,
        }
    }
}

#[derive(Debug, Serialize)]
struct UserProfileResponse {
    user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UsernameRequest {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct NotifyQuery {
    #[serde(rename = "type")]
    pub notify_type: NotifyType,
}

/// The notification flag that was changed. Unchanged flags are left out.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotifySettingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    account_book_notify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    feed_notify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chat_notify: Option<bool>,
}

impl NotifySettingUpdate {
    fn of(notify_type: NotifyType, enabled: bool) -> Self {
        match notify_type {
            NotifyType::AccountBook => Self {
                account_book_notify: Some(enabled),
                ..Default::default()
            },
            NotifyType::Feed => Self {
                feed_notify: Some(enabled),
                ..Default::default()
            },
            NotifyType::Chat => Self {
                chat_notify: Some(enabled),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotifySettingResponse {
    notify_setting: NotifySettingUpdate,
}

/// Get the account of the signed in user.
pub async fn get_my_account_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let user = get_user_by_id(user_id, &connection)?;

    Ok(success(UserProfileResponse { user: user.into() }))
}

/// Change the display name of the signed in user.
pub async fn update_name_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(request): ApiJson<NameRequest>,
) -> Result<Response, Error> {
    let name = FieldErrors::single("name", Name::new(&request.name))?;

    let connection = lock_connection(&state.db_connection)?;
    update_name(user_id, &name, &connection)?;
    tracing::info!("User {user_id} changed their name");

    Ok(no_content())
}

/// Change the username of the signed in user.
pub async fn update_username_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(request): ApiJson<UsernameRequest>,
) -> Result<Response, Error> {
    let username = FieldErrors::single("username", Username::new(&request.username))?;

    let connection = lock_connection(&state.db_connection)?;
    update_username(user_id, &username, &connection)?;
    tracing::info!("User {user_id} changed their username to {username}");

    Ok(no_content())
}

/// Turn a kind of notification on for the signed in user.
pub async fn turn_on_notification_endpoint(
    state: State<DbState>,
    user_id: Extension<UserID>,
    query: ApiQuery<NotifyQuery>,
) -> Result<Response, Error> {
    set_notification(state, user_id, query, true).await
}

/// Turn a kind of notification off for the signed in user.
pub async fn turn_off_notification_endpoint(
    state: State<DbState>,
    user_id: Extension<UserID>,
    query: ApiQuery<NotifyQuery>,
) -> Result<Response, Error> {
    set_notification(state, user_id, query, false).await
}

async fn set_notification(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<NotifyQuery>,
    enabled: bool,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    update_notify_setting(user_id, query.notify_type, enabled, &connection)?;

    Ok(success(NotifySettingResponse {
        notify_setting: NotifySettingUpdate::of(query.notify_type, enabled),
    }))
}

#[cfg(test)]
mod account_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::{
        Error,
        app_state::DbState,
        extract::{ApiJson, ApiQuery},
        test_utils::{assert_error_body, get_test_connection, insert_test_user, parse_json_body},
        user::{NotifyType, UserError, UserID, get_user_by_id},
    };

    use super::{
        NameRequest, NotifyQuery, UsernameRequest, get_my_account_endpoint,
        turn_off_notification_endpoint, turn_on_notification_endpoint, update_name_endpoint,
        update_username_endpoint,
    };

    fn get_state() -> (DbState, UserID) {
        let connection = get_test_connection();
        let user = insert_test_user("pennyway", &connection);

        let state = DbState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, user.id)
    }

    #[tokio::test]
    async fn get_my_account_returns_profile() {
        let (state, user_id) = get_state();

        let response = get_my_account_endpoint(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(
            body["data"]["user"],
            json!({
                "id": user_id.as_i64(),
                "username": "pennyway",
                "name": "페니웨이",
                "notifySetting": {
                    "accountBookNotify": true,
                    "feedNotify": true,
                    "chatNotify": true
                }
            })
        );
    }

    #[tokio::test]
    async fn get_my_account_fails_for_missing_user() {
        let (state, _) = get_state();

        let result = get_my_account_endpoint(State(state), Extension(UserID::new(999))).await;

        assert_eq!(result.unwrap_err(), Error::User(UserError::NotFound));
    }

    #[tokio::test]
    async fn update_name_rejects_invalid_name() {
        let (state, user_id) = get_state();
        let request = NameRequest {
            name: "Penny Way!".to_owned(),
        };

        let error = update_name_endpoint(State(state), Extension(user_id), ApiJson(request))
            .await
            .unwrap_err();

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = parse_json_body(response).await;
        assert_eq!(
            body["fieldErrors"]["name"],
            "2~8자의 한글, 영문 소문자만 사용 가능합니다."
        );
    }

    #[tokio::test]
    async fn update_name_succeeds() {
        let (state, user_id) = get_state();
        let request = NameRequest {
            name: "양재서".to_owned(),
        };

        let response =
            update_name_endpoint(State(state.clone()), Extension(user_id), ApiJson(request))
                .await
                .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let user = get_user_by_id(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(user.name.as_ref(), "양재서");
    }

    #[tokio::test]
    async fn update_username_to_taken_username_is_conflict() {
        let (state, user_id) = get_state();
        insert_test_user("takenname", &state.db_connection.lock().unwrap());
        let request = UsernameRequest {
            username: "takenname".to_owned(),
        };

        let error = update_username_endpoint(State(state), Extension(user_id), ApiJson(request))
            .await
            .unwrap_err();

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = parse_json_body(response).await;
        assert_error_body(&body, "4090", "이미 존재하는 아이디입니다.");
    }

    #[tokio::test]
    async fn notification_toggle_reports_only_changed_flag() {
        let (state, user_id) = get_state();

        let response = turn_off_notification_endpoint(
            State(state.clone()),
            Extension(user_id),
            ApiQuery(NotifyQuery {
                notify_type: NotifyType::Feed,
            }),
        )
        .await
        .unwrap();

        let body = parse_json_body(response).await;
        assert_eq!(body["data"], json!({"notifySetting": {"feedNotify": false}}));

        let response = turn_on_notification_endpoint(
            State(state.clone()),
            Extension(user_id),
            ApiQuery(NotifyQuery {
                notify_type: NotifyType::Feed,
            }),
        )
        .await
        .unwrap();

        let body = parse_json_body(response).await;
        assert_eq!(body["data"], json!({"notifySetting": {"feedNotify": true}}));
        let user = get_user_by_id(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert!(user.notify_setting.feed_notify);
    }
}
