use axum::{Extension, extract::State, response::Response};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::DbState,
    db::lock_connection,
    device::{Device, DeviceInfo, DeviceToken, delete_device, register_device},
    extract::{ApiJson, ApiQuery},
    response::{no_content, success},
    user::UserID,
    validation::FieldErrors,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRequest {
    #[serde(default)]
    pub origin_token: String,
    #[serde(default)]
    pub new_token: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub os: String,
}

#[derive(Debug, Deserialize)]
pub struct DeviceTokenQuery {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize)]
struct DeviceResponse {
    device: Device,
}

/// Register or refresh a push token for the signed in user.
pub async fn put_device_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(request): ApiJson<DeviceRequest>,
) -> Result<Response, Error> {
    let mut field_errors = FieldErrors::new();
    let origin_token = field_errors.check("originToken", DeviceToken::new(&request.origin_token));
    let new_token = field_errors.check("newToken", DeviceToken::new(&request.new_token));
    if request.model.trim().is_empty() {
        field_errors.add("model", "모델명은 필수입니다.");
    }
    if request.os.trim().is_empty() {
        field_errors.add("os", "OS는 필수입니다.");
    }

    let (Some(origin_token), Some(new_token)) = (origin_token, new_token) else {
        return Err(Error::InvalidFields(field_errors));
    };
    let info = field_errors.into_result(DeviceInfo {
        model: request.model,
        os: request.os,
    })?;

    let mut connection = lock_connection(&state.db_connection)?;
    let device = register_device(user_id, &origin_token, &new_token, &info, &mut connection)?;

    Ok(success(DeviceResponse { device }))
}

/// Remove one of the signed in user's push tokens.
pub async fn delete_device_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<DeviceTokenQuery>,
) -> Result<Response, Error> {
    let token = FieldErrors::single("token", DeviceToken::new(&query.token))?;

    let connection = lock_connection(&state.db_connection)?;
    delete_device(user_id, &token, &connection)?;
    tracing::info!("User {user_id} removed a device");

    Ok(no_content())
}
