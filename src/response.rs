//! The JSON envelope for successful responses.
//!
//! Successful responses look like `{"code": "2000", "data": {...}}`, which
//! mirrors the `{code, message}` shape of error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

/// The reason code sent with every successful response.
pub const SUCCESS_CODE: &str = "2000";

#[derive(Debug, Serialize)]
struct SuccessBody<T> {
    code: &'static str,
    data: T,
}

/// Respond with 200 OK and `data` wrapped in the success envelope.
pub fn success<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(SuccessBody {
            code: SUCCESS_CODE,
            data,
        }),
    )
        .into_response()
}

/// Respond with 200 OK and an empty `data` object.
pub fn no_content() -> Response {
    success(Value::Object(Map::new()))
}
