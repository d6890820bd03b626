//! Translates app errors into the `(status, reason, message)` triples sent to clients.
//!
//! Every error response has the JSON shape `{"code": "4040", "message": "..."}`
//! where `code` is the four digit reason code. Field validation failures also
//! include a `fieldErrors` object.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    Error, device::DeviceError, spending::SpendingError, target_amount::TargetAmountError,
    user::UserError, validation::FieldErrors,
};

/// A stable, machine readable reason for a failed request.
///
/// The numeric code is the HTTP status followed by one digit that tells
/// apart reasons sharing a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    InvalidRequest,
    MissingOrInvalidAuthenticationCredentials,
    AccessToTheRequestedResourceIsForbidden,
    RequestedResourceNotFound,
    ResourceAlreadyExists,
    TypeMismatchErrorInRequestBody,
    InvalidFieldValue,
    UnexpectedError,
}

impl ReasonCode {
    pub const fn code(&self) -> u16 {
        match self {
            ReasonCode::InvalidRequest => 4000,
            ReasonCode::MissingOrInvalidAuthenticationCredentials => 4010,
            ReasonCode::AccessToTheRequestedResourceIsForbidden => 4030,
            ReasonCode::RequestedResourceNotFound => 4040,
            ReasonCode::ResourceAlreadyExists => 4090,
            ReasonCode::TypeMismatchErrorInRequestBody => 4220,
            ReasonCode::InvalidFieldValue => 4221,
            ReasonCode::UnexpectedError => 5000,
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            ReasonCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ReasonCode::MissingOrInvalidAuthenticationCredentials => StatusCode::UNAUTHORIZED,
            ReasonCode::AccessToTheRequestedResourceIsForbidden => StatusCode::FORBIDDEN,
            ReasonCode::RequestedResourceNotFound => StatusCode::NOT_FOUND,
            ReasonCode::ResourceAlreadyExists => StatusCode::CONFLICT,
            ReasonCode::TypeMismatchErrorInRequestBody | ReasonCode::InvalidFieldValue => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ReasonCode::UnexpectedError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The wire-level description of one kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    pub status: StatusCode,
    pub reason: ReasonCode,
    pub message: &'static str,
}

impl ErrorCode {
    const fn new(reason: ReasonCode, message: &'static str) -> Self {
        Self {
            status: reason.status(),
            reason,
            message,
        }
    }
}

pub const UNAUTHENTICATED: ErrorCode = ErrorCode::new(
    ReasonCode::MissingOrInvalidAuthenticationCredentials,
    "인증 정보가 유효하지 않습니다.",
);
pub const NOT_FOUND: ErrorCode = ErrorCode::new(
    ReasonCode::RequestedResourceNotFound,
    "요청한 리소스를 찾을 수 없습니다.",
);
pub const INVALID_FIELDS: ErrorCode =
    ErrorCode::new(ReasonCode::InvalidFieldValue, "요청 값이 올바르지 않습니다.");
pub const INVALID_REQUEST_BODY: ErrorCode = ErrorCode::new(
    ReasonCode::TypeMismatchErrorInRequestBody,
    "요청 본문의 형식이 올바르지 않습니다.",
);
pub const INVALID_QUERY: ErrorCode =
    ErrorCode::new(ReasonCode::InvalidRequest, "요청 파라미터가 올바르지 않습니다.");
pub const INTERNAL_SERVER_ERROR: ErrorCode = ErrorCode::new(
    ReasonCode::UnexpectedError,
    "예기치 못한 서버 오류가 발생했습니다.",
);

pub const NOT_FOUND_CUSTOM_CATEGORY: ErrorCode = ErrorCode::new(
    ReasonCode::RequestedResourceNotFound,
    "존재하지 않는 사용자 정의 카테고리입니다.",
);
pub const FORBIDDEN_CUSTOM_CATEGORY: ErrorCode = ErrorCode::new(
    ReasonCode::AccessToTheRequestedResourceIsForbidden,
    "해당 사용자 정의 카테고리에 접근할 권한이 없습니다.",
);
pub const NOT_FOUND_SPENDING: ErrorCode = ErrorCode::new(
    ReasonCode::RequestedResourceNotFound,
    "존재하지 않는 지출 내역입니다.",
);
pub const FORBIDDEN_SPENDING: ErrorCode = ErrorCode::new(
    ReasonCode::AccessToTheRequestedResourceIsForbidden,
    "해당 지출 내역에 접근할 권한이 없습니다.",
);

pub const NOT_FOUND_DEVICE: ErrorCode = ErrorCode::new(
    ReasonCode::RequestedResourceNotFound,
    "디바이스를 찾을 수 없습니다.",
);

pub const NOT_FOUND_USER: ErrorCode =
    ErrorCode::new(ReasonCode::RequestedResourceNotFound, "유저를 찾을 수 없습니다.");
pub const ALREADY_EXIST_USERNAME: ErrorCode =
    ErrorCode::new(ReasonCode::ResourceAlreadyExists, "이미 존재하는 아이디입니다.");
pub const NOT_MATCHED_CREDENTIALS: ErrorCode = ErrorCode::new(
    ReasonCode::MissingOrInvalidAuthenticationCredentials,
    "아이디 또는 비밀번호가 일치하지 않습니다.",
);

pub const NOT_FOUND_TARGET_AMOUNT: ErrorCode = ErrorCode::new(
    ReasonCode::RequestedResourceNotFound,
    "목표 금액을 찾을 수 없습니다.",
);

/// Map an app error to the error code that is reported to the client.
pub fn error_code(error: &Error) -> ErrorCode {
    match error {
        Error::Spending(SpendingError::CustomCategoryNotFound) => NOT_FOUND_CUSTOM_CATEGORY,
        Error::Spending(SpendingError::CustomCategoryForbidden) => FORBIDDEN_CUSTOM_CATEGORY,
        Error::Spending(SpendingError::SpendingNotFound) => NOT_FOUND_SPENDING,
        Error::Spending(SpendingError::SpendingForbidden) => FORBIDDEN_SPENDING,
        Error::Spending(SpendingError::TotalOverflow) => INTERNAL_SERVER_ERROR,
        Error::Device(DeviceError::NotFound) => NOT_FOUND_DEVICE,
        Error::User(UserError::NotFound) => NOT_FOUND_USER,
        Error::User(UserError::DuplicateUsername) => ALREADY_EXIST_USERNAME,
        Error::User(UserError::InvalidCredentials) => NOT_MATCHED_CREDENTIALS,
        Error::TargetAmount(TargetAmountError::NotFound) => NOT_FOUND_TARGET_AMOUNT,
        Error::InvalidFields(_) => INVALID_FIELDS,
        Error::InvalidRequestBody(_) => INVALID_REQUEST_BODY,
        Error::InvalidQuery(_) => INVALID_QUERY,
        Error::Unauthenticated => UNAUTHENTICATED,
        Error::NotFound => NOT_FOUND,
        Error::HashingError(_)
        | Error::InvalidDateFormat(_)
        | Error::DatabaseLockError
        | Error::SqlError(_) => INTERNAL_SERVER_ERROR,
    }
}

/// The JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub code: String,
    pub message: &'a str,
    #[serde(rename = "fieldErrors", skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<&'a FieldErrors>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let error_code = error_code(&self);

        if error_code.status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        } else {
            tracing::debug!("Rejecting request: {}", self);
        }

        let field_errors = match &self {
            Error::InvalidFields(field_errors) => Some(field_errors),
            _ => None,
        };

        let body = ErrorBody {
            code: error_code.reason.code().to_string(),
            message: error_code.message,
            field_errors,
        };

        (error_code.status, Json(body)).into_response()
    }
}
