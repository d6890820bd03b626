use axum::{Extension, extract::State, response::Response};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::DbState,
    db::lock_connection,
    extract::{ApiJson, ApiQuery},
    response::success,
    target_amount::{TargetAmount, get_target_amount, save_target_amount},
    user::UserID,
    validation::FieldErrors,
};

#[derive(Debug, Deserialize)]
pub struct TargetAmountRequest {
    pub year: i32,
    pub month: u8,
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct TargetAmountQuery {
    pub year: i32,
    pub month: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TargetAmountResponse {
    target_amount: TargetAmount,
}

/// Set the signed in user's target amount for a month.
pub async fn put_target_amount_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(request): ApiJson<TargetAmountRequest>,
) -> Result<Response, Error> {
    let mut field_errors = FieldErrors::new();
    if !(1..=12).contains(&request.month) {
        field_errors.add("month", "월은 1~12 사이로 입력해주세요");
    }
    if request.amount < 0 {
        field_errors.add("amount", "목표 금액은 0 이상이어야 합니다.");
    }
    let request = field_errors.into_result(request)?;

    let connection = lock_connection(&state.db_connection)?;
    let target_amount = save_target_amount(
        user_id,
        request.year,
        request.month,
        request.amount,
        &connection,
    )?;

    Ok(success(TargetAmountResponse { target_amount }))
}

/// Get the signed in user's target amount for a month.
pub async fn get_target_amount_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<TargetAmountQuery>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let target_amount = get_target_amount(user_id, query.year, query.month, &connection)?;

    Ok(success(TargetAmountResponse { target_amount }))
}

#[cfg(test)]
mod target_amount_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::{
        app_state::DbState,
        extract::{ApiJson, ApiQuery},
        test_utils::{assert_error_body, get_test_connection, insert_test_user, parse_json_body},
        user::UserID,
    };

    use super::{
        TargetAmountQuery, TargetAmountRequest, get_target_amount_endpoint,
        put_target_amount_endpoint,
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
    async fn put_then_get_target_amount() {
        let (state, user_id) = get_state();

        put_target_amount_endpoint(
            State(state.clone()),
            Extension(user_id),
            ApiJson(TargetAmountRequest {
                year: 2024,
                month: 5,
                amount: 500_000,
            }),
        )
        .await
        .unwrap();

        let response = get_target_amount_endpoint(
            State(state),
            Extension(user_id),
            ApiQuery(TargetAmountQuery {
                year: 2024,
                month: 5,
            }),
        )
        .await
        .unwrap();

        let body = parse_json_body(response).await;
        let target_amount = &body["data"]["targetAmount"];
        assert_eq!(target_amount["year"], 2024);
        assert_eq!(target_amount["month"], 5);
        assert_eq!(target_amount["amount"], 500_000);
    }

    #[tokio::test]
    async fn get_unset_target_amount_is_not_found() {
        let (state, user_id) = get_state();

        let error = get_target_amount_endpoint(
            State(state),
            Extension(user_id),
            ApiQuery(TargetAmountQuery {
                year: 2024,
                month: 5,
            }),
        )
        .await
        .unwrap_err();

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = parse_json_body(response).await;
        assert_error_body(&body, "4040", "목표 금액을 찾을 수 없습니다.");
    }

    #[tokio::test]
    async fn put_rejects_negative_amount_and_bad_month() {
        let (state, user_id) = get_state();

        let error = put_target_amount_endpoint(
            State(state),
            Extension(user_id),
            ApiJson(TargetAmountRequest {
                year: 2024,
                month: 0,
                amount: -1,
            }),
        )
        .await
        .unwrap_err();

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = parse_json_body(response).await;
        assert_eq!(
            body["fieldErrors"],
            json!({
                "amount": "목표 금액은 0 이상이어야 합니다.",
                "month": "월은 1~12 사이로 입력해주세요"
            })
        );
    }
}
