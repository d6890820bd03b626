//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};

use crate::{
    AppState,
    auth::{auth_guard, sign_in_endpoint, sign_out_endpoint, sign_up_endpoint},
    device::{delete_device_endpoint, put_device_endpoint},
    endpoints,
    not_found::get_404_not_found,
    question::send_question_endpoint,
    spending::{
        create_custom_category_endpoint, create_spending_endpoint, get_custom_categories_endpoint,
        get_monthly_spendings_endpoint, get_spending_endpoint, update_spending_endpoint,
    },
    target_amount::{get_target_amount_endpoint, put_target_amount_endpoint},
    user::{
        get_my_account_endpoint, turn_off_notification_endpoint, turn_on_notification_endpoint,
        update_name_endpoint, update_username_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::SIGN_UP, post(sign_up_endpoint))
        .route(endpoints::SIGN_IN, post(sign_in_endpoint))
        .route(endpoints::SIGN_OUT, post(sign_out_endpoint))
        .route(endpoints::QUESTIONS, post(send_question_endpoint));

    let protected_routes = Router::new()
        .route(endpoints::MY_ACCOUNT, get(get_my_account_endpoint))
        .route(endpoints::MY_NAME, patch(update_name_endpoint))
        .route(endpoints::MY_USERNAME, patch(update_username_endpoint))
        .route(
            endpoints::MY_NOTIFICATIONS,
            patch(turn_on_notification_endpoint).delete(turn_off_notification_endpoint),
        )
        .route(
            endpoints::MY_DEVICES,
            put(put_device_endpoint).delete(delete_device_endpoint),
        )
        .route(
            endpoints::SPENDING_CUSTOM_CATEGORIES,
            post(create_custom_category_endpoint).get(get_custom_categories_endpoint),
        )
        .route(
            endpoints::SPENDINGS,
            post(create_spending_endpoint).get(get_monthly_spendings_endpoint),
        )
        .route(
            endpoints::SPENDING,
            get(get_spending_endpoint).put(update_spending_endpoint),
        )
        .route(
            endpoints::TARGET_AMOUNTS,
            put(put_target_amount_endpoint).get(get_target_amount_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
