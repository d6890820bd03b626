//! The API endpoints URIs.
//!
//! Tests that request an endpoint with a parameter, e.g., '/v2/spendings/{spending_id}',
//! fill it in with `format_endpoint`.

/// The route for creating an account.
pub const SIGN_UP: &str = "/v1/auth/sign-up";
/// The route for signing in with a username and password.
pub const SIGN_IN: &str = "/v1/auth/sign-in";
/// The route for the client to sign out the current user.
pub const SIGN_OUT: &str = "/v1/auth/sign-out";

/// The route for the signed in user's account.
pub const MY_ACCOUNT: &str = "/v1/users/me";
/// The route for changing the signed in user's name.
pub const MY_NAME: &str = "/v1/users/me/name";
/// The route for changing the signed in user's username.
pub const MY_USERNAME: &str = "/v1/users/me/username";
/// The route for turning notifications on (PATCH) and off (DELETE).
pub const MY_NOTIFICATIONS: &str = "/v1/users/me/notifications";
/// The route for registering and removing push tokens.
pub const MY_DEVICES: &str = "/v1/users/me/devices";

/// The route to access the signed in user's custom spending categories.
pub const SPENDING_CUSTOM_CATEGORIES: &str = "/v2/spending-custom-categories";
/// The route to create spendings and list them by month.
pub const SPENDINGS: &str = "/v2/spendings";
/// The route to access a single spending.
pub const SPENDING: &str = "/v2/spendings/{spending_id}";

/// The route to access monthly target amounts.
pub const TARGET_AMOUNTS: &str = "/v2/target-amounts";

/// The route for sending a question to the support team.
pub const QUESTIONS: &str = "/v1/questions";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/v2/spendings/{spending_id}', '{spending_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
