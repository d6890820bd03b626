//! Cookie based sessions: signing users in and out, and guarding routes that
//! need a signed in user.

mod cookie;
mod middleware;
mod session;

pub use cookie::{
    DEFAULT_COOKIE_DURATION, extend_auth_cookie_duration_if_needed, get_user_id_from_auth_cookie,
    invalidate_auth_cookie, set_auth_cookie,
};
pub use middleware::{AuthState, auth_guard};
pub use session::{SessionState, sign_in_endpoint, sign_out_endpoint, sign_up_endpoint};

#[cfg(test)]
pub(crate) use cookie::{COOKIE_EXPIRY, COOKIE_USER_ID};
