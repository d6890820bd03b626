//! Stores the signed in user and the session expiry in private cookies.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{
    Duration, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{Error, user::UserID};

pub(crate) const COOKIE_USER_ID: &str = "user_id";
pub(crate) const COOKIE_EXPIRY: &str = "expiry";
/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(30);

/// Date time format for the cookie expiry, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
         sign:mandatory]:[offset_minute]:[offset_second]"
);

fn build_cookie(name: &'static str, value: String, expiry: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .expires(expiry)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build()
}

/// Add the auth cookies for `user_id` to `jar`, valid for `duration` from now.
///
/// # Errors
///
/// Returns [Error::InvalidDateFormat] if the expiry cannot be formatted.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expiry = OffsetDateTime::now_utc() + duration;
    // `to_string` prints midnight with a single digit hour, which DATE_TIME_FORMAT cannot parse.
    let expiry_string = expiry
        .format(DATE_TIME_FORMAT)
        .map_err(|error| Error::InvalidDateFormat(error.to_string()))?;

    Ok(jar
        .add(build_cookie(
            COOKIE_USER_ID,
            user_id.as_i64().to_string(),
            expiry,
        ))
        .add(build_cookie(COOKIE_EXPIRY, expiry_string, expiry)))
}

/// Overwrite the auth cookies with expired placeholders so the client drops them.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    let mut user_id_cookie = build_cookie(
        COOKIE_USER_ID,
        "deleted".to_owned(),
        OffsetDateTime::UNIX_EPOCH,
    );
    user_id_cookie.set_max_age(Duration::ZERO);

    let mut expiry_cookie = build_cookie(
        COOKIE_EXPIRY,
        "deleted".to_owned(),
        OffsetDateTime::UNIX_EPOCH,
    );
    expiry_cookie.set_max_age(Duration::ZERO);

    jar.add(user_id_cookie).add(expiry_cookie)
}

/// Get the signed in user from `jar`.
///
/// # Errors
///
/// Returns [Error::Unauthenticated] if either cookie is missing or unreadable,
/// or if the session has expired.
pub fn get_user_id_from_auth_cookie(jar: &PrivateCookieJar) -> Result<UserID, Error> {
    let user_id_cookie = jar.get(COOKIE_USER_ID).ok_or(Error::Unauthenticated)?;
    let expiry_cookie = jar.get(COOKIE_EXPIRY).ok_or(Error::Unauthenticated)?;

    let expiry = extract_date_time(&expiry_cookie).map_err(|_| Error::Unauthenticated)?;
    if expiry <= OffsetDateTime::now_utc() {
        return Err(Error::Unauthenticated);
    }

    user_id_cookie
        .value_trimmed()
        .parse()
        .map(UserID::new)
        .map_err(|_| Error::Unauthenticated)
}

/// Push the session expiry in `jar` out to `duration` from now, unless it
/// already expires later than that.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// - [Error::Unauthenticated] if the auth cookies are not in the cookie jar.
/// - [Error::InvalidDateFormat] if the expiry could not be read, extended or formatted.
pub fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expiry_cookie = jar.get(COOKIE_EXPIRY).ok_or(Error::Unauthenticated)?;
    let current_expiry = extract_date_time(&expiry_cookie)
        .map_err(|error| Error::InvalidDateFormat(error.to_string()))?;

    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::InvalidDateFormat("cookie expiry overflowed".to_owned()))?;

    set_auth_cookie_expiry(jar, max(current_expiry, new_expiry))
}

fn set_auth_cookie_expiry(
    jar: PrivateCookieJar,
    expiry: OffsetDateTime,
) -> Result<PrivateCookieJar, Error> {
    let expiry_string = expiry
        .format(DATE_TIME_FORMAT)
        .map_err(|error| Error::InvalidDateFormat(error.to_string()))?;

    let user_id_cookie = jar.get(COOKIE_USER_ID).ok_or(Error::Unauthenticated)?;

    Ok(jar
        .add(build_cookie(
            COOKIE_USER_ID,
            user_id_cookie.value().to_owned(),
            expiry,
        ))
        .add(build_cookie(COOKIE_EXPIRY, expiry_string, expiry)))
}

fn extract_date_time(cookie: &Cookie) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(cookie.value_trimmed(), DATE_TIME_FORMAT)
}
