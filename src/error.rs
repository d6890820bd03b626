//! Defines the app level error type.
//!
//! The variants here only describe *what* went wrong. Turning an error into
//! an HTTP status and a JSON body is the job of [crate::error_code].

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};

use crate::{
    device::DeviceError, spending::SpendingError, target_amount::TargetAmountError,
    user::UserError, validation::FieldErrors,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A spending or custom spending category could not be used by the acting user.
    #[error(transparent)]
    Spending(#[from] SpendingError),

    /// A device (push token) operation failed.
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// A user account operation failed.
    #[error(transparent)]
    User(#[from] UserError),

    /// A target amount operation failed.
    #[error(transparent)]
    TargetAmount(#[from] TargetAmountError),

    /// One or more fields in the request failed validation.
    ///
    /// Each entry maps the field name to a user-facing message.
    #[error("the request contains invalid fields: {0:?}")]
    InvalidFields(FieldErrors),

    /// The request body could not be parsed into the expected type.
    ///
    /// The string holds the parser's explanation and should only be logged.
    #[error("could not parse the request body: {0}")]
    InvalidRequestBody(String),

    /// The query string or a path parameter could not be parsed into the expected type.
    #[error("could not parse the request parameters: {0}")]
    InvalidQuery(String),

    /// The auth cookie is missing, could not be decrypted or has expired.
    #[error("missing or invalid authentication credentials")]
    Unauthenticated,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The expiry of the auth cookie could not be formatted or parsed.
    #[error("could not handle the auth cookie date-time: {0}")]
    InvalidDateFormat(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.username") =>
            {
                Error::User(UserError::DuplicateUsername)
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidQuery(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidQuery(rejection.body_text())
    }
}

#[cfg(test)]
mod error_tests {
    use rusqlite::Connection;

    use crate::{Error, user::UserError};

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn duplicate_username_maps_to_user_error() {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute_batch(
                "CREATE TABLE user (id INTEGER PRIMARY KEY, username TEXT NOT NULL UNIQUE);
                INSERT INTO user (username) VALUES ('pennyway');",
            )
            .unwrap();

        let error: Error = connection
            .execute("INSERT INTO user (username) VALUES ('pennyway')", ())
            .unwrap_err()
            .into();

        assert_eq!(error, Error::User(UserError::DuplicateUsername));
    }
}
