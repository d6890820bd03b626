//! Database operations for users.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    password::PasswordHash,
    user::{Name, NotifySetting, NotifyType, User, UserError, UserID, Username},
};

const SELECT_USER: &str = "SELECT id, username, name, password, account_book_notify, \
    feed_notify, chat_notify FROM user";

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                password TEXT NOT NULL,
                account_book_notify INTEGER NOT NULL DEFAULT 1,
                feed_notify INTEGER NOT NULL DEFAULT 1,
                chat_notify INTEGER NOT NULL DEFAULT 1
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// New users receive every kind of notification.
///
/// # Errors
///
/// Returns [UserError::DuplicateUsername] if the username is taken, or a
/// [Error::SqlError] if another SQL related error occurred.
pub fn create_user(
    username: Username,
    name: Name,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (username, name, password) VALUES (?1, ?2, ?3)",
        (username.as_ref(), name.as_ref(), password_hash.as_ref()),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        username,
        name,
        password_hash,
        notify_setting: NotifySetting::default(),
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the database.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("{SELECT_USER} WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(map_missing_user)
}

/// Get the user that signs in with `username`.
///
/// # Errors
///
/// Returns [UserError::NotFound] if no user has the username.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("{SELECT_USER} WHERE username = :username"))?
        .query_row(&[(":username", &username)], map_row)
        .map_err(map_missing_user)
}

/// Change the display name of a user.
pub fn update_name(user_id: UserID, name: &Name, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET name = ?1 WHERE id = ?2",
        (name.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(UserError::NotFound.into());
    }

    Ok(())
}

/// Change the username of a user.
///
/// # Errors
///
/// Returns [UserError::DuplicateUsername] if another user has `username`.
pub fn update_username(
    user_id: UserID,
    username: &Username,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET username = ?1 WHERE id = ?2",
        (username.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(UserError::NotFound.into());
    }

    Ok(())
}

/// Turn one kind of notification on or off for a user.
pub fn update_notify_setting(
    user_id: UserID,
    notify_type: NotifyType,
    enabled: bool,
    connection: &Connection,
) -> Result<(), Error> {
    // The column name comes from a closed enum, never from user input.
    let query = format!("UPDATE user SET {} = ?1 WHERE id = ?2", notify_type.column());
    let rows_affected = connection.execute(&query, (enabled, user_id.as_i64()))?;

    if rows_affected == 0 {
        return Err(UserError::NotFound.into());
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_username: String = row.get(1)?;
    let raw_name: String = row.get(2)?;
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        username: Username::new_unchecked(&raw_username),
        name: Name::new_unchecked(&raw_name),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        notify_setting: NotifySetting {
            account_book_notify: row.get(4)?,
            feed_notify: row.get(5)?,
            chat_notify: row.get(6)?,
        },
    })
}

fn map_missing_user(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::QueryReturnedNoRows => UserError::NotFound.into(),
        error => error.into(),
    }
}
