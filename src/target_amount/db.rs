//! The monthly spending targets users set for themselves.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{Error, database_id::DatabaseId, user::UserID};

/// How much a user plans to spend at most in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetAmount {
    pub id: DatabaseId,
    #[serde(skip)]
    pub user_id: UserID,
    pub year: i32,
    pub month: u8,
    pub amount: i64,
}

/// The errors for target amount operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TargetAmountError {
    /// The user has not set a target for the month.
    #[error("no target amount has been set for the month")]
    NotFound,
}

/// Create the target amount table.
pub fn create_target_amount_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS target_amount (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            amount INTEGER NOT NULL CHECK (amount >= 0),
            UNIQUE(user_id, year, month),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );",
    )?;

    Ok(())
}

/// Set the target of `user_id` for `month` of `year`, replacing any earlier target.
pub fn save_target_amount(
    user_id: UserID,
    year: i32,
    month: u8,
    amount: i64,
    connection: &Connection,
) -> Result<TargetAmount, Error> {
    connection
        .prepare(
            "INSERT INTO target_amount (user_id, year, month, amount) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, year, month) DO UPDATE SET amount = excluded.amount
            RETURNING id, user_id, year, month, amount",
        )?
        .query_row((user_id.as_i64(), year, month, amount), map_row)
        .map_err(|error| error.into())
}

/// Get the target of `user_id` for `month` of `year`.
///
/// # Errors
/// Returns [TargetAmountError::NotFound] if no target has been set.
pub fn get_target_amount(
    user_id: UserID,
    year: i32,
    month: u8,
    connection: &Connection,
) -> Result<TargetAmount, Error> {
    connection
        .prepare(
            "SELECT id, user_id, year, month, amount FROM target_amount
            WHERE user_id = ?1 AND year = ?2 AND month = ?3",
        )?
        .query_row((user_id.as_i64(), year, month), map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => TargetAmountError::NotFound.into(),
            error => error.into(),
        })
}

fn map_row(row: &Row) -> Result<TargetAmount, rusqlite::Error> {
    Ok(TargetAmount {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        year: row.get(2)?,
        month: row.get(3)?,
        amount: row.get(4)?,
    })
}
