//! Spendings and their database operations.

use rusqlite::{Connection, Row, types::Type};
use serde::Serialize;
use time::{Date, Month};

use crate::{
    Error,
    database_id::DatabaseId,
    spending::{ResolvedCategory, SpendingError, create_custom_category_table, parse_icon},
    user::UserID,
};

time::serde::format_description!(pub(crate) iso_date, Date, "[year]-[month]-[day]");

/// A single spending in a user's ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spending {
    pub id: DatabaseId,
    #[serde(skip)]
    pub user_id: UserID,
    pub amount: i64,
    pub category: ResolvedCategory,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub place: String,
    pub memo: String,
}

/// The user-editable fields of a spending, minus its category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendingDetails {
    /// Always greater than zero.
    pub amount: i64,
    pub date: Date,
    pub place: String,
    pub memo: String,
}

/// Create the spending table along with the custom category table it references.
pub fn create_spending_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_custom_category_table(connection)?;

    // Exactly one of `category` (built-in) and `custom_category_id` is set.
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS spending (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            amount INTEGER NOT NULL CHECK (amount > 0 AND amount <= 2147483647),
            date TEXT NOT NULL,
            place TEXT NOT NULL,
            memo TEXT NOT NULL,
            category TEXT,
            custom_category_id INTEGER,
            CHECK ((category IS NULL) <> (custom_category_id IS NULL)),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(custom_category_id) REFERENCES spending_custom_category(id) ON UPDATE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_spending_user_date ON spending(user_id, date);",
    )?;

    Ok(())
}

/// Split a resolved category into the `category` and `custom_category_id` columns.
fn category_columns(category: &ResolvedCategory) -> (Option<&'static str>, Option<DatabaseId>) {
    if category.is_custom {
        (None, Some(category.id))
    } else {
        (Some(category.icon.as_str()), None)
    }
}

/// Insert a spending for `user_id` with an already resolved category.
pub fn create_spending(
    user_id: UserID,
    details: SpendingDetails,
    category: ResolvedCategory,
    connection: &Connection,
) -> Result<Spending, Error> {
    let (built_in, custom_category_id) = category_columns(&category);

    connection.execute(
        "INSERT INTO spending (user_id, amount, date, place, memo, category, custom_category_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            user_id.as_i64(),
            details.amount,
            details.date,
            &details.place,
            &details.memo,
            built_in,
            custom_category_id,
        ),
    )?;

    Ok(Spending {
        id: connection.last_insert_rowid(),
        user_id,
        amount: details.amount,
        category,
        date: details.date,
        place: details.place,
        memo: details.memo,
    })
}

/// Overwrite every editable field of the spending `id`.
///
/// # Errors
/// Returns [SpendingError::SpendingNotFound] if there is no spending with `id`.
pub fn update_spending(
    id: DatabaseId,
    details: SpendingDetails,
    category: ResolvedCategory,
    connection: &Connection,
) -> Result<Spending, Error> {
    let (built_in, custom_category_id) = category_columns(&category);

    let rows_affected = connection.execute(
        "UPDATE spending
        SET amount = ?1, date = ?2, place = ?3, memo = ?4, category = ?5, custom_category_id = ?6
        WHERE id = ?7",
        (
            details.amount,
            details.date,
            &details.place,
            &details.memo,
            built_in,
            custom_category_id,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(SpendingError::SpendingNotFound.into());
    }

    get_spending(id, connection)
}

const SELECT_SPENDING: &str = "SELECT s.id, s.user_id, s.amount, s.date, s.place, s.memo,
    s.category, c.id, c.icon
    FROM spending s
    LEFT JOIN spending_custom_category c ON c.id = s.custom_category_id";

/// Get the spending with `id`, whoever owns it.
///
/// # Errors
/// Returns [SpendingError::SpendingNotFound] if there is no spending with `id`.
pub fn get_spending(id: DatabaseId, connection: &Connection) -> Result<Spending, Error> {
    connection
        .prepare(&format!("{SELECT_SPENDING} WHERE s.id = :id"))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => SpendingError::SpendingNotFound.into(),
            error => error.into(),
        })
}

/// Get the spendings of `user_id` dated in `month` of `year`, newest first.
///
/// # Errors
/// Returns [Error::InvalidQuery] if `year` is outside the supported range.
pub fn get_spendings_in_month(
    user_id: UserID,
    year: i32,
    month: Month,
    connection: &Connection,
) -> Result<Vec<Spending>, Error> {
    let (start, end) = month_bounds(year, month)?;

    connection
        .prepare(&format!(
            "{SELECT_SPENDING}
            WHERE s.user_id = :user_id AND s.date >= :start AND s.date < :end
            ORDER BY s.date DESC, s.id DESC"
        ))?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":start": start,
                ":end": end,
            },
            map_row,
        )?
        .map(|maybe_spending| maybe_spending.map_err(|error| error.into()))
        .collect()
}

/// The first day of `month` and the first day of the month after it.
fn month_bounds(year: i32, month: Month) -> Result<(Date, Date), Error> {
    let start = Date::from_calendar_date(year, month, 1)
        .map_err(|error| Error::InvalidQuery(error.to_string()))?;
    let next_year = if month == Month::December {
        year.checked_add(1)
            .ok_or_else(|| Error::InvalidQuery(format!("year {year} is out of range")))?
    } else {
        year
    };
    let end = Date::from_calendar_date(next_year, month.next(), 1)
        .map_err(|error| Error::InvalidQuery(error.to_string()))?;

    Ok((start, end))
}

fn map_row(row: &Row) -> Result<Spending, rusqlite::Error> {
    let built_in: Option<String> = row.get(6)?;
    let custom_category_id: Option<DatabaseId> = row.get(7)?;
    let custom_icon: Option<String> = row.get(8)?;

    let category = match (built_in, custom_category_id, custom_icon) {
        (Some(icon), None, _) => ResolvedCategory::built_in(parse_icon(&icon, 6)?),
        (None, Some(id), Some(icon)) => ResolvedCategory::custom(id, parse_icon(&icon, 8)?),
        _ => {
            return Err(rusqlite::Error::InvalidColumnType(
                6,
                "category".to_owned(),
                Type::Null,
            ));
        }
    };

    Ok(Spending {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        amount: row.get(2)?,
        date: row.get(3)?,
        place: row.get(4)?,
        memo: row.get(5)?,
        category,
    })
}
