//! User-owned spending categories and their database operations.

use std::str::FromStr;

use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::{
    Error,
    database_id::DatabaseId,
    spending::SpendingCategory,
    user::UserID,
    validation::InvalidField,
};

const MAX_NAME_LENGTH: usize = 15;

/// A validated custom category name: 1 to 15 characters after trimming.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CustomCategoryName(String);

impl CustomCategoryName {
    /// Create a custom category name.
    ///
    /// # Errors
    ///
    /// Fails if `name` is blank or longer than 15 characters.
    pub fn new(name: &str) -> Result<Self, InvalidField> {
        let name = name.trim();

        if name.is_empty() {
            Err(InvalidField("카테고리 이름을 입력해주세요"))
        } else if name.chars().count() > MAX_NAME_LENGTH {
            Err(InvalidField("카테고리 이름은 15자 이하로 입력해주세요"))
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a name without validation.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CustomCategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A spending category created by, and only usable by, one user.
///
/// The owner never changes after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendingCustomCategory {
    pub id: DatabaseId,
    pub name: CustomCategoryName,
    /// The built-in category whose icon this category is displayed with.
    pub icon: SpendingCategory,
    pub owner: UserID,
}

/// Finds custom categories by id for category resolution.
pub trait CustomCategoryLookup {
    /// Get the custom category with `id`, or `None` if there is no such category.
    fn find_custom_category_by_id(
        &self,
        id: DatabaseId,
    ) -> Result<Option<SpendingCustomCategory>, Error>;
}

impl CustomCategoryLookup for Connection {
    fn find_custom_category_by_id(
        &self,
        id: DatabaseId,
    ) -> Result<Option<SpendingCustomCategory>, Error> {
        self.prepare("SELECT id, name, icon, user_id FROM spending_custom_category WHERE id = :id")?
            .query_row(&[(":id", &id)], map_row)
            .optional()
            .map_err(|error| error.into())
    }
}

/// Create a custom category owned by `owner`.
pub fn create_custom_category(
    name: CustomCategoryName,
    icon: SpendingCategory,
    owner: UserID,
    connection: &Connection,
) -> Result<SpendingCustomCategory, Error> {
    connection.execute(
        "INSERT INTO spending_custom_category (name, icon, user_id) VALUES (?1, ?2, ?3)",
        (name.as_ref(), icon.as_str(), owner.as_i64()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(SpendingCustomCategory {
        id,
        name,
        icon,
        owner,
    })
}

/// Get the custom categories owned by `owner`, oldest first.
pub fn get_custom_categories_by_owner(
    owner: UserID,
    connection: &Connection,
) -> Result<Vec<SpendingCustomCategory>, Error> {
    connection
        .prepare(
            "SELECT id, name, icon, user_id FROM spending_custom_category
            WHERE user_id = :user_id ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &owner.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Initialize the custom category table.
pub fn create_custom_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS spending_custom_category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            icon TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_spending_custom_category_user
            ON spending_custom_category(user_id);",
    )?;

    Ok(())
}

/// Parse a category name stored in the database.
pub(crate) fn parse_icon(raw_icon: &str, column: usize) -> Result<SpendingCategory, rusqlite::Error> {
    SpendingCategory::from_str(raw_icon).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })
}

fn map_row(row: &Row) -> Result<SpendingCustomCategory, rusqlite::Error> {
    let raw_name: String = row.get(1)?;
    let raw_icon: String = row.get(2)?;

    Ok(SpendingCustomCategory {
        id: row.get(0)?,
        name: CustomCategoryName::new_unchecked(&raw_name),
        icon: parse_icon(&raw_icon, 2)?,
        owner: UserID::new(row.get(3)?),
    })
}

#[cfg(test)]
mod custom_category_name_tests {
    use crate::validation::InvalidField;

    use super::CustomCategoryName;

    #[test]
    fn new_fails_on_blank() {
        assert_eq!(
            CustomCategoryName::new(" \t"),
            Err(InvalidField("카테고리 이름을 입력해주세요"))
        );
    }

    #[test]
    fn new_fails_on_long_name() {
        assert!(CustomCategoryName::new(&"가".repeat(16)).is_err());
    }

    #[test]
    fn new_trims_name() {
        let name = CustomCategoryName::new("  잉여비 ").unwrap();

        assert_eq!(name.as_ref(), "잉여비");
    }
}
