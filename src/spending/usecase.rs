//! Spending operations that combine category resolution, ownership checks
//! and writes.

use rusqlite::Connection;

use crate::{
    Error,
    database_id::DatabaseId,
    spending::{
        NewSpending, Spending, SpendingError, create_spending, get_spending, resolve_category,
        update_spending,
    },
    user::UserID,
};

/// Resolve the category of `new_spending` and save it for `user_id`.
///
/// Resolution and the insert run in one transaction, so a custom category
/// cannot change hands between the ownership check and the write.
pub fn add_spending(
    user_id: UserID,
    new_spending: NewSpending,
    connection: &mut Connection,
) -> Result<Spending, Error> {
    let transaction = connection.transaction()?;

    let category = resolve_category(user_id, new_spending.category, &*transaction)?;
    let spending = create_spending(user_id, new_spending.details, category, &transaction)?;

    transaction.commit()?;
    tracing::debug!("User {user_id} added spending {}", spending.id);

    Ok(spending)
}

/// Get the spending `id` if it belongs to `user_id`.
///
/// # Errors
/// - [SpendingError::SpendingNotFound] if the spending does not exist.
/// - [SpendingError::SpendingForbidden] if it belongs to another user.
pub fn get_owned_spending(
    user_id: UserID,
    id: DatabaseId,
    connection: &Connection,
) -> Result<Spending, Error> {
    let spending = get_spending(id, connection)?;

    if spending.user_id != user_id {
        tracing::warn!(
            "User {user_id} tried to access spending {id} owned by user {}",
            spending.user_id
        );
        return Err(SpendingError::SpendingForbidden.into());
    }

    Ok(spending)
}

/// Replace the spending `id` of `user_id` with `new_spending`, resolving its category again.
pub fn edit_spending(
    user_id: UserID,
    id: DatabaseId,
    new_spending: NewSpending,
    connection: &mut Connection,
) -> Result<Spending, Error> {
    let transaction = connection.transaction()?;

    get_owned_spending(user_id, id, &transaction)?;
    let category = resolve_category(user_id, new_spending.category, &*transaction)?;
    let spending = update_spending(id, new_spending.details, category, &transaction)?;

    transaction.commit()?;
    tracing::debug!("User {user_id} edited spending {id}");

    Ok(spending)
}

#[cfg(test)]
mod spending_usecase_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        spending::{
            CustomCategoryName, NewSpending, ResolvedCategory, SpendingCategory,
            SpendingCategoryReference, SpendingDetails, SpendingError, create_custom_category,
            get_spending,
        },
        test_utils::{get_test_connection, insert_test_user},
        user::UserID,
    };

    use super::{add_spending, edit_spending, get_owned_spending};

    fn new_spending(category: SpendingCategoryReference) -> NewSpending {
        NewSpending {
            details: SpendingDetails {
                amount: 10000,
                date: date!(2024 - 05 - 17),
                place: "소비처".to_owned(),
                memo: "메모".to_owned(),
            },
            category,
        }
    }

    fn setup() -> (Connection, UserID, UserID) {
        let connection = get_test_connection();
        let owner = insert_test_user("pennyway", &connection);
        let other = insert_test_user("otheruser", &connection);

        (connection, owner.id, other.id)
    }

    #[test]
    fn add_spending_with_built_in_category() {
        let (mut connection, user_id, _) = setup();

        let spending = add_spending(
            user_id,
            new_spending(SpendingCategoryReference::BuiltIn(SpendingCategory::Food)),
            &mut connection,
        )
        .unwrap();

        assert_eq!(
            spending.category,
            ResolvedCategory {
                is_custom: false,
                id: -1,
                icon: SpendingCategory::Food
            }
        );
        assert_eq!(get_spending(spending.id, &connection), Ok(spending));
    }

    #[test]
    fn add_spending_with_own_custom_category_uses_category_icon() {
        let (mut connection, user_id, _) = setup();
        let category = create_custom_category(
            CustomCategoryName::new_unchecked("잉여비"),
            SpendingCategory::Living,
            user_id,
            &connection,
        )
        .unwrap();

        let spending = add_spending(
            user_id,
            new_spending(SpendingCategoryReference::Custom(category.id)),
            &mut connection,
        )
        .unwrap();

        assert_eq!(
            spending.category,
            ResolvedCategory {
                is_custom: true,
                id: category.id,
                icon: SpendingCategory::Living
            }
        );
    }

    #[test]
    fn add_spending_with_someone_elses_category_writes_nothing() {
        let (mut connection, user_id, other_id) = setup();
        let category = create_custom_category(
            CustomCategoryName::new_unchecked("남의것"),
            SpendingCategory::Food,
            other_id,
            &connection,
        )
        .unwrap();

        let result = add_spending(
            user_id,
            new_spending(SpendingCategoryReference::Custom(category.id)),
            &mut connection,
        );

        assert_eq!(
            result,
            Err(Error::Spending(SpendingError::CustomCategoryForbidden))
        );
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM spending", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn add_spending_with_missing_category_is_not_found() {
        let (mut connection, user_id, _) = setup();

        let result = add_spending(
            user_id,
            new_spending(SpendingCategoryReference::Custom(1000)),
            &mut connection,
        );

        assert_eq!(
            result,
            Err(Error::Spending(SpendingError::CustomCategoryNotFound))
        );
    }

    #[test]
    fn get_owned_spending_rejects_other_users() {
        let (mut connection, user_id, other_id) = setup();
        let spending = add_spending(
            user_id,
            new_spending(SpendingCategoryReference::BuiltIn(SpendingCategory::Food)),
            &mut connection,
        )
        .unwrap();

        assert_eq!(
            get_owned_spending(other_id, spending.id, &connection),
            Err(Error::Spending(SpendingError::SpendingForbidden))
        );
        assert_eq!(
            get_owned_spending(user_id, spending.id + 1, &connection),
            Err(Error::Spending(SpendingError::SpendingNotFound))
        );
        assert_eq!(
            get_owned_spending(user_id, spending.id, &connection),
            Ok(spending)
        );
    }

    #[test]
    fn edit_spending_resolves_new_category() {
        let (mut connection, user_id, _) = setup();
        let spending = add_spending(
            user_id,
            new_spending(SpendingCategoryReference::BuiltIn(SpendingCategory::Food)),
            &mut connection,
        )
        .unwrap();
        let category = create_custom_category(
            CustomCategoryName::new_unchecked("잉여비"),
            SpendingCategory::Hobby,
            user_id,
            &connection,
        )
        .unwrap();

        let edited = edit_spending(
            user_id,
            spending.id,
            new_spending(SpendingCategoryReference::Custom(category.id)),
            &mut connection,
        )
        .unwrap();

        assert_eq!(
            edited.category,
            ResolvedCategory::custom(category.id, SpendingCategory::Hobby)
        );
    }

    #[test]
    fn edit_spending_of_another_user_is_forbidden() {
        let (mut connection, user_id, other_id) = setup();
        let spending = add_spending(
            user_id,
            new_spending(SpendingCategoryReference::BuiltIn(SpendingCategory::Food)),
            &mut connection,
        )
        .unwrap();

        let result = edit_spending(
            other_id,
            spending.id,
            new_spending(SpendingCategoryReference::BuiltIn(SpendingCategory::Travel)),
            &mut connection,
        );

        assert_eq!(result, Err(Error::Spending(SpendingError::SpendingForbidden)));
        assert_eq!(get_spending(spending.id, &connection), Ok(spending));
    }
}
