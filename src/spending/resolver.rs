//! Turns the category a spending request asks for into an authorized category.

use crate::{
    Error,
    spending::{
        CustomCategoryLookup, ResolvedCategory, SpendingCategoryReference, SpendingError,
    },
    user::UserID,
};

/// Resolve the category referenced by a new or updated spending of `user_id`.
///
/// Built-in categories need no lookup. Custom categories are fetched through
/// `lookup` and may only be used by their owner; the ownership check runs on
/// every call.
///
/// # Errors
///
/// - [SpendingError::CustomCategoryNotFound] if the custom category does not exist.
/// - [SpendingError::CustomCategoryForbidden] if it belongs to another user.
/// - [Error::SqlError] if the lookup itself failed.
pub fn resolve_category<L>(
    user_id: UserID,
    reference: SpendingCategoryReference,
    lookup: &L,
) -> Result<ResolvedCategory, Error>
where
    L: CustomCategoryLookup + ?Sized,
{
    let category_id = match reference {
        SpendingCategoryReference::BuiltIn(icon) => return Ok(ResolvedCategory::built_in(icon)),
        SpendingCategoryReference::Custom(category_id) => category_id,
    };

    let category = lookup
        .find_custom_category_by_id(category_id)?
        .ok_or(SpendingError::CustomCategoryNotFound)?;

    if category.owner != user_id {
        tracing::warn!(
            "User {user_id} tried to use custom category {category_id} owned by user {}",
            category.owner
        );
        return Err(SpendingError::CustomCategoryForbidden.into());
    }

    Ok(ResolvedCategory::custom(category.id, category.icon))
}
