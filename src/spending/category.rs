//! Spending categories: the built-in icons, references to them in requests,
//! and the category a spending ends up with once resolved.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::database_id::DatabaseId;

/// The id reported for a spending that uses a built-in category.
pub const BUILT_IN_CATEGORY_ID: DatabaseId = -1;

/// The fixed categories every user can pick from.
///
/// Custom categories also use one of these as their icon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpendingCategory {
    Food,
    Transportation,
    BeautyOrFashion,
    ConvenienceStore,
    Education,
    Living,
    Health,
    Hobby,
    Travel,
    AlcoholOrEntertainment,
    MembershipOrFamilyEvent,
    Other,
}

impl SpendingCategory {
    pub const ALL: [SpendingCategory; 12] = [
        SpendingCategory::Food,
        SpendingCategory::Transportation,
        SpendingCategory::BeautyOrFashion,
        SpendingCategory::ConvenienceStore,
        SpendingCategory::Education,
        SpendingCategory::Living,
        SpendingCategory::Health,
        SpendingCategory::Hobby,
        SpendingCategory::Travel,
        SpendingCategory::AlcoholOrEntertainment,
        SpendingCategory::MembershipOrFamilyEvent,
        SpendingCategory::Other,
    ];

    /// The name used on the wire and in the database, e.g. "BEAUTY_OR_FASHION".
    pub fn as_str(&self) -> &'static str {
        match self {
            SpendingCategory::Food => "FOOD",
            SpendingCategory::Transportation => "TRANSPORTATION",
            SpendingCategory::BeautyOrFashion => "BEAUTY_OR_FASHION",
            SpendingCategory::ConvenienceStore => "CONVENIENCE_STORE",
            SpendingCategory::Education => "EDUCATION",
            SpendingCategory::Living => "LIVING",
            SpendingCategory::Health => "HEALTH",
            SpendingCategory::Hobby => "HOBBY",
            SpendingCategory::Travel => "TRAVEL",
            SpendingCategory::AlcoholOrEntertainment => "ALCOHOL_OR_ENTERTAINMENT",
            SpendingCategory::MembershipOrFamilyEvent => "MEMBERSHIP_OR_FAMILY_EVENT",
            SpendingCategory::Other => "OTHER",
        }
    }
}

impl Display for SpendingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The string did not name a built-in spending category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a spending category")]
pub struct UnknownSpendingCategory(pub String);

impl FromStr for SpendingCategory {
    type Err = UnknownSpendingCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpendingCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownSpendingCategory(s.to_owned()))
    }
}

/// The category a spending request asks for.
///
/// Requests use the id `-1` to mean "no custom category"; that convention
/// stops at deserialization and everything past it uses this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpendingCategoryReference {
    BuiltIn(SpendingCategory),
    Custom(DatabaseId),
}

/// The concrete, authorized category of a spending.
///
/// For built-in categories `id` is [BUILT_IN_CATEGORY_ID].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCategory {
    pub is_custom: bool,
    pub id: DatabaseId,
    pub icon: SpendingCategory,
}

impl ResolvedCategory {
    pub fn built_in(icon: SpendingCategory) -> Self {
        Self {
            is_custom: false,
            id: BUILT_IN_CATEGORY_ID,
            icon,
        }
    }

    pub fn custom(id: DatabaseId, icon: SpendingCategory) -> Self {
        Self {
            is_custom: true,
            id,
            icon,
        }
    }
}

/// The ways using a spending or custom category can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpendingError {
    /// No custom category has the referenced id.
    #[error("the custom spending category does not exist")]
    CustomCategoryNotFound,

    /// The custom category belongs to a different user.
    #[error("the custom spending category belongs to another user")]
    CustomCategoryForbidden,

    /// No spending has the requested id.
    #[error("the spending does not exist")]
    SpendingNotFound,

    /// The spending belongs to a different user.
    #[error("the spending belongs to another user")]
    SpendingForbidden,

    /// The total of a day or month does not fit in an `i64`.
    #[error("the spending total is too large")]
    TotalOverflow,
}

#[cfg(test)]
mod spending_category_tests {
    use std::str::FromStr;

    use super::{SpendingCategory, UnknownSpendingCategory};

    #[test]
    fn from_str_accepts_every_category_name() {
        for category in SpendingCategory::ALL {
            assert_eq!(SpendingCategory::from_str(category.as_str()), Ok(category));
        }
    }

    #[test]
    fn from_str_rejects_unknown_name() {
        assert_eq!(
            SpendingCategory::from_str("CUSTOM"),
            Err(UnknownSpendingCategory("CUSTOM".to_owned()))
        );
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&SpendingCategory::BeautyOrFashion).unwrap();

        assert_eq!(json, "\"BEAUTY_OR_FASHION\"");
    }
}
