//! The request body for creating or updating a spending.

use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    database_id::DatabaseId,
    spending::{
        BUILT_IN_CATEGORY_ID, SpendingCategory, SpendingCategoryReference, SpendingDetails,
        core::iso_date,
    },
    validation::{FieldErrors, first_failure},
};

const MAX_PLACE_LENGTH: usize = 20;
const MAX_MEMO_LENGTH: usize = 100;
/// The largest amount a single spending may record.
pub const MAX_SPENDING_AMOUNT: i64 = i32::MAX as i64;

/// A spending as sent by the client.
///
/// `categoryId` is `-1` for a built-in category, in which case `icon` names
/// it. Any other id refers to a custom category and `icon` is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingRequest {
    pub amount: i64,
    pub category_id: DatabaseId,
    #[serde(default)]
    pub icon: Option<SpendingCategory>,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub memo: String,
}

/// A validated spending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpending {
    pub details: SpendingDetails,
    pub category: SpendingCategoryReference,
}

impl SpendingRequest {
    /// Check every field and translate the category id into a [SpendingCategoryReference].
    ///
    /// # Errors
    /// Returns [Error::InvalidFields] listing every invalid field.
    pub fn validate(self) -> Result<NewSpending, Error> {
        let mut field_errors = FieldErrors::new();

        if let Some(message) = first_failure(&[
            (self.amount <= 0, "지출 금액은 0보다 커야 합니다."),
            (
                self.amount > MAX_SPENDING_AMOUNT,
                "지출 금액은 2147483647원 이하로 입력해주세요",
            ),
        ]) {
            field_errors.add("amount", message);
        }

        if self.place.chars().count() > MAX_PLACE_LENGTH {
            field_errors.add("place", "소비처는 20자 이하로 입력해주세요");
        }

        if self.memo.chars().count() > MAX_MEMO_LENGTH {
            field_errors.add("memo", "메모는 100자 이하로 입력해주세요");
        }

        let category = match (self.category_id, self.icon) {
            (BUILT_IN_CATEGORY_ID, Some(icon)) => Some(SpendingCategoryReference::BuiltIn(icon)),
            (BUILT_IN_CATEGORY_ID, None) => {
                field_errors.add("icon", "icon 값은 필수입니다.");
                None
            }
            (id, _) if id > 0 => Some(SpendingCategoryReference::Custom(id)),
            _ => {
                field_errors.add("categoryId", "categoryId는 -1 또는 양수여야 합니다.");
                None
            }
        };

        match category {
            Some(category) => field_errors.into_result(NewSpending {
                details: SpendingDetails {
                    amount: self.amount,
                    date: self.date,
                    place: self.place,
                    memo: self.memo,
                },
                category,
            }),
            None => Err(Error::InvalidFields(field_errors)),
        }
    }
}
