//! HTTP handlers for spendings and custom spending categories.

use axum::{Extension, extract::State, response::Response};
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    Error,
    app_state::DbState,
    database_id::DatabaseId,
    db::lock_connection,
    extract::{ApiJson, ApiPath, ApiQuery},
    response::success,
    spending::{
        CustomCategoryName, MonthlySpendings, Spending, SpendingCategory, SpendingCustomCategory,
        SpendingRequest, add_spending, create_custom_category, edit_spending,
        get_custom_categories_by_owner, get_owned_spending, get_spendings_in_month,
    },
    user::UserID,
    validation::FieldErrors,
};

#[derive(Debug, Deserialize)]
pub struct CustomCategoryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: Option<SpendingCategory>,
}

#[derive(Debug, Serialize)]
struct CustomCategoryView {
    id: DatabaseId,
    name: String,
    icon: SpendingCategory,
}

impl From<SpendingCustomCategory> for CustomCategoryView {
    fn from(category: SpendingCustomCategory) -> Self {
        Self {
            id: category.id,
            name: category.name.as_ref().to_owned(),
            icon: category.icon,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomCategoryResponse {
    spending_category: CustomCategoryView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomCategoriesResponse {
    spending_categories: Vec<CustomCategoryView>,
}

#[derive(Debug, Serialize)]
struct SpendingResponse {
    spending: Spending,
}

#[derive(Debug, Serialize)]
struct MonthlySpendingsResponse {
    spending: MonthlySpendings,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u8,
}

/// Create a custom spending category owned by the signed in user.
pub async fn create_custom_category_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(request): ApiJson<CustomCategoryRequest>,
) -> Result<Response, Error> {
    let mut field_errors = FieldErrors::new();
    let name = field_errors.check("name", CustomCategoryName::new(&request.name));
    if request.icon.is_none() {
        field_errors.add("icon", "icon 값은 필수입니다.");
    }

    let (Some(name), Some(icon)) = (name, request.icon) else {
        return Err(Error::InvalidFields(field_errors));
    };

    let connection = lock_connection(&state.db_connection)?;
    let category = create_custom_category(name, icon, user_id, &connection)?;
    tracing::info!("User {user_id} created custom category {}", category.id);

    Ok(success(CustomCategoryResponse {
        spending_category: category.into(),
    }))
}

/// List the custom spending categories of the signed in user.
pub async fn get_custom_categories_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let categories = get_custom_categories_by_owner(user_id, &connection)?;

    Ok(success(CustomCategoriesResponse {
        spending_categories: categories.into_iter().map(Into::into).collect(),
    }))
}

/// Record a spending for the signed in user.
pub async fn create_spending_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(request): ApiJson<SpendingRequest>,
) -> Result<Response, Error> {
    let new_spending = request.validate()?;

    let mut connection = lock_connection(&state.db_connection)?;
    let spending = add_spending(user_id, new_spending, &mut connection)?;

    Ok(success(SpendingResponse { spending }))
}

/// Get one of the signed in user's spendings.
pub async fn get_spending_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(spending_id): ApiPath<DatabaseId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let spending = get_owned_spending(user_id, spending_id, &connection)?;

    Ok(success(SpendingResponse { spending }))
}

/// Replace one of the signed in user's spendings.
pub async fn update_spending_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(spending_id): ApiPath<DatabaseId>,
    ApiJson(request): ApiJson<SpendingRequest>,
) -> Result<Response, Error> {
    let new_spending = request.validate()?;

    let mut connection = lock_connection(&state.db_connection)?;
    let spending = edit_spending(user_id, spending_id, new_spending, &mut connection)?;

    Ok(success(SpendingResponse { spending }))
}

/// Get the signed in user's spendings for a month, grouped by day.
pub async fn get_monthly_spendings_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Response, Error> {
    let month =
        Month::try_from(query.month).map_err(|error| Error::InvalidQuery(error.to_string()))?;

    let connection = lock_connection(&state.db_connection)?;
    let spendings = get_spendings_in_month(user_id, query.year, month, &connection)?;

    Ok(success(MonthlySpendingsResponse {
        spending: MonthlySpendings::group(query.year, month, spendings)?,
    }))
}
