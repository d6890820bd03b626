//! The spending ledger: spendings, custom categories and resolving which
//! category a spending may use.

mod category;
mod core;
mod custom_category;
mod endpoints;
mod request;
mod resolver;
mod search;
mod usecase;

pub use category::{
    BUILT_IN_CATEGORY_ID, ResolvedCategory, SpendingCategory, SpendingCategoryReference,
    SpendingError, UnknownSpendingCategory,
};
pub use core::{
    Spending, SpendingDetails, create_spending, create_spending_tables, get_spending,
    get_spendings_in_month, update_spending,
};
pub use custom_category::{
    CustomCategoryLookup, CustomCategoryName, SpendingCustomCategory, create_custom_category,
    create_custom_category_table, get_custom_categories_by_owner,
};
pub use endpoints::{
    create_custom_category_endpoint, create_spending_endpoint, get_custom_categories_endpoint,
    get_monthly_spendings_endpoint, get_spending_endpoint, update_spending_endpoint,
};
pub use request::{NewSpending, SpendingRequest};
pub use resolver::resolve_category;
pub use search::MonthlySpendings;
pub use usecase::{add_spending, edit_spending, get_owned_spending};

pub(crate) use custom_category::parse_icon;
