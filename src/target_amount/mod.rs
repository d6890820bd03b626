//! Monthly spending targets.

mod db;
mod endpoints;

pub use db::{
    TargetAmount, TargetAmountError, create_target_amount_table, get_target_amount,
    save_target_amount,
};
pub use endpoints::{get_target_amount_endpoint, put_target_amount_endpoint};
