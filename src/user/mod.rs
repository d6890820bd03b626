//! User accounts: profile, names and notification settings.

mod account;
mod db;
mod domain;

pub use account::{
    get_my_account_endpoint, turn_off_notification_endpoint, turn_on_notification_endpoint,
    update_name_endpoint, update_username_endpoint,
};
pub use db::{
    create_user, create_user_table, get_user_by_id, get_user_by_username, update_name,
    update_notify_setting, update_username,
};
pub use domain::{Name, NotifySetting, NotifyType, User, UserError, UserID, Username};
