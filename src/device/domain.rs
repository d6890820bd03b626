use serde::Serialize;

use crate::{database_id::DatabaseId, user::UserID, validation::InvalidField};

/// A push notification token registered by one of a user's devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub id: DatabaseId,
    #[serde(skip)]
    pub user_id: UserID,
    pub token: String,
    #[serde(skip)]
    pub model: String,
    #[serde(skip)]
    pub os: String,
    #[serde(skip)]
    pub activated: bool,
}

/// The hardware and software a token was issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub model: String,
    pub os: String,
}

/// A token that is not blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceToken(String);

impl DeviceToken {
    pub fn new(token: &str) -> Result<Self, InvalidField> {
        if token.trim().is_empty() {
            Err(InvalidField("토큰은 필수입니다."))
        } else {
            Ok(Self(token.to_owned()))
        }
    }
}

impl AsRef<str> for DeviceToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The errors for device operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// The user has no device with the given token.
    #[error("the device could not be found")]
    NotFound,
}
