//! Core user domain types.

use std::{fmt::Display, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{password::PasswordHash, validation::InvalidField};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z\-_.]{5,20}$").expect("invalid username pattern"));

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[가-힣a-z]{2,8}$").expect("invalid name pattern"));

/// The unique ID a user signs in with, e.g. "pennyway".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Username(String);

impl Username {
    /// Create a username.
    ///
    /// # Errors
    ///
    /// Fails if `username` is blank or is not 5 to 20 lowercase letters, '-', '_' or '.'.
    pub fn new(username: &str) -> Result<Self, InvalidField> {
        if username.trim().is_empty() {
            return Err(InvalidField("아이디를 입력해주세요"));
        }

        if !USERNAME_PATTERN.is_match(username) {
            return Err(InvalidField(
                "5~20자의 영문 소문자, -, _, . 만 사용 가능합니다.",
            ));
        }

        Ok(Self(username.to_owned()))
    }

    /// Create a username without validation.
    ///
    /// The caller should ensure that the string follows the username rules.
    pub fn new_unchecked(username: &str) -> Self {
        Self(username.to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user's display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Name(String);

impl Name {
    /// Create a display name.
    ///
    /// # Errors
    ///
    /// Fails if `name` is blank or is not 2 to 8 Hangul syllables or lowercase letters.
    pub fn new(name: &str) -> Result<Self, InvalidField> {
        if name.trim().is_empty() {
            return Err(InvalidField("이름을 입력해주세요"));
        }

        if !NAME_PATTERN.is_match(name) {
            return Err(InvalidField("2~8자의 한글, 영문 소문자만 사용 가능합니다."));
        }

        Ok(Self(name.to_owned()))
    }

    /// Create a display name without validation.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The kinds of push notification a user can opt in or out of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotifyType {
    AccountBook,
    Feed,
    Chat,
}

impl NotifyType {
    /// The name of the column in the user table that stores this setting.
    pub(crate) fn column(&self) -> &'static str {
        match self {
            NotifyType::AccountBook => "account_book_notify",
            NotifyType::Feed => "feed_notify",
            NotifyType::Chat => "chat_notify",
        }
    }
}

/// Which push notifications a user receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifySetting {
    pub account_book_notify: bool,
    pub feed_notify: bool,
    pub chat_notify: bool,
}

impl Default for NotifySetting {
    fn default() -> Self {
        Self {
            account_book_notify: true,
            feed_notify: true,
            chat_notify: true,
        }
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserID,
    pub username: Username,
    pub name: Name,
    pub password_hash: PasswordHash,
    pub notify_setting: NotifySetting,
}

/// The ways a user account operation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    /// No user has the given ID or username.
    #[error("the user could not be found")]
    NotFound,

    /// Another user already signed up with the username.
    #[error("the username is already taken")]
    DuplicateUsername,

    /// The username and password do not match a registered user.
    #[error("the username or password is incorrect")]
    InvalidCredentials,
}

#[cfg(test)]
mod username_tests {
    use crate::validation::InvalidField;

    use super::Username;

    #[test]
    fn new_fails_on_blank() {
        assert_eq!(
            Username::new("  "),
            Err(InvalidField("아이디를 입력해주세요"))
        );
    }

    #[test]
    fn new_fails_on_uppercase() {
        assert!(Username::new("PennyWay").is_err());
    }

    #[test]
    fn new_fails_on_short_username() {
        assert!(Username::new("abcd").is_err());
    }

    #[test]
    fn new_succeeds_with_punctuation() {
        assert!(Username::new("penny-way_.").is_ok());
    }
}

#[cfg(test)]
mod name_tests {
    use super::Name;

    #[test]
    fn new_succeeds_on_hangul() {
        assert!(Name::new("페니웨이").is_ok());
    }

    #[test]
    fn new_succeeds_on_lowercase() {
        assert!(Name::new("penny").is_ok());
    }

    #[test]
    fn new_fails_on_single_character() {
        assert!(Name::new("페").is_err());
    }

    #[test]
    fn new_fails_on_digits() {
        assert!(Name::new("penny1").is_err());
    }
}
