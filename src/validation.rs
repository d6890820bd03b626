//! Collects per-field validation messages for request bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::Error;

/// A user-facing message explaining why a single value is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidField(pub &'static str);

/// Maps the name of a request field to the message explaining why it is invalid.
///
/// Only the first message recorded for a field is kept, so callers should
/// check the most basic rule (e.g., "is it blank?") first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already has a message.
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_owned())
            .or_insert_with(|| message.to_owned());
    }

    /// Unwrap `result`, recording its message under `field` if it failed.
    pub fn check<T>(&mut self, field: &str, result: Result<T, InvalidField>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(InvalidField(message)) => {
                self.add(field, message);
                None
            }
        }
    }

    /// Shorthand for a request with a single validated field.
    pub fn single<T>(field: &str, result: Result<T, InvalidField>) -> Result<T, Error> {
        let mut field_errors = Self::new();

        match field_errors.check(field, result) {
            Some(value) => Ok(value),
            None => Err(Error::InvalidFields(field_errors)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return `value` if no field errors were recorded, otherwise an
    /// [Error::InvalidFields] holding every message.
    pub fn into_result<T>(self, value: T) -> Result<T, Error> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(Error::InvalidFields(self))
        }
    }
}

/// Return the first message from `checks` whose condition is true.
///
/// Shorthand for validating a single field against an ordered list of rules.
pub fn first_failure<'a>(checks: &[(bool, &'a str)]) -> Option<&'a str> {
    checks
        .iter()
        .find(|(failed, _)| *failed)
        .map(|(_, message)| *message)
}

#[cfg(test)]
mod field_errors_tests {
    use crate::Error;

    use super::{FieldErrors, InvalidField, first_failure};

    #[test]
    fn keeps_first_message_per_field() {
        let mut errors = FieldErrors::new();

        errors.add("email", "first");
        errors.add("email", "second");

        assert_eq!(errors.get("email"), Some("first"));
    }

    #[test]
    fn check_records_failures_and_passes_values() {
        let mut errors = FieldErrors::new();

        let good = errors.check("amount", Ok::<_, InvalidField>(10));
        let bad = errors.check::<i64>("memo", Err(InvalidField("too long")));

        assert_eq!(good, Some(10));
        assert_eq!(bad, None);
        assert_eq!(errors.get("memo"), Some("too long"));
        assert_eq!(errors.get("amount"), None);
    }

    #[test]
    fn into_result_succeeds_when_empty() {
        assert_eq!(FieldErrors::new().into_result(42), Ok(42));
    }

    #[test]
    fn into_result_fails_when_not_empty() {
        let mut errors = FieldErrors::new();
        errors.add("name", "bad name");

        let result = errors.clone().into_result(());

        assert_eq!(result, Err(Error::InvalidFields(errors)));
    }

    #[test]
    fn first_failure_picks_earliest_failed_check() {
        let got = first_failure(&[(false, "a"), (true, "b"), (true, "c")]);

        assert_eq!(got, Some("b"));
    }
}
