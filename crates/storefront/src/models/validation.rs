//! Field-level validation errors.

use std::fmt;

use serde::Serialize;

/// A single problem with one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The camelCase field name as sent by the client.
    pub field: &'static str,
    pub message: String,
}

/// Every problem found while validating a request body.
///
/// Validation collects all failures rather than stopping at the first, so
/// the client can highlight every bad field at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a problem with `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// A single-field error.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(value)` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Trim `value`, recording an error if nothing is left.
pub(crate) fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "is required");
    }
    trimmed.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_field() {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", "   ");
        let city = required_text(&mut errors, "city", " Lyon ");
        errors.add("price", "must be greater than 0");

        assert_eq!(name, "");
        assert_eq!(city, "Lyon");
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(
            errors.to_string(),
            "name: is required; price: must be greater than 0"
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ValidationErrors::new().into_result(5), Ok(5));
        assert!(ValidationErrors::single("x", "bad").into_result(5).is_err());
    }
}
