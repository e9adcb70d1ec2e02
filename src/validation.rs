// Request payload shape checks, mirroring the endpoint validators.
use std::collections::HashMap;

use crate::error::ApiError;

pub const CLASSIFICATIONS: &[&str] = &["city", "regency"];

/// Accumulates per-field messages and converts into a 400 with field errors.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(
                "Validation failed",
                Some(self.errors),
            ))
        }
    }
}

/// Pragmatic email shape check: one `@`, non-empty local part, and a dot in
/// the domain.
pub fn validate_email_format(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Trim and lowercase, as stored emails are compared exactly.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub fn check_email(errors: &mut FieldErrors, email: &str) {
    if !validate_email_format(email.trim()) {
        errors.push("email", "Invalid email address");
    }
}

pub fn check_password(errors: &mut FieldErrors, password: &str) {
    if password.trim().len() < 8 {
        errors.push("password", "Password must be at least 8 characters");
    }
}

pub fn check_max_length(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.push(field, "Must not be empty");
    } else if value.trim().len() > max {
        errors.push(field, format!("Must be at most {} characters", max));
    }
}

pub fn check_optional_max_length(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(value) = value {
        check_max_length(errors, field, value, max);
    }
}

pub fn check_classification(errors: &mut FieldErrors, classification: Option<&str>) {
    if let Some(value) = classification {
        if !CLASSIFICATIONS.contains(&value) {
            errors.push("classification", "Must be one of: city, regency");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        assert!(validate_email_format("admin@admin.com"));
        assert!(validate_email_format("a.b@sub.example.org"));
        assert!(!validate_email_format("no-at-sign"));
        assert!(!validate_email_format("@example.com"));
        assert!(!validate_email_format("user@"));
        assert!(!validate_email_format("user@nodot"));
        assert!(!validate_email_format("user@.com"));
        assert!(!validate_email_format("user name@example.com"));
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  Admin@Admin.COM "), "admin@admin.com");
    }

    #[test]
    fn password_minimum_length() {
        let mut errors = FieldErrors::new();
        check_password(&mut errors, "short");
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        check_password(&mut errors, "admin1234");
        assert!(errors.is_empty());
    }

    #[test]
    fn length_bounds() {
        let mut errors = FieldErrors::new();
        check_max_length(&mut errors, "code", "ID-JB", 16);
        assert!(errors.is_empty());

        let mut errors = FieldErrors::new();
        check_max_length(&mut errors, "code", &"x".repeat(17), 16);
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        check_max_length(&mut errors, "code", "   ", 16);
        assert!(!errors.is_empty());
    }

    #[test]
    fn classification_enum() {
        let mut errors = FieldErrors::new();
        check_classification(&mut errors, Some("city"));
        check_classification(&mut errors, Some("regency"));
        check_classification(&mut errors, None);
        assert!(errors.is_empty());

        let mut errors = FieldErrors::new();
        check_classification(&mut errors, Some("village"));
        assert!(!errors.is_empty());
    }

    #[test]
    fn field_errors_convert_to_validation_error() {
        let mut errors = FieldErrors::new();
        errors.push("email", "Invalid email address");
        let err = errors.into_result().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
