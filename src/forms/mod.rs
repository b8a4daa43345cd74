//! Input validation for every form, run before anything leaves the process.

mod account;
mod settings;

pub use self::account::{ActivationForm, ForgotPasswordForm, LoginForm, ResetPasswordForm, SignupForm};
pub use self::settings::{PasswordChangeForm, ProfileForm, MAX_AVATAR_BYTES};

use regex::Regex;
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

pub trait Validate {
    /// # Errors
    /// Returns every failing field, not just the first.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|error| error.field).collect()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Basic email format check.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email.trim()))
}

/// Collects field errors for one form.
#[derive(Default)]
struct Checks(Vec<FieldError>);

impl Checks {
    fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn required(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.fail(field, "is required");
        }
    }

    fn email(&mut self, field: &'static str, value: &str) {
        if !valid_email(value) {
            self.fail(field, "is not a valid email address");
        }
    }

    fn min_chars(&mut self, field: &'static str, value: &str, min: usize) {
        if value.chars().count() < min {
            self.fail(field, format!("must be at least {min} characters"));
        }
    }

    fn same_as(&mut self, field: &'static str, value: &str, expected: &str) {
        if value != expected {
            self.fail(field, "does not match the new password");
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email(" name.surname@example.co "));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("bad"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
        assert!(!valid_email("two words@example.com"));
    }

    #[test]
    fn min_chars_counts_characters_not_bytes() {
        let mut checks = Checks::default();
        checks.min_chars("name", "太郎", 2);
        assert!(checks.finish().is_ok());
    }

    #[test]
    fn errors_display_every_field() {
        let mut checks = Checks::default();
        checks.required("uid", "");
        checks.email("email", "bad");
        let errors = checks.finish().err();
        assert_eq!(
            errors.map(|e| e.to_string()).as_deref(),
            Some("uid: is required, email: is not a valid email address")
        );
    }
}
