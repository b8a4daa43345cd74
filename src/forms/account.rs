use super::{Checks, Validate, ValidationErrors};
use serde::Deserialize;
use std::fmt;
use utoipa::ToSchema;

const MIN_NAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 8;

#[derive(ToSchema, Deserialize, Clone)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Validate for SignupForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::default();
        checks.min_chars("name", &self.name, MIN_NAME_CHARS);
        checks.email("email", &self.email);
        checks.min_chars("password", &self.password, MIN_PASSWORD_CHARS);
        checks.finish()
    }
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Deserialize, Debug, Clone)]
pub struct ActivationForm {
    pub uid: String,
    pub token: String,
}

impl Validate for ActivationForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::default();
        checks.required("uid", &self.uid);
        checks.required("token", &self.token);
        checks.finish()
    }
}

#[derive(ToSchema, Deserialize, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::default();
        checks.email("email", &self.email);
        checks.min_chars("password", &self.password, MIN_PASSWORD_CHARS);
        checks.finish()
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Deserialize, Debug, Clone)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl Validate for ForgotPasswordForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::default();
        checks.email("email", &self.email);
        checks.finish()
    }
}

/// Second step of a password reset, carrying the ids from the emailed link.
#[derive(ToSchema, Deserialize, Clone)]
pub struct ResetPasswordForm {
    pub uid: String,
    pub token: String,
    pub new_password: String,
    pub re_new_password: String,
}

impl Validate for ResetPasswordForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::default();
        checks.required("uid", &self.uid);
        checks.required("token", &self.token);
        checks.min_chars("new_password", &self.new_password, MIN_PASSWORD_CHARS);
        checks.min_chars("re_new_password", &self.re_new_password, MIN_PASSWORD_CHARS);
        checks.same_as("re_new_password", &self.re_new_password, &self.new_password);
        checks.finish()
    }
}

impl fmt::Debug for ResetPasswordForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPasswordForm")
            .field("uid", &self.uid)
            .field("token", &"***")
            .field("new_password", &"***")
            .field("re_new_password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_rejects_every_bad_field() {
        let form = SignupForm {
            name: "a".to_string(),
            email: "bad".to_string(),
            password: "short".to_string(),
        };
        let errors = form.validate().err().map(|e| e.fields());
        assert_eq!(errors, Some(vec!["name", "email", "password"]));
    }

    #[test]
    fn signup_name_needs_two_characters() {
        let mut form = SignupForm {
            name: "ab".to_string(),
            email: "alice@example.com".to_string(),
            password: "correct-horse".to_string(),
        };
        assert!(form.validate().is_ok());

        form.name = "a".to_string();
        assert_eq!(form.validate().err().map(|e| e.fields()), Some(vec!["name"]));
    }

    #[test]
    fn login_requires_email_and_long_password() {
        let form = LoginForm {
            email: "alice@example.com".to_string(),
            password: "1234567".to_string(),
        };
        assert_eq!(
            form.validate().err().map(|e| e.fields()),
            Some(vec!["password"])
        );

        let form = LoginForm {
            email: "alice@example.com".to_string(),
            password: "12345678".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn forgot_password_checks_email() {
        let form = ForgotPasswordForm {
            email: "alice.example.com".to_string(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn reset_password_requires_matching_confirmation() {
        let form = ResetPasswordForm {
            uid: "MQ".to_string(),
            token: "c3x8-abc".to_string(),
            new_password: "battery-staple".to_string(),
            re_new_password: "battery-stapler".to_string(),
        };
        assert_eq!(
            form.validate().err().map(|e| e.fields()),
            Some(vec!["re_new_password"])
        );
    }

    #[test]
    fn reset_password_requires_link_ids() {
        let form = ResetPasswordForm {
            uid: " ".to_string(),
            token: String::new(),
            new_password: "battery-staple".to_string(),
            re_new_password: "battery-staple".to_string(),
        };
        assert_eq!(
            form.validate().err().map(|e| e.fields()),
            Some(vec!["uid", "token"])
        );
    }

    #[test]
    fn activation_requires_uid_and_token() {
        let form = ActivationForm {
            uid: "MQ".to_string(),
            token: String::new(),
        };
        assert_eq!(form.validate().err().map(|e| e.fields()), Some(vec!["token"]));
    }

    #[test]
    fn debug_hides_passwords() {
        let form = LoginForm {
            email: "alice@example.com".to_string(),
            password: "correct-horse".to_string(),
        };
        assert!(!format!("{form:?}").contains("correct-horse"));
    }
}
