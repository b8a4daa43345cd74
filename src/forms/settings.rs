use super::{Checks, Validate, ValidationErrors};
use base64::Engine;
use serde::Deserialize;
use std::fmt;
use utoipa::ToSchema;

const MIN_PROFILE_NAME_CHARS: usize = 3;
const MIN_SETTINGS_PASSWORD_CHARS: usize = 3;

/// Largest accepted avatar, decoded.
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

#[derive(ToSchema, Deserialize, Debug, Clone)]
pub struct ProfileForm {
    pub name: String,
    #[serde(default)]
    pub introduction: Option<String>,
    /// `data:<mime>;base64,<payload>`
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Validate for ProfileForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::default();
        checks.min_chars("name", &self.name, MIN_PROFILE_NAME_CHARS);
        if let Some(avatar) = &self.avatar {
            match avatar_size(avatar) {
                Some(size) if size <= MAX_AVATAR_BYTES => {}
                Some(_) => checks.fail("avatar", "must not exceed 2 MB"),
                None => checks.fail("avatar", "must be a base64 data URL"),
            }
        }
        checks.finish()
    }
}

/// Decoded size of a base64 data URL, `None` if it is not one.
fn avatar_size(data_url: &str) -> Option<usize> {
    let rest = data_url.strip_prefix("data:")?;
    let (_mime, payload) = rest.split_once(";base64,")?;
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()
        .map(|bytes| bytes.len())
}

#[derive(ToSchema, Deserialize, Clone)]
pub struct PasswordChangeForm {
    pub current_password: String,
    pub new_password: String,
    pub re_new_password: String,
}

impl Validate for PasswordChangeForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::default();
        checks.min_chars(
            "current_password",
            &self.current_password,
            MIN_SETTINGS_PASSWORD_CHARS,
        );
        checks.min_chars("new_password", &self.new_password, MIN_SETTINGS_PASSWORD_CHARS);
        checks.min_chars(
            "re_new_password",
            &self.re_new_password,
            MIN_SETTINGS_PASSWORD_CHARS,
        );
        checks.same_as("re_new_password", &self.re_new_password, &self.new_password);
        checks.finish()
    }
}

impl fmt::Debug for PasswordChangeForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChangeForm")
            .field("current_password", &"***")
            .field("new_password", &"***")
            .field("re_new_password", &"***")
            .finish()
    }
}
