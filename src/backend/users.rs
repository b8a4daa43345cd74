//! Account actions forwarded to the remote API.

use super::{decode, tokens::CURRENT_USER_PATH, ApiClient, ApiError, UserProfile};
use reqwest::Method;
use secrecy::SecretString;
use serde::Serialize;
use tracing::instrument;

pub const REGISTER_PATH: &str = "/api/auth/users/";
pub const ACTIVATION_PATH: &str = "/api/auth/users/activation/";
pub const RESET_PASSWORD_PATH: &str = "/api/auth/users/reset_password/";
pub const RESET_PASSWORD_CONFIRM_PATH: &str = "/api/auth/users/reset_password_confirm/";
pub const SET_PASSWORD_PATH: &str = "/api/auth/users/set_password/";

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    re_password: &'a str,
}

#[derive(Serialize)]
struct ActivationRequest<'a> {
    uid: &'a str,
    token: &'a str,
}

#[derive(Serialize)]
struct ResetPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct ResetPasswordConfirmRequest<'a> {
    uid: &'a str,
    token: &'a str,
    new_password: &'a str,
    re_new_password: &'a str,
}

#[derive(Serialize)]
struct SetPasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
    re_new_password: &'a str,
}

/// Body of `PATCH /api/auth/users/me/`.
///
/// `None` fields are left out of the body so the API keeps what it has.
/// `avatar` is a base64 data URL.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<&'a str>,
}

impl ApiClient {
    /// Start a registration; the API mails an activation link.
    ///
    /// # Errors
    /// Returns an error if the API does not accept the registration.
    #[instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let body = RegisterRequest {
            name,
            email,
            password,
            re_password: password,
        };
        self.send(
            REGISTER_PATH,
            self.request(Method::POST, REGISTER_PATH, None).json(&body),
        )
        .await?;
        Ok(())
    }

    /// Complete a registration with the `uid`/`token` pair from the email link.
    ///
    /// # Errors
    /// Returns an error if the API rejects the activation.
    #[instrument(skip(self, token))]
    pub async fn activate(&self, uid: &str, token: &str) -> Result<(), ApiError> {
        self.send(
            ACTIVATION_PATH,
            self.request(Method::POST, ACTIVATION_PATH, None)
                .json(&ActivationRequest { uid, token }),
        )
        .await?;
        Ok(())
    }

    /// Ask the API to mail a password reset link.
    ///
    /// # Errors
    /// Returns an error if the API rejects the request.
    #[instrument(skip(self))]
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        self.send(
            RESET_PASSWORD_PATH,
            self.request(Method::POST, RESET_PASSWORD_PATH, None)
                .json(&ResetPasswordRequest { email }),
        )
        .await?;
        Ok(())
    }

    /// Set a new password with the `uid`/`token` pair from the reset link.
    ///
    /// # Errors
    /// Returns an error if the API rejects the reset.
    #[instrument(skip(self, token, new_password, re_new_password))]
    pub async fn confirm_password_reset(
        &self,
        uid: &str,
        token: &str,
        new_password: &str,
        re_new_password: &str,
    ) -> Result<(), ApiError> {
        let body = ResetPasswordConfirmRequest {
            uid,
            token,
            new_password,
            re_new_password,
        };
        self.send(
            RESET_PASSWORD_CONFIRM_PATH,
            self.request(Method::POST, RESET_PASSWORD_CONFIRM_PATH, None)
                .json(&body),
        )
        .await?;
        Ok(())
    }

    /// `GET /api/users/{id}/`, no authentication.
    ///
    /// # Errors
    /// Returns an error if `id` is not a plain identifier, the user does not
    /// exist, or the profile is incomplete.
    #[instrument(skip(self))]
    pub async fn public_profile(&self, id: &str) -> Result<UserProfile, ApiError> {
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ApiError::InvalidInput {
                field: "id",
                reason: "must be a non-empty alphanumeric identifier",
            });
        }

        let path = format!("/api/users/{id}/");
        let response = self
            .send(&path, self.request(Method::GET, &path, None))
            .await?;
        decode(&path, response).await
    }

    /// Update the signed-in user's profile and return the stored result.
    ///
    /// # Errors
    /// Returns an error if the API rejects the update or returns an
    /// incomplete profile.
    #[instrument(skip(self, access, update))]
    pub async fn update_profile(
        &self,
        access: &SecretString,
        update: &ProfileUpdate<'_>,
    ) -> Result<UserProfile, ApiError> {
        let response = self
            .send(
                CURRENT_USER_PATH,
                self.request(Method::PATCH, CURRENT_USER_PATH, Some(access))
                    .json(update),
            )
            .await?;
        decode(CURRENT_USER_PATH, response).await
    }

    /// Change the signed-in user's password.
    ///
    /// # Errors
    /// Returns an error if the API rejects the change.
    #[instrument(skip_all)]
    pub async fn set_password(
        &self,
        access: &SecretString,
        current_password: &str,
        new_password: &str,
        re_new_password: &str,
    ) -> Result<(), ApiError> {
        let body = SetPasswordRequest {
            current_password,
            new_password,
            re_new_password,
        };
        self.send(
            SET_PASSWORD_PATH,
            self.request(Method::POST, SET_PASSWORD_PATH, Some(access))
                .json(&body),
        )
        .await?;
        Ok(())
    }
}
