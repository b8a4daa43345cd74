//! JWT issuance, verification and refresh.

use super::{decode, ApiClient, ApiError, TokenPair, UserProfile};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

pub const JWT_CREATE_PATH: &str = "/api/auth/jwt/create/";
pub const JWT_VERIFY_PATH: &str = "/api/auth/jwt/verify/";
pub const JWT_REFRESH_PATH: &str = "/api/auth/jwt/refresh/";
pub const CURRENT_USER_PATH: &str = "/api/auth/users/me/";

#[derive(Serialize)]
struct CreateRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct CreateResponse {
    access: String,
    refresh: String,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

impl ApiClient {
    /// Trade email/password for a token pair, then load the user's profile
    /// with the new access token.
    ///
    /// # Errors
    /// Returns an error if an input is empty, either call fails, or a
    /// required field is missing from a response.
    #[instrument(skip(self, password))]
    pub async fn exchange_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(TokenPair, UserProfile), ApiError> {
        let tokens = self.issue_tokens(email, password).await?;
        let user = self.current_user(tokens.access()).await?;
        debug!(user_id = %user.id, "credentials exchanged");
        Ok((tokens, user))
    }

    /// `POST /api/auth/jwt/create/`
    ///
    /// # Errors
    /// Returns an error on empty input, non-success status, or a response
    /// without both tokens.
    pub async fn issue_tokens(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        if email.trim().is_empty() {
            return Err(ApiError::InvalidInput {
                field: "email",
                reason: "must not be empty",
            });
        }
        if password.is_empty() {
            return Err(ApiError::InvalidInput {
                field: "password",
                reason: "must not be empty",
            });
        }

        let body = CreateRequest {
            email: email.trim(),
            password,
        };
        let response = self
            .send(
                JWT_CREATE_PATH,
                self.request(Method::POST, JWT_CREATE_PATH, None).json(&body),
            )
            .await?;
        let issued: CreateResponse = decode(JWT_CREATE_PATH, response).await?;

        if issued.access.is_empty() || issued.refresh.is_empty() {
            return Err(ApiError::InvalidResponse {
                path: JWT_CREATE_PATH.to_string(),
                reason: "empty access or refresh token".to_string(),
            });
        }

        Ok(TokenPair::new(
            SecretString::from(issued.access),
            SecretString::from(issued.refresh),
        ))
    }

    /// `GET /api/auth/users/me/`
    ///
    /// # Errors
    /// Returns an error on non-success status or an incomplete profile.
    pub async fn current_user(&self, access: &SecretString) -> Result<UserProfile, ApiError> {
        let response = self
            .send(
                CURRENT_USER_PATH,
                self.request(Method::GET, CURRENT_USER_PATH, Some(access)),
            )
            .await?;
        decode(CURRENT_USER_PATH, response).await
    }

    /// Ask the API whether `access` is still valid.
    ///
    /// Fail-closed: anything but a success status means invalid.
    #[instrument(skip_all)]
    pub async fn verify_token(&self, access: &SecretString) -> bool {
        let token = access.expose_secret();
        if token.is_empty() {
            return false;
        }

        let builder = self
            .request(Method::POST, JWT_VERIFY_PATH, None)
            .json(&VerifyRequest { token });
        match self.send(JWT_VERIFY_PATH, builder).await {
            Ok(_) => true,
            Err(ApiError::Status { status, .. }) => {
                debug!("access token rejected: {status}");
                false
            }
            Err(e) => {
                warn!("Error verifying access token: {e}");
                false
            }
        }
    }

    /// Mint a new access token from `refresh`.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status, or a
    /// response without an access token.
    #[instrument(skip_all)]
    pub async fn refresh_token(&self, refresh: &SecretString) -> Result<SecretString, ApiError> {
        let token = refresh.expose_secret();
        if token.is_empty() {
            return Err(ApiError::InvalidInput {
                field: "refresh",
                reason: "must not be empty",
            });
        }

        let builder = self
            .request(Method::POST, JWT_REFRESH_PATH, None)
            .json(&RefreshRequest { refresh: token });
        let response = self.send(JWT_REFRESH_PATH, builder).await?;
        let refreshed: RefreshResponse = decode(JWT_REFRESH_PATH, response).await?;

        if refreshed.access.is_empty() {
            return Err(ApiError::InvalidResponse {
                path: JWT_REFRESH_PATH.to_string(),
                reason: "empty access token".to_string(),
            });
        }

        Ok(SecretString::from(refreshed.access))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::test_support::{can_bind_localhost, closed_port_url};
    use anyhow::Result;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn profile_json() -> serde_json::Value {
        json!({
            "uid": "k3Yq8ZbW",
            "name": "Alice",
            "email": "alice@example.com",
            "avatar": null,
            "introduction": "hello",
            "created_at": "2024-05-01T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn exchange_credentials_issues_tokens_and_loads_profile() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(JWT_CREATE_PATH))
            .and(body_json(json!({
                "email": "alice@example.com",
                "password": "correct-horse"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": "access-1",
                "refresh": "refresh-1"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(CURRENT_USER_PATH))
            .and(header("Authorization", "JWT access-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
            .expect(1)
            .mount(&server)
            .await;

        let (tokens, user) = client(&server)
            .exchange_credentials(" alice@example.com ", "correct-horse")
            .await?;

        assert_eq!(tokens.access().expose_secret(), "access-1");
        assert_eq!(tokens.refresh().expose_secret(), "refresh-1");
        assert_eq!(user.id, "k3Yq8ZbW");
        assert_eq!(user.bio, "hello");
        Ok(())
    }

    #[tokio::test]
    async fn exchange_credentials_stops_on_rejected_login() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(JWT_CREATE_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "No active account found with the given credentials"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(CURRENT_USER_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
            .expect(0)
            .mount(&server)
            .await;

        let result = client(&server)
            .exchange_credentials("alice@example.com", "wrong-password")
            .await;

        assert_eq!(
            result.err().and_then(|e| e.upstream_status()),
            Some(StatusCode::UNAUTHORIZED)
        );
        Ok(())
    }

    #[tokio::test]
    async fn exchange_credentials_requires_both_tokens() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(JWT_CREATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "a" })))
            .mount(&server)
            .await;

        let result = client(&server)
            .exchange_credentials("alice@example.com", "correct-horse")
            .await;
        assert!(matches!(result, Err(ApiError::InvalidResponse { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn exchange_credentials_fails_on_incomplete_profile() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(JWT_CREATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": "access-1",
                "refresh": "refresh-1"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(CURRENT_USER_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Alice" })))
            .mount(&server)
            .await;

        let result = client(&server)
            .exchange_credentials("alice@example.com", "correct-horse")
            .await;
        assert!(matches!(result, Err(ApiError::InvalidResponse { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn issue_tokens_rejects_empty_input_without_request() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(JWT_CREATE_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let api = client(&server);
        assert!(matches!(
            api.issue_tokens("", "password").await,
            Err(ApiError::InvalidInput { field: "email", .. })
        ));
        assert!(matches!(
            api.issue_tokens("alice@example.com", "").await,
            Err(ApiError::InvalidInput {
                field: "password",
                ..
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn verify_token_accepts_success_status() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(JWT_VERIFY_PATH))
            .and(body_json(json!({ "token": "access-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(3)
            .mount(&server)
            .await;

        let api = client(&server);
        let token = secret("access-1");
        // Same token, same answer.
        for _ in 0..3 {
            assert!(api.verify_token(&token).await);
        }
        Ok(())
    }

    #[tokio::test]
    async fn verify_token_rejects_client_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(JWT_VERIFY_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Token is invalid or expired",
                "code": "token_not_valid"
            })))
            .mount(&server)
            .await;

        assert!(!client(&server).verify_token(&secret("expired")).await);
        Ok(())
    }

    #[tokio::test]
    async fn verify_token_fails_closed_on_server_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(JWT_VERIFY_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(!client(&server).verify_token(&secret("access-1")).await);
        Ok(())
    }

    #[tokio::test]
    async fn verify_token_fails_closed_on_transport_error() {
        let api = ApiClient::new(&closed_port_url(), Duration::from_secs(1)).unwrap();
        assert!(!api.verify_token(&secret("access-1")).await);
    }

    #[tokio::test]
    async fn verify_token_empty_is_invalid() {
        let api = ApiClient::new(&closed_port_url(), Duration::from_secs(1)).unwrap();
        assert!(!api.verify_token(&secret("")).await);
    }

    #[tokio::test]
    async fn refresh_token_returns_new_access() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(JWT_REFRESH_PATH))
            .and(body_json(json!({ "refresh": "refresh-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "access-2" })))
            .expect(1)
            .mount(&server)
            .await;

        let access = client(&server).refresh_token(&secret("refresh-1")).await?;
        assert_eq!(access.expose_secret(), "access-2");
        Ok(())
    }

    #[tokio::test]
    async fn refresh_token_propagates_rejection() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(JWT_REFRESH_PATH))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client(&server).refresh_token(&secret("refresh-1")).await;
        assert_eq!(
            result.err().and_then(|e| e.upstream_status()),
            Some(StatusCode::UNAUTHORIZED)
        );
        Ok(())
    }

    #[tokio::test]
    async fn refresh_token_propagates_transport_error() {
        let api = ApiClient::new(&closed_port_url(), Duration::from_secs(1)).unwrap();
        let result = api.refresh_token(&secret("refresh-1")).await;
        assert!(matches!(result, Err(ApiError::Transport { .. })));
    }
}
