//! The uniform `{success, user?, errors?}` body and the errors that map onto it.

use crate::{
    backend::{ApiError, UserProfile},
    forms::{FieldError, ValidationErrors},
};
use axum::{
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ActionResult {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            user: None,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_user(user: UserProfile) -> Self {
        Self {
            user: Some(user),
            ..Self::ok()
        }
    }

    #[must_use]
    pub fn failed(errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            user: None,
            errors,
        }
    }
}

/// Every way an action can fail; all of them render as `{success: false}`.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("missing payload")]
    MissingPayload,
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
    /// No live session; carries the header that clears the stale cookie.
    #[error("no active session")]
    Unauthenticated { clear_cookie: Option<HeaderValue> },
    #[error("already signed in")]
    AlreadySignedIn,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ActionError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingPayload => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::AlreadySignedIn => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Api(err) => match err {
                ApiError::Status { status, .. } if *status == StatusCode::NOT_FOUND => {
                    StatusCode::NOT_FOUND
                }
                ApiError::Status { status, .. } if status.is_client_error() => {
                    StatusCode::BAD_REQUEST
                }
                ApiError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::Status { .. }
                | ApiError::Transport { .. }
                | ApiError::InvalidResponse { .. } => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Action failed: {self}");
        } else if matches!(self, Self::Api(_)) {
            warn!("Action rejected upstream: {self}");
        } else {
            debug!("Action refused: {self}");
        }

        match self {
            Self::Validation(errors) => {
                (status, Json(ActionResult::failed(errors.into_inner()))).into_response()
            }
            Self::Unauthenticated {
                clear_cookie: Some(cookie),
            } => (
                status,
                [(SET_COOKIE, cookie)],
                Json(ActionResult::failed(Vec::new())),
            )
                .into_response(),
            _ => (status, Json(ActionResult::failed(Vec::new()))).into_response(),
        }
    }
}
