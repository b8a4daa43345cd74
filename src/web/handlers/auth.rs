//! Login, logout and session lookup.

use super::validated;
use crate::{
    forms::LoginForm,
    session::Session,
    web::{
        cookie::{clear_session_cookie, extract_session_token, session_cookie},
        response::{ActionError, ActionResult},
        state::PortalState,
    },
};
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info};

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginForm,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = ActionResult),
        (status = 400, description = "Credentials rejected", body = ActionResult),
        (status = 422, description = "Invalid input", body = ActionResult),
        (status = 502, description = "Authentication API unavailable", body = ActionResult)
    ),
    tag = "auth"
)]
pub async fn login(
    headers: HeaderMap,
    Extension(state): Extension<Arc<PortalState>>,
    payload: Option<Json<LoginForm>>,
) -> Result<Response, ActionError> {
    let form = validated(payload)?;

    // Signing in replaces whatever session this browser had.
    if let Some(previous) = extract_session_token(&headers) {
        state.sessions().remove(&previous).await;
    }

    let (tokens, user) = state
        .client()
        .exchange_credentials(&form.email, &form.password)
        .await?;

    let token = state
        .sessions()
        .create(tokens, user.clone())
        .await
        .map_err(|e| ActionError::Internal(format!("{e:#}")))?;

    let cookie = match session_cookie(
        &token,
        state.sessions().ttl().as_secs(),
        state.cookie_secure(),
    ) {
        Ok(cookie) => cookie,
        Err(e) => {
            state.sessions().remove(&token).await;
            return Err(ActionError::Internal(format!(
                "failed to build session cookie: {e}"
            )));
        }
    };

    info!(user_id = %user.id, "signed in");

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(ActionResult::with_user(user)),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 200, description = "Session cleared", body = ActionResult)
    ),
    tag = "auth"
)]
pub async fn logout(
    headers: HeaderMap,
    Extension(state): Extension<Arc<PortalState>>,
) -> impl IntoResponse {
    if let Some(token) = extract_session_token(&headers) {
        if state.sessions().remove(&token).await {
            debug!("session removed");
        }
    }

    // Always clear the cookie, even if the session record was missing.
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(state.cookie_secure()) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (StatusCode::OK, response_headers, Json(ActionResult::ok()))
}

#[utoipa::path(
    get,
    path = "/v1/auth/session",
    responses(
        (status = 200, description = "Session is active", body = ActionResult),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn session(
    headers: HeaderMap,
    Extension(state): Extension<Arc<PortalState>>,
) -> Response {
    // Missing cookies are treated as "no session".
    let Some(token) = extract_session_token(&headers) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    match state.sessions().read(state.client(), &token).await {
        Session::Authenticated(record) => {
            (StatusCode::OK, Json(ActionResult::with_user(record.user))).into_response()
        }
        Session::Absent => {
            let mut response_headers = HeaderMap::new();
            if let Ok(cookie) = clear_session_cookie(state.cookie_secure()) {
                response_headers.insert(SET_COOKIE, cookie);
            }
            (StatusCode::NO_CONTENT, response_headers).into_response()
        }
    }
}
