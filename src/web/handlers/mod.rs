pub mod auth;
pub mod health;
pub mod me;
pub mod password;
pub mod signup;
pub mod users;


// common functions for the handlers
use super::{
    cookie::{clear_session_cookie, extract_session_token},
    response::{ActionError, ActionResult},
    state::PortalState,
};
use crate::{
    forms::Validate,
    session::{Session, SessionRecord},
};
use axum::{
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

/// Unwrap an optional JSON body and validate it.
pub(crate) fn validated<T: Validate>(payload: Option<Json<T>>) -> Result<T, ActionError> {
    let Some(Json(form)) = payload else {
        return Err(ActionError::MissingPayload);
    };
    form.validate()?;
    Ok(form)
}

/// Resolve the caller's session, returning its cookie token and record.
pub(crate) async fn require_session(
    state: &PortalState,
    headers: &HeaderMap,
) -> Result<(String, SessionRecord), ActionError> {
    let Some(token) = extract_session_token(headers) else {
        return Err(ActionError::Unauthenticated { clear_cookie: None });
    };

    match state.sessions().read(state.client(), &token).await {
        Session::Authenticated(record) => Ok((token, record)),
        Session::Absent => {
            debug!("session cookie no longer resolves");
            Err(ActionError::Unauthenticated {
                clear_cookie: clear_session_cookie(state.cookie_secure()).ok(),
            })
        }
    }
}

/// Refuse account-entry actions while the browser is signed in.
///
/// Returns the header clearing a cookie that no longer resolves, if any.
pub(crate) async fn ensure_signed_out(
    state: &PortalState,
    headers: &HeaderMap,
) -> Result<Option<HeaderValue>, ActionError> {
    let Some(token) = extract_session_token(headers) else {
        return Ok(None);
    };

    match state.sessions().read(state.client(), &token).await {
        Session::Authenticated(_) => Err(ActionError::AlreadySignedIn),
        Session::Absent => {
            debug!("stale session cookie on signed-out action");
            Ok(clear_session_cookie(state.cookie_secure()).ok())
        }
    }
}

/// Render an action outcome, appending `clear_cookie` whether it succeeded or not.
pub(crate) fn respond(
    result: Result<ActionResult, ActionError>,
    clear_cookie: Option<HeaderValue>,
) -> Response {
    let mut response = match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => e.into_response(),
    };
    if let Some(cookie) = clear_cookie {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    response
}
