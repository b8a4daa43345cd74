//! Two-step registration: signup mails a link, activation completes it.

use super::{ensure_signed_out, respond, validated};
use crate::{
    forms::{ActivationForm, SignupForm},
    web::{
        response::{ActionError, ActionResult},
        state::PortalState,
    },
};
use axum::{extract::Extension, http::HeaderMap, response::Response, Json};
use std::sync::Arc;
use tracing::info;

#[utoipa::path(
    post,
    path = "/v1/auth/signup",
    request_body = SignupForm,
    responses(
        (status = 200, description = "Registration accepted; activation email sent", body = ActionResult),
        (status = 400, description = "Registration rejected", body = ActionResult),
        (status = 409, description = "Already signed in", body = ActionResult),
        (status = 422, description = "Invalid input", body = ActionResult)
    ),
    tag = "signup"
)]
pub async fn signup(
    headers: HeaderMap,
    Extension(state): Extension<Arc<PortalState>>,
    payload: Option<Json<SignupForm>>,
) -> Result<Response, ActionError> {
    let form = validated(payload)?;
    let stale_cookie = ensure_signed_out(&state, &headers).await?;

    let result = state
        .client()
        .register(form.name.trim(), form.email.trim(), &form.password)
        .await
        .map(|()| {
            info!("registration submitted");
            ActionResult::ok()
        })
        .map_err(ActionError::from);

    Ok(respond(result, stale_cookie))
}

#[utoipa::path(
    post,
    path = "/v1/auth/activation",
    request_body = ActivationForm,
    responses(
        (status = 200, description = "Account activated", body = ActionResult),
        (status = 400, description = "Activation link rejected", body = ActionResult),
        (status = 409, description = "Already signed in", body = ActionResult),
        (status = 422, description = "Invalid input", body = ActionResult)
    ),
    tag = "signup"
)]
pub async fn activation(
    headers: HeaderMap,
    Extension(state): Extension<Arc<PortalState>>,
    payload: Option<Json<ActivationForm>>,
) -> Result<Response, ActionError> {
    let form = validated(payload)?;
    let stale_cookie = ensure_signed_out(&state, &headers).await?;

    let result = state
        .client()
        .activate(form.uid.trim(), form.token.trim())
        .await
        .map(|()| {
            info!("account activated");
            ActionResult::ok()
        })
        .map_err(ActionError::from);

    Ok(respond(result, stale_cookie))
}
