//! Password reset for signed-out users.

use super::{ensure_signed_out, respond, validated};
use crate::{
    forms::{ForgotPasswordForm, ResetPasswordForm},
    web::{
        response::{ActionError, ActionResult},
        state::PortalState,
    },
};
use axum::{extract::Extension, http::HeaderMap, response::Response, Json};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/v1/auth/password/forgot",
    request_body = ForgotPasswordForm,
    responses(
        (status = 200, description = "Reset email requested", body = ActionResult),
        (status = 409, description = "Already signed in", body = ActionResult),
        (status = 422, description = "Invalid input", body = ActionResult)
    ),
    tag = "password"
)]
pub async fn forgot(
    headers: HeaderMap,
    Extension(state): Extension<Arc<PortalState>>,
    payload: Option<Json<ForgotPasswordForm>>,
) -> Result<Response, ActionError> {
    let form = validated(payload)?;
    let stale_cookie = ensure_signed_out(&state, &headers).await?;

    let result = state
        .client()
        .request_password_reset(form.email.trim())
        .await
        .map(|()| ActionResult::ok())
        .map_err(ActionError::from);

    Ok(respond(result, stale_cookie))
}

#[utoipa::path(
    post,
    path = "/v1/auth/password/reset",
    request_body = ResetPasswordForm,
    responses(
        (status = 200, description = "Password replaced", body = ActionResult),
        (status = 400, description = "Reset link rejected", body = ActionResult),
        (status = 409, description = "Already signed in", body = ActionResult),
        (status = 422, description = "Invalid input", body = ActionResult)
    ),
    tag = "password"
)]
pub async fn reset(
    headers: HeaderMap,
    Extension(state): Extension<Arc<PortalState>>,
    payload: Option<Json<ResetPasswordForm>>,
) -> Result<Response, ActionError> {
    let form = validated(payload)?;
    let stale_cookie = ensure_signed_out(&state, &headers).await?;

    let result = state
        .client()
        .confirm_password_reset(
            form.uid.trim(),
            form.token.trim(),
            &form.new_password,
            &form.re_new_password,
        )
        .await
        .map(|()| ActionResult::ok())
        .map_err(ActionError::from);

    Ok(respond(result, stale_cookie))
}
