//! Settings of the signed-in user.

use super::{require_session, validated};
use crate::{
    backend::ProfileUpdate,
    forms::{PasswordChangeForm, ProfileForm},
    web::{
        response::{ActionError, ActionResult},
        state::PortalState,
    },
};
use axum::{extract::Extension, http::HeaderMap, Json};
use std::sync::Arc;
use tracing::info;

#[utoipa::path(
    patch,
    path = "/v1/me/profile",
    request_body = ProfileForm,
    responses(
        (status = 200, description = "Profile updated", body = ActionResult),
        (status = 401, description = "Not signed in", body = ActionResult),
        (status = 422, description = "Invalid input", body = ActionResult)
    ),
    tag = "me"
)]
pub async fn profile(
    headers: HeaderMap,
    Extension(state): Extension<Arc<PortalState>>,
    payload: Option<Json<ProfileForm>>,
) -> Result<Json<ActionResult>, ActionError> {
    let form = validated(payload)?;
    let (token, record) = require_session(&state, &headers).await?;

    let update = ProfileUpdate {
        name: form.name.trim(),
        introduction: form.introduction.as_deref(),
        avatar: form.avatar.as_deref(),
    };
    let user = state
        .client()
        .update_profile(record.tokens.access(), &update)
        .await?;

    state.sessions().replace_profile(&token, user.clone()).await;
    info!(user_id = %user.id, "profile updated");

    Ok(Json(ActionResult::with_user(user)))
}

#[utoipa::path(
    post,
    path = "/v1/me/password",
    request_body = PasswordChangeForm,
    responses(
        (status = 200, description = "Password changed", body = ActionResult),
        (status = 400, description = "Current password rejected", body = ActionResult),
        (status = 401, description = "Not signed in", body = ActionResult),
        (status = 422, description = "Invalid input", body = ActionResult)
    ),
    tag = "me"
)]
pub async fn password(
    headers: HeaderMap,
    Extension(state): Extension<Arc<PortalState>>,
    payload: Option<Json<PasswordChangeForm>>,
) -> Result<Json<ActionResult>, ActionError> {
    let form = validated(payload)?;
    let (_token, record) = require_session(&state, &headers).await?;

    state
        .client()
        .set_password(
            record.tokens.access(),
            &form.current_password,
            &form.new_password,
            &form.re_new_password,
        )
        .await?;

    info!(user_id = %record.user.id, "password changed");
    Ok(Json(ActionResult::ok()))
}
