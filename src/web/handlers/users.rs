use crate::web::{
    response::{ActionError, ActionResult},
    state::PortalState,
};
use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    params(
        ("id" = String, Path, description = "Public user id")
    ),
    responses(
        (status = 200, description = "Public profile", body = ActionResult),
        (status = 404, description = "No such user", body = ActionResult),
        (status = 502, description = "Authentication API unavailable", body = ActionResult)
    ),
    tag = "users"
)]
pub async fn user(
    Path(id): Path<String>,
    Extension(state): Extension<Arc<PortalState>>,
) -> Result<Json<ActionResult>, ActionError> {
    let user = state.client().public_profile(&id).await?;
    Ok(Json(ActionResult::with_user(user)))
}
