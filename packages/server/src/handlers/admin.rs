use axum::Json;
use axum::extract::State;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::admin::AdminToken;
use crate::models::admin::ResetResponse;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/reset",
    tag = "Admin",
    operation_id = "resetRegistry",
    summary = "Delete every certificate and uploaded file",
    description = "Irreversibly wipes all categories and all supporting documents. Sequence \
        numbers restart at 001 afterwards. Requires the configured admin token.",
    responses(
        (status = 200, description = "Registry wiped", body = ResetResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Admin endpoints disabled (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("admin_token" = [])),
)]
#[instrument(skip(state, _admin))]
pub async fn reset_registry(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Result<Json<ResetResponse>, AppError> {
    // Files first: a failure here leaves every record in place.
    let uploads_deleted = state.uploads.delete_all().await?;
    let certificates_deleted = state.records.delete_all().await?;

    info!(certificates_deleted, uploads_deleted, "Registry reset");

    Ok(Json(ResetResponse {
        certificates_deleted,
        uploads_deleted,
    }))
}
