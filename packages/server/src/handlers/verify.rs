use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::verify::{VerifyPayloadRequest, VerifyResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Verification",
    operation_id = "verifyCertificate",
    summary = "Verify a certificate by ID",
    description = "Always answers 200. `valid` is false for unknown or malformed IDs, and for \
        records whose integrity tag no longer matches their contents.",
    params(("id" = String, Path, description = "Certificate ID, e.g. BC-2025-007")),
    responses(
        (status = 200, description = "Verification result", body = VerifyResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn verify_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VerifyResponse>, AppError> {
    let verification = state.verifier.verify(&id).await?;
    Ok(Json(verification.into()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Verification",
    operation_id = "verifyPayload",
    summary = "Verify a scanned QR payload",
    description = "Valid only when the payload's certificate exists and its name and date of birth \
        match the stored record.",
    request_body = VerifyPayloadRequest,
    responses(
        (status = 200, description = "Verification result", body = VerifyResponse),
        (status = 400, description = "Payload is not a certificate QR text (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn verify_payload(
    State(state): State<AppState>,
    AppJson(payload): AppJson<VerifyPayloadRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let verification = state.verifier.verify_payload(&payload.payload).await?;
    Ok(Json(verification.into()))
}

/// Public plain-text verification page linked from every QR code.
#[instrument(skip(state))]
pub async fn verify_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, String), AppError> {
    let verification = state.verifier.verify(&id).await?;
    let status = if verification.is_valid() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    Ok((status, verification.to_string()))
}
