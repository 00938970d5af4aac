use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::storage::{UploadRole, upload_reference};
use common::{CertificateCategory, CertificateRecord};
use sea_orm::*;
use tracing::{instrument, warn};

use crate::entity::certificate_upload;
use crate::error::{AppError, ErrorBody};
use crate::models::certificate::*;
use crate::models::shared::Pagination;
use crate::state::AppState;

/// Room for two maximum-size files plus the text fields.
pub fn certificate_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let limit = max_upload_size.saturating_mul(2).saturating_add(1024 * 1024);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Certificates",
    operation_id = "createCertificate",
    summary = "Issue a new certificate",
    description = "Issues a certificate from a multipart form. The `category` field selects the \
        form schema (`birth`, `marriage`, `celibacy`); remaining text fields use snake_case names, \
        with marriage parties prefixed `husband_` / `wife_`. Optional `photo` and `id_card` file \
        parts are stored as supporting documents; files that are not png/jpg/jpeg/gif are skipped. \
        The QR code and barcode are generated best-effort and are null if rendering failed.",
    request_body(content_type = "multipart/form-data", description = "Certificate form with optional photo and id_card files"),
    responses(
        (status = 201, description = "Certificate issued", body = CertificateResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "No free certificate ID after retries (ALLOCATION_CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn create_certificate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut category: Option<CertificateCategory> = None;
    let mut form = FormFields::default();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if let Ok(role) = name.parse::<UploadRole>() {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = read_file_field(field, state.config.storage.max_upload_size).await?;
            // Browsers send an empty part for an untouched file input.
            if !data.is_empty() {
                files.push(PendingUpload {
                    role,
                    filename,
                    data,
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?;
        if name == "category" {
            category = Some(
                value
                    .parse()
                    .map_err(|e| AppError::Validation(format!("{e}")))?,
            );
        } else {
            form.insert(name, value);
        }
    }

    let category =
        category.ok_or_else(|| AppError::Validation("category is required".into()))?;
    let record = state.issuer.issue(form.into_fields(category)).await?;
    let uploads = store_uploads(&state, &record, files).await;

    Ok((
        StatusCode::CREATED,
        Json(CertificateResponse::new(record, uploads)),
    ))
}

async fn read_file_field(mut field: Field<'_>, max_size: u64) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        if (data.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Persist supporting documents for a freshly issued certificate. Failures are
/// logged and the file is left out; the certificate itself is already issued.
async fn store_uploads(
    state: &AppState,
    record: &CertificateRecord,
    files: Vec<PendingUpload>,
) -> Vec<certificate_upload::Model> {
    let mut saved = Vec::new();
    for PendingUpload {
        role,
        filename,
        data,
    } in files
    {
        let Some(reference) = upload_reference(&record.id, role, &filename) else {
            warn!(certificate_id = %record.id, %role, filename = %filename, "Unsupported upload type, skipping");
            continue;
        };

        let size = match state.uploads.put(&reference, &data).await {
            Ok(size) => size,
            Err(e) => {
                warn!(certificate_id = %record.id, %role, error = %e, "Failed to store upload");
                continue;
            }
        };

        let model = certificate_upload::ActiveModel {
            content_type: Set(mime_guess::from_path(&reference)
                .first()
                .map(|m| m.to_string())),
            reference: Set(reference),
            certificate_id: Set(record.id.clone()),
            role: Set(role.to_string()),
            filename: Set(filename),
            size: Set(i64::try_from(size).unwrap_or(i64::MAX)),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        match model.insert(&state.db).await {
            Ok(m) => saved.push(m),
            Err(e) => {
                warn!(certificate_id = %record.id, %role, error = %e, "Failed to record upload")
            }
        }
    }
    saved
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Certificates",
    operation_id = "listCertificates",
    summary = "List issued certificates",
    description = "Returns issued certificates, newest first, optionally filtered by category. \
        Artifacts are omitted; fetch a single certificate for those.",
    params(CertificateListQuery),
    responses(
        (status = 200, description = "Page of certificates", body = CertificateListResponse),
        (status = 400, description = "Invalid query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_certificates(
    State(state): State<AppState>,
    Query(query): Query<CertificateListQuery>,
) -> Result<Json<CertificateListResponse>, AppError> {
    let (page, per_page) = Pagination::normalize(query.page, query.per_page);
    let result = state
        .records
        .list(query.category, (page - 1) * per_page, per_page)
        .await?;

    Ok(Json(CertificateListResponse {
        data: result
            .items
            .into_iter()
            .map(CertificateListItem::from)
            .collect(),
        pagination: Pagination::new(page, per_page, result.total),
    }))
}

#[utoipa::path(
    get,
    path = "/stats",
    tag = "Certificates",
    operation_id = "certificateStats",
    summary = "Count certificates per category",
    responses(
        (status = 200, description = "Counts per category", body = CertificateStatsResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn certificate_stats(
    State(state): State<AppState>,
) -> Result<Json<CertificateStatsResponse>, AppError> {
    let birth = state.records.count(CertificateCategory::Birth).await?;
    let marriage = state.records.count(CertificateCategory::Marriage).await?;
    let celibacy = state.records.count(CertificateCategory::Celibacy).await?;

    Ok(Json(CertificateStatsResponse {
        birth,
        marriage,
        celibacy,
        total: birth + marriage + celibacy,
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Certificates",
    operation_id = "getCertificate",
    summary = "Get a certificate by ID",
    description = "Returns the full certificate record including QR and barcode artifacts and supporting documents.",
    params(("id" = String, Path, description = "Certificate ID, e.g. BC-2025-007")),
    responses(
        (status = 200, description = "Certificate found", body = CertificateResponse),
        (status = 404, description = "Certificate not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CertificateResponse>, AppError> {
    let record = state
        .records
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Certificate {id} not found")))?;

    let uploads = certificate_upload::Entity::find()
        .filter(certificate_upload::Column::CertificateId.eq(id.as_str()))
        .order_by_asc(certificate_upload::Column::Role)
        .all(&state.db)
        .await?;

    Ok(Json(CertificateResponse::new(record, uploads)))
}
