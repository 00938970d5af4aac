use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ResetResponse {
    pub certificates_deleted: u64,
    pub uploads_deleted: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
}
