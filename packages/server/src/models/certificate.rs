use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::fields::{BirthFields, CelibacyFields, Identity, MarriageFields, PartyFields};
use common::storage::UploadRole;
use common::{CertificateCategory, CertificateFields, CertificateRecord, CertificateStatus};
use serde::{Deserialize, Serialize};

use crate::entity::certificate_upload;
use crate::models::shared::Pagination;

/// A supporting document attached to a certificate.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(example = "BC-2025-007_photo_portrait.jpg")]
    pub reference: String,
    pub role: String,
    /// Original upload filename.
    pub filename: String,
    pub content_type: Option<String>,
    pub size: i64,
    /// Where the file is served.
    #[schema(example = "/uploads/BC-2025-007_photo_portrait.jpg")]
    pub url: String,
}

impl From<certificate_upload::Model> for UploadResponse {
    fn from(m: certificate_upload::Model) -> Self {
        Self {
            url: format!("/uploads/{}", m.reference),
            reference: m.reference,
            role: m.role,
            filename: m.filename,
            content_type: m.content_type,
            size: m.size,
        }
    }
}

/// Full certificate including artifacts.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CertificateResponse {
    #[schema(example = "BC-2025-007")]
    pub id: String,
    pub category: CertificateCategory,
    #[schema(example = "Birth Certificate")]
    pub document_type: String,
    pub status: CertificateStatus,
    /// Category-specific form fields, tagged with `category`.
    #[schema(value_type = Object)]
    pub fields: CertificateFields,
    pub identity: Identity,
    /// Issue date as `DD.MM.YYYY`.
    #[schema(example = "14.03.2025")]
    pub issued_at: String,
    pub created_at: DateTime<Utc>,
    /// Text encoded in the QR code. Null when QR generation failed.
    pub qr_payload: Option<String>,
    /// Base64 PNG. Null when generation failed.
    pub qr_artifact: Option<String>,
    /// Base64 PNG. Null when generation failed.
    pub barcode_artifact: Option<String>,
    pub uploads: Vec<UploadResponse>,
}

impl CertificateResponse {
    pub fn new(record: CertificateRecord, uploads: Vec<certificate_upload::Model>) -> Self {
        Self {
            document_type: record.category.document_type().to_string(),
            identity: record.identity(),
            issued_at: record.issued_on(),
            id: record.id,
            category: record.category,
            status: record.status,
            fields: record.fields,
            created_at: record.created_at,
            qr_payload: record.qr_payload,
            qr_artifact: record.qr_artifact,
            barcode_artifact: record.barcode_artifact,
            uploads: uploads.into_iter().map(UploadResponse::from).collect(),
        }
    }
}

/// Certificate summary for list views. Artifacts are omitted.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CertificateListItem {
    pub id: String,
    pub category: CertificateCategory,
    pub full_name: String,
    pub date_of_birth: String,
    pub issued_at: String,
    pub created_at: DateTime<Utc>,
    pub has_qr: bool,
    pub has_barcode: bool,
}

impl From<CertificateRecord> for CertificateListItem {
    fn from(r: CertificateRecord) -> Self {
        let identity = r.identity();
        Self {
            issued_at: r.issued_on(),
            has_qr: r.qr_artifact.is_some(),
            has_barcode: r.barcode_artifact.is_some(),
            id: r.id,
            category: r.category,
            full_name: identity.full_name,
            date_of_birth: identity.date_of_birth,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CertificateListResponse {
    pub data: Vec<CertificateListItem>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CertificateListQuery {
    /// Only list this category.
    pub category: Option<CertificateCategory>,
    /// 1-based page number. Default: 1.
    pub page: Option<u64>,
    /// Items per page (1-100). Default: 20.
    pub per_page: Option<u64>,
}

/// Number of issued certificates per category.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CertificateStatsResponse {
    pub birth: u64,
    pub marriage: u64,
    pub celibacy: u64,
    pub total: u64,
}

/// Text parts of a certificate creation form, keyed by field name.
#[derive(Debug, Default)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn insert(&mut self, name: String, value: String) {
        self.0.insert(name, value);
    }

    fn text(&self, name: &str) -> String {
        self.0.get(name).cloned().unwrap_or_default()
    }

    fn optional(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }

    /// `{prefix}date_of_birth`, or the `{prefix}birth_day/_month/_year` triple
    /// joined as `D.M.YYYY` when the single field is absent.
    fn date_of_birth(&self, prefix: &str) -> Option<String> {
        if let Some(dob) = self.optional(&format!("{prefix}date_of_birth")) {
            return Some(dob);
        }
        let part = |p: &str| self.optional(&format!("{prefix}birth_{p}"));
        match (part("day"), part("month"), part("year")) {
            (Some(d), Some(m), Some(y)) => Some(format!("{}.{}.{}", d.trim(), m.trim(), y.trim())),
            _ => None,
        }
    }

    fn party(&self, prefix: &str) -> PartyFields {
        PartyFields {
            family_name: self.text(&format!("{prefix}family_name")),
            given_name: self.text(&format!("{prefix}given_name")),
            date_of_birth: self.date_of_birth(prefix),
            place_of_birth: self.optional(&format!("{prefix}place_of_birth")),
            id_number: self.optional(&format!("{prefix}id_number")),
        }
    }

    /// Build the category's field set. Validation happens at issue time.
    pub fn into_fields(self, category: CertificateCategory) -> CertificateFields {
        match category {
            CertificateCategory::Birth => CertificateFields::Birth(BirthFields {
                family_name: self.text("family_name"),
                given_name: self.text("given_name"),
                previous_name: self.optional("previous_name"),
                date_of_birth: self.date_of_birth("").unwrap_or_default(),
                gender: self.optional("gender"),
                place_of_birth: self.optional("place_of_birth"),
                passport_number: self.optional("passport_number"),
                father_name: self.optional("father_name"),
                mother_name: self.optional("mother_name"),
            }),
            CertificateCategory::Marriage => CertificateFields::Marriage(MarriageFields {
                husband: self.party("husband_"),
                wife: self.party("wife_"),
                marriage_date: self.optional("marriage_date"),
                marriage_place: self.optional("marriage_place"),
            }),
            CertificateCategory::Celibacy => CertificateFields::Celibacy(CelibacyFields {
                full_name: self.text("full_name"),
                date_of_birth: self.date_of_birth("").unwrap_or_default(),
                nationality: self.optional("nationality"),
                purpose: self.optional("purpose"),
                current_address: self.optional("current_address"),
                passport_number: self.optional("passport_number"),
                father_name: self.optional("father_name"),
            }),
        }
    }
}

/// A file part of a creation form, buffered until the certificate ID is known.
pub struct PendingUpload {
    pub role: UploadRole,
    pub filename: String,
    pub data: Vec<u8>,
}
