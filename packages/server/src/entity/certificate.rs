use common::{CertificateCategory, CertificateStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "certificate")]
pub struct Model {
    /// `{prefix}-{year}-{seq}`. Uniqueness of this key is what detects
    /// allocation races between processes.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub category: CertificateCategory,

    /// Category-specific form fields as JSON text.
    #[sea_orm(column_type = "Text")]
    pub fields: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub qr_payload: Option<String>,

    /// Base64 PNG.
    #[sea_orm(column_type = "Text", nullable)]
    pub qr_artifact: Option<String>,

    /// Base64 PNG.
    #[sea_orm(column_type = "Text", nullable)]
    pub barcode_artifact: Option<String>,

    /// Hex HMAC over id, category and identity; null when issued without a key.
    pub integrity_tag: Option<String>,

    pub status: CertificateStatus,

    pub created_at: DateTimeUtc,

    #[sea_orm(has_many)]
    pub uploads: HasMany<super::certificate_upload::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
