use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A supporting document stored alongside a certificate. Kept out of the
/// certificate row so issued records stay untouched.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "certificate_upload")]
pub struct Model {
    /// `{certificate_id}_{role}_{filename}`, also the file name on disk.
    #[sea_orm(primary_key, auto_increment = false)]
    pub reference: String,

    pub certificate_id: String,
    #[sea_orm(belongs_to, from = "certificate_id", to = "id")]
    pub certificate: HasOne<super::certificate::Entity>,

    /// `photo` or `id_card`.
    pub role: String,

    /// Original upload filename.
    pub filename: String,

    pub content_type: Option<String>,

    pub size: i64,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
