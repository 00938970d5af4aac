#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of civil-registry document. Determines the ID prefix and field schema.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "snake_case")]
pub enum CertificateCategory {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "birth"))]
    Birth,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "marriage"))]
    Marriage,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "celibacy"))]
    Celibacy,
}

impl CertificateCategory {
    pub const ALL: [CertificateCategory; 3] = [Self::Birth, Self::Marriage, Self::Celibacy];

    /// Two-letter prefix used in certificate IDs.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Birth => "BC",
            Self::Marriage => "MC",
            Self::Celibacy => "CC",
        }
    }

    /// Reverse of [`prefix`](Self::prefix).
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.prefix() == prefix)
    }

    /// Document title printed on the certificate and encoded in the QR payload.
    pub fn document_type(&self) -> &'static str {
        match self {
            Self::Birth => "Birth Certificate",
            Self::Marriage => "Marriage Certificate",
            Self::Celibacy => "Celibacy Certificate",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Birth => "birth",
            Self::Marriage => "marriage",
            Self::Celibacy => "celibacy",
        }
    }
}

impl fmt::Display for CertificateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown certificate category '{0}' (expected birth, marriage or celibacy)")]
pub struct UnknownCategory(pub String);

impl FromStr for CertificateCategory {
    type Err = UnknownCategory;

    /// Accepts the lowercase name (`birth`) or the ID prefix (`BC`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| {
                trimmed.eq_ignore_ascii_case(c.as_str()) || trimmed.eq_ignore_ascii_case(c.prefix())
            })
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Lifecycle state of an issued certificate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    /// Issued and persisted. Records are never edited after this point.
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "completed"))]
    Completed,
}

impl CertificateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
