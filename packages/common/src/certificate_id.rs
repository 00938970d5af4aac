use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::CertificateCategory;

/// Allocate the certificate ID following `existing_count` certificates of `category`.
///
/// Format: `{prefix}-{year}-{existing_count + 1:03}`. Past 999 the sequence simply
/// widens; it never rolls over. The count must be read fresh for every call, the
/// sequence is not tied to the year.
pub fn allocate(category: CertificateCategory, existing_count: u64, year: i32) -> CertificateId {
    CertificateId {
        category,
        year,
        sequence: existing_count.saturating_add(1),
    }
}

/// A structurally valid certificate identifier such as `BC-2025-007`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CertificateId {
    pub category: CertificateCategory,
    pub year: i32,
    pub sequence: u64,
}

/// Why a string is not a certificate ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("expected three '-' separated segments")]
    Shape,
    #[error("unknown category prefix '{0}'")]
    Prefix(String),
    #[error("year must be four digits")]
    Year,
    #[error("sequence must be at least three digits")]
    Sequence,
}

impl CertificateId {
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        let mut parts = s.split('-');
        let (Some(prefix), Some(year), Some(seq), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(IdParseError::Shape);
        };

        let category = CertificateCategory::from_prefix(prefix)
            .ok_or_else(|| IdParseError::Prefix(prefix.to_string()))?;

        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdParseError::Year);
        }
        let year: i32 = year.parse().map_err(|_| IdParseError::Year)?;

        if seq.len() < 3 || !seq.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdParseError::Sequence);
        }
        let sequence: u64 = seq.parse().map_err(|_| IdParseError::Sequence)?;
        if sequence == 0 {
            return Err(IdParseError::Sequence);
        }

        Ok(Self {
            category,
            year,
            sequence,
        })
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{:03}",
            self.category.prefix(),
            self.year,
            self.sequence
        )
    }
}

impl Serialize for CertificateId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CertificateId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
