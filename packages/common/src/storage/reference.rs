//! Naming of uploaded supporting documents.
//!
//! A stored file is addressed by `{certificate_id}_{role}_{filename}`, where the
//! filename is reduced to a flat, URL-safe name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// Image types accepted as supporting documents.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

const MAX_REFERENCE_LEN: usize = 255;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UploadRole {
    Photo,
    IdCard,
}

impl UploadRole {
    pub const ALL: [UploadRole; 2] = [Self::Photo, Self::IdCard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::IdCard => "id_card",
        }
    }
}

impl fmt::Display for UploadRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|r| r.as_str() == s).ok_or(())
    }
}

/// Whether `filename` has one of the [`ALLOWED_EXTENSIONS`] (case-insensitive).
pub fn is_allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Reduce a client-supplied filename to `[A-Za-z0-9._-]`, dropping any directory
/// part and leading dots. Returns `None` when nothing usable is left.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Storage reference for an upload, or `None` when the file type is not
/// accepted.
pub fn upload_reference(certificate_id: &str, role: UploadRole, filename: &str) -> Option<String> {
    let name = sanitize_filename(filename)?;
    if !is_allowed_file(&name) {
        return None;
    }
    let mut reference = format!("{certificate_id}_{role}_{name}");
    if reference.len() > MAX_REFERENCE_LEN {
        // Keep the extension so the served content type stays right.
        let ext = name.rsplit_once('.').map(|(_, e)| e).unwrap_or_default();
        let keep = MAX_REFERENCE_LEN - ext.len() - 1;
        reference = format!("{}.{ext}", &reference[..keep]);
    }
    Some(reference)
}

/// Check that a reference taken from a request names a flat file inside the
/// upload directory.
pub fn validate_reference(reference: &str) -> Result<&str, StorageError> {
    let ok = !reference.is_empty()
        && reference.len() <= MAX_REFERENCE_LEN
        && !reference.starts_with('.')
        && reference
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if ok {
        Ok(reference)
    } else {
        Err(StorageError::InvalidReference(reference.to_string()))
    }
}
