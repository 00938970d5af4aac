use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::category::CertificateCategory;

/// Display format for every date stored on a certificate.
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

const ACCEPTED_DATE_FORMATS: &[&str] = &[DISPLAY_DATE_FORMAT, "%Y-%m-%d"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be a date as DD.MM.YYYY or YYYY-MM-DD, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
}

/// Category-specific data captured on the issuing form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum CertificateFields {
    Birth(BirthFields),
    Marriage(MarriageFields),
    Celibacy(CelibacyFields),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BirthFields {
    pub family_name: String,
    pub given_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_name: Option<String>,
    #[schema(example = "01.02.1990")]
    pub date_of_birth: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
}

/// One spouse on a marriage certificate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PartyFields {
    pub family_name: String,
    pub given_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MarriageFields {
    pub husband: PartyFields,
    pub wife: PartyFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marriage_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marriage_place: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CelibacyFields {
    pub full_name: String,
    pub date_of_birth: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
}

/// The `(name, date of birth)` pair a certificate vouches for.
///
/// This is what the QR payload encodes and what verification reports back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Identity {
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "01.02.1990")]
    pub date_of_birth: String,
}

impl CertificateFields {
    pub fn category(&self) -> CertificateCategory {
        match self {
            Self::Birth(_) => CertificateCategory::Birth,
            Self::Marriage(_) => CertificateCategory::Marriage,
            Self::Celibacy(_) => CertificateCategory::Celibacy,
        }
    }

    /// Trim every value, drop empty optionals, enforce required fields and
    /// rewrite dates as `DD.MM.YYYY`.
    ///
    /// Records are only ever built from normalized fields.
    pub fn normalize(self) -> Result<Self, FieldError> {
        Ok(match self {
            Self::Birth(f) => Self::Birth(BirthFields {
                family_name: required("family_name", f.family_name)?,
                given_name: required("given_name", f.given_name)?,
                previous_name: optional(f.previous_name),
                date_of_birth: normalize_date(
                    "date_of_birth",
                    &required("date_of_birth", f.date_of_birth)?,
                )?,
                gender: optional(f.gender),
                place_of_birth: optional(f.place_of_birth),
                passport_number: optional(f.passport_number),
                father_name: optional(f.father_name),
                mother_name: optional(f.mother_name),
            }),
            Self::Marriage(f) => Self::Marriage(MarriageFields {
                husband: normalize_party("husband", f.husband)?,
                wife: normalize_party("wife", f.wife)?,
                marriage_date: optional_date("marriage_date", f.marriage_date)?,
                marriage_place: optional(f.marriage_place),
            }),
            Self::Celibacy(f) => Self::Celibacy(CelibacyFields {
                full_name: required("full_name", f.full_name)?,
                date_of_birth: normalize_date(
                    "date_of_birth",
                    &required("date_of_birth", f.date_of_birth)?,
                )?,
                nationality: optional(f.nationality),
                purpose: optional(f.purpose),
                current_address: optional(f.current_address),
                passport_number: optional(f.passport_number),
                father_name: optional(f.father_name),
            }),
        })
    }

    pub fn identity(&self) -> Identity {
        match self {
            Self::Birth(f) => Identity {
                full_name: join_name(&f.given_name, &f.family_name),
                date_of_birth: f.date_of_birth.clone(),
            },
            Self::Marriage(f) => Identity {
                full_name: format!(
                    "{} & {}",
                    join_name(&f.husband.given_name, &f.husband.family_name),
                    join_name(&f.wife.given_name, &f.wife.family_name)
                ),
                date_of_birth: format!(
                    "{} & {}",
                    f.husband.date_of_birth.as_deref().unwrap_or_default(),
                    f.wife.date_of_birth.as_deref().unwrap_or_default()
                ),
            },
            Self::Celibacy(f) => Identity {
                full_name: f.full_name.clone(),
                date_of_birth: f.date_of_birth.clone(),
            },
        }
    }
}

/// Parse a date in any accepted format and render it as `DD.MM.YYYY`.
pub fn normalize_date(field: &'static str, value: &str) -> Result<String, FieldError> {
    let value = value.trim();
    ACCEPTED_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
        .ok_or_else(|| FieldError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

fn normalize_party(role: &'static str, party: PartyFields) -> Result<PartyFields, FieldError> {
    let (family, given, dob) = match role {
        "husband" => (
            "husband.family_name",
            "husband.given_name",
            "husband.date_of_birth",
        ),
        _ => ("wife.family_name", "wife.given_name", "wife.date_of_birth"),
    };
    Ok(PartyFields {
        family_name: required(family, party.family_name)?,
        given_name: required(given, party.given_name)?,
        date_of_birth: optional_date(dob, party.date_of_birth)?,
        place_of_birth: optional(party.place_of_birth),
        id_number: optional(party.id_number),
    })
}

fn required(field: &'static str, value: String) -> Result<String, FieldError> {
    let cleaned = collapse_whitespace(&value);
    if cleaned.is_empty() {
        return Err(FieldError::Missing(field));
    }
    Ok(cleaned)
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| collapse_whitespace(&v))
        .filter(|v| !v.is_empty())
}

/// Values end up on single lines of the QR payload, so line breaks and runs of
/// whitespace collapse to one space.
fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn optional_date(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, FieldError> {
    optional(value)
        .map(|v| normalize_date(field, &v))
        .transpose()
}

fn join_name(given: &str, family: &str) -> String {
    format!("{given} {family}").trim().to_string()
}
