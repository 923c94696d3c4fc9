//! Core sanction record types and the type normalization rule
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanctionType {
    Warn,
    Strike,
}

impl SanctionType {
    /// Single normalization rule applied at every entry point: input is
    /// trimmed and lowercased, accepted spellings are exactly
    /// `warn`, `w`, `strike`, `s`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "warn" | "w" => Some(SanctionType::Warn),
            "strike" | "s" => Some(SanctionType::Strike),
            _ => None,
        }
    }
}

impl fmt::Display for SanctionType {
    // uppercase, as shown in log and notice text
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanctionType::Warn => write!(f, "WARN"),
            SanctionType::Strike => write!(f, "STRIKE"),
        }
    }
}

/// One issued warn or strike. Records are append-only: the only permitted
/// mutation is the single `active` flip performed by an annulment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanctionRecord {
    pub id: String,
    pub user_id: String,
    pub user_tag: String,
    #[serde(rename = "type")]
    pub kind: SanctionType,
    pub reason: String,
    pub authorized_by_id: String,
    pub authorized_by_tag: String,
    pub issued_by_id: String,
    pub issued_by_tag: String,
    pub created_at: DateTime<Utc>,
    pub active: bool,
    // absent (not null) when the form left it blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annul: Option<Annulment>,
}

/// Attached exactly once, when a record is annulled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annulment {
    pub reason: String,
    pub authorized_by_id: String,
    pub authorized_by_tag: String,
    pub by_id: String,
    pub by_tag: String,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
}
