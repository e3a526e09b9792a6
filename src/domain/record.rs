// src/domain/record.rs
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Sentinel filter value meaning "no filter on this field". A selectbox in
/// the presentation layer sends this for its default entry.
pub const NO_FILTER: &str = "All";

/// Lifecycle label given to new and imported records.
pub const DEFAULT_STATUS: &str = "Active";

/// Three-valued employment flag. The source data distinguishes "we asked and
/// the answer was no" from "nobody knows", so this never collapses to a bool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unknown,
}

impl TriState {
    /// Canonical stored form: "Yes", "No", or the empty string for unknown.
    pub fn as_str(&self) -> &'static str {
        match self {
            TriState::Yes => "Yes",
            TriState::No => "No",
            TriState::Unknown => "",
        }
    }

    /// Parse a canonical label. Anything else reads as unknown.
    pub fn from_label(label: &str) -> TriState {
        match label.trim() {
            "Yes" => TriState::Yes,
            "No" => TriState::No,
            _ => TriState::Unknown,
        }
    }
}

impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One housing-unit allocation, as stored.
///
/// The tri-state and pass-through flags are kept as the raw stored text:
/// rows written through [`RecordFields`] always hold canonical values, but
/// rows that came in through the spreadsheet bridge carry whatever the sheet
/// said, and that raw value must survive a later export unchanged.
#[derive(Debug, Clone)]
pub struct HousingRecord {
    pub id: i64,

    pub block: String,
    pub unit: String,

    pub decision: String,
    pub decision_date: String,
    pub occupant_name: String,
    pub employee_id: String,
    pub national_id: String,
    pub profession: String,
    pub job_title: String,
    pub department: String,
    pub phone: String,

    pub employed: String,
    pub retired: String,
    pub deceased: String,

    pub respondent_name: String,
    pub respondent_relation: String,
    pub respondent_phone: String,

    pub state_owned: String,
    pub decommissioned: String,

    pub observation: String,

    pub latitude: f64,
    pub longitude: f64,

    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Sparse create/update payload: only the fields a caller supplies are
/// written. Serializes to the JSON snapshot stored in the audit log, with
/// absent fields omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub employed: Option<TriState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retired: Option<TriState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased: Option<TriState>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub respondent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respondent_relation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respondent_phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_owned: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decommissioned: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl RecordFields {
    /// JSON snapshot of the supplied fields, for the audit trail.
    pub fn snapshot(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Equality-only filter over the fields the list page exposes. A value that
/// is empty or equal to [`NO_FILTER`] is treated as absent.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub block: Option<String>,
    pub department: Option<String>,
    pub profession: Option<String>,
    pub status: Option<String>,
}

impl RecordFilter {
    /// (column, value) pairs that actually constrain the query.
    pub fn active(&self) -> Vec<(&'static str, &str)> {
        let candidates = [
            ("block", self.block.as_deref()),
            ("department", self.department.as_deref()),
            ("profession", self.profession.as_deref()),
            ("status", self.status.as_deref()),
        ];

        candidates
            .into_iter()
            .filter_map(|(col, v)| match v {
                Some(v) if !v.is_empty() && v != NO_FILTER => Some((col, v)),
                _ => None,
            })
            .collect()
    }
}
