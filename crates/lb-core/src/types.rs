use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use lb_api_types::ApiLead;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LeadId
// ---------------------------------------------------------------------------

/// Opaque backend identifier for a lead. Stable across requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(String);

impl LeadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LeadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for LeadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// LeadStatus
// ---------------------------------------------------------------------------

/// Pipeline stage of a lead.
///
/// Parsing is case-insensitive; known stages always serialize lowercase.
/// A missing or empty status reads as [`LeadStatus::New`]. Anything else the
/// backend sends is kept verbatim in [`LeadStatus::Unclassified`] so it can
/// be reported and written back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeadStatus {
    New,
    Open,
    Contacted,
    Interested,
    Qualified,
    Closed,
    Unclassified(String),
}

impl LeadStatus {
    pub const KNOWN: [LeadStatus; 6] = [
        LeadStatus::New,
        LeadStatus::Open,
        LeadStatus::Contacted,
        LeadStatus::Interested,
        LeadStatus::Qualified,
        LeadStatus::Closed,
    ];

    /// Lenient read used for backend payloads.
    pub fn parse(raw: Option<&str>) -> LeadStatus {
        let raw = match raw.map(str::trim) {
            None | Some("") => return LeadStatus::New,
            Some(s) => s,
        };
        Self::known(raw).unwrap_or_else(|| LeadStatus::Unclassified(raw.to_string()))
    }

    fn known(raw: &str) -> Option<LeadStatus> {
        match raw.to_ascii_lowercase().as_str() {
            "new" => Some(LeadStatus::New),
            "open" => Some(LeadStatus::Open),
            "contacted" => Some(LeadStatus::Contacted),
            "interested" => Some(LeadStatus::Interested),
            "qualified" => Some(LeadStatus::Qualified),
            "closed" => Some(LeadStatus::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Open => "open",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Interested => "interested",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Closed => "closed",
            LeadStatus::Unclassified(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, LeadStatus::Unclassified(_))
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for LeadStatus {
    fn from(s: String) -> Self {
        LeadStatus::parse(Some(&s))
    }
}

impl From<LeadStatus> for String {
    fn from(s: LeadStatus) -> Self {
        s.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lead status '{0}' (expected one of: new, open, contacted, interested, qualified, closed)")]
pub struct UnknownStatus(pub String);

/// Strict parse for user input: unknown values are an error.
impl FromStr for LeadStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::known(s.trim()).ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// The fixed kanban columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    New,
    Contacted,
    Interested,
    Qualified,
    Closed,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::New,
        Column::Contacted,
        Column::Interested,
        Column::Qualified,
        Column::Closed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Column::New => "New",
            Column::Contacted => "Contacted",
            Column::Interested => "Interested",
            Column::Qualified => "Qualified",
            Column::Closed => "Closed",
        }
    }

    /// Status written when a card is dropped on this column.
    pub fn status(&self) -> LeadStatus {
        match self {
            Column::New => LeadStatus::New,
            Column::Contacted => LeadStatus::Contacted,
            Column::Interested => LeadStatus::Interested,
            Column::Qualified => LeadStatus::Qualified,
            Column::Closed => LeadStatus::Closed,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Column::New => 0,
            Column::Contacted => 1,
            Column::Interested => 2,
            Column::Qualified => 3,
            Column::Closed => 4,
        }
    }

    /// Column a status renders under. `open` has no column unless
    /// `open_as_new` folds it into `New`; unclassified values never do.
    pub fn for_status(status: &LeadStatus, open_as_new: bool) -> Option<Column> {
        match status {
            LeadStatus::New => Some(Column::New),
            LeadStatus::Open if open_as_new => Some(Column::New),
            LeadStatus::Open => None,
            LeadStatus::Contacted => Some(Column::Contacted),
            LeadStatus::Interested => Some(Column::Interested),
            LeadStatus::Qualified => Some(Column::Qualified),
            LeadStatus::Closed => Some(Column::Closed),
            LeadStatus::Unclassified(_) => None,
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Column> {
        Column::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Lead
// ---------------------------------------------------------------------------

/// Local mirror of a backend lead record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub source: Option<String>,
    pub enrichment_status: Option<String>,
    pub status: LeadStatus,
    pub score: u8,
    pub created_at: Option<DateTime<Utc>>,
}

impl Lead {
    pub fn new(id: impl Into<LeadId>, status: LeadStatus) -> Self {
        Self {
            id: id.into(),
            name: None,
            first_name: None,
            last_name: None,
            title: None,
            company: None,
            email: None,
            phone: None,
            linkedin_url: None,
            source: None,
            enrichment_status: None,
            status,
            score: 0,
            created_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn from_api(api: &ApiLead) -> Self {
        Self {
            id: LeadId::new(api.id.clone()),
            name: non_empty(&api.name),
            first_name: non_empty(&api.first_name),
            last_name: non_empty(&api.last_name),
            title: non_empty(&api.title),
            company: non_empty(&api.company),
            email: non_empty(&api.email),
            phone: non_empty(&api.phone),
            linkedin_url: non_empty(&api.linkedin_url),
            source: non_empty(&api.source),
            enrichment_status: non_empty(&api.enrichment_status),
            status: LeadStatus::parse(api.status.as_deref()),
            score: clamp_score(api.score),
            created_at: api.created_at.as_deref().and_then(parse_timestamp),
        }
    }

    /// `name`, else `first_name last_name`, else "Unknown".
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let parts: Vec<&str> = [&self.first_name, &self.last_name]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect();
        if parts.is_empty() {
            "Unknown".to_string()
        } else {
            parts.join(" ")
        }
    }

    /// Card subtitle: "Company • Title".
    pub fn subtitle(&self) -> String {
        let title = self.title.as_deref().unwrap_or("No Title");
        match &self.company {
            Some(company) => format!("{company} \u{2022} {title}"),
            None => title.to_string(),
        }
    }

    pub fn is_hot(&self) -> bool {
        self.score > 70
    }
}

fn non_empty(v: &Option<String>) -> Option<String> {
    v.as_ref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn clamp_score(score: Option<f64>) -> u8 {
    match score {
        Some(s) if s.is_finite() => s.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

/// RFC 3339, or a naive ISO timestamp (assumed UTC) as Python backends emit.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(LeadStatus::parse(Some("Qualified")), LeadStatus::Qualified);
        assert_eq!(LeadStatus::parse(Some("CLOSED")), LeadStatus::Closed);
        assert_eq!(LeadStatus::parse(Some(" open ")), LeadStatus::Open);
    }

    #[test]
    fn missing_or_empty_status_defaults_to_new() {
        assert_eq!(LeadStatus::parse(None), LeadStatus::New);
        assert_eq!(LeadStatus::parse(Some("")), LeadStatus::New);
        assert_eq!(LeadStatus::parse(Some("   ")), LeadStatus::New);
    }

    #[test]
    fn unknown_status_is_preserved() {
        let s = LeadStatus::parse(Some("Weird_Value"));
        assert_eq!(s, LeadStatus::Unclassified("Weird_Value".into()));
        assert_eq!(s.as_str(), "Weird_Value");
        assert!(!s.is_known());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&LeadStatus::parse(Some("Interested"))).unwrap();
        assert_eq!(json, "\"interested\"");
        let back: LeadStatus = serde_json::from_str("\"Contacted\"").unwrap();
        assert_eq!(back, LeadStatus::Contacted);
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        assert_eq!("qualified".parse::<LeadStatus>(), Ok(LeadStatus::Qualified));
        assert!("won".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn open_has_no_column_by_default() {
        assert_eq!(Column::for_status(&LeadStatus::Open, false), None);
        assert_eq!(Column::for_status(&LeadStatus::Open, true), Some(Column::New));
        assert_eq!(
            Column::for_status(&LeadStatus::Unclassified("x".into()), true),
            None
        );
    }

    #[test]
    fn column_status_round_trips_through_for_status() {
        for column in Column::ALL {
            assert_eq!(Column::for_status(&column.status(), false), Some(column));
            assert_eq!(Column::ALL[column.index()], column);
        }
        assert_eq!(Column::from_label("qualified"), Some(Column::Qualified));
        assert_eq!(Column::from_label("Open"), None);
    }

    #[test]
    fn lead_from_api_normalises_fields() {
        let api = ApiLead {
            id: "42".into(),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            company: Some("  ".into()),
            title: Some("CTO".into()),
            status: Some("Interested".into()),
            score: Some(140.0),
            created_at: Some("2025-03-01T10:20:30.123456".into()),
            ..Default::default()
        };
        let lead = Lead::from_api(&api);
        assert_eq!(lead.id.as_str(), "42");
        assert_eq!(lead.status, LeadStatus::Interested);
        assert_eq!(lead.score, 100);
        assert_eq!(lead.company, None);
        assert_eq!(lead.display_name(), "Ada Lovelace");
        assert_eq!(lead.subtitle(), "CTO");
        assert!(lead.created_at.is_some());
    }

    #[test]
    fn display_name_falls_back_to_unknown() {
        let lead = Lead::new("1", LeadStatus::New);
        assert_eq!(lead.display_name(), "Unknown");
        assert_eq!(lead.subtitle(), "No Title");
    }

    #[test]
    fn unparsable_timestamp_reads_as_none() {
        let api = ApiLead {
            id: "1".into(),
            created_at: Some("yesterday".into()),
            ..Default::default()
        };
        assert_eq!(Lead::from_api(&api).created_at, None);
    }
}
