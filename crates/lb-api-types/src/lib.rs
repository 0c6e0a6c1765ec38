//! Wire types shared by the leadboard client surfaces.
//!
//! These mirror the JSON the lead backend actually sends, which is loose:
//! most fields may be missing or null, and the list endpoint answers with
//! either `items` or `leads` depending on the route. Everything here is
//! lenient on read; normalisation into strict domain types happens in
//! `lb-core`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Lead records ──

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiLead {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub enrichment_status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One page of `GET /api/leads`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiLeadsPage {
    #[serde(default, alias = "leads")]
    pub items: Vec<ApiLead>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
}

fn default_page() -> u32 {
    1
}

/// `GET /api/leads/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiLeadStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub by_status: BTreeMap<String, u64>,
    #[serde(default)]
    pub avg_score: f64,
    #[serde(default)]
    pub by_enrichment: Option<BTreeMap<String, u64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCampaign {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub leads_count: u64,
    #[serde(default)]
    pub contacted_count: u64,
    #[serde(default)]
    pub replied_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ── Request types ──

/// Query string for `GET /api/leads`. Unset parameters are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl LeadQuery {
    /// Drop empty strings so `?search=` never reaches the backend.
    pub fn normalized(mut self) -> Self {
        fn keep(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        self.campaign_id = keep(self.campaign_id);
        self.search = keep(self.search);
        self.status = keep(self.status);
        self
    }
}

/// Body of `PATCH /api/leads/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLeadStatus {
    pub status: String,
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.detail.as_deref().or(self.error.as_deref())
    }
}
