use async_trait::async_trait;
use lb_api_types::{ApiLeadStats, ApiLeadsPage, LeadQuery};

use crate::types::{Lead, LeadId, LeadStatus};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Failures talking to the remote lead service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Transport failure: connect, timeout, TLS.
    #[error("request failed: {0}")]
    Http(String),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    #[error("lead {0} not found")]
    NotFound(LeadId),
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPage {
    pub leads: Vec<Lead>,
    pub total: u64,
    pub page: u32,
    pub pages: u32,
}

impl From<ApiLeadsPage> for LeadPage {
    fn from(api: ApiLeadsPage) -> Self {
        Self {
            leads: api.items.iter().map(Lead::from_api).collect(),
            total: api.total,
            page: api.page,
            pages: api.pages,
        }
    }
}

// ---------------------------------------------------------------------------
// LeadService trait
// ---------------------------------------------------------------------------

/// The REST contract the board consumes.
#[async_trait]
pub trait LeadService: Send + Sync {
    /// `GET /api/leads`
    async fn list_leads(&self, query: &LeadQuery) -> Result<LeadPage, ServiceError>;

    /// `GET /api/leads/{id}`
    async fn get_lead(&self, id: &LeadId) -> Result<Lead, ServiceError>;

    /// `PATCH /api/leads/{id}` with `{"status": ...}`. The response body is ignored.
    async fn update_status(&self, id: &LeadId, status: &LeadStatus) -> Result<(), ServiceError>;

    /// `GET /api/leads/stats`
    async fn stats(&self) -> Result<ApiLeadStats, ServiceError>;
}
