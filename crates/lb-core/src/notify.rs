//! Transient user-facing notifications (toasts).

use serde::{Deserialize, Serialize};

use crate::types::{LeadId, LeadStatus};

pub const UPDATE_FAILED: &str = "Failed to update status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<LeadId>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            lead_id: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    pub fn for_lead(mut self, id: &LeadId) -> Self {
        self.lead_id = Some(id.clone());
        self
    }

    pub fn moved(id: &LeadId, status: &LeadStatus) -> Self {
        Self::success(format!("Moved to {status}")).for_lead(id)
    }

    pub fn update_failed(id: &LeadId) -> Self {
        Self::error(UPDATE_FAILED).for_lead(id)
    }

    pub fn transition_rejected(id: &LeadId, from: &LeadStatus, to: &LeadStatus) -> Self {
        Self::error(format!("Cannot move from {from} to {to}")).for_lead(id)
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Sending half handed to the orchestrator. Delivery is best effort: a
/// dropped receiver just means nobody is showing toasts.
pub type NotificationSender = flume::Sender<Notification>;

pub fn channel() -> (NotificationSender, flume::Receiver<Notification>) {
    flume::unbounded()
}
