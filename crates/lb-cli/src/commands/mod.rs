pub mod board;
pub mod config;
pub mod move_lead;
pub mod show;
pub mod stats;

use lb_core::notify::{Notification, NotificationLevel};
use lb_core::service::ServiceError;

/// Map service failures to user-friendly messages.
pub fn friendly_error(err: ServiceError) -> anyhow::Error {
    match err {
        ServiceError::Http(detail) => anyhow::anyhow!(
            "Could not reach the lead API ({detail}).\n  \
             (hint: is the backend running? check --api-url or LEADBOARD_API_URL)"
        ),
        ServiceError::Status { status: 401, .. } | ServiceError::Status { status: 403, .. } => {
            anyhow::anyhow!(
                "The lead API refused the request. Set a token in LEADBOARD_API_TOKEN \
                 (or the variable named by api.token_env)."
            )
        }
        ServiceError::Status { status, message } => {
            anyhow::anyhow!("Lead API returned HTTP {status}: {message}")
        }
        ServiceError::Decode(detail) => {
            anyhow::anyhow!("Unexpected response from the lead API: {detail}")
        }
        ServiceError::NotFound(id) => anyhow::anyhow!("Lead {id} not found"),
    }
}

/// One-line rendering of a toast for the terminal.
pub fn format_notification(note: &Notification) -> String {
    let tag = match note.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Success => "ok",
        NotificationLevel::Warning => "warn",
        NotificationLevel::Error => "error",
    };
    format!("[{tag}] {}", note.message)
}
