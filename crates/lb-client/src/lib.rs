//! REST client for the lead backend.
//!
//! [`HttpLeadService`] implements [`lb_core::service::LeadService`] on top of
//! `reqwest`, so the CLI and any native front end share one transport.

mod error;
mod http;

pub use error::ClientError;
pub use http::HttpLeadService;
