use std::time::Duration;

use async_trait::async_trait;
use lb_api_types::{
    ApiCampaign, ApiErrorBody, ApiLead, ApiLeadStats, ApiLeadsPage, LeadQuery, UpdateLeadStatus,
};
use lb_core::config::ApiConfig;
use lb_core::service::{LeadPage, LeadService, ServiceError};
use lb_core::types::{Lead, LeadId, LeadStatus};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;

/// `LeadService` over the backend's JSON REST API.
#[derive(Debug, Clone)]
pub struct HttpLeadService {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpLeadService {
    /// Client with no request timeout.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: trimmed.to_string(),
            token: None,
        })
    }

    /// Build from the `[api]` config section. The bearer token is read from
    /// the env var the section names.
    pub fn from_config(api: &ApiConfig) -> Result<Self, ClientError> {
        let service = Self::with_timeout(&api.base_url, api.timeout_secs.map(Duration::from_secs))?;
        Ok(match api.token() {
            Some(token) => service.with_token(token),
            None => service,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/campaigns/{id}`, used for the board heading.
    pub async fn get_campaign(&self, id: &str) -> Result<ApiCampaign, ClientError> {
        let path = format!("/api/campaigns/{}", urlencoding::encode(id));
        self.send_json(self.request(Method::GET, &path)).await
    }

    /// `GET /api/leads` without converting to domain leads.
    pub async fn fetch_page(&self, query: &LeadQuery) -> Result<ApiLeadsPage, ClientError> {
        let query = query.clone().normalized();
        self.send_json(self.request(Method::GET, "/api/leads").query(&query))
            .await
    }

    // -- helpers ------------------------------------------------------------

    fn lead_path(id: &LeadId) -> String {
        format!("/api/leads/{}", urlencoding::encode(id.as_str()))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, "lead api request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.message().map(str::to_string))
            .or_else(|| {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let bytes = self.send(builder).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl LeadService for HttpLeadService {
    async fn list_leads(&self, query: &LeadQuery) -> Result<LeadPage, ServiceError> {
        let page = self.fetch_page(query).await?;
        debug!(count = page.items.len(), total = page.total, "leads fetched");
        Ok(page.into())
    }

    async fn get_lead(&self, id: &LeadId) -> Result<Lead, ServiceError> {
        let result: Result<ApiLead, ClientError> = self
            .send_json(self.request(Method::GET, &Self::lead_path(id)))
            .await;
        match result {
            Ok(api) => Ok(Lead::from_api(&api)),
            Err(err) if err.status() == Some(404) => Err(ServiceError::NotFound(id.clone())),
            Err(err) => Err(err.into()),
        }
    }

    async fn update_status(&self, id: &LeadId, status: &LeadStatus) -> Result<(), ServiceError> {
        let body = UpdateLeadStatus {
            status: status.to_string(),
        };
        self.send(self.request(Method::PATCH, &Self::lead_path(id)).json(&body))
            .await?;
        Ok(())
    }

    async fn stats(&self) -> Result<ApiLeadStats, ServiceError> {
        Ok(self
            .send_json(self.request(Method::GET, "/api/leads/stats"))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let svc = HttpLeadService::new("http://localhost:8000/").unwrap();
        assert_eq!(svc.base_url(), "http://localhost:8000");
    }

    #[test]
    fn base_url_needs_a_scheme() {
        let err = HttpLeadService::new("localhost:8000").unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl(_)));
    }

    #[test]
    fn lead_ids_are_path_encoded() {
        assert_eq!(
            HttpLeadService::lead_path(&LeadId::from("a/b c")),
            "/api/leads/a%2Fb%20c"
        );
    }

    #[test]
    fn status_errors_convert_to_service_errors() {
        let err: ServiceError = ClientError::Status {
            status: 422,
            message: "bad status".into(),
        }
        .into();
        assert_eq!(
            err,
            ServiceError::Status {
                status: 422,
                message: "bad status".into()
            }
        );
    }
}
