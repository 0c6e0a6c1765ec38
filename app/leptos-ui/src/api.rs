use std::fmt;

use lb_api_types::{ApiCampaign, ApiErrorBody, ApiLead, ApiLeadsPage, LeadQuery, UpdateLeadStatus};
use lb_core::types::{LeadId, LeadStatus};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

/// A failed call to the lead API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status, or `None` when the request never got an answer.
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    fn transport(err: impl fmt::Debug) -> Self {
        Self {
            status: None,
            message: format!("{err:?}"),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {status}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

// ── Generic fetch helpers ──

async fn send(method: &str, url: &str, body: Option<String>) -> Result<Response, ApiError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts).map_err(ApiError::transport)?;
    let headers = request.headers();
    headers
        .set("Accept", "application/json")
        .map_err(ApiError::transport)?;
    if body.is_some() {
        headers
            .set("Content-Type", "application/json")
            .map_err(ApiError::transport)?;
    }

    let window = web_sys::window().ok_or_else(|| ApiError {
        status: None,
        message: "no global window".to_string(),
    })?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(ApiError::transport)?;
    let resp: Response = resp_value.dyn_into().map_err(ApiError::transport)?;

    if resp.ok() {
        return Ok(resp);
    }

    let status = resp.status();
    let text = match resp.text() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default(),
        Err(_) => String::new(),
    };
    Err(ApiError {
        status: Some(status),
        message: error_message(&text, &resp.status_text()),
    })
}

async fn fetch_json<T: for<'de> Deserialize<'de>>(url: &str) -> Result<T, ApiError> {
    let resp = send("GET", url, None).await?;
    let json = JsFuture::from(resp.json().map_err(ApiError::transport)?)
        .await
        .map_err(ApiError::transport)?;
    serde_wasm_bindgen::from_value(json).map_err(ApiError::transport)
}

async fn patch_json<T: Serialize>(url: &str, body: &T) -> Result<(), ApiError> {
    let body = serde_json::to_string(body).map_err(ApiError::transport)?;
    send("PATCH", url, Some(body)).await?;
    Ok(())
}

/// Message for a failed response: the body's `detail`/`error`, else the
/// status text.
pub fn error_message(body: &str, status_text: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message().map(str::to_string))
        .unwrap_or_else(|| {
            if status_text.is_empty() {
                "request failed".to_string()
            } else {
                status_text.to_string()
            }
        })
}

/// `?key=value&...` for a lead query; blank fields are left out.
pub fn query_string(query: &LeadQuery) -> String {
    let query = query.clone().normalized();
    let mut pairs: Vec<(&str, String)> = Vec::new();
    if let Some(v) = &query.campaign_id {
        pairs.push(("campaign_id", v.clone()));
    }
    if let Some(v) = query.page {
        pairs.push(("page", v.to_string()));
    }
    if let Some(v) = query.limit {
        pairs.push(("limit", v.to_string()));
    }
    if let Some(v) = &query.search {
        pairs.push(("search", v.clone()));
    }
    if let Some(v) = &query.status {
        pairs.push(("status", v.clone()));
    }
    if pairs.is_empty() {
        return String::new();
    }
    let encoded: Vec<String> = pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={}", String::from(js_sys::encode_uri_component(&v))))
        .collect();
    format!("?{}", encoded.join("&"))
}

fn lead_url(base: &str, id: &LeadId) -> String {
    format!(
        "{base}/api/leads/{}",
        String::from(js_sys::encode_uri_component(id.as_str()))
    )
}

// ── Endpoints ──

pub async fn fetch_leads(base: &str, query: &LeadQuery) -> Result<ApiLeadsPage, ApiError> {
    fetch_json(&format!("{base}/api/leads{}", query_string(query))).await
}

pub async fn fetch_lead(base: &str, id: &LeadId) -> Result<ApiLead, ApiError> {
    fetch_json(&lead_url(base, id)).await
}

pub async fn fetch_campaign(base: &str, id: &str) -> Result<ApiCampaign, ApiError> {
    fetch_json(&format!(
        "{base}/api/campaigns/{}",
        String::from(js_sys::encode_uri_component(id))
    ))
    .await
}

pub async fn update_lead_status(base: &str, id: &LeadId, status: &LeadStatus) -> Result<(), ApiError> {
    let body = UpdateLeadStatus {
        status: status.to_string(),
    };
    patch_json(&lead_url(base, id), &body).await
}
