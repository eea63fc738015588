//! HTTP access to the catalog backend
//!
//! Every operation is one JSON POST to a fixed endpoint. The background
//! helpers spawn a task per user action and publish the outcome into the
//! shared state, so the UI loop never awaits the network.

use crate::catalog::envelope::EnvelopeError;
use crate::catalog::payload::{listing_payload, search_payload};
use crate::catalog::{AdminAction, SearchResponse, unpack_envelope};
use crate::config::EndpointConfig;
use crate::state::{QueryState, SharedState, write_state};
use crate::types::{LoadingState, QueryOutcome};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0} URL is not configured (press ',' to set it)")]
    NotConfigured(&'static str),
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

/// Which of the two read endpoints a query goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Search,
    Listing,
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    endpoints: EndpointConfig,
}

impl CatalogClient {
    pub fn new(endpoints: &EndpointConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(endpoints.timeout())
            .build()?;
        Ok(Self {
            http,
            endpoints: endpoints.clone(),
        })
    }

    /// The underlying HTTP client, shared with the page scraper
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }

    /// Natural-language search
    pub async fn search(&self, question: &str) -> Result<SearchResponse, CatalogError> {
        let url = required(&self.endpoints.search_url, "Search")?;
        let value = self.post(url, &search_payload(question)).await?;
        Ok(unpack_envelope(value)?)
    }

    /// Records of one theme
    pub async fn list_by_theme(&self, theme: &str) -> Result<SearchResponse, CatalogError> {
        let url = required(&self.endpoints.listing_url, "Listing")?;
        let value = self.post(url, &listing_payload(theme)).await?;
        Ok(unpack_envelope(value)?)
    }

    /// Send a payload built by `build_admin_payload`
    pub async fn admin(&self, payload: &Value) -> Result<SearchResponse, CatalogError> {
        let url = required(&self.endpoints.admin_url, "Admin")?;
        let value = self.post(url, payload).await?;
        Ok(unpack_envelope(value)?)
    }

    pub async fn query(&self, kind: QueryKind, text: &str) -> Result<SearchResponse, CatalogError> {
        match kind {
            QueryKind::Search => self.search(text).await,
            QueryKind::Listing => self.list_by_theme(text).await,
        }
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value, CatalogError> {
        tracing::debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        decode_body(status, &text)
    }
}

fn required<'a>(url: &'a Option<String>, name: &'static str) -> Result<&'a str, CatalogError> {
    url.as_deref()
        .filter(|u| !u.trim().is_empty())
        .ok_or(CatalogError::NotConfigured(name))
}

/// Turn a raw HTTP answer into JSON; anything but 200 is an error
pub(crate) fn decode_body(status: StatusCode, text: &str) -> Result<Value, CatalogError> {
    if status != StatusCode::OK {
        return Err(CatalogError::Status {
            status: status.as_u16(),
            body: text.trim().to_string(),
        });
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(text)?)
}

fn query_state(state: &mut crate::state::AppState, kind: QueryKind) -> &mut QueryState {
    match kind {
        QueryKind::Search => &mut state.search,
        QueryKind::Listing => &mut state.listing,
    }
}

/// Run a search or listing in the background
pub fn execute_query_background(
    state: SharedState,
    client: CatalogClient,
    kind: QueryKind,
    text: String,
) {
    {
        let mut s = write_state(&state);
        let query = query_state(&mut s, kind);
        query.loading = LoadingState::Loading;
        query.last_query = text.clone();
    }

    tokio::spawn(async move {
        let start = Instant::now();
        let result = client.query(kind, &text).await;
        let duration = start.elapsed();

        let mut s = write_state(&state);
        match result {
            Ok(response) => {
                tracing::info!(?kind, items = response.items.len(), ?duration, "query complete");
                s.cache.remember_all(&response.items);
                let query = query_state(&mut s, kind);
                query.outcome = Some(QueryOutcome { response, duration });
                query.loading = LoadingState::Complete;
                query.selected = 0;
                s.ui.results_scroll = 0;
            }
            Err(e) => {
                tracing::warn!(?kind, error = %e, "query failed");
                query_state(&mut s, kind).loading = LoadingState::Error(e.to_string());
            }
        }
    });
}

/// Send an admin payload in the background
pub fn execute_admin_background(
    state: SharedState,
    client: CatalogClient,
    action: AdminAction,
    payload: Value,
) {
    let set_number = payload
        .get("set_number")
        .or_else(|| payload.pointer("/lego/set_number"))
        .and_then(Value::as_i64);

    {
        let mut s = write_state(&state);
        s.admin.loading = LoadingState::Loading;
        s.admin.message = None;
    }

    tokio::spawn(async move {
        let result = client.admin(&payload).await;

        let mut s = write_state(&state);
        match result {
            Ok(response) => {
                tracing::info!(action = action.wire_name(), ?set_number, "admin operation complete");
                s.cache.remember_all(&response.items);
                if let (AdminAction::Delete, Some(id)) = (action, set_number) {
                    s.cache.forget(id);
                }
                s.admin.message = Some(if response.answer.is_empty() {
                    format!("{} completada", action.label())
                } else {
                    response.answer
                });
                s.admin.loading = LoadingState::Complete;
            }
            Err(e) => {
                tracing::warn!(action = action.wire_name(), error = %e, "admin operation failed");
                s.admin.loading = LoadingState::Error(e.to_string());
            }
        }
    });
}
