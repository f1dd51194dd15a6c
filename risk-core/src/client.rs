use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};
use tracing::debug;

use crate::{
    Config,
    error::TransportError,
    model::{AssessmentResponse, Coordinates},
};

/// Path of the assessment endpoint, relative to the server base URL.
pub const RISK_ASSESSMENT_PATH: &str = "/risk_assessment";

/// Something that can turn coordinates into an assessment reply.
#[async_trait]
pub trait RiskAssessor: Send + Sync + Debug {
    async fn assess(&self, coords: &Coordinates) -> Result<AssessmentResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpRiskClient {
    endpoint: String,
    http: Client,
}

impl HttpRiskClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self { endpoint: endpoint_url(base_url), http }
    }

    /// Build a client for the configured server, applying the timeout if one is set.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self::with_client(config.server_url(), http))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RiskAssessor for HttpRiskClient {
    async fn assess(&self, coords: &Coordinates) -> Result<AssessmentResponse, TransportError> {
        let url = self.endpoint.clone();

        // `.json` also sets `Content-Type: application/json`.
        let res = self
            .http
            .post(&url)
            .json(coords)
            .send()
            .await
            .map_err(|source| TransportError::Request { url: url.clone(), source })?;

        // The server sends its `{"error": ...}` payload with a 404, so the
        // status is not checked; only the body decides.
        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| TransportError::Request { url: url.clone(), source })?;

        debug!(%url, status = status.as_u16(), bytes = body.len(), "risk assessment response received");

        serde_json::from_str(&body).map_err(|source| TransportError::Decode {
            url,
            status: status.as_u16(),
            body: truncate_body(&body),
            source,
        })
    }
}

fn endpoint_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), RISK_ASSESSMENT_PATH)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
