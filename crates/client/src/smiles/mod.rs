//! Smiles flight search API client.
//!
//! ### Upstream API
//!
//! - **Endpoint**: `https://api-air-flightsearch-blue.smiles.com.br/v1/airlines/search`
//! - **Authentication**: `x-api-key` header plus an `Akamai-BM-Telemetry` anti-bot token.
//! - **Headers**: a fixed browser-like set, attached identically to every request.
//! - **Timeout**: 30s per request by default. No retries at this layer.
//! - **Failures**: transport, status, and body-parse failures come back as
//!   `TransportError` values for the caller to recover per query.

pub mod error;
pub mod normalize;
pub mod request;
pub mod response;

pub use error::{SmilesError, TransportError};
pub use normalize::{LOYALTY_FARE_TYPES, loyalty_cost, normalize};
pub use request::{SearchQuery, UpstreamParams};
pub use response::{FlightRecord, RawResponse};

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use milesfare_core::AppConfig;
use milesfare_core::config::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use reqwest::Url;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ACCEPT: &str = "application/json, text/plain, */*";
const ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7";
const CHANNEL: &str = "WEB";
const FRONT_END_ORIGIN: &str = "https://www.smiles.com.br";
const FRONT_END_REFERER: &str = "https://www.smiles.com.br/";

/// Anything that can run one upstream flight search.
///
/// `SmilesClient` is the production implementation; the dispatcher and the
/// orchestrator only depend on this trait.
#[async_trait]
pub trait FlightSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<RawResponse, TransportError>;
}

/// Smiles API client configuration.
#[derive(Debug, Clone)]
pub struct SmilesConfig {
    /// Value of the `x-api-key` header.
    pub api_key: String,
    /// Value of the `Akamai-BM-Telemetry` header.
    pub telemetry: String,
    /// Search endpoint.
    pub base_url: String,
    /// Request timeout (default: 30s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for SmilesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            telemetry: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SmilesConfig {
    /// Build from application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SmilesError> {
        let api_key = config.require_api_key().map_err(|_| SmilesError::MissingApiKey)?;
        let telemetry = config.require_telemetry().map_err(|_| SmilesError::MissingTelemetry)?;

        Ok(Self {
            api_key: api_key.to_string(),
            telemetry: telemetry.to_string(),
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// The fixed header set sent with every request.
    fn headers(&self) -> Result<HeaderMap, SmilesError> {
        fn value(name: &'static str, raw: &str) -> Result<HeaderValue, SmilesError> {
            HeaderValue::from_str(raw).map_err(|_| SmilesError::InvalidHeader { name })
        }

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
        headers.insert(
            HeaderName::from_static("akamai-bm-telemetry"),
            value("akamai-bm-telemetry", &self.telemetry)?,
        );
        headers.insert(HeaderName::from_static("channel"), HeaderValue::from_static(CHANNEL));
        headers.insert(header::ORIGIN, HeaderValue::from_static(FRONT_END_ORIGIN));
        headers.insert(HeaderName::from_static("priority"), HeaderValue::from_static("u=1, i"));
        headers.insert(header::REFERER, HeaderValue::from_static(FRONT_END_REFERER));
        headers.insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("empty"));
        headers.insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("cors"));
        headers.insert(HeaderName::from_static("sec-fetch-site"), HeaderValue::from_static("same-site"));
        headers.insert(header::USER_AGENT, value("user-agent", &self.user_agent)?);
        headers.insert(HeaderName::from_static("x-api-key"), value("x-api-key", &self.api_key)?);
        Ok(headers)
    }
}

/// Smiles flight search client.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct SmilesClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SmilesClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SmilesConfig) -> Result<Self, SmilesError> {
        if config.api_key.is_empty() {
            return Err(SmilesError::MissingApiKey);
        }
        if config.telemetry.is_empty() {
            return Err(SmilesError::MissingTelemetry);
        }

        let base_url =
            Url::parse(&config.base_url).map_err(|e| SmilesError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(config.headers()?)
            .build()
            .map_err(|e| SmilesError::Client(Arc::new(e)))?;

        Ok(Self { http, base_url })
    }

    /// Create a new client from application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SmilesError> {
        Self::new(SmilesConfig::from_app_config(config)?)
    }

    /// Run one upstream search: exactly one GET, no retries.
    pub async fn fetch(&self, query: &SearchQuery) -> Result<RawResponse, TransportError> {
        let start = Instant::now();

        tracing::debug!(
            "searching Smiles API: {}->{} on {}",
            query.origin,
            query.destination,
            query.departure_date
        );

        let http_response = self
            .http
            .get(self.base_url.clone())
            .query(&query.to_params())
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("Smiles API response status: {}", status);

        if !status.is_success() {
            return Err(TransportError::Http { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let document: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Parse(e.to_string()))?;

        tracing::debug!("search for {} completed in {:?}", query.departure_date, start.elapsed());

        Ok(RawResponse::new(document))
    }
}

#[async_trait]
impl FlightSearch for SmilesClient {
    async fn search(&self, query: &SearchQuery) -> Result<RawResponse, TransportError> {
        self.fetch(query).await
    }
}
