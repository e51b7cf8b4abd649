//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::airport_lookup::{AirportLookupParams, lookup_impl};
use crate::tools::flight_search::{FlightSearchParams, search_impl};

use milesfare_client::{DeepLinkBuilder, FlightService, SmilesClient};
use milesfare_core::{AirportDirectory, AppConfig, Error};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// Upstream search backend, or the reason it could not be built.
///
/// Credentials are checked lazily so `airport_lookup` keeps working without them.
enum Upstream {
    Ready(FlightService<SmilesClient>),
    Unavailable(String),
}

impl Upstream {
    fn from_config(config: &AppConfig) -> Self {
        let deeplinks = match DeepLinkBuilder::new(&config.deeplink_base_url, config.deeplink_utc_offset_minutes) {
            Ok(deeplinks) => deeplinks,
            Err(e) => return Upstream::Unavailable(e.to_string()),
        };

        match SmilesClient::from_app_config(config) {
            Ok(client) => Upstream::Ready(FlightService::new(Arc::new(client), deeplinks)),
            Err(e) => {
                tracing::warn!("flight search disabled: {}", e);
                Upstream::Unavailable(e.to_string())
            }
        }
    }
}

/// The main MCP server handler for mcp-flights.
#[derive(Clone)]
pub struct FlightSearchServer {
    tool_router: ToolRouter<Self>,
    config: Arc<AppConfig>,
    airports: Option<Arc<AirportDirectory>>,
    upstream: Arc<Upstream>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl FlightSearchServer {
    /// Create a new server handler.
    pub fn new(config: AppConfig, airports: Option<AirportDirectory>) -> Self {
        let upstream = Upstream::from_config(&config);
        Self {
            tool_router: Self::tool_router(),
            config: Arc::new(config),
            airports: airports.map(Arc::new),
            upstream: Arc::new(upstream),
        }
    }

    /// Search award flights across a window of departure dates.
    #[tool(
        description = "Search Smiles award flights from origin to destination starting on a date, across a \
                       flexibility window of consecutive days. Returns flights priced in miles, cheapest first, \
                       each with a booking link."
    )]
    async fn flight_search(&self, params: Parameters<FlightSearchParams>) -> Result<CallToolResult, McpError> {
        match self.upstream.as_ref() {
            Upstream::Ready(service) => search_impl(service, self.airports.as_deref(), &self.config, params.0).await,
            Upstream::Unavailable(reason) => {
                Err(Error::Upstream(format!("flight search unavailable: {reason}")).into())
            }
        }
    }

    /// Check whether an airport code is known.
    #[tool(description = "Look up an airport by IATA code. Returns whether it exists and its details.")]
    async fn airport_lookup(&self, params: Parameters<AirportLookupParams>) -> Result<CallToolResult, McpError> {
        lookup_impl(self.airports.as_deref(), params.0)
    }
}

impl ServerHandler for FlightSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-flights".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_both_tools() {
        let server = FlightSearchServer::new(AppConfig::default(), None);
        let names: Vec<_> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();

        assert!(names.contains(&"flight_search".to_string()));
        assert!(names.contains(&"airport_lookup".to_string()));
    }

    #[test]
    fn test_upstream_unavailable_without_credentials() {
        let upstream = Upstream::from_config(&AppConfig::default());
        assert!(matches!(upstream, Upstream::Unavailable(reason) if reason.contains("API key")));
    }

    #[test]
    fn test_upstream_ready_with_credentials() {
        let config = AppConfig {
            api_key: Some("key".into()),
            akamai_telemetry: Some("token".into()),
            ..Default::default()
        };
        assert!(matches!(Upstream::from_config(&config), Upstream::Ready(_)));
    }

    #[tokio::test]
    async fn test_flight_search_reports_unavailable_upstream() {
        let server = FlightSearchServer::new(AppConfig::default(), None);
        let params = FlightSearchParams {
            origin: "GIG".into(),
            destination: "MXP".into(),
            date: "2099-01-01".into(),
            flexibility_days: 0,
        };

        let result = server.flight_search(Parameters(params)).await;
        assert!(result.is_err());
    }
}
