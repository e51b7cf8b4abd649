//! airport_lookup tool implementation.
//!
//! Answers whether an IATA code is known, with the airport's details when it is.

use milesfare_core::{Airport, AirportDirectory, ConfigError, Error, is_iata_code};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for airport_lookup tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AirportLookupParams {
    /// Airport IATA code (case-insensitive).
    pub code: String,
}

/// Output structure for airport_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AirportLookupOutput {
    pub code: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airport: Option<Airport>,
}

/// Implementation of the airport_lookup tool.
pub fn lookup_impl(
    airports: Option<&AirportDirectory>, params: AirportLookupParams,
) -> Result<CallToolResult, McpError> {
    let directory = airports.ok_or_else(|| {
        Error::Config(ConfigError::Missing {
            field: "airports_path".into(),
            hint: "Set MILESFARE_AIRPORTS_PATH to a CSV of airports".into(),
        })
    })?;

    let code = params.code.trim().to_ascii_uppercase();
    if !is_iata_code(&code) {
        return Err(Error::InvalidInput(format!("code must be a 3-letter IATA code, got {code:?}")).into());
    }

    let airport = directory.get(&code).cloned();
    let output = AirportLookupOutput { exists: airport.is_some(), code, airport };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}
