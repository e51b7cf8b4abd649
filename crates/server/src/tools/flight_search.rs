//! flight_search tool implementation.
//!
//! Validates the request, then searches every date in the flexibility window
//! and returns loyalty-priced flights sorted by miles.

use chrono::{Local, NaiveDate};
use milesfare_client::{FlightRecord, FlightSearch, FlightService};
use milesfare_core::{AirportDirectory, AppConfig, Error, is_iata_code};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for flight_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FlightSearchParams {
    /// Origin airport IATA code (e.g., "GIG").
    pub origin: String,

    /// Destination airport IATA code (e.g., "MXP").
    pub destination: String,

    /// Departure date as YYYY-MM-DD. Must not be in the past.
    pub date: String,

    /// Number of consecutive dates to search starting at `date` (default: 0).
    /// 0 and 1 both search the requested date only. Typical values: 0, 3, 7, 15, 30.
    #[serde(default)]
    pub flexibility_days: u32,
}

/// Summary of one search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSummary {
    pub origin: String,
    pub destination: String,
    pub first_date: NaiveDate,
    /// Number of dates queried.
    pub dates_searched: u32,
    /// Number of flights returned.
    pub total: usize,
}

/// Output structure for flight_search tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSearchOutput {
    /// Flights, cheapest first.
    pub flights: Vec<FlightRecord>,
    pub summary: SearchSummary,
    /// Set when no flight qualified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSearch {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub flexibility_days: u32,
}

/// Check codes, route, date, and window size.
///
/// When an airport directory is loaded, both codes must exist in it.
pub fn validate(
    params: &FlightSearchParams, airports: Option<&AirportDirectory>, max_flexibility_days: u32, today: NaiveDate,
) -> Result<ValidatedSearch, Error> {
    let origin = params.origin.trim().to_ascii_uppercase();
    let destination = params.destination.trim().to_ascii_uppercase();

    for (field, code) in [("origin", &origin), ("destination", &destination)] {
        if !is_iata_code(code) {
            return Err(Error::InvalidInput(format!("{field} must be a 3-letter IATA code, got {code:?}")));
        }
    }

    if origin == destination {
        return Err(Error::InvalidInput("origin and destination must differ".into()));
    }

    let date = NaiveDate::parse_from_str(params.date.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidInput(format!("date must be YYYY-MM-DD: {e}")))?;

    if date < today {
        return Err(Error::InvalidInput("departure date cannot be in the past".into()));
    }

    if params.flexibility_days > max_flexibility_days {
        return Err(Error::InvalidInput(format!(
            "flexibility_days must not exceed {max_flexibility_days}"
        )));
    }

    if let Some(directory) = airports {
        for code in [&origin, &destination] {
            if !directory.exists(code) {
                return Err(Error::UnknownAirport(code.clone()));
            }
        }
    }

    Ok(ValidatedSearch { origin, destination, date, flexibility_days: params.flexibility_days })
}

/// Implementation of the flight_search tool.
pub async fn search_impl<S>(
    service: &FlightService<S>, airports: Option<&AirportDirectory>, config: &AppConfig, params: FlightSearchParams,
) -> Result<CallToolResult, McpError>
where
    S: FlightSearch + ?Sized + 'static,
{
    let today = Local::now().date_naive();
    let search = validate(&params, airports, config.max_flexibility_days, today)?;

    let flights = service
        .get_flights(&search.origin, &search.destination, search.date, i64::from(search.flexibility_days))
        .await
        .map_err(|e| {
            tracing::error!("flight search failed: {}", e);
            Error::SearchFailed(format!("an error occurred while searching for flights: {e}"))
        })?;

    let message = flights.is_empty().then(|| "no flights found".to_string());

    let output = FlightSearchOutput {
        summary: SearchSummary {
            origin: search.origin,
            destination: search.destination,
            first_date: search.date,
            dates_searched: search.flexibility_days.max(1),
            total: flights.len(),
        },
        flights,
        message,
    };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}
