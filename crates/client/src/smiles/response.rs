//! Smiles flight search response types.
//!
//! The upstream schema is undocumented and drifts, so the raw model makes
//! every field optional except the fare list. A flight option that does not
//! fit the model is skipped on its own; the rest of the response is kept.
//! Fare items are checked one by one, so an odd fare never sinks its siblings.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One upstream response body, kept as an untyped JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse(Value);

impl RawResponse {
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    pub fn document(&self) -> &Value {
        &self.0
    }

    /// Flight options across all requested segments, in response order.
    ///
    /// A missing or non-array list at either level contributes nothing.
    pub fn flight_options(&self) -> impl Iterator<Item = &Value> {
        self.0
            .get("requestedFlightSegmentList")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|segment| segment.get("flightList").and_then(Value::as_array))
            .flatten()
    }
}

impl From<Value> for RawResponse {
    fn from(document: Value) -> Self {
        Self(document)
    }
}

/// One flight option as returned upstream.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFlight {
    #[serde(default)]
    pub airline: Option<RawAirline>,
    #[serde(default)]
    pub duration: Option<RawDuration>,
    #[serde(deserialize_with = "fare_items")]
    pub fare_list: Vec<RawFare>,
    #[serde(default)]
    pub departure: Option<RawEndpoint>,
    #[serde(default)]
    pub arrival: Option<RawEndpoint>,
    #[serde(default)]
    pub stops: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RawAirline {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawDuration {
    #[serde(default)]
    pub hours: Option<u32>,
    #[serde(default)]
    pub minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RawFare {
    #[serde(default, rename = "type")]
    pub fare_type: Option<String>,
    #[serde(default)]
    pub miles: Option<i64>,
}

/// Keep every fare item that fits `RawFare`. The list itself must be an array.
fn fare_items<'de, D>(deserializer: D) -> Result<Vec<RawFare>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<Value>::deserialize(deserializer)?;
    Ok(items.into_iter().filter_map(|item| RawFare::deserialize(item).ok()).collect())
}

#[derive(Debug, Deserialize)]
pub struct RawEndpoint {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub airport: Option<RawAirport>,
}

#[derive(Debug, Deserialize)]
pub struct RawAirport {
    #[serde(default)]
    pub code: Option<String>,
}

impl RawEndpoint {
    fn airport_code(&self) -> Option<String> {
        self.airport.as_ref().and_then(|a| a.code.clone())
    }
}

impl RawFlight {
    pub fn airline_name(&self) -> Option<String> {
        self.airline.as_ref().and_then(|a| a.name.clone())
    }

    pub fn duration_hours(&self) -> Option<u32> {
        self.duration.as_ref().and_then(|d| d.hours)
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        self.duration.as_ref().and_then(|d| d.minutes)
    }

    pub fn departure_date(&self) -> Option<&str> {
        self.departure.as_ref().and_then(|d| d.date.as_deref())
    }

    pub fn arrival_date(&self) -> Option<&str> {
        self.arrival.as_ref().and_then(|a| a.date.as_deref())
    }

    pub fn departure_airport(&self) -> Option<String> {
        self.departure.as_ref().and_then(RawEndpoint::airport_code)
    }

    pub fn arrival_airport(&self) -> Option<String> {
        self.arrival.as_ref().and_then(RawEndpoint::airport_code)
    }
}

/// Normalized, comparably priced flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub airline: Option<String>,
    pub miles_cost: u64,
    pub duration_hours: Option<u32>,
    pub duration_minutes: Option<u32>,
    pub departure_time: Option<NaiveDateTime>,
    pub arrival_time: Option<NaiveDateTime>,
    pub departure_airport: Option<String>,
    pub arrival_airport: Option<String>,
    pub number_of_stops: u32,
    pub booking_url: String,
}
