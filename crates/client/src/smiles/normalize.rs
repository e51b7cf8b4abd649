//! Turns one upstream response into zero or more `FlightRecord`s.
//!
//! ### Rules
//! - Only fares typed as a loyalty currency count; cash and mixed fares are ignored.
//! - The cheapest strictly positive loyalty fare prices the itinerary.
//! - Itineraries with no such fare are dropped silently.
//! - Unparseable timestamps become `None`; they never drop the itinerary.
//! - Stop count is taken from upstream as-is.

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

use super::response::{FlightRecord, RawFare, RawFlight, RawResponse};

/// Fare types priced purely in program miles.
pub const LOYALTY_FARE_TYPES: &[&str] = &["SMILES", "SMILES_CLUB"];

/// Normalize every qualifying flight option in `raw`, stamping `booking_url`
/// on each record. Output keeps upstream order.
pub fn normalize(raw: &RawResponse, booking_url: &str) -> Vec<FlightRecord> {
    let mut records = Vec::new();
    let mut malformed = 0usize;
    let mut unpriced = 0usize;

    for candidate in raw.flight_options() {
        let flight = match RawFlight::deserialize(candidate) {
            Ok(flight) => flight,
            Err(e) => {
                malformed += 1;
                tracing::debug!("skipping malformed flight option: {}", e);
                continue;
            }
        };

        let Some(miles_cost) = loyalty_cost(&flight.fare_list) else {
            unpriced += 1;
            continue;
        };

        records.push(FlightRecord {
            airline: flight.airline_name(),
            miles_cost,
            duration_hours: flight.duration_hours(),
            duration_minutes: flight.duration_minutes(),
            departure_time: flight.departure_date().and_then(parse_timestamp),
            arrival_time: flight.arrival_date().and_then(parse_timestamp),
            departure_airport: flight.departure_airport(),
            arrival_airport: flight.arrival_airport(),
            number_of_stops: flight.stops.unwrap_or(0),
            booking_url: booking_url.to_string(),
        });
    }

    tracing::debug!(kept = records.len(), malformed, unpriced, "normalized flight options");

    records
}

/// Cheapest strictly positive loyalty fare, or `None` when no fare qualifies.
pub fn loyalty_cost(fares: &[RawFare]) -> Option<u64> {
    fares
        .iter()
        .filter(|fare| fare.fare_type.as_deref().is_some_and(|t| LOYALTY_FARE_TYPES.contains(&t)))
        .filter_map(|fare| fare.miles)
        .filter_map(|miles| u64::try_from(miles).ok())
        .filter(|&miles| miles > 0)
        .min()
}

/// Parse an ISO-8601 timestamp, keeping the local wall-clock time.
///
/// Accepts `2025-03-26T16:40:00`, fractional seconds, and an explicit offset.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}
