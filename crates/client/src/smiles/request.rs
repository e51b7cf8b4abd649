//! Smiles flight search request types and query encoding.

use chrono::NaiveDate;
use serde::Serialize;

/// Cabin filter sent upstream. `ALL` returns every cabin in one response.
pub const CABIN_ALL: &str = "ALL";

/// Cookie literal the front end sends. Form encoding turns it into
/// `_gid%3Dundefined%3B` on the wire.
pub const COOKIES: &str = "_gid=undefined;";

/// One upstream search: a single route on a single day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Origin IATA code, uppercase.
    pub origin: String,
    /// Destination IATA code, uppercase.
    pub destination: String,
    pub departure_date: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub return_date: Option<NaiveDate>,
}

impl SearchQuery {
    /// One-way query for a single adult.
    pub fn one_way(origin: &str, destination: &str, departure_date: NaiveDate) -> Self {
        Self {
            origin: origin.to_ascii_uppercase(),
            destination: destination.to_ascii_uppercase(),
            departure_date,
            adults: 1,
            children: 0,
            infants: 0,
            return_date: None,
        }
    }

    pub fn with_passengers(mut self, adults: u32, children: u32, infants: u32) -> Self {
        self.adults = adults;
        self.children = children;
        self.infants = infants;
        self
    }

    pub fn with_return_date(mut self, return_date: NaiveDate) -> Self {
        self.return_date = Some(return_date);
        self
    }

    /// Encode the upstream query parameter set.
    pub fn to_params(&self) -> UpstreamParams<'_> {
        UpstreamParams {
            cabin: CABIN_ALL,
            origin_airport_code: &self.origin,
            destination_airport_code: &self.destination,
            departure_date: format_date(self.departure_date),
            adults: self.adults,
            children: self.children,
            infants: self.infants,
            force_congener: false,
            cookies: COOKIES,
            member_number: "",
            return_date: self.return_date.map(format_date),
        }
    }
}

/// Query string of one upstream search request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamParams<'a> {
    pub cabin: &'static str,
    pub origin_airport_code: &'a str,
    pub destination_airport_code: &'a str,
    pub departure_date: String,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub force_congener: bool,
    pub cookies: &'static str,
    pub member_number: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
