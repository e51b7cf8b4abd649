//! Booking deep links.
//!
//! A deep link reopens a search on the Smiles web front end. The front end
//! encodes the departure day as the Unix millisecond timestamp of that day at
//! 15:00 on its own wall clock, so the same convention is reproduced here
//! exactly; any other time of day opens a different search.

use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeDelta};
use url::Url;

/// Wall-clock hour the front end pins departure dates to.
pub const DEPARTURE_HOUR: u32 = 15;

const DEPARTURE_TIME: NaiveTime = match NaiveTime::from_hms_opt(DEPARTURE_HOUR, 0, 0) {
    Some(time) => time,
    None => panic!("departure hour out of range"),
};

/// Parameters identical on every link, in the order the front end emits them.
const ADULTS: &str = "1";
const CABIN: &str = "ALL";
const CHILDREN: &str = "0";
const INFANTS: &str = "0";
const IS_FLEXIBLE_DATE_CHECKED: &str = "false";
const SEARCH_TYPE: &str = "g3";
const SEGMENTS: &str = "1";
const TRIP_TYPE: &str = "2";

#[derive(Debug, thiserror::Error)]
pub enum DeepLinkError {
    #[error("invalid deep-link base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid UTC offset: {0} minutes")]
    InvalidOffset(i32),

    #[error("departure date out of range: {0}")]
    DateOutOfRange(NaiveDate),
}

/// Builds booking URLs for one front end and reference time zone.
#[derive(Debug, Clone)]
pub struct DeepLinkBuilder {
    base_url: Url,
    offset: FixedOffset,
}

impl DeepLinkBuilder {
    pub fn new(base_url: &str, utc_offset_minutes: i32) -> Result<Self, DeepLinkError> {
        let base_url = Url::parse(base_url).map_err(|e| DeepLinkError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(DeepLinkError::InvalidOffset(utc_offset_minutes))?;

        Ok(Self { base_url, offset })
    }

    /// Milliseconds since the Unix epoch of `date` at 15:00 in the reference zone.
    pub fn departure_timestamp_ms(&self, date: NaiveDate) -> Result<i64, DeepLinkError> {
        let local = date.and_time(DEPARTURE_TIME);
        let utc = local
            .checked_sub_signed(TimeDelta::seconds(i64::from(self.offset.local_minus_utc())))
            .ok_or(DeepLinkError::DateOutOfRange(date))?;
        Ok(utc.and_utc().timestamp_millis())
    }

    /// Booking URL reproducing a one-way, single-adult search.
    pub fn build_url(
        &self, origin: &str, destination: &str, departure_date: NaiveDate,
    ) -> Result<String, DeepLinkError> {
        let departure = self.departure_timestamp_ms(departure_date)?.to_string();

        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("adults", ADULTS)
            .append_pair("cabin", CABIN)
            .append_pair("children", CHILDREN)
            .append_pair("departureDate", &departure)
            .append_pair("destinationAirportCode", destination)
            .append_pair("infants", INFANTS)
            .append_pair("isFlexibleDateChecked", IS_FLEXIBLE_DATE_CHECKED)
            .append_pair("originAirportCode", origin)
            .append_pair("searchType", SEARCH_TYPE)
            .append_pair("segments", SEGMENTS)
            .append_pair("tripType", TRIP_TYPE);

        Ok(url.into())
    }
}
