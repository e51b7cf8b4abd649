//! Multi-date flight search.
//!
//! Expands one request into a query per day of the flexibility window, runs
//! them through the bulk dispatcher, normalizes each response with its own
//! deep link, and returns every qualifying flight sorted by miles.

use std::sync::Arc;

use chrono::{Days, NaiveDate};

use crate::deeplink::{DeepLinkBuilder, DeepLinkError};
use crate::dispatch::search_all;
use crate::smiles::{FlightRecord, FlightSearch, SearchQuery, normalize};

/// Caller-level failures. Per-date transport failures are not errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("date out of range: {date} + {offset} days")]
    DateOutOfRange { date: NaiveDate, offset: u64 },

    #[error(transparent)]
    DeepLink(#[from] DeepLinkError),
}

/// Build one query per day in `[date, date + flexibility_days)`.
///
/// A window of zero or less still searches the requested date.
pub fn expand_window(
    origin: &str, destination: &str, departure_date: NaiveDate, flexibility_days: i64,
) -> Result<Vec<SearchQuery>, SearchError> {
    let days = flexibility_days.max(1).unsigned_abs();

    (0..days)
        .map(|offset| {
            departure_date
                .checked_add_days(Days::new(offset))
                .map(|date| SearchQuery::one_way(origin, destination, date))
                .ok_or(SearchError::DateOutOfRange { date: departure_date, offset })
        })
        .collect()
}

/// Search orchestrator over any `FlightSearch` backend.
pub struct FlightService<S: ?Sized> {
    client: Arc<S>,
    deeplinks: DeepLinkBuilder,
}

impl<S: ?Sized> Clone for FlightService<S> {
    fn clone(&self) -> Self {
        Self { client: Arc::clone(&self.client), deeplinks: self.deeplinks.clone() }
    }
}

impl<S> FlightService<S>
where
    S: FlightSearch + ?Sized + 'static,
{
    pub fn new(client: Arc<S>, deeplinks: DeepLinkBuilder) -> Self {
        Self { client, deeplinks }
    }

    pub fn deeplinks(&self) -> &DeepLinkBuilder {
        &self.deeplinks
    }

    /// Search every day of the window and return all loyalty-priced flights,
    /// cheapest first. Ties keep date order, then upstream order.
    ///
    /// Dates whose request failed contribute nothing; if every date fails the
    /// result is empty rather than an error.
    pub async fn get_flights(
        &self, origin: &str, destination: &str, departure_date: NaiveDate, flexibility_days: i64,
    ) -> Result<Vec<FlightRecord>, SearchError> {
        let batch = expand_window(origin, destination, departure_date, flexibility_days)?;

        tracing::info!(
            origin,
            destination,
            %departure_date,
            dates = batch.len(),
            "searching flexibility window"
        );

        let entries = search_all(Arc::clone(&self.client), batch).await;

        let mut flights = Vec::new();
        let mut failed_dates = 0usize;
        for entry in &entries {
            match &entry.result {
                Ok(raw) => {
                    let booking_url = self.deeplinks.build_url(
                        &entry.query.origin,
                        &entry.query.destination,
                        entry.query.departure_date,
                    )?;
                    flights.extend(normalize(raw, &booking_url));
                }
                Err(e) => {
                    failed_dates += 1;
                    tracing::warn!(date = %entry.query.departure_date, "no flights for date: {}", e);
                }
            }
        }

        flights.sort_by_key(|flight| flight.miles_cost);

        tracing::info!(flights = flights.len(), failed_dates, "flight search complete");

        Ok(flights)
    }
}
