//! Client code for milesfare.
//!
//! This crate provides the Smiles API client, concurrent multi-date dispatch,
//! response normalization, booking deep links, and the search orchestrator
//! that ties them together.

pub mod deeplink;
pub mod dispatch;
pub mod service;
pub mod smiles;

pub use deeplink::{DeepLinkBuilder, DeepLinkError};
pub use dispatch::{BatchEntry, search_all};
pub use service::{FlightService, SearchError, expand_window};
pub use smiles::{
    FlightRecord, FlightSearch, RawResponse, SearchQuery, SmilesClient, SmilesConfig, SmilesError, TransportError,
    normalize,
};
