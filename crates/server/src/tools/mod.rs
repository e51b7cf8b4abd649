//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-flights server.
#![allow(unused_imports)]

pub mod airport_lookup;
pub mod flight_search;

pub use airport_lookup::{AirportLookupOutput, AirportLookupParams};
pub use flight_search::{FlightSearchOutput, FlightSearchParams};
