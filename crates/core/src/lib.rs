//! Core types and shared functionality for milesfare.
//!
//! This crate provides:
//! - Layered application configuration
//! - Unified error types
//! - Airport reference data

pub mod airports;
pub mod config;
pub mod error;

pub use airports::{Airport, AirportDirectory, AirportError, is_iata_code};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
