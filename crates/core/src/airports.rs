//! Airport reference data.
//!
//! A keyed, in-memory directory of airports loaded from CSV. Request entry
//! points consult it to reject unknown IATA codes before a search is run.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Errors loading airport reference data.
#[derive(Debug, thiserror::Error)]
pub enum AirportError {
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("invalid airport record: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid IATA code in reference data: {0:?}")]
    InvalidCode(String),
}

/// One airport row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Airport {
    pub name: String,
    pub iata_code: String,
    pub state_code: String,
    pub country_code: String,
    pub country_name: String,
}

/// Airports keyed by uppercase IATA code.
#[derive(Debug, Clone, Default)]
pub struct AirportDirectory {
    airports: HashMap<String, Airport>,
}

impl AirportDirectory {
    /// Load a directory from a CSV file with a header row of
    /// `name,iata_code,state_code,country_code,country_name`.
    pub fn load(path: &Path) -> Result<Self, AirportError> {
        let file = std::fs::File::open(path)
            .map_err(|source| AirportError::Io { path: path.display().to_string(), source })?;
        let directory = Self::from_reader(file)?;

        tracing::info!(path = %path.display(), airports = directory.len(), "loaded airport directory");

        Ok(directory)
    }

    /// Parse CSV from any reader. Later rows win on duplicate codes.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AirportError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut airports = HashMap::new();
        for record in csv_reader.deserialize::<Airport>() {
            let mut airport = record?;
            airport.iata_code = airport.iata_code.to_ascii_uppercase();
            if !is_iata_code(&airport.iata_code) {
                return Err(AirportError::InvalidCode(airport.iata_code));
            }
            airports.insert(airport.iata_code.clone(), airport);
        }

        Ok(Self { airports })
    }

    /// Whether an airport with this code is known. Case-insensitive.
    pub fn exists(&self, iata_code: &str) -> bool {
        self.get(iata_code).is_some()
    }

    /// Look up an airport by code. Case-insensitive.
    pub fn get(&self, iata_code: &str) -> Option<&Airport> {
        self.airports.get(&iata_code.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

/// Three ASCII letters.
pub fn is_iata_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic())
}
