//! Traits describing the external data sources and their shared error type.

use async_trait::async_trait;
use chrono::ParseError as ChronoParseError;
use reqwest::Error as ReqwestError;

use crate::model::{PermitQueryResponse, TrashSchedule};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the data sources.
pub enum PortError {
    /// Network layer failed, the source answered with a non-2xx status,
    /// or the body did not decode into the expected shape.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Failed to parse a date from the source response.
    #[error("Parse error: {0}")]
    Parse(#[from] ChronoParseError),
    /// The schedule has no entry for the requested waste stream.
    #[error("No pickup scheduled for trash type: {0}")]
    UnknownTrashType(String),
    /// Internal source error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Lookup of the next pickup dates for an address.
pub trait WastePort: Send + Sync {
    /// Base URL the port sends requests to.
    fn endpoint(&self) -> &str;

    /// Fetch the next pickup date for every waste stream serving `address`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the payload is malformed.
    async fn schedule(&self, address: &str) -> Result<TrashSchedule, PortError>;
}

#[async_trait]
/// Lookup of the building permits recorded for an address.
pub trait PermitPort: Send + Sync {
    /// URL the port sends queries to.
    fn endpoint(&self) -> &str;

    /// Fetch permits for the parcels matching `address`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the payload is malformed.
    async fn permits(&self, address: &str) -> Result<PermitQueryResponse, PortError>;
}
