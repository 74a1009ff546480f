//! Error types for the Dolibarr client
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Transport Error ==
/// Failure of a single network call issued by a transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection failure, timeout, or any other reqwest-level error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The remote body is not valid JSON
    #[error("Unparsable response body: {body}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

// == Client Error ==
/// Unified error type for cache calls and record operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The transport failed; never cached, never retried
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Request parameters cannot be canonically serialized
    #[error("Cannot derive cache key from parameters: {0}")]
    KeySerialization(#[source] serde_json::Error),

    /// The API answered with a shape the record layer cannot interpret
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A list filter value has the wrong type
    #[error("Invalid filter value for '{field}': {value}")]
    InvalidFilter { field: String, value: String },

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

// == Cache Error ==
/// Store bookkeeping failure.
///
/// Never surfaced to callers of the cache; the cache logs it and degrades to a miss.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    #[error("Internal cache error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for the client.
pub type Result<T> = std::result::Result<T, ClientError>;
