//! Dolibarr Client - A cached client for the Dolibarr ERP REST API
//!
//! Every API call goes through a bounded response cache keyed by method, URL
//! and canonical parameters, evicting the least recently accessed response.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod transport;

pub use api::DolibarrApi;
pub use cache::{CacheKey, CacheStats, ResponseCache};
pub use config::Config;
pub use error::{CacheError, ClientError, Result, TransportError};
pub use models::{ModuleFilter, Record, RecordPage};
pub use reqwest::Method;
pub use transport::{Encoding, HttpTransport, Transport};
