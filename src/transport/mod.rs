//! Transport Module
//!
//! Issues single requests against the remote API and decodes the JSON answer.
//! The cache sits on top of a `Transport` and never retries on its behalf.

mod http;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::TransportError;

pub use http::{query_pairs, HttpTransport};

/// How request parameters travel to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Parameters are sent as the query string
    Query,
    /// Parameters are sent as a JSON body
    Json,
}

/// Performs one network call and decodes the response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: &Method,
        url: &str,
        params: &Value,
        encoding: Encoding,
    ) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(
        &self,
        method: &Method,
        url: &str,
        params: &Value,
        encoding: Encoding,
    ) -> Result<Value, TransportError> {
        (**self).send(method, url, params, encoding).await
    }
}
