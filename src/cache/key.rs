//! Cache Key Module
//!
//! Derives the identity of a memoizable request from its method, URL and parameters.

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

// == Cache Key ==
/// Identifies one memoizable request.
///
/// Two calls are the same request iff their keys are equal. Parameters are
/// stored in canonical form so insertion order never matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: Method,
    params: String,
    url: String,
}

impl CacheKey {
    /// Builds a key from any serializable parameter set.
    ///
    /// Fails with `ClientError::KeySerialization` when the parameters cannot be
    /// represented as JSON.
    pub fn new<P: Serialize + ?Sized>(method: &Method, url: &str, params: &P) -> Result<Self> {
        let params = serde_json::to_value(params).map_err(ClientError::KeySerialization)?;
        Ok(Self::from_value(method, url, &params))
    }

    /// Builds a key from parameters already converted to JSON.
    pub fn from_value(method: &Method, url: &str, params: &Value) -> Self {
        Self {
            method: method.clone(),
            params: canonical_params(params),
            url: url.to_string(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Canonical JSON text of the parameters.
    pub fn params(&self) -> &str {
        &self.params
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

// == Canonicalization ==
/// Serializes parameters with object keys sorted at every depth.
pub fn canonical_params(params: &Value) -> String {
    canonicalize(params).to_string()
}

/// Rebuilds a JSON value so every object lists its keys in sorted order.
///
/// Inserting in sorted order keeps the result sorted whether or not
/// `serde_json` preserves insertion order.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
