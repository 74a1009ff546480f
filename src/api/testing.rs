//! Scripted transport shared by the record layer tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::cache::ResponseCache;
use crate::error::TransportError;
use crate::transport::{Encoding, Transport};

use super::DolibarrApi;

pub const BASE_URL: &str = "http://erp/api/index.php/";

#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    pub method: Method,
    pub url: String,
    pub params: Value,
    pub encoding: Encoding,
}

/// Answers by URL path (relative to `BASE_URL`); unknown paths get a 404.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, Value>>,
    sent: Mutex<Vec<SentRequest>>,
}

impl ScriptedTransport {
    pub fn respond(&self, path: &str, response: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(format!("{}{}", BASE_URL, path), response);
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        method: &Method,
        url: &str,
        params: &Value,
        encoding: Encoding,
    ) -> Result<Value, TransportError> {
        self.sent.lock().unwrap().push(SentRequest {
            method: method.clone(),
            url: url.to_string(),
            params: params.clone(),
            encoding,
        });

        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::Status {
                status: 404,
                body: format!("no route for {}", url),
            })
    }
}

pub fn api() -> (Arc<ScriptedTransport>, DolibarrApi<Arc<ScriptedTransport>>) {
    let transport = Arc::new(ScriptedTransport::default());
    let cache = ResponseCache::new(Arc::clone(&transport), 100);
    (transport, DolibarrApi::new(BASE_URL, Arc::new(cache)))
}
