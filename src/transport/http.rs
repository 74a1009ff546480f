//! HTTP transport backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT},
    Client, Method,
};
use serde_json::Value;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{ClientError, Result, TransportError};

use super::{Encoding, Transport};

/// Header carrying the Dolibarr API key.
const API_KEY_HEADER: &str = "dolapikey";

/// Dolibarr REST transport with API key authentication and a fixed timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport from the client configuration.
    pub fn new(config: &Config) -> Result<Self> {
        if config.api_token.trim().is_empty() {
            return Err(ClientError::Config(
                "missing API token, set DOLIBARR_API_TOKEN".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&config.api_token)
                .map_err(|e| ClientError::Config(format!("invalid API token: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.application_name)
                .map_err(|e| ClientError::Config(format!("invalid application name: {}", e)))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(TransportError::Request)?;

        info!(
            url = %config.url,
            timeout_secs = config.timeout_secs,
            verify_ssl = config.verify_ssl,
            "HTTP transport initialized"
        );

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: &Method,
        url: &str,
        params: &Value,
        encoding: Encoding,
    ) -> std::result::Result<Value, TransportError> {
        let request = self.client.request(method.clone(), url);
        let request = match encoding {
            Encoding::Query => request.query(&query_pairs(params)),
            Encoding::Json => request.json(params),
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| {
            error!(%method, url, body = %body, "Dolibarr API returned an unparsable body");
            TransportError::Decode { body, source }
        })
    }
}

/// Flattens top-level parameters into query pairs.
///
/// `null` values are left out, strings go as-is, other scalars use their JSON
/// text and nested values are sent as JSON. Anything but an object yields no
/// pairs.
pub fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = params else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}
