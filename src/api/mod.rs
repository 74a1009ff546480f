//! API Module
//!
//! Record-level operations on the Dolibarr REST API, all served through the
//! shared response cache.
//!
//! # Operations
//! - `get_all_records` - `GET <module>` with a list filter
//! - `get_record_by_id` - `GET <module>/<id>`
//! - `get_relationship_action` - `GET <module>/<id>/<action>`
//! - `get_module_fields` - `GET <module>/get<module>fields`
//! - `get_document_pdf` - `GET documents/download`
//! - `save_record` - `PUT <module>/<id>[/<action>]`
//! - `create_record` - `POST <module>`

mod documents;
mod fields;
mod records;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::error::Result;
use crate::transport::{HttpTransport, Transport};

pub use documents::document_path;

/// Dolibarr client over a cached transport.
///
/// Responses come back from the cache as shared values; every operation
/// reshapes a copy and never the cached original.
#[derive(Debug)]
pub struct DolibarrApi<T> {
    base_url: String,
    cache: Arc<ResponseCache<T>>,
}

impl<T> Clone for DolibarrApi<T> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl DolibarrApi<HttpTransport> {
    /// Builds the HTTP transport and cache described by `config`.
    pub fn connect(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        let cache = ResponseCache::from_config(transport, config);
        info!(
            url = %config.url,
            max_cached_requests = config.max_cached_requests,
            "Dolibarr client ready"
        );
        Ok(Self::new(&config.url, Arc::new(cache)))
    }
}

impl<T: Transport> DolibarrApi<T> {
    /// `base_url` is the API root, e.g. `https://erp.example.org/api/index.php/`.
    pub fn new(base_url: &str, cache: Arc<ResponseCache<T>>) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url, cache }
    }

    pub fn cache(&self) -> &Arc<ResponseCache<T>> {
        &self.cache
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// == Response Shaping ==

/// Copies each `options_<name>` entry of `array_options` to the top level as `<name>`.
///
/// Rows without extrafields carry `array_options` as an empty list, which is
/// left alone.
pub fn flatten_extrafields(row: &mut Map<String, Value>) {
    let Some(Value::Object(options)) = row.get("array_options") else {
        return;
    };

    let lifted: Vec<(String, Value)> = options
        .iter()
        .map(|(name, value)| {
            let name = name.strip_prefix("options_").unwrap_or(name);
            (name.to_string(), value.clone())
        })
        .collect();

    row.extend(lifted);
}

/// First letter upper case, the rest lower case.
pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
