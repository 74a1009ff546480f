use std::sync::{Arc, LazyLock};

use reqwest::Method;
use regex::Regex;
use serde_json::{json, Value};

use crate::error::Result;
use crate::transport::Transport;

use super::DolibarrApi;

static DOC_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([^/]+/[^/]+\.pdf)$").expect("document path pattern compiles"));

impl<T: Transport> DolibarrApi<T> {
    /// Downloads a generated PDF; Dolibarr answers with the base64 content.
    pub async fn get_document_pdf(&self, module_area: &str, doc_file: &str) -> Result<Arc<Value>> {
        let params = json!({
            "modulepart": module_area,
            "original_file": document_path(doc_file),
        });
        self.cache
            .call(Method::GET, &self.url("documents/download"), &params)
            .await
    }
}

/// Trailing `<dir>/<file>.pdf` of a document path, or `""` when it has none.
pub fn document_path(doc_file: &str) -> &str {
    DOC_PATH_RE
        .captures(doc_file)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}
