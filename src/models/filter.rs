//! List filter sent with module listing requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

/// Query parameters for listing a module's records.
///
/// Serialized as-is into the request parameters, so unset fields appear as
/// `null` in the cache key and are left out of the query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleFilter {
    pub sortfield: Option<String>,
    pub sortorder: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub thirdparty_ids: Option<String>,
    pub sqlfilters: Option<String>,
    pub pagination_data: Option<bool>,
    /// Extrafield element type, used by `setup/extrafields`
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl Default for ModuleFilter {
    fn default() -> Self {
        Self {
            sortfield: Some("t.rowid".to_string()),
            sortorder: Some("ASC".to_string()),
            limit: Some(20),
            page: Some(0),
            thirdparty_ids: None,
            sqlfilters: None,
            pagination_data: Some(true),
            kind: None,
        }
    }
}

impl ModuleFilter {
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_sqlfilters(mut self, sqlfilters: impl Into<String>) -> Self {
        self.sqlfilters = Some(sqlfilters.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Applies loosely typed values, e.g. straight from a web form.
    ///
    /// Text fields accept any scalar, `limit` and `page` accept integers or
    /// numeric strings, and `null` clears a field. Unknown keys are ignored.
    pub fn update_value(&mut self, values: &Map<String, Value>) -> Result<()> {
        for (field, value) in values {
            match field.as_str() {
                "sortfield" => self.sortfield = as_text(value),
                "sortorder" => self.sortorder = as_text(value),
                "thirdparty_ids" => self.thirdparty_ids = as_text(value),
                "sqlfilters" => self.sqlfilters = as_text(value),
                "type" => self.kind = as_text(value),
                "limit" => self.limit = as_count(field, value)?,
                "page" => self.page = as_count(field, value)?,
                "pagination_data" => {
                    self.pagination_data = match value {
                        Value::Null => None,
                        Value::Bool(b) => Some(*b),
                        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
                        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
                        other => return Err(invalid(field, other)),
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn as_count(field: &str, value: &Value) -> Result<Option<u32>> {
    let parsed = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.map(Some).ok_or_else(|| invalid(field, value))
}

fn invalid(field: &str, value: &Value) -> ClientError {
    ClientError::InvalidFilter {
        field: field.to_string(),
        value: value.to_string(),
    }
}
