use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

/// One row of a Dolibarr module, with an optional related list attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub module: String,
    pub fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Value>,
}

impl Record {
    pub fn new(module: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            module: module.into(),
            fields,
            relationship_name: None,
            relationships: None,
        }
    }

    /// Wraps a JSON object; anything else is an unexpected response.
    pub fn from_value(module: impl Into<String>, value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self::new(module, fields)),
            other => Err(ClientError::UnexpectedResponse(format!(
                "expected a record object, got {}",
                other
            ))),
        }
    }

    pub fn with_relationships(mut self, name: impl Into<String>, list: Value) -> Self {
        self.relationship_name = Some(name.into());
        self.relationships = Some(list);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Sets a field, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    pub fn id(&self) -> Option<&Value> {
        self.fields.get("id")
    }
}
