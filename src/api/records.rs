//! Record listing, lookup and writes.

use std::fmt::Display;
use std::sync::Arc;

use reqwest::Method;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::models::{ModuleFilter, Record, RecordPage};
use crate::transport::Transport;

use super::{capitalize, flatten_extrafields, DolibarrApi};

impl<T: Transport> DolibarrApi<T> {
    /// Lists one page of a module's records.
    ///
    /// Understands both the paginated answer (`pagination_data=true`) and a
    /// bare row array.
    pub async fn get_all_records(
        &self,
        module: &str,
        filter: Option<&ModuleFilter>,
    ) -> Result<RecordPage> {
        let default_filter = ModuleFilter::default();
        let filter = filter.unwrap_or(&default_filter);

        let mut current_page = i64::from(filter.page.unwrap_or(0));
        let mut last_page = current_page;
        let mut limit = filter.limit.map(i64::from).unwrap_or(0);

        let response = self.cache.call(Method::GET, &self.url(module), filter).await?;

        let rows = match response.get("pagination") {
            Some(pagination) => {
                if let Some(page) = pagination.get("page").and_then(Value::as_i64) {
                    current_page = page;
                }
                if let Some(count) = pagination.get("page_count").and_then(Value::as_i64) {
                    last_page = count - 1;
                }
                if let Some(l) = pagination.get("limit").and_then(Value::as_i64) {
                    limit = l;
                }
                response.get("data").unwrap_or(&Value::Null)
            }
            None => &*response,
        };

        let Value::Array(rows) = rows else {
            return Err(ClientError::UnexpectedResponse(format!(
                "listing {} did not return a row array",
                module
            )));
        };

        let entries = rows
            .iter()
            .map(|row| flattened_record(module, row))
            .collect::<Result<Vec<_>>>()?;

        debug!(module, count = entries.len(), current_page, last_page, "Listed records");
        Ok(RecordPage::new(entries, current_page, last_page, limit))
    }

    /// Fetches one record, with the `action` relationship list attached when given.
    pub async fn get_record_by_id(
        &self,
        module: &str,
        id: impl Display,
        action: Option<&str>,
    ) -> Result<Record> {
        let id = id.to_string();
        let url = self.url(&format!("{}/{}", module, id));
        let response = self.cache.call(Method::GET, &url, &Value::Null).await?;

        let record = flattened_record(&capitalize(module), &response)?;
        self.attach_relationship(record, module, &id, action).await
    }

    pub async fn get_relationship_action(
        &self,
        module: &str,
        id: impl Display,
        action: &str,
    ) -> Result<Arc<Value>> {
        let url = self.url(&format!("{}/{}/{}", module, id, action));
        self.cache.call(Method::GET, &url, &Value::Null).await
    }

    /// Updates a record (or one of its sub-resources when `action` is set).
    pub async fn save_record(
        &self,
        module: &str,
        id: impl Display,
        params: &Map<String, Value>,
        action: Option<&str>,
    ) -> Result<Record> {
        let id = id.to_string();
        let mut path = format!("{}/{}", module, id);
        if let Some(action) = action {
            path.push('/');
            path.push_str(action);
        }

        let response = self.cache.call_json(Method::PUT, &self.url(&path), params).await?;

        let record = flattened_record(&capitalize(module), &response)?;
        self.attach_relationship(record, module, &id, action).await
    }

    /// Creates a record; the answer is the new id.
    pub async fn create_record(&self, module: &str, params: &Map<String, Value>) -> Result<Record> {
        let response = self.cache.call_json(Method::POST, &self.url(module), params).await?;

        let mut record = Record::new(capitalize(module), params.clone());
        record.set("id", Value::clone(&response));
        Ok(record)
    }

    async fn attach_relationship(
        &self,
        record: Record,
        module: &str,
        id: &str,
        action: Option<&str>,
    ) -> Result<Record> {
        match action {
            Some(action) => {
                let list = self.get_relationship_action(module, id, action).await?;
                Ok(record.with_relationships(action, Value::clone(&list)))
            }
            None => Ok(record),
        }
    }
}

/// Copies a shared row, lifts its extrafields and wraps it as a record.
fn flattened_record(module: &str, row: &Value) -> Result<Record> {
    let mut record = Record::from_value(module, row.clone())?;
    flatten_extrafields(&mut record.fields);
    Ok(record)
}
