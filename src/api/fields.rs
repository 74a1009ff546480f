use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::error::{ClientError, Result};
use crate::models::ModuleFilter;
use crate::transport::Transport;

use super::DolibarrApi;

impl<T: Transport> DolibarrApi<T> {
    /// Field definitions of a module, keyed by field name.
    ///
    /// With `extrafield_module`, the extrafields declared for that element
    /// type are merged in and tagged `"extrafield": true`. Every definition
    /// ends up with a `name`.
    pub async fn get_module_fields(
        &self,
        module: &str,
        lang: &str,
        extrafield_module: Option<&str>,
    ) -> Result<Map<String, Value>> {
        let url = self.url(&format!("{}/get{}fields", module, module));
        let response = self.cache.call(Method::GET, &url, &json!({ "lang": lang })).await?;

        let Value::Object(fields) = &*response else {
            return Err(ClientError::UnexpectedResponse(format!(
                "field list of {} is not an object",
                module
            )));
        };
        let mut fields = fields.clone();

        if let Some(element) = extrafield_module {
            self.merge_extrafields(element, &mut fields).await?;
        }

        for (name, definition) in fields.iter_mut() {
            if let Value::Object(definition) = definition {
                definition
                    .entry("name")
                    .or_insert_with(|| Value::String(name.clone()));
            }
        }

        Ok(fields)
    }

    async fn merge_extrafields(&self, element: &str, fields: &mut Map<String, Value>) -> Result<()> {
        let filter = ModuleFilter::default().with_kind(element);
        let response = self
            .cache
            .call(Method::GET, &self.url("setup/extrafields"), &filter)
            .await?;

        let Some(Value::Object(extrafields)) = response.get(element) else {
            warn!(element, "No extrafields declared for element type");
            return Ok(());
        };

        for (name, definition) in extrafields {
            let mut definition = definition.clone();
            if let Value::Object(map) = &mut definition {
                map.insert("extrafield".to_string(), Value::Bool(true));
            }
            fields.insert(name.clone(), definition);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;

    #[tokio::test]
    async fn test_module_fields_fill_missing_names() {
        let (transport, api) = testing::api();
        transport.respond(
            "thirdparties/getthirdpartiesfields",
            json!({
                "nom": {"label": "Name"},
                "email": {"label": "Email", "name": "mail"}
            }),
        );

        let fields = api.get_module_fields("thirdparties", "fr_FR", None).await.unwrap();

        assert_eq!(fields["nom"]["name"], json!("nom"));
        assert_eq!(fields["email"]["name"], json!("mail"));
        assert_eq!(transport.sent()[0].params, json!({"lang": "fr_FR"}));
    }

    #[tokio::test]
    async fn test_module_fields_merge_extrafields() {
        let (transport, api) = testing::api();
        transport.respond(
            "thirdparties/getthirdpartiesfields",
            json!({"nom": {"label": "Name"}}),
        );
        transport.respond(
            "setup/extrafields",
            json!({"societe": {"vip": {"label": "VIP", "type": "boolean"}}}),
        );

        let fields = api
            .get_module_fields("thirdparties", "en_US", Some("societe"))
            .await
            .unwrap();

        assert_eq!(fields["vip"]["extrafield"], json!(true));
        assert_eq!(fields["vip"]["name"], json!("vip"));
        assert!(fields["nom"].get("extrafield").is_none());

        let sent = transport.sent();
        assert_eq!(sent[1].params["type"], json!("societe"));
    }

    #[tokio::test]
    async fn test_module_fields_do_not_mutate_cache() {
        let (transport, api) = testing::api();
        let raw = json!({"nom": {"label": "Name"}});
        transport.respond("thirdparties/getthirdpartiesfields", raw.clone());

        api.get_module_fields("thirdparties", "en_US", None).await.unwrap();

        let url = format!("{}thirdparties/getthirdpartiesfields", testing::BASE_URL);
        let cached = api
            .cache()
            .call(Method::GET, &url, &json!({"lang": "en_US"}))
            .await
            .unwrap();
        assert_eq!(*cached, raw);
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_extrafield_element_is_skipped() {
        let (transport, api) = testing::api();
        transport.respond("products/getproductsfields", json!({"ref": {}}));
        transport.respond("setup/extrafields", json!({"societe": {}}));

        let fields = api
            .get_module_fields("products", "en_US", Some("product"))
            .await
            .unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["ref"]["name"], json!("ref"));
    }
}
