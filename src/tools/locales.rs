use crate::mcp::{ToolDefinition, ToolOutput};
use crate::strapi::{default_locale, locale_entries, parse_locale_list, StrapiClient};
use crate::tools::pretty;
use serde_json::json;
use tracing::{error, info};

pub(super) fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "strapi-get-i18n-locales".to_string(),
        title: "Strapi Get i18n Locales".to_string(),
        description: "List the locales configured in the i18n plugin (id, code, name). Use it to \
            pick valid locale codes before creating or reading localized content."
            .to_string(),
        input_schema: json!({"type": "object", "properties": {}}),
    }
}

pub async fn handle_get_i18n_locales(client: &StrapiClient) -> ToolOutput {
    info!("Fetching available i18n locales");

    let body = match client.get_i18n_locales().await {
        Ok(body) => body,
        Err(e) => {
            error!("Fetching locales failed: {}", e);
            return ToolOutput::error(format!(
                "Error fetching i18n locales: {}. Make sure the i18n plugin is enabled in Strapi.",
                e
            ));
        }
    };

    let (Some(entries), Some(locales)) = (locale_entries(&body), parse_locale_list(&body)) else {
        return ToolOutput::error(format!(
            "Error fetching i18n locales: unexpected response format {}",
            body
        ));
    };

    let summary: Vec<_> = locales
        .iter()
        .map(|l| json!({"id": l.id, "code": l.code, "name": l.name}))
        .collect();
    let default_code = default_locale(&locales).map(|l| l.code.as_str());

    let output = json!({
        "success": true,
        "data": entries,
        "count": entries.len(),
        "defaultLocale": default_code,
        "locales": summary,
    });

    let codes: Vec<&str> = locales.iter().map(|l| l.code.as_str()).collect();
    ToolOutput::success(
        format!(
            "Successfully fetched {} locales: {} (default: {})\n\n{}",
            entries.len(),
            codes.join(", "),
            default_code.unwrap_or("none"),
            pretty(&output)
        ),
        output,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::client_for;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    async fn mount_locales(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/i18n/locales"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_get_locales_bare_array() {
        let server = MockServer::start().await;
        mount_locales(
            &server,
            json!([
                {"id": 1, "code": "es", "name": "Spanish (es)", "isDefault": true},
                {"id": 2, "code": "en", "name": "English (en)"}
            ]),
        )
        .await;

        let out = handle_get_i18n_locales(&client_for(&server)).await;

        assert!(!out.is_error);
        assert!(out.text().starts_with("Successfully fetched 2 locales: es, en (default: es)"));
        let structured = out.structured_content.unwrap();
        assert_eq!(structured["count"], 2);
        assert_eq!(structured["locales"][1], json!({"id": 2, "code": "en", "name": "English (en)"}));
        assert_eq!(structured["data"][0]["isDefault"], true);
        assert_eq!(structured["defaultLocale"], "es");
    }

    #[tokio::test]
    async fn test_get_locales_passes_entries_through() {
        let server = MockServer::start().await;
        mount_locales(
            &server,
            json!([
                {"id": 1, "documentId": "loc1", "code": "es", "createdAt": "2024-01-01T00:00:00.000Z"},
                {"id": 2, "name": "missing code"}
            ]),
        )
        .await;

        let out = handle_get_i18n_locales(&client_for(&server)).await;

        assert!(!out.is_error);
        let structured = out.structured_content.unwrap();
        assert_eq!(structured["count"], 2);
        assert_eq!(structured["data"][0]["documentId"], "loc1");
        assert_eq!(structured["data"][0]["createdAt"], "2024-01-01T00:00:00.000Z");
        assert_eq!(structured["data"][1]["name"], "missing code");
        assert_eq!(structured["locales"].as_array().unwrap().len(), 1);
        assert_eq!(structured["defaultLocale"], "es");
    }

    #[tokio::test]
    async fn test_get_locales_data_envelope() {
        let server = MockServer::start().await;
        mount_locales(&server, json!({"data": [{"id": 3, "code": "ca", "name": "Catalan"}]})).await;

        let out = handle_get_i18n_locales(&client_for(&server)).await;
        assert_eq!(out.structured_content.unwrap()["count"], 1);
    }

    #[tokio::test]
    async fn test_get_locales_unexpected_shape() {
        let server = MockServer::start().await;
        mount_locales(&server, json!({"message": "nope"})).await;

        let out = handle_get_i18n_locales(&client_for(&server)).await;
        assert!(out.is_error);
        assert!(out.text().contains("unexpected response format"));
    }

    #[tokio::test]
    async fn test_get_locales_plugin_missing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/i18n/locales"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let out = handle_get_i18n_locales(&client_for(&server)).await;
        assert!(out.is_error);
        assert!(out.text().contains("i18n plugin"));
    }
}
