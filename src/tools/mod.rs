//! MCP tool implementations
//!
//! Every handler returns a `ToolOutput`; backend failures become
//! `isError: true` results and never reach the JSON-RPC layer. Only unknown
//! tool names and malformed arguments are protocol errors.

mod create;
mod create_with_locales;
mod delete;
mod list;
mod locales;
mod media;
mod read;
mod schema;
mod update;

use crate::mcp::{McpError, ToolDefinition, ToolOutput};
use crate::strapi::StrapiClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use create::{handle_create, CreateParams};
pub use create_with_locales::{handle_create_with_locales, CreateWithLocalesParams};
pub use delete::{handle_delete, DeleteParams};
pub use list::{handle_list, ListParams};
pub use locales::handle_get_i18n_locales;
pub use media::{
    handle_get_media, handle_search_media, handle_upload_media, GetMediaParams, MediaId,
    SearchMediaParams, UploadMediaParams,
};
pub use read::{handle_read, ReadParams};
pub use schema::{
    handle_add_field, handle_get_schema, handle_list_content_types, AddFieldParams, FieldType,
    GetSchemaParams,
};
pub use update::{handle_update, UpdateParams};

/// Every tool the server advertises, in registration order.
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        create::definition(),
        create_with_locales::definition(),
        read::definition(),
        list::definition(),
        update::definition(),
        delete::definition(),
        schema::list_content_types_definition(),
        schema::add_field_definition(),
        schema::get_schema_definition(),
        locales::definition(),
        media::search_definition(),
        media::get_definition(),
        media::upload_definition(),
    ]
}

/// Route a `tools/call` to its handler.
pub async fn call_tool(client: &StrapiClient, name: &str, arguments: Value) -> Result<ToolOutput, McpError> {
    let output = match name {
        "strapi-create" => handle_create(client, parse_args(arguments)?).await,
        "strapi-create-with-locales" => handle_create_with_locales(client, parse_args(arguments)?).await,
        "strapi-read" => handle_read(client, parse_args(arguments)?).await,
        "strapi-list" => handle_list(client, parse_args(arguments)?).await,
        "strapi-update" => handle_update(client, parse_args(arguments)?).await,
        "strapi-delete" => handle_delete(client, parse_args(arguments)?).await,
        "strapi-list-content-types" => handle_list_content_types(client).await,
        "strapi-add-field" => handle_add_field(client, parse_args(arguments)?).await,
        "strapi-get-schema" => handle_get_schema(client, parse_args(arguments)?).await,
        "strapi-get-i18n-locales" => handle_get_i18n_locales(client).await,
        "strapi-search-media" => handle_search_media(client, parse_args(arguments)?).await,
        "strapi-get-media" => handle_get_media(client, parse_args(arguments)?).await,
        "strapi-upload-media" => handle_upload_media(client, parse_args(arguments)?).await,
        _ => return Err(McpError::ToolNotFound(name.to_string())),
    };
    Ok(output)
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, McpError> {
    // Clients may send `null` for tools without parameters
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| McpError::InvalidParams(e.to_string()))
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}

fn locale_suffix(locale: Option<&str>) -> String {
    locale
        .map(|l| format!(" (locale: {})", l))
        .unwrap_or_default()
}

fn default_true() -> bool {
    true
}

/// File size as KB with two decimals, or "N/A".
fn format_size_kb(item: &Value) -> String {
    item.get("size")
        .and_then(Value::as_f64)
        .filter(|s| *s > 0.0)
        .map(|s| format!("{:.2} KB", s / 1024.0))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Render a JSON scalar without quotes.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::Config;
    use crate::strapi::{ContentBackend, LocaleEntry, QueryParams, StrapiClient, StrapiError, StrapiResponse};
    use serde_json::{json, Map, Value};
    use std::sync::Mutex;
    use wiremock::MockServer;

    pub fn client_for(server: &MockServer) -> StrapiClient {
        let config = Config::new(&server.uri(), Some("test-token".to_string()), 5).unwrap();
        StrapiClient::new(&config).unwrap()
    }

    /// Backend holding a single stored record, logging every call.
    pub struct MemoryBackend {
        pub record: Value,
        pub calls: Mutex<Vec<String>>,
    }

    impl MemoryBackend {
        pub fn new(record: Value) -> Self {
            Self {
                record,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn log(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl ContentBackend for MemoryBackend {
        async fn list_locales(&self) -> Result<Vec<LocaleEntry>, StrapiError> {
            self.log("locales".to_string());
            Ok(Vec::new())
        }

        async fn create_record(
            &self,
            content_type: &str,
            data: &Map<String, Value>,
            _query: &QueryParams,
        ) -> Result<Value, StrapiError> {
            self.log(format!("create {}", content_type));
            let mut record = data.clone();
            record.insert("documentId".to_string(), json!("mem-1"));
            Ok(Value::Object(record))
        }

        async fn update_record(
            &self,
            content_type: &str,
            document_id: &str,
            data: &Map<String, Value>,
            _query: &QueryParams,
        ) -> Result<Value, StrapiError> {
            self.log(format!("update {} {}", content_type, document_id));
            let mut record = self.record.as_object().cloned().unwrap_or_default();
            record.extend(data.clone());
            Ok(Value::Object(record))
        }

        async fn read_record(&self, content_type: &str, document_id: &str, _: &QueryParams) -> Result<Value, StrapiError> {
            self.log(format!("read {} {}", content_type, document_id));
            Ok(self.record.clone())
        }

        async fn list_records(&self, content_type: &str, _: &QueryParams) -> Result<StrapiResponse, StrapiError> {
            self.log(format!("list {}", content_type));
            Ok(StrapiResponse {
                data: json!([self.record]),
                meta: Some(json!({"pagination": {"total": 1}})),
            })
        }

        async fn delete_record(&self, content_type: &str, document_id: &str) -> Result<Value, StrapiError> {
            self.log(format!("delete {} {}", content_type, document_id));
            Ok(self.record.clone())
        }

        async fn content_type_schema(&self, uid: &str) -> Result<Value, StrapiError> {
            self.log(format!("schema {}", uid));
            Err(StrapiError::Api {
                status: 404,
                message: "Not Found".to_string(),
            })
        }
    }
}
