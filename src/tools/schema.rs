//! Content-type builder tools: list, inspect and extend schemas.

use crate::mcp::{ToolDefinition, ToolOutput};
use crate::strapi::StrapiClient;
use crate::tools::{display_value, pretty};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use tracing::{error, info};

// ==================== strapi-list-content-types ====================

pub(super) fn list_content_types_definition() -> ToolDefinition {
    ToolDefinition {
        name: "strapi-list-content-types".to_string(),
        title: "Strapi List Content Types".to_string(),
        description: "List every content type with its UID, API id, kind, display and \
            singular/plural names, and attribute names."
            .to_string(),
        input_schema: json!({"type": "object", "properties": {}}),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentTypeSummary {
    uid: Value,
    #[serde(rename = "apiID")]
    api_id: Value,
    kind: Value,
    display_name: Value,
    singular_name: Value,
    plural_name: Value,
    attributes: Vec<String>,
}

fn summarize_content_type(ct: &Value) -> ContentTypeSummary {
    let schema = ct.get("schema");
    let schema_field = |key: &str| schema.and_then(|s| s.get(key)).cloned().unwrap_or(Value::Null);
    let api_id = ct.get("apiID").cloned().unwrap_or(Value::Null);

    let display_name = match schema_field("displayName") {
        Value::Null => api_id.clone(),
        name => name,
    };

    ContentTypeSummary {
        uid: ct.get("uid").cloned().unwrap_or(Value::Null),
        kind: ct.get("kind").cloned().unwrap_or(Value::Null),
        display_name,
        singular_name: schema_field("singularName"),
        plural_name: schema_field("pluralName"),
        attributes: schema
            .and_then(|s| s.get("attributes"))
            .and_then(Value::as_object)
            .map(|attrs| attrs.keys().cloned().collect())
            .unwrap_or_default(),
        api_id,
    }
}

pub async fn handle_list_content_types(client: &StrapiClient) -> ToolOutput {
    info!("Fetching all content types");

    let result = match client.get_content_types().await {
        Ok(result) => result,
        Err(e) => {
            error!("List content types failed: {}", e);
            return ToolOutput::error(format!("Error fetching content types: {}", e));
        }
    };

    let Some(items) = result.get("data").and_then(Value::as_array) else {
        return ToolOutput::error(format!(
            "Error fetching content types: unexpected response {}",
            result
        ));
    };

    let content_types: Vec<ContentTypeSummary> = items.iter().map(summarize_content_type).collect();
    let output = json!({
        "success": true,
        "count": content_types.len(),
        "contentTypes": content_types,
    });

    ToolOutput::success(
        format!(
            "Successfully fetched {} content types\n\n{}",
            content_types.len(),
            pretty(&output)
        ),
        output,
    )
}

// ==================== strapi-get-schema ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSchemaParams {
    /// Full UID, e.g. "api::product.product"
    pub content_type: String,
}

pub(super) fn get_schema_definition() -> ToolDefinition {
    ToolDefinition {
        name: "strapi-get-schema".to_string(),
        title: "Strapi Get Schema".to_string(),
        description: "Show the schema of a content type: required and optional fields with type, \
            uniqueness, defaults, limits, enumeration values and relations. Takes the full UID \
            (e.g. \"api::product.product\")."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "contentType": {"type": "string", "description": "Full content type UID"}
            },
            "required": ["contentType"]
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct FieldInfo {
    name: String,
    #[serde(rename = "type")]
    field_type: Value,
    required: bool,
    unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<Value>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    enumeration: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    relation: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<Value>,
}

impl FieldInfo {
    fn from_attribute(name: &str, config: &Value) -> Self {
        let flag = |key: &str| config.get(key).and_then(Value::as_bool).unwrap_or(false);
        let opt = |key: &str| config.get(key).filter(|v| !v.is_null()).cloned();

        Self {
            name: name.to_string(),
            field_type: config.get("type").cloned().unwrap_or(Value::Null),
            required: flag("required"),
            unique: flag("unique"),
            default: opt("default"),
            min: opt("min"),
            max: opt("max"),
            enumeration: opt("enum"),
            relation: opt("relation"),
            target: opt("target"),
        }
    }

    fn describe(&self) -> String {
        let mut line = format!("- {} ({})", self.name, display_value(&self.field_type));
        if !self.required {
            if let Some(default) = &self.default {
                line.push_str(&format!(" - default: {}", display_value(default)));
            }
        }
        if let Some(Value::Array(values)) = &self.enumeration {
            let values: Vec<String> = values.iter().map(display_value).collect();
            line.push_str(&format!(" - values: {}", values.join(", ")));
        }
        if self.required {
            if let Some(min) = &self.min {
                line.push_str(&format!(" - min: {}", display_value(min)));
            }
            if let Some(max) = &self.max {
                line.push_str(&format!(" - max: {}", display_value(max)));
            }
        }
        if let Some(relation) = &self.relation {
            let target = self.target.as_ref().map(display_value).unwrap_or_default();
            line.push_str(&format!(" - relation {} with {}", display_value(relation), target));
        }
        line
    }
}

pub async fn handle_get_schema(client: &StrapiClient, params: GetSchemaParams) -> ToolOutput {
    info!("Fetching schema for {}", params.content_type);

    let fail = |message: String| {
        ToolOutput::error(format!(
            "Error fetching schema for {}: {}\n\nUse the full UID, e.g. \"api::product.product\". \
             strapi-list-content-types lists every available UID.",
            params.content_type, message
        ))
    };

    let result = match client.get_content_type(&params.content_type).await {
        Ok(result) => result,
        Err(e) => {
            error!("Get schema failed: {}", e);
            return fail(e.to_string());
        }
    };

    let Some(schema) = result.get("data").and_then(|d| d.get("schema")) else {
        return fail("Schema not found".to_string());
    };

    let empty = Map::new();
    let attributes = schema.get("attributes").and_then(Value::as_object).unwrap_or(&empty);
    let (required, optional): (Vec<FieldInfo>, Vec<FieldInfo>) = attributes
        .iter()
        .map(|(name, config)| FieldInfo::from_attribute(name, config))
        .partition(|f| f.required);

    let text_of = |key: &str| schema.get(key).map(display_value).unwrap_or_else(|| "N/A".to_string());

    let output = json!({
        "success": true,
        "contentType": params.content_type,
        "displayName": schema.get("displayName"),
        "pluralName": schema.get("pluralName"),
        "singularName": schema.get("singularName"),
        "description": schema.get("description"),
        "requiredFields": required,
        "optionalFields": optional,
        "totalFields": attributes.len(),
    });

    let describe_all =
        |fields: &[FieldInfo]| fields.iter().map(FieldInfo::describe).collect::<Vec<_>>().join("\n");

    let text = format!(
        "Schema of {} ({})\n\nGeneral:\n- Plural name: {}\n- Singular name: {}\n- Description: {}\n- Total fields: {}\n\nRequired fields ({}):\n{}\n\nOptional fields ({}):\n{}\n\nUse the required fields above when creating an entry.",
        text_of("displayName"),
        params.content_type,
        text_of("pluralName"),
        text_of("singularName"),
        text_of("description"),
        attributes.len(),
        required.len(),
        describe_all(&required),
        optional.len(),
        describe_all(&optional),
    );

    ToolOutput::success(text, output)
}

// ==================== strapi-add-field ====================

/// Attribute types the content-type builder accepts for scalar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Text,
    Richtext,
    Email,
    Password,
    Integer,
    Biginteger,
    Float,
    Decimal,
    Date,
    Time,
    Datetime,
    Timestamp,
    Boolean,
    Enumeration,
    Json,
    Uid,
}

impl FieldType {
    pub const ALL: [FieldType; 17] = [
        FieldType::String,
        FieldType::Text,
        FieldType::Richtext,
        FieldType::Email,
        FieldType::Password,
        FieldType::Integer,
        FieldType::Biginteger,
        FieldType::Float,
        FieldType::Decimal,
        FieldType::Date,
        FieldType::Time,
        FieldType::Datetime,
        FieldType::Timestamp,
        FieldType::Boolean,
        FieldType::Enumeration,
        FieldType::Json,
        FieldType::Uid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Richtext => "richtext",
            FieldType::Email => "email",
            FieldType::Password => "password",
            FieldType::Integer => "integer",
            FieldType::Biginteger => "biginteger",
            FieldType::Float => "float",
            FieldType::Decimal => "decimal",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Datetime => "datetime",
            FieldType::Timestamp => "timestamp",
            FieldType::Boolean => "boolean",
            FieldType::Enumeration => "enumeration",
            FieldType::Json => "json",
            FieldType::Uid => "uid",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFieldParams {
    /// Full UID, e.g. "api::product.product"
    pub content_type: String,
    pub field_name: String,
    pub field_type: FieldType,
    /// Extra attribute options (required, unique, minLength, ...)
    #[serde(default)]
    pub options: Map<String, Value>,
}

pub(super) fn add_field_definition() -> ToolDefinition {
    let types: Vec<&str> = FieldType::ALL.iter().map(FieldType::as_str).collect();
    ToolDefinition {
        name: "strapi-add-field".to_string(),
        title: "Strapi Add Field".to_string(),
        description: "Add a field to an existing content type via the content-type builder. \
            Strapi may need a restart for the change to take effect."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "contentType": {"type": "string", "description": "Full content type UID"},
                "fieldName": {"type": "string", "description": "Name of the new field"},
                "fieldType": {"type": "string", "enum": types},
                "options": {"type": "object", "description": "Extra options (required, unique, minLength, maxLength, ...)"}
            },
            "required": ["contentType", "fieldName", "fieldType"]
        }),
    }
}

pub async fn handle_add_field(client: &StrapiClient, params: AddFieldParams) -> ToolOutput {
    info!("Adding field {} to {}", params.field_name, params.content_type);

    match client
        .add_field(
            &params.content_type,
            &params.field_name,
            params.field_type.as_str(),
            &params.options,
        )
        .await
    {
        Ok(_) => {
            let output = json!({
                "success": true,
                "message": format!("Field '{}' added successfully to {}", params.field_name, params.content_type),
                "fieldName": params.field_name,
                "fieldType": params.field_type,
                "options": params.options,
            });
            ToolOutput::success(
                format!(
                    "Successfully added field '{}' ({}) to {}\n\n{}\n\nNOTE: You may need to restart Strapi for changes to take effect.",
                    params.field_name,
                    params.field_type,
                    params.content_type,
                    pretty(&output)
                ),
                output,
            )
        }
        Err(e) => {
            error!("Add field failed: {}", e);
            ToolOutput::error(format!("Error adding field to {}: {}", params.content_type, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::client_for;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn product_schema() -> Value {
        json!({
            "data": {
                "uid": "api::product.product",
                "apiID": "product",
                "kind": "collectionType",
                "schema": {
                    "displayName": "Product",
                    "singularName": "product",
                    "pluralName": "products",
                    "attributes": {
                        "name": {"type": "string", "required": true, "unique": true, "min": 3},
                        "price": {"type": "decimal", "default": 0},
                        "category": {"type": "relation", "relation": "manyToOne", "target": "api::category.category"},
                        "status": {"type": "enumeration", "enum": ["draft", "live"], "required": true}
                    }
                }
            }
        })
    }

    // ==================== List Content Types Tests ====================

    #[test]
    fn test_summarize_content_type() {
        let summary = summarize_content_type(&product_schema()["data"]);
        assert_eq!(summary.display_name, "Product");
        assert_eq!(summary.attributes, vec!["name", "price", "category", "status"]);

        let bare = summarize_content_type(&json!({"uid": "plugin::x.y", "apiID": "y"}));
        assert_eq!(bare.display_name, "y");
        assert!(bare.attributes.is_empty());
    }

    #[tokio::test]
    async fn test_list_content_types() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/content-type-builder/content-types"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [product_schema()["data"].clone()]
            })))
            .mount(&server)
            .await;

        let out = handle_list_content_types(&client_for(&server)).await;
        let structured = out.structured_content.unwrap();
        assert_eq!(structured["count"], 1);
        assert_eq!(structured["contentTypes"][0]["apiID"], "product");
        assert_eq!(structured["contentTypes"][0]["pluralName"], "products");
    }

    // ==================== Get Schema Tests ====================

    #[test]
    fn test_field_info_describe() {
        let name = FieldInfo::from_attribute("name", &json!({"type": "string", "required": true, "min": 3}));
        assert_eq!(name.describe(), "- name (string) - min: 3");

        let category = FieldInfo::from_attribute(
            "category",
            &json!({"type": "relation", "relation": "manyToOne", "target": "api::category.category"}),
        );
        assert_eq!(
            category.describe(),
            "- category (relation) - relation manyToOne with api::category.category"
        );
    }

    #[tokio::test]
    async fn test_get_schema_splits_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/content-type-builder/content-types/api::product.product"))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_schema()))
            .mount(&server)
            .await;

        let out = handle_get_schema(
            &client_for(&server),
            GetSchemaParams {
                content_type: "api::product.product".to_string(),
            },
        )
        .await;

        assert!(!out.is_error);
        assert!(out.text().starts_with("Schema of Product (api::product.product)"));
        assert!(out.text().contains("- status (enumeration) - values: draft, live"));

        let structured = out.structured_content.unwrap();
        assert_eq!(structured["totalFields"], 4);
        assert_eq!(structured["requiredFields"].as_array().unwrap().len(), 2);
        assert_eq!(structured["requiredFields"][0]["unique"], true);
        assert_eq!(structured["optionalFields"][0]["default"], 0);
        assert!(structured["optionalFields"][0].get("enum").is_none());
    }

    #[tokio::test]
    async fn test_get_schema_missing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/content-type-builder/content-types/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
            .mount(&server)
            .await;

        let out = handle_get_schema(
            &client_for(&server),
            GetSchemaParams {
                content_type: "products".to_string(),
            },
        )
        .await;

        assert!(out.is_error);
        assert!(out.text().contains("Schema not found"));
        assert!(out.text().contains("api::product.product"));
    }

    // ==================== Add Field Tests ====================

    #[test]
    fn test_field_type_rejects_relations() {
        let parsed: Result<AddFieldParams, _> = serde_json::from_value(json!({
            "contentType": "api::product.product",
            "fieldName": "owner",
            "fieldType": "relation"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_field_type_names_round_trip() {
        for field_type in FieldType::ALL {
            let value = serde_json::to_value(field_type).unwrap();
            assert_eq!(value, field_type.as_str());
        }
    }

    #[tokio::test]
    async fn test_add_field_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/content-type-builder/content-types/api::product.product"))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_schema()))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/api/content-type-builder/content-types/api::product.product"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let params: AddFieldParams = serde_json::from_value(json!({
            "contentType": "api::product.product",
            "fieldName": "sku",
            "fieldType": "uid",
            "options": {"required": true}
        }))
        .unwrap();

        let out = handle_add_field(&client_for(&server), params).await;
        assert!(!out.is_error);
        assert!(out.text().starts_with("Successfully added field 'sku' (uid) to api::product.product"));
        assert_eq!(out.structured_content.unwrap()["fieldType"], "uid");
    }
}
