use crate::i18n::document_identifier;
use crate::mcp::{ToolDefinition, ToolOutput};
use crate::strapi::{ContentBackend, QueryParams, StrapiError};
use crate::tools::{display_value, locale_suffix, pretty};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    /// Plural API name, e.g. "articles"
    pub content_type: String,
    pub data: Map<String, Value>,
    #[serde(default)]
    pub populate: Vec<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

pub(super) fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "strapi-create".to_string(),
        title: "Strapi Create".to_string(),
        description: "Create a new entry in a Strapi content type. Use the PLURAL API name \
            (e.g. \"articles\"), not the UID. Strapi v5 returns a string documentId besides the \
            numeric id. Pass \"locale\" to create the entry in a specific language."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "contentType": {"type": "string", "description": "Plural content type name (e.g. \"products\")"},
                "data": {"type": "object", "description": "Entry attributes"},
                "populate": {"type": "array", "items": {"type": "string"}, "description": "Relations to populate"},
                "locale": {"type": "string", "description": "Locale to create the entry in (e.g. \"en\", \"es-ES\")"}
            },
            "required": ["contentType", "data"]
        }),
    }
}

/// `api::<singular>.<singular>` guessed from a plural API name.
pub(crate) fn singular_uid(content_type: &str) -> String {
    let singular = content_type.strip_suffix('s').unwrap_or(content_type);
    format!("api::{}.{}", singular, singular)
}

/// Required attributes of a schema that `data` does not provide.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MissingFields {
    pub missing: Vec<String>,
    /// One line per required attribute with type and constraint hints
    pub required_hints: Vec<String>,
}

pub(crate) fn check_required_fields(schema: &Value, data: &Map<String, Value>) -> Option<MissingFields> {
    let attributes = schema
        .get("data")
        .and_then(|d| d.get("schema"))
        .and_then(|s| s.get("attributes"))
        .and_then(Value::as_object)?;

    let required: Vec<(&String, &Value)> = attributes
        .iter()
        .filter(|(_, config)| config.get("required").and_then(Value::as_bool).unwrap_or(false))
        .collect();

    let missing: Vec<String> = required
        .iter()
        .filter(|(name, _)| !data.contains_key(name.as_str()))
        .map(|(name, _)| name.to_string())
        .collect();

    if missing.is_empty() {
        return None;
    }

    let required_hints = required
        .iter()
        .map(|(name, config)| {
            let mut hint = format!(
                "  - {} ({})",
                name,
                config.get("type").map(display_value).unwrap_or_default()
            );
            if let Some(values) = config.get("enum").and_then(Value::as_array) {
                let values: Vec<String> = values.iter().map(display_value).collect();
                hint.push_str(&format!(" - values: {}", values.join(", ")));
            }
            if let Some(min) = config.get("min") {
                hint.push_str(&format!(" - min: {}", display_value(min)));
            }
            if config.get("relation").is_some() {
                let target = config.get("target").map(display_value).unwrap_or_default();
                hint.push_str(&format!(" - relation with {}", target));
            }
            hint
        })
        .collect();

    Some(MissingFields {
        missing,
        required_hints,
    })
}

pub async fn handle_create<B: ContentBackend>(backend: &B, params: CreateParams) -> ToolOutput {
    let locale = params.locale.as_deref();
    info!("Creating entry in {}{}", params.content_type, locale_suffix(locale));

    let uid = singular_uid(&params.content_type);

    // Best effort: an unreachable schema must not block the create
    match backend.content_type_schema(&uid).await {
        Ok(schema) => {
            if let Some(report) = check_required_fields(&schema, &params.data) {
                warn!("Missing required fields: {}", report.missing.join(", "));
                return ToolOutput::error(format!(
                    "Cannot create entry in {}\n\nMissing required fields: {}\n\nAll required fields for {}:\n{}\n\nAdd these fields to the request to create the entry.",
                    params.content_type,
                    report.missing.join(", "),
                    params.content_type,
                    report.required_hints.join("\n")
                ));
            }
        }
        Err(e) => warn!("Could not fetch schema {} for validation: {}", uid, e),
    }

    let query = QueryParams::default()
        .with_locale(locale)
        .with_populate(&params.populate);

    match backend.create_record(&params.content_type, &params.data, &query).await {
        Ok(record) => {
            let output = json!({
                "success": true,
                "documentId": document_identifier(&record),
                "data": record,
            });
            ToolOutput::success(
                format!(
                    "Successfully created entry in {}{}\n\n{}",
                    params.content_type,
                    locale_suffix(locale),
                    pretty(&output)
                ),
                output,
            )
        }
        Err(e) => {
            error!("Create failed: {}", e);
            ToolOutput::error(format!(
                "Error creating entry in {}:\n\n{}",
                params.content_type,
                explain_create_error(&params.content_type, &e)
            ))
        }
    }
}

fn explain_create_error(content_type: &str, err: &StrapiError) -> String {
    let message = match err {
        StrapiError::Api { message, .. } => message.clone(),
        other => other.to_string(),
    };

    let looks_like_validation = ["errors occurred", "required", "Invalid"]
        .iter()
        .any(|needle| message.contains(needle));

    if !looks_like_validation {
        return message;
    }

    format!(
        "Validation error in {}: {}\n\nPossible causes:\n- Missing required fields\n- Invalid enumeration values\n- Relations pointing at documentIds that do not exist\n- Wrongly formatted data\n\nTo see the exact required fields, use strapi-get-schema with \"{}\"",
        content_type,
        message,
        singular_uid(content_type)
    )
}
