use crate::i18n::{
    document_identifier, format_validation_results, scan_mixed_languages, validate_document_language,
    ValidationOptions, DEFAULT_MIXED_THRESHOLD,
};
use crate::mcp::{ToolDefinition, ToolOutput};
use crate::strapi::{ContentBackend, QueryParams};
use crate::tools::{default_true, locale_suffix, pretty};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParams {
    pub content_type: String,
    pub document_id: String,
    /// Partial update: only the attributes to change
    pub data: Map<String, Value>,
    #[serde(default)]
    pub populate: Vec<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default = "default_true")]
    pub validate_before_update: bool,
    #[serde(default)]
    pub strict_mode: bool,
}

pub(super) fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "strapi-update".to_string(),
        title: "Strapi Update".to_string(),
        description: "Update an entry by documentId (partial update). Always confirm the documentId \
            with the user first. With a locale, the payload's text fields are scanned for \
            mixed-language content before the update; strictMode refuses the update when any \
            is found."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "contentType": {"type": "string", "description": "Plural content type name"},
                "documentId": {"type": "string", "description": "documentId of the entry to update"},
                "data": {"type": "object", "description": "Attributes to change"},
                "populate": {"type": "array", "items": {"type": "string"}},
                "locale": {"type": "string", "description": "Locale to update (e.g. \"en\", \"es\", \"ca\")"},
                "validateBeforeUpdate": {"type": "boolean", "default": true},
                "strictMode": {"type": "boolean", "default": false, "description": "Refuse the update on language inconsistencies"}
            },
            "required": ["contentType", "documentId", "data"]
        }),
    }
}

pub async fn handle_update<B: ContentBackend>(backend: &B, params: UpdateParams) -> ToolOutput {
    let locale = params.locale.as_deref().filter(|l| !l.is_empty());
    info!(
        "Updating entry {} in {}{}",
        params.document_id,
        params.content_type,
        locale_suffix(locale)
    );

    let validate = params.validate_before_update && locale.is_some();

    let pre_update_warnings = if validate {
        scan_mixed_languages(&Value::Object(params.data.clone()), DEFAULT_MIXED_THRESHOLD)
    } else {
        Vec::new()
    };
    for warning in &pre_update_warnings {
        warn!("{}", warning);
    }

    if params.strict_mode && !pre_update_warnings.is_empty() {
        return ToolOutput::error(format!(
            "Strict mode: refusing to update {} because of language inconsistencies:\n\n{}\n\nFix the content before updating.",
            params.document_id,
            pre_update_warnings.join("\n")
        ))
        .with_structured(json!({
            "success": false,
            "preUpdateWarnings": pre_update_warnings,
        }));
    }

    let query = QueryParams::default()
        .with_locale(locale)
        .with_populate(&params.populate);

    let record = match backend
        .update_record(&params.content_type, &params.document_id, &params.data, &query)
        .await
    {
        Ok(record) => record,
        Err(e) => {
            error!("Update failed: {}", e);
            return ToolOutput::error(format!(
                "Error updating entry {} in {}: {}",
                params.document_id, params.content_type, e
            ));
        }
    };

    // The write already happened; report, never reject
    let validation = match locale {
        Some(locale) if validate => Some(validate_document_language(
            &record,
            locale,
            &ValidationOptions::default(),
        )),
        _ => None,
    };

    let mut text = format!(
        "Successfully updated entry {} in {}{}",
        params.document_id,
        params.content_type,
        locale_suffix(locale)
    );
    if !pre_update_warnings.is_empty() {
        text.push_str("\n\nPre-update warnings:\n");
        text.push_str(&pre_update_warnings.join("\n"));
    }
    if let Some(validation) = validation.as_ref().filter(|v| !v.is_valid) {
        text.push_str(&format_validation_results(validation));
    }

    let mut output = json!({
        "success": true,
        "documentId": document_identifier(&record),
        "data": record,
        "validation": validation,
    });
    if !pre_update_warnings.is_empty() {
        output["preUpdateWarnings"] = json!(pre_update_warnings);
    }

    text.push_str("\n\n");
    text.push_str(&pretty(&output));
    ToolOutput::success(text, output)
}
