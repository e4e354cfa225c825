use crate::i18n::{format_validation_results, validate_document_language, ValidationOptions};
use crate::mcp::{ToolDefinition, ToolOutput};
use crate::strapi::{ContentBackend, QueryParams};
use crate::tools::{default_true, locale_suffix, pretty};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadParams {
    pub content_type: String,
    pub document_id: String,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub populate: Vec<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default = "default_true")]
    pub validate_language: bool,
    #[serde(default)]
    pub strict_mode: bool,
}

pub(super) fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "strapi-read".to_string(),
        title: "Strapi Read".to_string(),
        description: "Read one entry by documentId. Use the PLURAL API name (e.g. \"products\"). \
            When a locale is given the content is checked against that locale's language, \
            inherited fallback content is reported, and strictMode rejects fallbacks and \
            language mismatches."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "contentType": {"type": "string", "description": "Plural content type name"},
                "documentId": {"type": "string", "description": "Strapi v5 documentId"},
                "fields": {"type": "array", "items": {"type": "string"}},
                "populate": {"type": "array", "items": {"type": "string"}},
                "locale": {"type": "string", "description": "Locale to read (e.g. \"en\", \"es\", \"ca\")"},
                "validateLanguage": {"type": "boolean", "default": true, "description": "Check the content is in the locale's language"},
                "strictMode": {"type": "boolean", "default": false, "description": "Fail on inherited content or language mismatches"}
            },
            "required": ["contentType", "documentId"]
        }),
    }
}

pub async fn handle_read<B: ContentBackend>(backend: &B, params: ReadParams) -> ToolOutput {
    let locale = params.locale.as_deref().filter(|l| !l.is_empty());
    info!(
        "Reading entry {} from {}{}",
        params.document_id,
        params.content_type,
        locale_suffix(locale)
    );

    let query = QueryParams::default()
        .with_fields(&params.fields)
        .with_populate(&params.populate)
        .with_locale(locale);

    let record = match backend
        .read_record(&params.content_type, &params.document_id, &query)
        .await
    {
        Ok(record) => record,
        Err(e) => {
            error!("Read failed: {}", e);
            return ToolOutput::error(format!(
                "Error reading entry {} from {}: {}",
                params.document_id, params.content_type, e
            ));
        }
    };

    // Strict mode implies validation: a fallback must never slip through
    let validation = match locale {
        Some(locale) if params.validate_language || params.strict_mode => {
            let options = ValidationOptions::default().strict(params.strict_mode);
            Some(validate_document_language(&record, locale, &options))
        }
        _ => None,
    };

    if let Some(validation) = &validation {
        if params.strict_mode && !validation.is_valid {
            return ToolOutput::error(format!(
                "Strict mode rejected entry {} from {}:{}",
                params.document_id,
                params.content_type,
                format_validation_results(validation)
            ))
            .with_structured(json!({
                "success": false,
                "data": record,
                "validation": validation,
            }));
        }
    }

    let validation_message = validation
        .as_ref()
        .map(format_validation_results)
        .unwrap_or_default();

    let output = json!({
        "success": true,
        "data": record,
        "validation": validation,
    });

    ToolOutput::success(
        format!(
            "Successfully read entry {} from {}{}{}\n\n{}",
            params.document_id,
            params.content_type,
            locale_suffix(locale),
            validation_message,
            pretty(&output)
        ),
        output,
    )
}
