use crate::i18n::{analyze_localization_status, document_identifier, LocalizationStatus};
use crate::mcp::{ToolDefinition, ToolOutput};
use crate::strapi::{ContentBackend, Pagination, QueryParams};
use crate::tools::{default_true, locale_suffix, pretty};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub content_type: String,
    #[serde(default)]
    pub filters: Map<String, Value>,
    #[serde(default)]
    pub sort: Vec<String>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub populate: Vec<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default = "default_true")]
    pub show_localization_summary: bool,
}

pub(super) fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "strapi-list".to_string(),
        title: "Strapi List".to_string(),
        description: "List entries of a content type with filters, sorting and pagination. Use the \
            PLURAL API name. Includes a per-entry localization summary (current locale, available \
            translations, inherited content) unless showLocalizationSummary is false."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "contentType": {"type": "string", "description": "Plural content type name"},
                "filters": {"type": "object", "description": "Strapi filters, e.g. {\"title\": {\"$contains\": \"news\"}}"},
                "sort": {"type": "array", "items": {"type": "string"}, "description": "e.g. [\"createdAt:desc\"]"},
                "pagination": {
                    "type": "object",
                    "properties": {
                        "page": {"type": "integer"},
                        "pageSize": {"type": "integer"},
                        "start": {"type": "integer"},
                        "limit": {"type": "integer"}
                    }
                },
                "fields": {"type": "array", "items": {"type": "string"}},
                "populate": {"type": "array", "items": {"type": "string"}},
                "locale": {"type": "string"},
                "showLocalizationSummary": {"type": "boolean", "default": true}
            },
            "required": ["contentType"]
        }),
    }
}

fn summary_block(index: usize, item: &Value, status: &LocalizationStatus) -> String {
    let id = document_identifier(item).unwrap_or_else(|| index.to_string());
    let mut block = format!(
        "\nEntry {}:\n   Current locale: {}\n   Available translations: {}\n   Own translation: {}",
        id,
        status.current_locale,
        status.available_locales.join(", "),
        if status.is_own_translation { "yes" } else { "no (inherited)" }
    );
    if let Some(inherited) = &status.inherited_from {
        block.push_str(&format!("\n   Inherited from: {}", inherited));
    }
    block
}

pub async fn handle_list<B: ContentBackend>(backend: &B, params: ListParams) -> ToolOutput {
    let locale = params.locale.as_deref().filter(|l| !l.is_empty());
    info!("Listing entries from {}{}", params.content_type, locale_suffix(locale));

    let query = QueryParams {
        fields: params.fields.clone(),
        populate: params.populate.clone(),
        filters: params.filters.clone(),
        sort: params.sort.clone(),
        pagination: params.pagination.clone(),
        publication_state: None,
        locale: None,
    }
    .with_locale(locale);

    let result = match backend.list_records(&params.content_type, &query).await {
        Ok(result) => result,
        Err(e) => {
            error!("List failed: {}", e);
            return ToolOutput::error(format!(
                "Error listing entries from {}: {}",
                params.content_type, e
            ));
        }
    };

    let items: &[Value] = result.data.as_array().map(Vec::as_slice).unwrap_or(&[]);

    let mut summary_text = String::new();
    let mut summaries = Vec::new();
    if params.show_localization_summary && !items.is_empty() {
        summary_text.push_str("\n\nLocalization summary:");
        for (index, item) in items.iter().enumerate() {
            let status = analyze_localization_status(item, locale);
            summary_text.push_str(&summary_block(index, item, &status));
            summaries.push(status);
        }
    }

    let mut output = json!({
        "success": true,
        "data": result.data,
        "meta": result.meta,
        "count": items.len(),
    });
    if !summaries.is_empty() {
        output["localizationSummary"] = json!(summaries);
    }

    ToolOutput::success(
        format!(
            "Successfully listed {} entries from {}{}{}\n\n{}",
            items.len(),
            params.content_type,
            locale_suffix(locale),
            summary_text,
            pretty(&output)
        ),
        output,
    )
}
