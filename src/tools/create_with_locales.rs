use crate::i18n::LocalizationRequest;
use crate::mcp::{ToolDefinition, ToolOutput};
use crate::strapi::ContentBackend;
use crate::tools::pretty;
use crate::workflow::{create_with_locales, CreateWithLocalesRequest, WorkflowError};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::error;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWithLocalesParams {
    pub content_type: String,
    pub default_locale: String,
    pub data: Map<String, Value>,
    #[serde(default)]
    pub localizations: Vec<LocalizationRequest>,
    #[serde(default)]
    pub populate: Vec<String>,
}

impl From<CreateWithLocalesParams> for CreateWithLocalesRequest {
    fn from(params: CreateWithLocalesParams) -> Self {
        Self {
            content_type: params.content_type,
            default_locale: params.default_locale,
            data: params.data,
            localizations: params.localizations,
            populate: params.populate,
        }
    }
}

pub(super) fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "strapi-create-with-locales".to_string(),
        title: "Strapi Create with Locales".to_string(),
        description: "Create one entry with several localizations in Strapi v5. All locales share \
            a single documentId: the entry is created in the default locale, then updated once per \
            additional locale. Requested locales are adapted to the ones configured in Strapi \
            (\"es-ES\" becomes \"es\" if only \"es\" exists); unknown or duplicate locales are \
            skipped. Slug and other UID or unique fields must be identical in every locale. Use the \
            PLURAL API name (e.g. \"categories\")."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "contentType": {"type": "string", "description": "Plural content type name"},
                "defaultLocale": {"type": "string", "description": "Locale of the base entry (e.g. \"es-ES\")"},
                "data": {"type": "object", "description": "Entry data in the default locale"},
                "localizations": {
                    "type": "array",
                    "description": "Additional locales, applied in order",
                    "items": {
                        "type": "object",
                        "properties": {
                            "locale": {"type": "string"},
                            "data": {"type": "object"}
                        },
                        "required": ["locale", "data"]
                    }
                },
                "populate": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["contentType", "defaultLocale", "data"]
        }),
    }
}

const UNIQUE_FIELD_HINT: &str = "Hints:\n\
1. \"This attribute must be unique\": unique fields (e.g. name, slug) must be IDENTICAL in every \
locale of a Strapi v5 entry. Translate only the non-unique fields such as description.\n\
2. Use strapi-get-schema to see which fields are unique.\n\
3. Locales are adapted to the ones available in Strapi; unknown or duplicate locales are skipped.";

pub async fn handle_create_with_locales<B: ContentBackend>(
    backend: &B,
    params: CreateWithLocalesParams,
) -> ToolOutput {
    let content_type = params.content_type.clone();
    let request = CreateWithLocalesRequest::from(params);

    match create_with_locales(backend, &request).await {
        Ok(outcome) => {
            let mut output = json!({
                "success": true,
                "message": "Entry created successfully with all localizations",
            });
            if let (Value::Object(out), Ok(Value::Object(fields))) =
                (&mut output, serde_json::to_value(&outcome))
            {
                out.extend(fields);
            }

            ToolOutput::success(
                format!(
                    "Successfully created entry with locales in {}\n\n{}",
                    content_type,
                    pretty(&output)
                ),
                output,
            )
        }
        Err(e) => {
            error!("Create with locales failed at {}: {}", e.step(), e);
            failure_output(&content_type, &e)
        }
    }
}

fn failure_output(content_type: &str, err: &WorkflowError) -> ToolOutput {
    let mut text = format!(
        "Error creating entry with locales in {}:\n\n{}",
        content_type, err
    );

    let mut structured = json!({
        "success": false,
        "error": err.to_string(),
        "failedStep": err.step().to_string(),
    });

    match err {
        WorkflowError::LocaleUpdate { partial, .. } => {
            let committed: Vec<&str> = std::iter::once(partial.main_entry.locale.as_str())
                .chain(partial.localizations.iter().map(|l| l.locale.as_str()))
                .collect();
            text.push_str(&format!(
                "\n\nPARTIAL STATE: entry {} was created and NOT rolled back.\nCommitted locales: {}\nNot written: {}",
                partial.main_entry.document_id,
                committed.join(", "),
                partial.pending_locales.join(", ")
            ));
            structured["partial"] = serde_json::to_value(partial.as_ref()).unwrap_or(Value::Null);
        }
        WorkflowError::MissingDocumentId { locale, record } => {
            text.push_str(&format!(
                "\n\nPARTIAL STATE: an entry was created in {} but could not be identified; no localizations were applied.",
                locale
            ));
            structured["partial"] = json!({ "mainEntry": { "locale": locale, "data": record } });
        }
        _ => {}
    }

    text.push_str("\n\n");
    text.push_str(UNIQUE_FIELD_HINT);

    ToolOutput::error(text).with_structured(structured)
}
