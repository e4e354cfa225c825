use crate::mcp::{ToolDefinition, ToolOutput};
use crate::strapi::ContentBackend;
use crate::tools::pretty;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParams {
    pub content_type: String,
    pub document_id: String,
}

pub(super) fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "strapi-delete".to_string(),
        title: "Strapi Delete".to_string(),
        description: "Delete an entry by documentId. Always ask the user to confirm the documentId \
            before deleting. Use the PLURAL API name."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "contentType": {"type": "string", "description": "Plural content type name"},
                "documentId": {"type": "string", "description": "documentId of the entry to delete"}
            },
            "required": ["contentType", "documentId"]
        }),
    }
}

pub async fn handle_delete<B: ContentBackend>(backend: &B, params: DeleteParams) -> ToolOutput {
    info!("Deleting entry {} from {}", params.document_id, params.content_type);

    match backend.delete_record(&params.content_type, &params.document_id).await {
        Ok(record) => {
            let output = json!({
                "success": true,
                "deletedDocumentId": params.document_id,
                "deletedData": record,
            });
            ToolOutput::success(
                format!(
                    "Successfully deleted entry {} from {}\n\n{}",
                    params.document_id,
                    params.content_type,
                    pretty(&output)
                ),
                output,
            )
        }
        Err(e) => {
            error!("Delete failed: {}", e);
            ToolOutput::error(format!(
                "Error deleting entry {} from {}: {}",
                params.document_id, params.content_type, e
            ))
        }
    }
}
