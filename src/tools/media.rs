//! Media library tools: search, fetch and upload files.

use crate::mcp::{ToolDefinition, ToolOutput};
use crate::strapi::{MediaSearch, MediaUpload, Pagination, StrapiClient};
use crate::tools::{display_value, format_size_kb, pretty};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::path::PathBuf;
use tracing::{error, info};

fn file_line(file: &Value) -> String {
    let field = |key: &str| file.get(key).map(display_value).unwrap_or_else(|| "N/A".to_string());

    let mut line = format!(
        "- {} (ID: {}, documentId: {})\n  Size: {}  MIME: {}",
        field("name"),
        field("id"),
        field("documentId"),
        format_size_kb(file),
        field("mime")
    );
    if let (Some(width), Some(height)) = (
        file.get("width").filter(|v| !v.is_null()),
        file.get("height").filter(|v| !v.is_null()),
    ) {
        line.push_str(&format!("  Dimensions: {}x{}", width, height));
    }
    line.push_str(&format!("\n  URL: {}", field("url")));
    line
}

// ==================== strapi-search-media ====================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMediaParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub sort: Vec<String>,
}

impl From<SearchMediaParams> for MediaSearch {
    fn from(params: SearchMediaParams) -> Self {
        MediaSearch {
            search: params.search.filter(|s| !s.is_empty()),
            mime: params.mime.filter(|m| !m.is_empty()),
            pagination: params.pagination,
            sort: params.sort,
        }
    }
}

pub(super) fn search_definition() -> ToolDefinition {
    ToolDefinition {
        name: "strapi-search-media".to_string(),
        title: "Strapi Search Media".to_string(),
        description: "Search the media library by file name or alternative text, optionally \
            filtered by MIME type (e.g. \"image\", \"video\", \"application/pdf\")."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "search": {"type": "string", "description": "Matches file name or alternative text"},
                "mime": {"type": "string", "description": "MIME type filter"},
                "pagination": {
                    "type": "object",
                    "properties": {
                        "page": {"type": "integer"},
                        "pageSize": {"type": "integer"}
                    }
                },
                "sort": {"type": "array", "items": {"type": "string"}, "description": "e.g. [\"createdAt:desc\"]"}
            }
        }),
    }
}

pub async fn handle_search_media(client: &StrapiClient, params: SearchMediaParams) -> ToolOutput {
    let search: MediaSearch = params.into();

    let result = match client.search_media(&search).await {
        Ok(result) => result,
        Err(e) => {
            error!("Media search failed: {}", e);
            return ToolOutput::error(format!("Error searching media: {}", e));
        }
    };

    // The upload plugin answers with a bare array; some setups wrap it in {data, meta}
    let (files, meta) = match result {
        Value::Array(files) => (files, Value::Null),
        Value::Object(mut body) => {
            let files = match body.remove("data") {
                Some(Value::Array(files)) => files,
                _ => Vec::new(),
            };
            (files, body.remove("meta").unwrap_or(Value::Null))
        }
        _ => (Vec::new(), Value::Null),
    };

    info!("Found {} media files", files.len());

    let listing: Vec<String> = files.iter().map(file_line).collect();
    let output = json!({
        "success": true,
        "data": files,
        "meta": meta,
        "count": files.len(),
    });

    let mut text = format!("Found {} media files", files.len());
    if !listing.is_empty() {
        text.push_str(":\n\n");
        text.push_str(&listing.join("\n"));
    }
    text.push_str("\n\n");
    text.push_str(&pretty(&output));

    ToolOutput::success(text, output)
}

// ==================== strapi-get-media ====================

/// Media files are addressed by numeric id, but clients often send strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MediaId {
    Number(u64),
    Text(String),
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaId::Number(id) => write!(f, "{}", id),
            MediaId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetMediaParams {
    pub id: MediaId,
}

pub(super) fn get_definition() -> ToolDefinition {
    ToolDefinition {
        name: "strapi-get-media".to_string(),
        title: "Strapi Get Media".to_string(),
        description: "Fetch one media file by id with its URL, formats and metadata.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "id": {"type": ["integer", "string"], "description": "Media file id"}
            },
            "required": ["id"]
        }),
    }
}

pub async fn handle_get_media(client: &StrapiClient, params: GetMediaParams) -> ToolOutput {
    let id = params.id.to_string();

    match client.get_media(&id).await {
        Ok(file) => {
            let output = json!({"success": true, "data": file});
            ToolOutput::success(
                format!(
                    "Media file {}:\n\n{}\n\n{}",
                    id,
                    file_line(&file),
                    pretty(&output)
                ),
                output,
            )
        }
        Err(e) => {
            error!("Get media failed: {}", e);
            ToolOutput::error(format!("Error fetching media file {}: {}", id, e))
        }
    }
}

// ==================== strapi-upload-media ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMediaParams {
    /// Absolute path of a local file
    pub file_path: PathBuf,
    #[serde(default)]
    pub alternative_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
}

impl From<UploadMediaParams> for MediaUpload {
    fn from(params: UploadMediaParams) -> Self {
        MediaUpload {
            file_path: params.file_path,
            alternative_text: params.alternative_text,
            caption: params.caption,
            name: params.name,
            folder: params.folder,
        }
    }
}

pub(super) fn upload_definition() -> ToolDefinition {
    ToolDefinition {
        name: "strapi-upload-media".to_string(),
        title: "Strapi Upload Media".to_string(),
        description: "Upload a local file to the media library, with optional alternative text, \
            caption, display name and folder."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "filePath": {"type": "string", "description": "Absolute path to the local file"},
                "alternativeText": {"type": "string"},
                "caption": {"type": "string"},
                "name": {"type": "string", "description": "File name override"},
                "folder": {"type": "string", "description": "Target folder id"}
            },
            "required": ["filePath"]
        }),
    }
}

pub async fn handle_upload_media(client: &StrapiClient, params: UploadMediaParams) -> ToolOutput {
    let upload: MediaUpload = params.into();
    let path = upload.file_path.display().to_string();

    let files = match client.upload_media(&upload).await {
        Ok(Value::Array(files)) => files,
        Ok(Value::Null) => Vec::new(),
        Ok(other) => vec![other],
        Err(e) => {
            error!("Upload failed: {}", e);
            return ToolOutput::error(format!("Error uploading {}: {}", path, e));
        }
    };

    info!("Uploaded {} file(s) from {}", files.len(), path);

    let listing: Vec<String> = files.iter().map(file_line).collect();
    let output = json!({
        "success": true,
        "data": files,
        "count": files.len(),
    });

    ToolOutput::success(
        format!(
            "Successfully uploaded {}:\n\n{}\n\n{}",
            path,
            listing.join("\n"),
            pretty(&output)
        ),
        output,
    )
}
