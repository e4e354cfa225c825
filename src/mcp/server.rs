//! MCP server implementation

use crate::config::Config;
use crate::mcp::error::McpError;
use crate::mcp::protocol::*;
use crate::strapi::StrapiClient;
use crate::tools;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

pub const SERVER_NAME: &str = "strapi-i18n-mcp";

/// MCP server over the stdio transport.
pub struct McpServer {
    client: StrapiClient,
}

impl McpServer {
    pub fn new(config: &Config) -> Result<Self, McpError> {
        Ok(Self {
            client: StrapiClient::new(config)?,
        })
    }

    pub fn with_client(client: StrapiClient) -> Self {
        Self { client }
    }

    /// Read newline-delimited JSON-RPC messages from stdin until EOF.
    pub async fn run(&self) -> Result<(), McpError> {
        info!("MCP server started (Strapi at {})", self.client.base_url());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            if let Some(response) = self.handle_message(&line).await {
                write_response(&mut stdout, &response).await?;
            }
        }

        info!("MCP server stopped");
        Ok(())
    }

    /// Handle one raw message. Returns `None` for blank lines and notifications.
    pub async fn handle_message(&self, line: &str) -> Option<Value> {
        if line.trim().is_empty() {
            return None;
        }

        debug!("Received request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                let err = McpError::from(e);
                return Some(to_json(&JsonRpcError::new(None, err.error_code(), err.to_string())));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            warn!("Unexpected jsonrpc version: {}", request.jsonrpc);
        }

        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        Some(self.handle_request(request).await)
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Value {
        let id = request.id.clone();

        let result = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tool_call(request.params).await,
            other => Err(McpError::MethodNotFound(other.to_string())),
        };

        match result {
            Ok(value) => to_json(&JsonRpcResponse::new(id, value)),
            Err(e) => {
                warn!("Request {} failed: {}", request.method, e);
                to_json(&JsonRpcError::new(id, e.error_code(), e.to_string()))
            }
        }
    }

    fn handle_initialize(&self) -> Value {
        to_json(&InitializeResponse {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            capabilities: Capabilities {
                tools: ToolsCapability { list_changed: false },
            },
        })
    }

    fn handle_tools_list(&self) -> Value {
        to_json(&ToolListResponse {
            tools: tools::definitions(),
        })
    }

    async fn handle_tool_call(&self, params: Value) -> Result<Value, McpError> {
        let tool_name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| McpError::InvalidParams("Missing tool name".to_string()))?;

        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        let output = tools::call_tool(&self.client, tool_name, arguments).await?;
        Ok(to_json(&output))
    }
}

async fn write_response<W: AsyncWrite + Unpin>(out: &mut W, response: &Value) -> Result<(), McpError> {
    let mut line = serde_json::to_string(response)?;
    line.push('\n');
    out.write_all(line.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        error!("Failed to serialize response: {}", e);
        json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": null,
            "error": {"code": -32603, "message": format!("Internal error: {}", e)}
        })
    })
}
