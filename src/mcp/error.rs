//! Error types for MCP server operations.

use crate::strapi::StrapiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum McpError {
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Missing tool name or arguments that don't match the tool's schema
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Strapi client error: {0}")]
    Strapi(#[from] StrapiError),

    #[error("Parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl McpError {
    /// Convert to JSON-RPC error code
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::MethodNotFound(_) | McpError::ToolNotFound(_) => -32601,
            McpError::InvalidParams(_) => -32602,
            McpError::JsonError(_) => -32700,
            McpError::Strapi(_) | McpError::IoError(_) => -32000,
        }
    }
}
