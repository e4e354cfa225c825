//! Model Context Protocol shell: JSON-RPC 2.0 over stdio.

mod error;
mod protocol;
mod server;

pub use error::McpError;
pub use protocol::{TextContent, ToolDefinition, ToolOutput, PROTOCOL_VERSION};
pub use server::{McpServer, SERVER_NAME};
