//! Strapi MCP server with multilingual content consistency checks.
//!
//! Exposes Strapi CRUD, schema, locale and media operations as MCP tools
//! over stdio. Localized reads and writes are checked for fallback content
//! and language mismatches, and entries can be created in several locales
//! in one call.

pub mod config;
pub mod i18n;
pub mod mcp;
pub mod strapi;
pub mod tools;
pub mod workflow;
