use anyhow::{Context, Result};
use strapi_i18n_mcp::config::Config;
use strapi_i18n_mcp::mcp::{McpServer, SERVER_NAME};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when the client passes env vars directly)
    let _ = dotenvy::dotenv();

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strapi_i18n_mcp=info".parse()?),
        )
        .init();

    info!("Starting {} v{}", SERVER_NAME, env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Strapi URL: {}", config.strapi_url);
    info!(
        "API token: {}",
        if config.strapi_api_token.is_some() { "configured" } else { "not set" }
    );

    let server = McpServer::new(&config).context("Failed to build Strapi client")?;
    server.run().await?;

    info!("stdin closed, shutting down");
    Ok(())
}
