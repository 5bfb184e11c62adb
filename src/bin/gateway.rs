//! ShareIt Gateway - validating front tier
//!
//! Rejects malformed calls and forwards the rest to the server tier.

use std::net::SocketAddr;

use anyhow::Context;

use shareit_server::{
    config::{init_tracing, AppConfig},
    gateway::{self, ServerClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config);

    let client = ServerClient::new(config.gateway.server_url.clone());
    tracing::info!(
        "Starting ShareIt Gateway v{}, forwarding to {}",
        env!("CARGO_PKG_VERSION"),
        client.base_url()
    );

    let addr = SocketAddr::new(
        config.gateway.host.parse().context("Invalid host address")?,
        config.gateway.port,
    );

    let app = gateway::create_router(client);

    tracing::info!("Gateway listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
