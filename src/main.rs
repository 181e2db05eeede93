use anyhow::Result;
use epic_consult::{config::Config, http, init_tracing, server::EpicConsultServer};
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;
    init_tracing(&config);

    info!(
        "Starting epic-consult v{} (transport={}, cache={})",
        env!("CARGO_PKG_VERSION"),
        config.runtime.transport,
        config.system.cache_backend
    );

    let server = EpicConsultServer::open(config).await?;
    let store = server.store.clone();
    let transport = server.config.runtime.transport.clone();

    let served = match transport.as_str() {
        "http" => http::start_http_server(server)
            .await
            .map_err(anyhow::Error::from),
        _ => serve_stdio(server).await,
    };

    // flush the store even when the transport failed
    if let Err(e) = store.close().await {
        tracing::error!("failed to close consultation store: {}", e);
    }
    served
}

async fn serve_stdio(server: EpicConsultServer) -> Result<()> {
    info!("Serving MCP over stdio");
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
