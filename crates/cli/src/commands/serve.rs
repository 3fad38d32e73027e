use crate::di::DnsServices;
use crate::server;
use ferrous_lookup_domain::Config;
use ferrous_lookup_infrastructure::dns::DnsServerHandler;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Runs the UDP server until Ctrl-C.
pub async fn serve(config: &Config, services: &DnsServices) -> anyhow::Result<()> {
    let bind_addr: SocketAddr =
        format!("{}:{}", config.server.bind_address, config.server.dns_port).parse()?;

    let shutdown = CancellationToken::new();
    let handler = DnsServerHandler::new(services.handler_use_case(shutdown.clone()));

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
        signal_token.cancel();
    });

    server::start_dns_server(bind_addr, handler, config.server.write_attempts, shutdown).await?;

    info!("Server shutdown complete");
    Ok(())
}
