use std::sync::Arc;

use color_eyre::Result;

use chat_relay::adapters::ReqwestHttpClient;
use chat_relay::cli::{informational_output, parse_args, CliCommand};
use chat_relay::config::RelayConfig;
use chat_relay::logging::init_logging;
use chat_relay::server::{start_server, AppState};
use chat_relay::upstream::UpstreamClient;

fn main() -> Result<()> {
    // Informational flags print before any initialization
    let command = parse_args(std::env::args());
    if let Some(text) = informational_output(&command) {
        println!("{}", text);
        return Ok(());
    }

    color_eyre::install()?;

    let mut config = RelayConfig::from_env();
    if let CliCommand::Serve { port: Some(port) } = command {
        config = config.with_port(port);
    }
    init_logging(&config.log_filter);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(config))
}

async fn serve(config: RelayConfig) -> Result<()> {
    let upstream = UpstreamClient::new(
        config.upstream_url.clone(),
        Arc::new(ReqwestHttpClient::new()),
    );
    let (mut handle, addr) = start_server(AppState::new(upstream, config)).await?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!(%addr, "Shutting down");
        }
        result = &mut handle => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Server task ended unexpectedly");
            }
            return Ok(());
        }
    }
    handle.abort();
    Ok(())
}
