//! `parley serve`: run the relay until Ctrl-C

use anyhow::Result;
use parley_config::Config;
use tokio_util::sync::CancellationToken;

pub async fn execute(config: &Config) -> Result<()> {
    tracing::info!(
        "Relay backend: {} ({})",
        config.chat.provider,
        config.chat.chat_model()
    );

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown requested");
            }
            shutdown.cancel();
        }
    });

    parley_web::start_server(config, shutdown).await?;
    Ok(())
}
