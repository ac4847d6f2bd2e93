//! Moverwatch - stock market movers in the terminal.
//!
//! Reads commands from stdin and prints plain-text screens. Logs go to a
//! daily-rolling file so they do not interleave with the output.

use anyhow::Context;
use moverwatch::{App, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let log_dir = moverwatch::config::log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let (writer, _guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, "moverwatch.log"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moverwatch=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    // Load configuration
    let config = Config::load_or_default().context("loading configuration")?;
    if let Err(e) = config.api.api_key() {
        // Startup continues; requests report the problem on screen.
        tracing::warn!("{}", e);
    }

    // Run the application
    let mut app = App::new(config)?;
    app.run().await?;

    Ok(())
}
