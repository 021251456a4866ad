use clap::Parser;
use option_buyer::{Cli, Supervisor};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = cli.into_config()?;
    tracing::info!(
        multiplier = %config.multiplier,
        reconnect_delay_secs = config.reconnect_delay_secs,
        restart_policy = ?config.restart_policy,
        "Starting option buyer"
    );

    let mut supervisor = Supervisor::new(config)?;

    tokio::select! {
        result = supervisor.run() => {
            if let Err(e) = result {
                // Restart is left to whatever supervises this process
                tracing::error!(error = %e, "Exiting");
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
    }

    let stats = supervisor.handler().stats();
    tracing::info!(
        sessions = supervisor.sessions(),
        messages = stats.messages,
        orders_sent = stats.orders_sent,
        "Stopped"
    );

    Ok(())
}
