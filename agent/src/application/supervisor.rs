use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{AgentConfig, ConfigError, RestartPolicy};
use crate::infrastructure::{SessionError, WsConnector};

use super::market_data_handler::MarketDataHandler;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Keeps the stream session running
///
/// A normal close triggers an immediate reconnect. An abnormal close either
/// ends `run` with an error (`ExitProcess`, the process then exits non-zero)
/// or sleeps `reconnect_delay` and reconnects (`Reconnect`).
///
/// The handler outlives individual sessions, so cached prices and the
/// request-id sequence carry over a reconnect.
pub struct Supervisor {
    config: AgentConfig,
    connector: WsConnector,
    handler: MarketDataHandler,
    sessions: u64,
}

impl Supervisor {
    pub fn new(config: AgentConfig) -> Result<Self, SupervisorError> {
        config.validate()?;
        let connector = WsConnector::new(config.connection_target()?);
        let handler = MarketDataHandler::new(config.multiplier);

        Ok(Supervisor {
            config,
            connector,
            handler,
            sessions: 0,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn handler(&self) -> &MarketDataHandler {
        &self.handler
    }

    /// Sessions that got past the handshake
    pub fn sessions(&self) -> u64 {
        self.sessions
    }

    /// Run until a fatal error; never returns `Ok`
    pub async fn run(&mut self) -> Result<(), SupervisorError> {
        loop {
            match self.run_session().await {
                Ok(()) => {
                    info!("Stream closed normally, reconnecting");
                }
                Err(e) => match self.config.restart_policy {
                    RestartPolicy::ExitProcess => {
                        error!(error = %e, "Connection closed unexpectedly");
                        return Err(e.into());
                    }
                    RestartPolicy::Reconnect => {
                        let delay = self.config.reconnect_delay();
                        warn!(
                            error = %e,
                            delay_ms = delay.as_millis() as u64,
                            "Connection lost, reconnecting"
                        );
                        tokio::time::sleep(delay).await;
                    }
                },
            }
        }
    }

    async fn run_session(&mut self) -> Result<(), SessionError> {
        let mut session = self.connector.connect().await?;
        self.sessions += 1;

        let result = session.run(&mut self.handler).await;

        let stats = self.handler.stats();
        info!(
            session = self.sessions,
            state = ?session.state(),
            messages = stats.messages,
            snapshots = stats.snapshots,
            decode_failures = stats.decode_failures,
            skipped = stats.instruments_skipped,
            orders_sent = stats.orders_sent,
            send_failures = stats.send_failures,
            "Session ended"
        );

        result.map(|_| ())
    }
}
