use async_trait::async_trait;
use std::fmt;

/// Domain error for order submission
///
/// Transport implementations convert their own errors into this type so the
/// handler never sees infrastructure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendError(pub String);

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Send failed: {}", self.0)
    }
}

impl std::error::Error for SendError {}

/// Outbound path for rendered order commands
///
/// Implements Dependency Inversion - the market data handler writes orders
/// here without knowing which transport carries them.
#[async_trait]
pub trait OrderSink: Send {
    async fn send_order(&mut self, command: String) -> Result<(), SendError>;
}

/// In-memory sink, handy for replaying captured snapshots
#[async_trait]
impl OrderSink for Vec<String> {
    async fn send_order(&mut self, command: String) -> Result<(), SendError> {
        self.push(command);
        Ok(())
    }
}
