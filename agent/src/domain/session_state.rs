/// Lifecycle of one stream session
///
/// Connecting -> Connected -> ClosedNormal | ClosedAbnormal. There is no
/// transition out of a closed state; reconnecting means a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Handshake in progress
    Connecting,
    /// Receiving market data
    Connected,
    /// Peer sent a normal or going-away close frame
    ClosedNormal,
    /// Transport error, error close code, or stream ended without a close frame
    ClosedAbnormal,
}

impl SessionState {
    pub fn is_open(&self) -> bool {
        matches!(self, SessionState::Connected)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, SessionState::ClosedNormal | SessionState::ClosedAbnormal)
    }
}
