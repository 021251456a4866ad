//! Infrastructure Layer - the exchange connection
//!
//! - WsConnector: opens the authenticated WebSocket
//! - StreamSession: drives one connection through the market data handler
//!
//! The order sink for a live session is the write half of the socket.

pub mod ws_session;

pub use ws_session::{SessionError, StreamSession, WsConnector};
