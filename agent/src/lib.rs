//! Option Buyer Agent
//!
//! Streams market data from the exchange and buys any option whose
//! discounted intrinsic value strictly exceeds its best ask.
//!
//! Follows the same layering as the rest of the workspace:
//! - **Config**: JSON file plus CLI overrides
//! - **Domain**: session lifecycle, order sink abstraction
//! - **Application**: per-message handler, connection supervisor
//! - **Infrastructure**: WebSocket connector and stream session
//!
//! ```text
//!  exchange ──ws──▶ StreamSession ──frame──▶ MarketDataHandler
//!      ▲                                     │  PriceCache
//!      │                                     │  PricingEngine
//!      └──────────── add_order ◀─────────────┘  OrderRequestBuilder
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{
    BookSkip, HandlerStats, MarketDataHandler, MessageOutcome, Supervisor, SupervisorError,
};
pub use cli::Cli;
pub use config::{AgentConfig, ConfigError, DEFAULT_URI, RestartPolicy, load_config};
pub use domain::{OrderSink, SendError, SessionState};
pub use infrastructure::{SessionError, StreamSession, WsConnector};
