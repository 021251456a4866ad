mod market_data_handler;
mod supervisor;

pub use market_data_handler::{BookSkip, HandlerStats, MarketDataHandler, MessageOutcome};
pub use supervisor::{Supervisor, SupervisorError};
