//! Exchange wire messages
//!
//! - **Inbound**: `InboundMessage` envelope tagged on `type`; only
//!   `market_data_update` carries a payload we read.
//! - **Outbound**: `OrderRequest`, rendered from a fixed template rather than
//!   through a serializer.

mod market_data;
mod order;

pub use market_data::{Candle, CandleSet, InboundMessage, MarketDataUpdate, OrderBookDepth};
pub use order::{EXPIRY_SENTINEL, ORDER_QUANTITY, OrderRequest, OrderRequestBuilder, REQUEST_ID_WIDTH};
