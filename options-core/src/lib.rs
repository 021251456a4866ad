//! Options Core
//!
//! Domain types for the underpriced option buyer:
//! - **Value objects**: `OptionKind`, `InstrumentDescriptor`, `Side`
//! - **Pricing**: `PriceCache`, `PricingEngine`, `Decision`
//! - **Messages**: inbound market data decode, outbound order rendering
//!
//! Nothing in this crate performs I/O. The agent crate owns the connection
//! and feeds decoded snapshots through these types.

pub mod messages;
pub mod pricing;
pub mod value_objects;

// Re-export value objects at crate root for convenience
pub use value_objects::{
    INSTRUMENT_SIGIL, InstrumentDescriptor, InstrumentError, OptionKind, Side,
    is_option_instrument, parse_instrument, strip_sigil,
};

// Re-export pricing at crate root
pub use pricing::{Decision, PriceCache, PricingEngine, SkipReason};

// Re-export messages at crate root
pub use messages::{
    Candle, CandleSet, EXPIRY_SENTINEL, InboundMessage, MarketDataUpdate, ORDER_QUANTITY,
    OrderBookDepth, OrderRequest, OrderRequestBuilder, REQUEST_ID_WIDTH,
};
