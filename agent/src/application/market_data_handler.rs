use rust_decimal::Decimal;
use std::num::ParseIntError;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use options_core::{
    Decision, InboundMessage, InstrumentError, MarketDataUpdate, OrderBookDepth,
    OrderRequestBuilder, PriceCache, PricingEngine, Side, SkipReason, parse_instrument,
};

use crate::domain::OrderSink;

/// Counters for one handler, carried across reconnects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerStats {
    /// Frames handed to the handler
    pub messages: u64,
    /// Frames that failed to decode
    pub decode_failures: u64,
    /// Decoded frames of a type we do not handle
    pub ignored: u64,
    /// Market data snapshots processed
    pub snapshots: u64,
    /// Option books passed over
    pub instruments_skipped: u64,
    pub orders_sent: u64,
    pub send_failures: u64,
}

/// Result of handling one inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    DecodeFailed,
    Ignored,
    Processed { orders: usize },
}

/// Why an option book was not bought
#[derive(Error, Debug)]
pub enum BookSkip {
    #[error("no asks")]
    NoAsks,
    #[error("malformed book: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("bad instrument id: {0}")]
    Instrument(#[from] InstrumentError),
    #[error("invalid ask level: {0}")]
    InvalidAskLevel(#[from] ParseIntError),
    #[error("unknown option kind {0:?}")]
    UnknownKind(String),
    #[error("{0}")]
    Priced(SkipReason),
}

/// Per-message decision pipeline
///
/// Owns the price cache, pricing engine and request-id counter. Every frame
/// goes through `handle_text`, which never fails: decode and per-book errors
/// are logged and counted, then the next frame is processed.
///
/// Within one snapshot all underlying closes are cached before any option
/// book is priced.
pub struct MarketDataHandler {
    cache: PriceCache,
    engine: PricingEngine,
    orders: OrderRequestBuilder,
    stats: HandlerStats,
}

impl MarketDataHandler {
    pub fn new(multiplier: Decimal) -> Self {
        MarketDataHandler {
            cache: PriceCache::new(),
            engine: PricingEngine::new(multiplier),
            orders: OrderRequestBuilder::new(),
            stats: HandlerStats::default(),
        }
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    pub fn stats(&self) -> HandlerStats {
        self.stats
    }

    /// Request ids handed out so far
    pub fn orders_issued(&self) -> u64 {
        self.orders.issued()
    }

    /// Decode one frame and act on it
    pub async fn handle_text<S>(&mut self, text: &str, sink: &mut S) -> MessageOutcome
    where
        S: OrderSink + ?Sized,
    {
        self.stats.messages += 1;

        match InboundMessage::decode(text) {
            Ok(InboundMessage::MarketDataUpdate(update)) => {
                let orders = self.handle_update(&update, sink).await;
                MessageOutcome::Processed { orders }
            }
            Ok(InboundMessage::Unknown) => {
                self.stats.ignored += 1;
                trace!("Ignoring non market data message");
                MessageOutcome::Ignored
            }
            Err(e) => {
                self.stats.decode_failures += 1;
                warn!(error = %e, "Error processing message");
                MessageOutcome::DecodeFailed
            }
        }
    }

    /// Decode a binary frame as UTF-8 text and handle it like a text frame
    pub async fn handle_binary<S>(&mut self, bytes: &[u8], sink: &mut S) -> MessageOutcome
    where
        S: OrderSink + ?Sized,
    {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.handle_text(text, sink).await,
            Err(e) => {
                self.stats.messages += 1;
                self.stats.decode_failures += 1;
                warn!(error = %e, "Error processing message: binary frame is not UTF-8");
                MessageOutcome::DecodeFailed
            }
        }
    }

    /// Apply one snapshot: cache closes, then price every option book
    ///
    /// Returns the number of orders written to `sink`.
    pub async fn handle_update<S>(&mut self, update: &MarketDataUpdate, sink: &mut S) -> usize
    where
        S: OrderSink + ?Sized,
    {
        self.stats.snapshots += 1;

        for (symbol, close) in update.underlying_closes() {
            self.cache.update(symbol, close);
        }

        let mut sent = 0;
        for (instrument, book) in update.option_books() {
            let priced = book
                .map_err(BookSkip::from)
                .and_then(|book| self.evaluate_book(instrument, &book));

            let price = match priced {
                Ok(price) => price,
                Err(skip) => {
                    self.stats.instruments_skipped += 1;
                    debug!(instrument = %instrument, reason = %skip, "Skipping option");
                    continue;
                }
            };

            let order = self.orders.place(instrument, price, Side::Bid);
            info!(
                instrument = %instrument,
                price,
                request_id = %order.request_id,
                "Edge found, buying"
            );

            match sink.send_order(order.to_string()).await {
                Ok(()) => {
                    self.stats.orders_sent += 1;
                    sent += 1;
                }
                Err(e) => {
                    self.stats.send_failures += 1;
                    warn!(
                        instrument = %instrument,
                        request_id = %order.request_id,
                        error = %e,
                        "Failed to send order"
                    );
                }
            }
        }

        sent
    }

    /// Price to lift for this book, or why it is skipped
    pub fn evaluate_book(&self, instrument: &str, book: &OrderBookDepth) -> Result<i64, BookSkip> {
        if !book.has_asks() {
            return Err(BookSkip::NoAsks);
        }

        let descriptor = parse_instrument(instrument)?;
        let best_ask = book.best_ask()?.ok_or(BookSkip::NoAsks)?;

        match self.engine.evaluate(&descriptor, best_ask, &self.cache) {
            Decision::Buy { price } => Ok(price),
            Decision::Skip(SkipReason::UnknownKind) => {
                Err(BookSkip::UnknownKind(descriptor.kind_token))
            }
            Decision::Skip(reason) => Err(BookSkip::Priced(reason)),
        }
    }
}
