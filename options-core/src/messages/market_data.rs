//! Inbound market data messages
//!
//! Only the fields the buyer reads are modelled; everything else in the
//! exchange payload is ignored by serde.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::num::ParseIntError;

use crate::value_objects::{is_option_instrument, strip_sigil};

/// Envelope for every frame the exchange pushes
///
/// Dispatch is on the `type` tag. Unknown tags decode to `Unknown` and are
/// dropped by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    MarketDataUpdate(MarketDataUpdate),
    #[serde(other)]
    Unknown,
}

impl InboundMessage {
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// One market data snapshot
///
/// Candle series and book bodies are kept as raw JSON and decoded one symbol
/// or one book at a time, so a mis-shaped entry only costs that entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketDataUpdate {
    #[serde(default)]
    pub candles: CandleSet,
    /// Book bodies keyed by instrument id, in wire order
    #[serde(default)]
    pub orderbook_depths: IndexMap<String, Value>,
}

impl MarketDataUpdate {
    /// Latest close per underlying, sigil stripped
    ///
    /// Symbols whose series is empty, not a list, or whose last candle has no
    /// usable `close` are omitted.
    pub fn underlying_closes(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.candles
            .untradeable
            .iter()
            .filter_map(|(symbol, series)| Some((strip_sigil(symbol), last_close(series)?)))
    }

    /// Option books in wire order, each decoded independently
    ///
    /// Books whose id carries no option marker are never decoded.
    pub fn option_books(
        &self,
    ) -> impl Iterator<Item = (&str, Result<OrderBookDepth, serde_json::Error>)> + '_ {
        self.orderbook_depths
            .iter()
            .filter(|(instrument, _)| is_option_instrument(instrument))
            .map(|(instrument, body)| (instrument.as_str(), OrderBookDepth::from_value(body)))
    }
}

fn last_close(series: &Value) -> Option<Decimal> {
    let last = series.as_array()?.last()?;
    Candle::deserialize(last).ok()?.close
}

/// Candle groups; only the untradeable (underlying) series is read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandleSet {
    #[serde(default)]
    pub untradeable: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candle {
    #[serde(default)]
    pub close: Option<Decimal>,
}

/// Depth for one instrument
///
/// Ask levels are keyed by integer price strings; the values (sizes) are not
/// interpreted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderBookDepth {
    #[serde(default)]
    pub asks: Option<IndexMap<String, Value>>,
}

impl OrderBookDepth {
    pub fn from_value(body: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(body)
    }

    pub fn has_asks(&self) -> bool {
        self.asks.as_ref().is_some_and(|asks| !asks.is_empty())
    }

    /// Lowest ask level
    ///
    /// `Ok(None)` when there are no asks. Any non-integer level key fails the
    /// whole book, since the minimum can no longer be trusted.
    pub fn best_ask(&self) -> Result<Option<i64>, ParseIntError> {
        let Some(asks) = self.asks.as_ref() else {
            return Ok(None);
        };

        let mut best: Option<i64> = None;
        for level in asks.keys() {
            let price: i64 = level.trim().parse()?;
            best = Some(best.map_or(price, |b| b.min(price)));
        }
        Ok(best)
    }
}
