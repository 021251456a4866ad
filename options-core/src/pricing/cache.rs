use rust_decimal::Decimal;
use std::collections::HashMap;

/// Last known close price per underlying symbol
///
/// Single-writer: only the market data handler mutates it. A new close
/// always overwrites the previous one, with no staleness check.
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    prices: HashMap<String, Decimal>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cached price for `symbol`, replacing any previous value
    pub fn update(&mut self, symbol: impl Into<String>, price: Decimal) {
        self.prices.insert(symbol.into(), price);
    }

    /// Cached price for `symbol`, if one has been observed
    #[inline]
    pub fn lookup(&self, symbol: &str) -> Option<Decimal> {
        self.prices.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
