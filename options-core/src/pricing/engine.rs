use rust_decimal::Decimal;
use std::fmt;

use super::cache::PriceCache;
use crate::value_objects::{InstrumentDescriptor, OptionKind};

/// Outcome of evaluating one option book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Lift the best ask
    Buy { price: i64 },
    Skip(SkipReason),
}

impl Decision {
    pub fn is_buy(&self) -> bool {
        matches!(self, Decision::Buy { .. })
    }
}

/// Why an option was not bought
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Kind token was neither `call` nor `put`
    UnknownKind,
    /// Underlying has no cached close yet
    NoSpotPrice,
    /// Theoretical value does not strictly exceed the ask
    NoEdge { theoretical: Decimal },
    /// Arithmetic left the decimal range
    Overflow,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownKind => write!(f, "unknown option kind"),
            SkipReason::NoSpotPrice => write!(f, "no spot price"),
            SkipReason::NoEdge { theoretical } => write!(f, "no edge (theo {})", theoretical),
            SkipReason::Overflow => write!(f, "decimal overflow"),
        }
    }
}

/// Discounted intrinsic-value pricer
///
/// theo = (spot - strike) * multiplier for calls,
/// theo = (strike - spot) * multiplier for puts.
/// Buys only when theo > best ask; equality is a skip.
#[derive(Debug, Clone, Copy)]
pub struct PricingEngine {
    multiplier: Decimal,
}

impl PricingEngine {
    pub fn new(multiplier: Decimal) -> Self {
        Self { multiplier }
    }

    pub fn multiplier(&self) -> Decimal {
        self.multiplier
    }

    /// Discounted intrinsic value, `None` on overflow
    pub fn theoretical_value(&self, kind: OptionKind, spot: Decimal, strike: i64) -> Option<Decimal> {
        let strike = Decimal::from(strike);
        let intrinsic = match kind {
            OptionKind::Call => spot.checked_sub(strike)?,
            OptionKind::Put => strike.checked_sub(spot)?,
        };
        intrinsic.checked_mul(self.multiplier)
    }

    /// Decide whether to buy `descriptor` at `best_ask`
    pub fn evaluate(
        &self,
        descriptor: &InstrumentDescriptor,
        best_ask: i64,
        cache: &PriceCache,
    ) -> Decision {
        let Some(kind) = descriptor.kind else {
            return Decision::Skip(SkipReason::UnknownKind);
        };
        let Some(spot) = cache.lookup(&descriptor.underlying) else {
            return Decision::Skip(SkipReason::NoSpotPrice);
        };
        let Some(theoretical) = self.theoretical_value(kind, spot, descriptor.strike) else {
            return Decision::Skip(SkipReason::Overflow);
        };

        if theoretical > Decimal::from(best_ask) {
            Decision::Buy { price: best_ask }
        } else {
            Decision::Skip(SkipReason::NoEdge { theoretical })
        }
    }
}
