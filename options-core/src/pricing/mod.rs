//! Intrinsic-value pricing
//!
//! `PriceCache` holds the last close per underlying; `PricingEngine` turns a
//! parsed option plus its best ask into a buy/skip decision.

mod cache;
mod engine;

pub use cache::PriceCache;
pub use engine::{Decision, PricingEngine, SkipReason};
