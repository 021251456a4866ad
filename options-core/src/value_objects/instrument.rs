//! Option instrument identifiers
//!
//! The exchange names option books `$<SYMBOL>_<kind>_<strike>_<expiry>`,
//! e.g. `$ABC_call_90_99999999`. Underlyings are keyed by the same symbol
//! without the kind/strike/expiry suffix.

use std::fmt;
use thiserror::Error;

/// Leading sigil the exchange puts in front of every instrument name
pub const INSTRUMENT_SIGIL: char = '$';

/// Option kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    /// Match the exact wire token (case-sensitive)
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "call" => Some(OptionKind::Call),
            "put" => Some(OptionKind::Put),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            OptionKind::Call => "call",
            OptionKind::Put => "put",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons an identifier cannot be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstrumentError {
    #[error("expected 4 underscore-delimited segments, found {0}")]
    SegmentCount(usize),
    #[error("strike is not an integer: {0:?}")]
    InvalidStrike(String),
    #[error("expiry is not an integer: {0:?}")]
    InvalidExpiry(String),
}

/// Decoded option instrument name
///
/// `kind` is `None` when the second segment is neither `call` nor `put`.
/// Such descriptors still parse; the pricing engine declines to price them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstrumentDescriptor {
    /// Underlying symbol, sigil stripped, case preserved
    pub underlying: String,
    pub kind: Option<OptionKind>,
    /// Raw kind token as received
    pub kind_token: String,
    pub strike: i64,
    /// Parsed for validation only, not used in pricing
    pub expiry: i64,
}

/// Parse a wire instrument identifier into its four components
pub fn parse_instrument(raw: &str) -> Result<InstrumentDescriptor, InstrumentError> {
    let body = raw.strip_prefix(INSTRUMENT_SIGIL).unwrap_or(raw);

    let segments: Vec<&str> = body.split('_').collect();
    let [underlying, kind_token, strike, expiry] = segments.as_slice() else {
        return Err(InstrumentError::SegmentCount(segments.len()));
    };

    let strike: i64 = strike
        .parse()
        .map_err(|_| InstrumentError::InvalidStrike((*strike).to_string()))?;
    let expiry: i64 = expiry
        .parse()
        .map_err(|_| InstrumentError::InvalidExpiry((*expiry).to_string()))?;

    Ok(InstrumentDescriptor {
        underlying: (*underlying).to_string(),
        kind: OptionKind::from_token(kind_token),
        kind_token: (*kind_token).to_string(),
        strike,
        expiry,
    })
}

/// Cheap pre-filter: does this book name look like an option at all?
#[inline]
pub fn is_option_instrument(raw: &str) -> bool {
    raw.contains("call") || raw.contains("put")
}

/// Strip the instrument sigil from an underlying symbol key
#[inline]
pub fn strip_sigil(raw: &str) -> &str {
    raw.strip_prefix(INSTRUMENT_SIGIL).unwrap_or(raw)
}
