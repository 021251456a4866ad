//! Outbound order commands
//!
//! Orders are written straight into the wire template instead of going
//! through a serializer; the instrument id is the only free-form field and is
//! escaped only when it needs to be.

use serde_json::Value;
use std::fmt;

use crate::value_objects::Side;

/// Digits in a rendered `user_request_id`
pub const REQUEST_ID_WIDTH: usize = 10;

/// Expiry the exchange treats as good-till-cancel
pub const EXPIRY_SENTINEL: i64 = 99_999_999;

/// Every order is a single lot
pub const ORDER_QUANTITY: u32 = 1;

/// A single `add_order` command; `Display` renders the wire text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub request_id: String,
    pub instrument_id: String,
    pub price: i64,
    pub expiry: i64,
    pub side: Side,
    pub quantity: u32,
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"{{"type":"add_order","user_request_id":"{}","instrument_id":{},"price":{},"expiry":{},"side":"{}","quantity":{}}}"#,
            self.request_id,
            JsonStr(&self.instrument_id),
            self.price,
            self.expiry,
            self.side,
            self.quantity,
        )
    }
}

/// Quoted JSON string, escaped only if required
struct JsonStr<'a>(&'a str);

impl fmt::Display for JsonStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let needs_escape = self
            .0
            .chars()
            .any(|c| c == '"' || c == '\\' || c.is_control());

        if needs_escape {
            write!(f, "{}", Value::from(self.0))
        } else {
            write!(f, "\"{}\"", self.0)
        }
    }
}

/// Issues request ids and renders orders
///
/// Ids start at 1 and increase by one per call for the lifetime of the
/// builder. The builder is owned by the session handler, never shared.
#[derive(Debug, Default)]
pub struct OrderRequestBuilder {
    last_id: u64,
}

impl OrderRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next zero-padded request id
    pub fn next_request_id(&mut self) -> String {
        self.last_id += 1;
        format!("{:0width$}", self.last_id, width = REQUEST_ID_WIDTH)
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.last_id
    }

    /// One-lot order with the expiry sentinel
    pub fn build_order(
        &self,
        request_id: String,
        instrument_id: &str,
        price: i64,
        side: Side,
    ) -> OrderRequest {
        OrderRequest {
            request_id,
            instrument_id: instrument_id.to_string(),
            price,
            expiry: EXPIRY_SENTINEL,
            side,
            quantity: ORDER_QUANTITY,
        }
    }

    /// Assign the next id and build the order
    pub fn place(&mut self, instrument_id: &str, price: i64, side: Side) -> OrderRequest {
        let request_id = self.next_request_id();
        self.build_order(request_id, instrument_id, price, side)
    }
}
