//! Trade types
//!
//! A trade pairs the bid-side and ask-side fill of one matching step. Each
//! side is recorded at its own order's resting price; the two quantities
//! are always equal.

use crate::ids::{OrderId, TradeId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// One side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeInfo {
    pub order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
}

impl TradeInfo {
    pub fn new(order_id: OrderId, price: Price, quantity: Quantity) -> Self {
        Self {
            order_id,
            price,
            quantity,
        }
    }
}

/// An executed match between one resting and one incoming order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub bid: TradeInfo,
    pub ask: TradeInfo,
    /// Execution timestamp, unix microseconds from the injected clock.
    pub executed_at: i64,
}

impl Trade {
    /// Create a trade from its two sides.
    ///
    /// # Panics
    /// Panics if the side quantities differ; both sides of a match always
    /// decrement by the same amount.
    pub fn new(bid: TradeInfo, ask: TradeInfo, executed_at: i64) -> Self {
        assert!(
            bid.quantity == ask.quantity,
            "trade sides must carry equal quantities",
        );
        Self {
            id: TradeId::new(),
            bid,
            ask,
            executed_at,
        }
    }

    /// Quantity exchanged, identical on both sides.
    pub fn quantity(&self) -> Quantity {
        self.bid.quantity
    }
}
