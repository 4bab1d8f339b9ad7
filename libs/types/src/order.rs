//! Order lifecycle types
//!
//! An order carries its initial and remaining quantity; filling decrements
//! the remainder, and a remainder of zero means the order is done. Market
//! orders are promoted to GoodTillCancel at admission time and never rest
//! under their original type.

use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// How long an order remains in force and how it may fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Rests until filled or explicitly cancelled.
    GoodTillCancel,
    /// Rests until the end-of-day sweep cancels it.
    GoodForDay,
    /// Match whatever is immediately available; cancel the remainder.
    FillAndKill,
    /// Match the entire quantity immediately or cancel the whole order.
    FillOrKill,
    /// No price limit; pegged to the worst opposite resting price on
    /// admission and handled as GoodTillCancel from then on.
    Market,
}

/// A single order with mutable remaining quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    side: Side,
    order_type: OrderType,
    price: Price,
    initial_quantity: Quantity,
    remaining_quantity: Quantity,
}

impl Order {
    /// Create a limit order of the given type.
    pub fn new(
        id: OrderId,
        side: Side,
        order_type: OrderType,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            id,
            side,
            order_type,
            price,
            initial_quantity: quantity,
            remaining_quantity: quantity,
        }
    }

    /// Create a market order. The price is meaningless until admission
    /// promotes the order to GoodTillCancel at a concrete level.
    pub fn market(id: OrderId, side: Side, quantity: Quantity) -> Self {
        Self::new(id, side, OrderType::Market, Price::ZERO, quantity)
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn initial_quantity(&self) -> Quantity {
        self.initial_quantity
    }

    pub fn remaining_quantity(&self) -> Quantity {
        self.remaining_quantity
    }

    pub fn filled_quantity(&self) -> Quantity {
        self.initial_quantity - self.remaining_quantity
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Decrement the remaining quantity by a fill.
    ///
    /// # Panics
    /// Panics if `quantity` exceeds the remaining quantity. The matching
    /// loop always fills at most `min(remaining)` of the two sides, so an
    /// overfill is a bug, not an input error.
    pub fn fill(&mut self, quantity: Quantity) {
        assert!(
            quantity <= self.remaining_quantity,
            "order ({}) cannot be filled for more than its remaining quantity",
            self.id,
        );
        self.remaining_quantity -= quantity;
    }

    /// Promote a market order to GoodTillCancel at the given price.
    ///
    /// # Panics
    /// Panics if the order is not a market order.
    pub fn to_good_till_cancel(&mut self, price: Price) {
        assert!(
            self.order_type == OrderType::Market,
            "order ({}) cannot be promoted to GoodTillCancel, as it is not a market order",
            self.id,
        );
        self.price = price;
        self.order_type = OrderType::GoodTillCancel;
    }
}

/// Request to replace an existing order's price, side, or quantity.
///
/// Applying a modify cancels the original and re-adds a fresh order under
/// the original's type, so the order forfeits its time priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderModify {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

impl OrderModify {
    pub fn new(id: OrderId, side: Side, price: Price, quantity: Quantity) -> Self {
        Self {
            id,
            side,
            price,
            quantity,
        }
    }

    /// Build the replacement order under the captured type.
    pub fn to_order(&self, order_type: OrderType) -> Order {
        Order::new(self.id, self.side, order_type, self.price, self.quantity)
    }
}
