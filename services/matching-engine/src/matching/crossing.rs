//! Crossing predicates
//!
//! A bid and an ask can trade when the bid price is at or above the ask
//! price. These are the only price comparisons the match loop and the
//! admission checks perform.

use types::numeric::Price;
use types::order::Side;

/// Whether a bid at `bid` can trade against an ask at `ask`.
pub fn crosses(bid: Price, ask: Price) -> bool {
    bid >= ask
}

/// Whether an incoming order crosses a resting order's price.
pub fn taker_crosses(taker_side: Side, taker: Price, maker: Price) -> bool {
    match taker_side {
        Side::Buy => taker >= maker,
        Side::Sell => taker <= maker,
    }
}
