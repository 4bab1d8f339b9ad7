//! Matching logic
//!
//! The match loop runs while the best bid and best ask cross, filling the
//! two front orders by the smaller remaining quantity. Each trade records
//! both sides at their own resting prices; fully filled orders are popped
//! before the trade is recorded, and the level aggregates are adjusted per
//! side as the loop goes.

pub mod crossing;

use types::order::{OrderType, Side};
use types::trade::{Trade, TradeInfo};

use crate::book::{BookState, LevelAction};

/// Run the matching loop until the book no longer crosses, then cancel a
/// FillAndKill order left at the front of either best level.
pub(crate) fn match_orders(book: &mut BookState, executed_at: i64) -> Vec<Trade> {
    let mut trades = Vec::new();

    while let (Some(bid_price), Some(ask_price)) = (book.best_bid(), book.best_ask()) {
        if !crossing::crosses(bid_price, ask_price) {
            break;
        }

        // Trade the two front queues against each other until one of the
        // levels is exhausted; every step fully fills at least one side.
        loop {
            let Some(bid_key) = book.front(Side::Buy, bid_price) else {
                break;
            };
            let Some(ask_key) = book.front(Side::Sell, ask_price) else {
                break;
            };

            let quantity = book
                .order(bid_key)
                .remaining_quantity()
                .min(book.order(ask_key).remaining_quantity());
            book.order_mut(bid_key).fill(quantity);
            book.order_mut(ask_key).fill(quantity);

            let bid_filled = book.order(bid_key).is_filled();
            let ask_filled = book.order(ask_key).is_filled();
            let bid_info = TradeInfo::new(book.order(bid_key).id(), bid_price, quantity);
            let ask_info = TradeInfo::new(book.order(ask_key).id(), ask_price, quantity);

            if bid_filled {
                book.pop_front(Side::Buy, bid_price, bid_key);
            }
            if ask_filled {
                book.pop_front(Side::Sell, ask_price, ask_key);
            }

            trades.push(Trade::new(bid_info, ask_info, executed_at));

            let bid_action = if bid_filled { LevelAction::Remove } else { LevelAction::Match };
            let ask_action = if ask_filled { LevelAction::Remove } else { LevelAction::Match };
            book.update_level(bid_price, quantity, bid_action);
            book.update_level(ask_price, quantity, ask_action);
        }
    }

    cancel_front_fill_and_kill(book);
    trades
}

/// A FillAndKill order must not rest. Only the front order at each best
/// level is inspected; admission already rejects FillAndKill orders that
/// cannot cross, so a residual here is the partially filled remainder of
/// the order that just drove the match.
fn cancel_front_fill_and_kill(book: &mut BookState) {
    for side in [Side::Buy, Side::Sell] {
        let best = match side {
            Side::Buy => book.best_bid(),
            Side::Sell => book.best_ask(),
        };
        let Some(price) = best else { continue };
        let Some(key) = book.front(side, price) else { continue };
        if book.order(key).order_type() == OrderType::FillAndKill {
            let id = book.order(key).id();
            book.remove(id);
        }
    }
}
