//! Book state
//!
//! Four substructures kept consistent under the engine's single lock:
//! the two price-ordered level maps, the by-id index into the order
//! arena, and the per-price aggregates. The aggregates duplicate what
//! the FIFOs hold so that fill feasibility checks and depth snapshots
//! cost O(levels) instead of O(orders).

use std::collections::{BTreeMap, HashMap};

use slab::Slab;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};

use super::depth::{DepthSnapshot, LevelInfo};
use super::price_level::{OrderNode, PriceLevel};
use crate::matching::crossing;

/// Aggregate resting quantity and order count at one price.
///
/// An entry exists iff its quantity is non-zero; one price rests on only
/// one side in a well-formed book, so a single map covers both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct LevelStats {
    pub(crate) quantity: Quantity,
    pub(crate) order_count: usize,
}

/// How a book mutation affects a level's aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LevelAction {
    /// New resting order: quantity and count both grow.
    Add,
    /// An order left the level entirely: quantity and count both shrink.
    Remove,
    /// Partial fill: quantity shrinks, the order stays.
    Match,
}

#[derive(Debug, Default)]
pub(crate) struct BookState {
    /// Bid levels; matching iterates highest price first.
    pub(crate) bids: BTreeMap<Price, PriceLevel>,
    /// Ask levels; matching iterates lowest price first.
    pub(crate) asks: BTreeMap<Price, PriceLevel>,
    /// All resting orders, keyed by the handle the index stores.
    arena: Slab<OrderNode>,
    /// OrderId -> arena key, for O(1) lookup and O(1) FIFO removal.
    index: HashMap<OrderId, usize>,
    /// Per-price aggregates over both sides.
    pub(crate) levels: BTreeMap<Price, LevelStats>,
}

impl BookState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of resting orders.
    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn contains(&self, id: OrderId) -> bool {
        self.index.contains_key(&id)
    }

    pub(crate) fn order_type_of(&self, id: OrderId) -> Option<OrderType> {
        self.index.get(&id).map(|&key| self.arena[key].order.order_type())
    }

    pub(crate) fn best_bid(&self) -> Option<Price> {
        self.bids.keys().next_back().copied()
    }

    pub(crate) fn best_ask(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    pub(crate) fn worst_bid(&self) -> Option<Price> {
        self.bids.keys().next().copied()
    }

    pub(crate) fn worst_ask(&self) -> Option<Price> {
        self.asks.keys().next_back().copied()
    }

    /// Append a resting order at the tail of its price level's FIFO and
    /// record it in the index and the level aggregates.
    pub(crate) fn insert(&mut self, order: Order) {
        let id = order.id();
        let side = order.side();
        let price = order.price();
        let quantity = order.remaining_quantity();

        let key = self.arena.insert(OrderNode::new(order));
        let book = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        book.entry(price).or_default().push_back(&mut self.arena, key);
        self.index.insert(id, key);
        self.update_level(price, quantity, LevelAction::Add);
    }

    /// Remove a resting order by id. Idempotent: an unknown id is a no-op
    /// returning `None`. Empty price levels and zeroed aggregates are
    /// erased.
    pub(crate) fn remove(&mut self, id: OrderId) -> Option<Order> {
        let key = self.index.remove(&id)?;
        let (side, price) = {
            let order = &self.arena[key].order;
            (order.side(), order.price())
        };

        let book = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let level = book.get_mut(&price).expect("resting order has no price level");
        level.unlink(&mut self.arena, key);
        if level.is_empty() {
            book.remove(&price);
        }

        let node = self.arena.remove(key);
        self.update_level(price, node.order.remaining_quantity(), LevelAction::Remove);
        Some(node.order)
    }

    /// Slab key of the front order at the given price, if the level exists.
    pub(crate) fn front(&self, side: Side, price: Price) -> Option<usize> {
        let book = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        book.get(&price).and_then(PriceLevel::front)
    }

    pub(crate) fn order(&self, key: usize) -> &Order {
        &self.arena[key].order
    }

    pub(crate) fn order_mut(&mut self, key: usize) -> &mut Order {
        &mut self.arena[key].order
    }

    /// Pop a fully filled front order out of its FIFO, the index, and the
    /// arena. Level aggregates are the caller's responsibility: the match
    /// loop accounts for fills with [`LevelAction`]s of its own.
    pub(crate) fn pop_front(&mut self, side: Side, price: Price, key: usize) -> Order {
        let book = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let level = book.get_mut(&price).expect("popping from a missing price level");
        debug_assert_eq!(level.front(), Some(key), "only the front order can be popped");
        level.unlink(&mut self.arena, key);
        if level.is_empty() {
            book.remove(&price);
        }

        let node = self.arena.remove(key);
        self.index.remove(&node.order.id());
        node.order
    }

    /// Apply one aggregate action at a price, erasing the entry when its
    /// quantity reaches zero.
    pub(crate) fn update_level(&mut self, price: Price, quantity: Quantity, action: LevelAction) {
        let stats = self.levels.entry(price).or_default();
        match action {
            LevelAction::Add => {
                stats.quantity += quantity;
                stats.order_count += 1;
            }
            LevelAction::Remove => {
                stats.quantity -= quantity;
                stats.order_count -= 1;
            }
            LevelAction::Match => {
                stats.quantity -= quantity;
            }
        }
        if stats.quantity.is_zero() {
            self.levels.remove(&price);
        }
    }

    /// Whether an incoming order at `price` could trade against the best
    /// opposite level right now.
    pub(crate) fn can_cross(&self, side: Side, price: Price) -> bool {
        let best = match side {
            Side::Buy => self.best_ask(),
            Side::Sell => self.best_bid(),
        };
        best.is_some_and(|maker| crossing::taker_crosses(side, price, maker))
    }

    /// Whether `quantity` can be fully satisfied by resting liquidity at
    /// prices between the best opposite level and `price`, inclusive.
    ///
    /// Scans the aggregates rather than the FIFOs, so the cost is bounded
    /// by the number of levels traversed.
    pub(crate) fn can_fully_fill(&self, side: Side, price: Price, quantity: Quantity) -> bool {
        if !self.can_cross(side, price) {
            return false;
        }
        let range = match side {
            Side::Buy => match self.best_ask() {
                Some(ask) => ask..=price,
                None => return false,
            },
            Side::Sell => match self.best_bid() {
                Some(bid) => price..=bid,
                None => return false,
            },
        };

        let mut needed = quantity;
        for stats in self.levels.range(range).map(|(_, stats)| stats) {
            if needed <= stats.quantity {
                return true;
            }
            needed -= stats.quantity;
        }
        false
    }

    /// Ids of all resting GoodForDay orders, for the end-of-day sweep.
    pub(crate) fn good_for_day_ids(&self) -> Vec<OrderId> {
        self.arena
            .iter()
            .filter(|(_, node)| node.order.order_type() == OrderType::GoodForDay)
            .map(|(_, node)| node.order.id())
            .collect()
    }

    /// Aggregated depth on both sides, read straight off the level stats.
    pub(crate) fn depth(&self) -> DepthSnapshot {
        let quantity_at = |price: &Price| {
            self.levels
                .get(price)
                .map(|stats| stats.quantity)
                .expect("resting price level has no aggregate entry")
        };
        let bids = self
            .bids
            .keys()
            .rev()
            .map(|price| LevelInfo::new(*price, quantity_at(price)))
            .collect();
        let asks = self
            .asks
            .keys()
            .map(|price| LevelInfo::new(*price, quantity_at(price)))
            .collect();
        DepthSnapshot::new(bids, asks)
    }
}

#[cfg(test)]
impl BookState {
    /// Walk all four substructures and assert their cross-invariants:
    /// index ↔ FIFO consistency, aggregate sums, and no crossed book.
    pub(crate) fn assert_invariants(&self) {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        for (side, book) in [(Side::Buy, &self.bids), (Side::Sell, &self.asks)] {
            for (price, level) in book {
                let mut quantity = Quantity::ZERO;
                let mut count = 0usize;
                for key in level.iter(&self.arena) {
                    let order = &self.arena[key].order;
                    assert_eq!(order.side(), side, "order linked on the wrong side");
                    assert_eq!(order.price(), *price, "order linked at the wrong price");
                    assert!(!order.is_filled(), "resting order must have quantity left");
                    assert_eq!(
                        self.index.get(&order.id()),
                        Some(&key),
                        "index must reference the linked node"
                    );
                    assert!(seen.insert(order.id()), "order linked more than once");
                    quantity += order.remaining_quantity();
                    count += 1;
                }
                assert!(count > 0, "empty price level must be erased");

                let stats = self.levels.get(price).expect("resting level without stats");
                assert_eq!(stats.quantity, quantity, "stats quantity out of sync");
                assert_eq!(stats.order_count, count, "stats order count out of sync");
            }
        }
        assert_eq!(seen.len(), self.index.len(), "dangling index entries");
        assert_eq!(self.arena.len(), self.index.len(), "dangling arena nodes");
        assert_eq!(
            self.levels.len(),
            self.bids.len() + self.asks.len(),
            "stats entries must match resting levels exactly"
        );

        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
            assert!(bid < ask, "book must not rest crossed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::OrderId;

    fn order(id: u64, side: Side, price: i64, qty: u64) -> Order {
        Order::new(
            OrderId::new(id),
            side,
            OrderType::GoodTillCancel,
            Price::new(price),
            Quantity::new(qty),
        )
    }

    #[test]
    fn test_insert_and_remove() {
        let mut book = BookState::new();
        book.insert(order(1, Side::Buy, 100, 10));
        book.assert_invariants();

        assert_eq!(book.len(), 1);
        assert_eq!(book.best_bid(), Some(Price::new(100)));
        assert_eq!(
            book.levels.get(&Price::new(100)),
            Some(&LevelStats {
                quantity: Quantity::new(10),
                order_count: 1,
            })
        );

        let removed = book.remove(OrderId::new(1)).unwrap();
        assert_eq!(removed.remaining_quantity(), Quantity::new(10));
        assert_eq!(book.len(), 0);
        assert!(book.levels.is_empty());
        book.assert_invariants();
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut book = BookState::new();
        book.insert(order(1, Side::Sell, 101, 5));

        assert!(book.remove(OrderId::new(99)).is_none());
        assert_eq!(book.len(), 1);
        book.assert_invariants();
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut book = BookState::new();
        book.insert(order(1, Side::Buy, 100, 10));

        assert!(book.remove(OrderId::new(1)).is_some());
        assert!(book.remove(OrderId::new(1)).is_none());
        assert_eq!(book.len(), 0);
        book.assert_invariants();
    }

    #[test]
    fn test_best_and_worst_prices() {
        let mut book = BookState::new();
        book.insert(order(1, Side::Buy, 99, 1));
        book.insert(order(2, Side::Buy, 100, 1));
        book.insert(order(3, Side::Sell, 101, 1));
        book.insert(order(4, Side::Sell, 105, 1));

        assert_eq!(book.best_bid(), Some(Price::new(100)));
        assert_eq!(book.worst_bid(), Some(Price::new(99)));
        assert_eq!(book.best_ask(), Some(Price::new(101)));
        assert_eq!(book.worst_ask(), Some(Price::new(105)));
        book.assert_invariants();
    }

    #[test]
    fn test_level_aggregates_accumulate() {
        let mut book = BookState::new();
        book.insert(order(1, Side::Buy, 100, 4));
        book.insert(order(2, Side::Buy, 100, 6));

        let stats = book.levels.get(&Price::new(100)).unwrap();
        assert_eq!(stats.quantity, Quantity::new(10));
        assert_eq!(stats.order_count, 2);

        book.remove(OrderId::new(1));
        let stats = book.levels.get(&Price::new(100)).unwrap();
        assert_eq!(stats.quantity, Quantity::new(6));
        assert_eq!(stats.order_count, 1);
        book.assert_invariants();
    }

    #[test]
    fn test_can_cross() {
        let mut book = BookState::new();
        assert!(!book.can_cross(Side::Buy, Price::new(100)));

        book.insert(order(1, Side::Sell, 101, 5));
        assert!(!book.can_cross(Side::Buy, Price::new(100)));
        assert!(book.can_cross(Side::Buy, Price::new(101)));
        assert!(book.can_cross(Side::Buy, Price::new(102)));

        book.insert(order(2, Side::Buy, 99, 5));
        assert!(book.can_cross(Side::Sell, Price::new(99)));
        assert!(!book.can_cross(Side::Sell, Price::new(100)));
    }

    #[test]
    fn test_can_fully_fill_across_levels() {
        let mut book = BookState::new();
        book.insert(order(1, Side::Sell, 100, 3));
        book.insert(order(2, Side::Sell, 101, 4));

        assert!(book.can_fully_fill(Side::Buy, Price::new(101), Quantity::new(7)));
        assert!(!book.can_fully_fill(Side::Buy, Price::new(101), Quantity::new(8)));
        // Limit below the second level: only the first level counts.
        assert!(book.can_fully_fill(Side::Buy, Price::new(100), Quantity::new(3)));
        assert!(!book.can_fully_fill(Side::Buy, Price::new(100), Quantity::new(4)));
        // No cross at all.
        assert!(!book.can_fully_fill(Side::Buy, Price::new(99), Quantity::new(1)));
    }

    #[test]
    fn test_can_fully_fill_sell_side() {
        let mut book = BookState::new();
        book.insert(order(1, Side::Buy, 100, 3));
        book.insert(order(2, Side::Buy, 99, 4));

        assert!(book.can_fully_fill(Side::Sell, Price::new(99), Quantity::new(7)));
        assert!(!book.can_fully_fill(Side::Sell, Price::new(99), Quantity::new(8)));
        assert!(book.can_fully_fill(Side::Sell, Price::new(100), Quantity::new(3)));
        assert!(!book.can_fully_fill(Side::Sell, Price::new(100), Quantity::new(4)));
    }

    #[test]
    fn test_good_for_day_collection() {
        let mut book = BookState::new();
        book.insert(order(1, Side::Buy, 100, 1));
        book.insert(Order::new(
            OrderId::new(2),
            Side::Buy,
            OrderType::GoodForDay,
            Price::new(99),
            Quantity::new(1),
        ));
        book.insert(Order::new(
            OrderId::new(3),
            Side::Sell,
            OrderType::GoodForDay,
            Price::new(105),
            Quantity::new(1),
        ));

        let mut ids = book.good_for_day_ids();
        ids.sort();
        assert_eq!(ids, vec![OrderId::new(2), OrderId::new(3)]);
    }

    #[test]
    fn test_depth_ordering() {
        let mut book = BookState::new();
        book.insert(order(1, Side::Buy, 99, 10));
        book.insert(order(2, Side::Buy, 100, 5));
        book.insert(order(3, Side::Sell, 101, 7));
        book.insert(order(4, Side::Sell, 102, 2));

        let depth = book.depth();
        assert_eq!(depth.bids[0], LevelInfo::new(Price::new(100), Quantity::new(5)));
        assert_eq!(depth.bids[1], LevelInfo::new(Price::new(99), Quantity::new(10)));
        assert_eq!(depth.asks[0], LevelInfo::new(Price::new(101), Quantity::new(7)));
        assert_eq!(depth.asks[1], LevelInfo::new(Price::new(102), Quantity::new(2)));
    }
}
