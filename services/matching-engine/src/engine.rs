//! Engine handle
//!
//! `Orderbook` is the single public entry point: submissions,
//! cancellations, modifications, and depth queries all run to completion
//! under one coarse mutex over the whole book state, so every operation
//! sees the four substructures consistent and trades are returned before
//! any later operation observes the post-match book. The good-for-day
//! sweeper thread is spawned at construction and joined on shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info};

use types::ids::OrderId;
use types::order::{Order, OrderModify, OrderType, Side};
use types::trade::Trade;

use crate::book::{BookState, DepthSnapshot};
use crate::clock::{SystemClock, TimeSource};
use crate::matching;
use crate::sweeper::{self, SweeperConfig};

/// State shared between the engine handle and the sweeper thread.
pub(crate) struct Shared {
    book: Mutex<BookState>,
    shutdown: AtomicBool,
    pub(crate) shutdown_cv: Condvar,
    pub(crate) clock: Arc<dyn TimeSource>,
    pub(crate) config: SweeperConfig,
}

impl Shared {
    pub(crate) fn book(&self) -> MutexGuard<'_, BookState> {
        self.book.lock().expect("book mutex poisoned")
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Bulk-cancel path: one lock acquisition, each id idempotent. Used by
    /// both the public bulk cancel and the sweeper.
    pub(crate) fn cancel_ids(&self, ids: &[OrderId]) {
        let mut book = self.book();
        for &id in ids {
            if book.remove(id).is_some() {
                debug!(order_id = %id, "order cancelled");
            }
        }
    }
}

/// Price–time priority limit order book for a single instrument.
pub struct Orderbook {
    shared: Arc<Shared>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl Orderbook {
    /// Create an engine on the system clock with the default end-of-day
    /// rule (16:00 local).
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock), SweeperConfig::default())
    }

    /// Create an engine on an injected time source and sweeper
    /// configuration.
    pub fn with_clock(clock: Arc<dyn TimeSource>, config: SweeperConfig) -> Self {
        let shared = Arc::new(Shared {
            book: Mutex::new(BookState::new()),
            shutdown: AtomicBool::new(false),
            shutdown_cv: Condvar::new(),
            clock,
            config,
        });

        let sweeper = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("gfd-sweeper".into())
                .spawn(move || sweeper::run(&shared))
                .expect("failed to spawn gfd sweeper thread")
        };

        info!(session_close = %shared.config.session_close, "orderbook engine started");
        Self {
            shared,
            sweeper: Mutex::new(Some(sweeper)),
        }
    }

    /// Submit an order. Returns the trades produced by matching it, which
    /// may be empty: duplicate ids, FillAndKill orders with nothing to
    /// cross, FillOrKill orders that cannot fully fill, and market orders
    /// against an empty opposite side are all silently rejected.
    pub fn add_order(&self, order: Order) -> Vec<Trade> {
        let executed_at = self.now_micros();
        let mut book = self.shared.book();
        Self::add_locked(&mut book, order, executed_at)
    }

    /// Cancel a resting order. Unknown ids are a no-op.
    pub fn cancel_order(&self, id: OrderId) {
        let mut book = self.shared.book();
        if book.remove(id).is_some() {
            debug!(order_id = %id, "order cancelled");
        }
    }

    /// Cancel a batch of orders atomically with respect to other
    /// operations.
    pub fn cancel_orders(&self, ids: &[OrderId]) {
        self.shared.cancel_ids(ids);
    }

    /// Replace an existing order's price, side, or quantity. The original
    /// order's type is preserved, but its time priority is forfeited.
    /// A modify for an unknown id returns no trades and changes nothing.
    pub fn modify_order(&self, modify: OrderModify) -> Vec<Trade> {
        let executed_at = self.now_micros();
        let mut book = self.shared.book();

        let Some(order_type) = book.order_type_of(modify.id) else {
            debug!(order_id = %modify.id, "ignoring modify for unknown order");
            return Vec::new();
        };
        book.remove(modify.id);
        Self::add_locked(&mut book, modify.to_order(order_type), executed_at)
    }

    /// Number of resting orders.
    pub fn size(&self) -> usize {
        self.shared.book().len()
    }

    /// Aggregated depth per price level, bids highest first and asks
    /// lowest first.
    pub fn snapshot(&self) -> DepthSnapshot {
        self.shared.book().depth()
    }

    /// Stop the sweeper thread and wait for it to exit. Idempotent; book
    /// operations keep working afterwards.
    pub fn shutdown(&self) {
        {
            // Flip the flag and notify while holding the book mutex so the
            // sweeper cannot re-enter its wait between the store and the
            // notification.
            let _book = self.shared.book();
            self.shared.shutdown.store(true, Ordering::Release);
            self.shared.shutdown_cv.notify_all();
        }

        let handle = self
            .sweeper
            .lock()
            .expect("sweeper handle mutex poisoned")
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("gfd sweeper thread panicked");
            }
            info!("orderbook engine stopped");
        }
    }

    fn now_micros(&self) -> i64 {
        self.shared.clock.now().timestamp_micros()
    }

    fn add_locked(book: &mut BookState, mut order: Order, executed_at: i64) -> Vec<Trade> {
        if book.contains(order.id()) {
            debug!(order_id = %order.id(), "rejecting duplicate order id");
            return Vec::new();
        }

        match order.order_type() {
            OrderType::FillAndKill if !book.can_cross(order.side(), order.price()) => {
                debug!(order_id = %order.id(), "rejecting fill-and-kill with nothing to cross");
                return Vec::new();
            }
            OrderType::FillOrKill
                if !book.can_fully_fill(order.side(), order.price(), order.initial_quantity()) =>
            {
                debug!(order_id = %order.id(), "rejecting fill-or-kill that cannot fully fill");
                return Vec::new();
            }
            OrderType::Market => {
                let worst = match order.side() {
                    Side::Buy => book.worst_ask(),
                    Side::Sell => book.worst_bid(),
                };
                match worst {
                    Some(price) => order.to_good_till_cancel(price),
                    None => {
                        debug!(order_id = %order.id(), "rejecting market order against an empty side");
                        return Vec::new();
                    }
                }
            }
            _ => {}
        }

        debug!(
            order_id = %order.id(),
            side = ?order.side(),
            price = %order.price(),
            quantity = %order.remaining_quantity(),
            "order admitted"
        );
        book.insert(order);

        let trades = matching::match_orders(book, executed_at);
        if !trades.is_empty() {
            debug!(count = trades.len(), "matching emitted trades");
        }
        trades
    }
}

impl Default for Orderbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Orderbook {
    fn drop(&mut self) {
        self.shutdown();
    }
}
