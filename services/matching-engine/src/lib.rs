//! Matching Engine
//!
//! Price–time priority limit order book for a single instrument. Orders
//! are matched highest bid against lowest ask, FIFO within a price level;
//! FillAndKill, FillOrKill, and Market orders get their admission policies
//! applied before anything rests, and GoodForDay orders are cancelled by a
//! background sweeper when the session closes.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced
//! - The by-id index, per-price FIFOs, and level aggregates stay
//!   consistent under a single coarse lock
//! - The book never rests crossed
//! - Conservation of quantity: both sides of every trade decrement by the
//!   same amount

pub mod book;
pub mod clock;
pub mod engine;
pub mod matching;
pub mod sweeper;

pub use book::{DepthSnapshot, LevelInfo};
pub use engine::Orderbook;
pub use sweeper::SweeperConfig;
