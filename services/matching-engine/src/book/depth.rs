//! Aggregated depth view
//!
//! A snapshot row per price level, bids highest first and asks lowest
//! first. Quantities come from the book's level aggregates, so taking a
//! snapshot is linear in the number of levels.

use serde::{Deserialize, Serialize};
use types::numeric::{Price, Quantity};

/// Aggregate resting quantity at one price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub price: Price,
    pub quantity: Quantity,
}

impl LevelInfo {
    pub fn new(price: Price, quantity: Quantity) -> Self {
        Self { price, quantity }
    }
}

/// Depth on both sides of the book at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepthSnapshot {
    /// Bid levels, highest price first.
    pub bids: Vec<LevelInfo>,
    /// Ask levels, lowest price first.
    pub asks: Vec<LevelInfo>,
}

impl DepthSnapshot {
    pub fn new(bids: Vec<LevelInfo>, asks: Vec<LevelInfo>) -> Self {
        Self { bids, asks }
    }

    pub fn best_bid(&self) -> Option<&LevelInfo> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&LevelInfo> {
        self.asks.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_levels() {
        let snapshot = DepthSnapshot::new(
            vec![
                LevelInfo::new(Price::new(100), Quantity::new(4)),
                LevelInfo::new(Price::new(99), Quantity::new(9)),
            ],
            vec![LevelInfo::new(Price::new(101), Quantity::new(2))],
        );

        assert_eq!(snapshot.best_bid().unwrap().price, Price::new(100));
        assert_eq!(snapshot.best_ask().unwrap().quantity, Quantity::new(2));
    }

    #[test]
    fn test_empty_sides() {
        let snapshot = DepthSnapshot::default();
        assert!(snapshot.best_bid().is_none());
        assert!(snapshot.best_ask().is_none());
    }

    #[test]
    fn test_serialization() {
        let snapshot = DepthSnapshot::new(
            vec![LevelInfo::new(Price::new(100), Quantity::new(4))],
            vec![],
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        let deserialized: DepthSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, deserialized);
    }
}
