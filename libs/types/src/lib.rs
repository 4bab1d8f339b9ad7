//! Core domain types for the matching engine
//!
//! Prices are signed integer tick counts, quantities are unsigned
//! integers, order ids are caller-supplied `u64`s. All public types are
//! serde-serializable for embedding in wire protocols or journals.

pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
