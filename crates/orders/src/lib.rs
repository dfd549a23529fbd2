//! Order submission: quantity validation and the stock-adjustment operation.
//!
//! Orders are transient. A submission decrements the ordered book's stock
//! through the catalog store's compare-and-swap and is discarded afterwards;
//! nothing about the order itself is persisted.

pub mod order;
pub mod service;

pub use order::{Order, OrderReceipt, validate_quantity};
pub use service::OrderService;
