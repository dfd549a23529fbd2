//! Catalog domain module.
//!
//! This crate contains business rules for books and authors, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod author;
pub mod book;

pub use author::Author;
pub use book::Book;
