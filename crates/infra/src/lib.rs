//! Infrastructure: catalog storage backends, request context, seed data.

pub mod context;
pub mod seed;
pub mod store;

pub use context::RequestContext;
pub use store::{CatalogStore, InMemoryCatalogStore, PostgresCatalogStore};
