//! Catalog storage abstraction.
//!
//! The `CatalogStore` is the sole component permitted to read/write persisted
//! book and author records. Two backends: in-memory (dev/test) and Postgres.

use async_trait::async_trait;

use bookshop_catalog::{Author, Book};
use bookshop_core::{AuthorId, BookId, DomainResult};

use crate::context::RequestContext;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;

/// Persisted catalog records: lookup, maintenance, and the stock CAS.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch a book by id; `NotFound` when absent.
    async fn get_book(&self, ctx: &RequestContext, id: BookId) -> DomainResult<Book>;

    /// Persist a new stock level, compare-and-swap on the version token.
    ///
    /// Succeeds only when the stored version equals `expected_version`, in
    /// which case the version is bumped and the updated book returned.
    /// `Conflict` on a stale token, `NotFound` when the book vanished
    /// (race with a concurrent delete).
    async fn update_stock(
        &self,
        ctx: &RequestContext,
        id: BookId,
        new_stock: i64,
        expected_version: u64,
    ) -> DomainResult<Book>;

    /// Insert a freshly validated book; `Conflict` when the id is taken,
    /// `NotFound` when the referenced author does not exist.
    async fn insert_book(&self, ctx: &RequestContext, book: Book) -> DomainResult<()>;

    async fn list_books(&self, ctx: &RequestContext) -> DomainResult<Vec<Book>>;

    async fn delete_book(&self, ctx: &RequestContext, id: BookId) -> DomainResult<()>;

    async fn get_author(&self, ctx: &RequestContext, id: AuthorId) -> DomainResult<Author>;

    /// Insert an author; `Conflict` when the id is taken.
    async fn insert_author(&self, ctx: &RequestContext, author: Author) -> DomainResult<()>;

    async fn list_authors(&self, ctx: &RequestContext) -> DomainResult<Vec<Author>>;

    /// All books referencing `author_id`; empty when the author has none.
    /// `NotFound` when the author itself does not exist.
    async fn books_by_author(
        &self,
        ctx: &RequestContext,
        author_id: AuthorId,
    ) -> DomainResult<Vec<Book>>;
}
