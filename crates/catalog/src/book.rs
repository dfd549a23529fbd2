use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bookshop_core::{AuthorId, BookId, DomainError, DomainResult, Entity};

/// Catalog entry for a single title.
///
/// `stock` never goes negative; `version` is the optimistic-concurrency token
/// bumped by the store on every persisted write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    title: String,
    author_id: AuthorId,
    stock: i64,
    version: u64,
    created_at: DateTime<Utc>,
}

impl Book {
    /// Validate and construct a new book at version 0.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author_id: AuthorId,
        stock: i64,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if stock < 0 {
            return Err(DomainError::validation("initial stock cannot be negative"));
        }
        Ok(Self {
            id,
            title,
            author_id,
            stock,
            version: 0,
            created_at,
        })
    }

    /// Rehydrate from stored fields without re-running creation validation.
    pub fn from_stored(
        id: BookId,
        title: String,
        author_id: AuthorId,
        stock: i64,
        version: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            author_id,
            stock,
            version,
            created_at,
        }
    }

    pub fn id_typed(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author_id(&self) -> AuthorId {
        self.author_id
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Decide the post-decrement stock level for an order of `quantity` units.
    ///
    /// Pure decision logic: no state is mutated here. Persisting the returned
    /// value is the store's job (compare-and-swap on `version`).
    pub fn decremented(&self, quantity: i64) -> DomainResult<i64> {
        let new_stock = self.stock - quantity;
        if new_stock < 0 {
            return Err(DomainError::insufficient_stock(self.stock, quantity));
        }
        Ok(new_stock)
    }

    /// Copy of this book with updated stock and version (store-side helper).
    pub fn with_stock(&self, stock: i64, version: u64) -> Self {
        Self {
            stock,
            version,
            ..self.clone()
        }
    }
}

impl Entity for Book {
    type Id = BookId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
