use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use bookshop_catalog::{Author, Book};
use bookshop_core::{AuthorId, BookId, DomainError, DomainResult};

use crate::context::RequestContext;

use super::CatalogStore;

/// In-memory catalog store for dev/test.
///
/// The stock CAS runs entirely inside the write lock, so version checks and
/// the subsequent write are a single atomic unit. No lock is held across an
/// await point.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    books: RwLock<HashMap<BookId, Book>>,
    authors: RwLock<HashMap<AuthorId, Author>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl core::fmt::Debug) -> DomainError {
    DomainError::storage("catalog store lock poisoned")
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn get_book(&self, _ctx: &RequestContext, id: BookId) -> DomainResult<Book> {
        let books = self.books.read().map_err(poisoned)?;
        books.get(&id).cloned().ok_or(DomainError::NotFound)
    }

    async fn update_stock(
        &self,
        _ctx: &RequestContext,
        id: BookId,
        new_stock: i64,
        expected_version: u64,
    ) -> DomainResult<Book> {
        let mut books = self.books.write().map_err(poisoned)?;
        let book = books.get(&id).ok_or(DomainError::NotFound)?;

        if book.version() != expected_version {
            return Err(DomainError::conflict(format!(
                "stale version for book {id}: expected {expected_version}, actual {}",
                book.version()
            )));
        }

        let updated = book.with_stock(new_stock, expected_version + 1);
        books.insert(id, updated.clone());
        Ok(updated)
    }

    async fn insert_book(&self, _ctx: &RequestContext, book: Book) -> DomainResult<()> {
        {
            let authors = self.authors.read().map_err(poisoned)?;
            if !authors.contains_key(&book.author_id()) {
                return Err(DomainError::NotFound);
            }
        }

        let mut books = self.books.write().map_err(poisoned)?;
        let id = book.id_typed();
        if books.contains_key(&id) {
            return Err(DomainError::conflict(format!("book {id} already exists")));
        }
        books.insert(id, book);
        Ok(())
    }

    async fn list_books(&self, _ctx: &RequestContext) -> DomainResult<Vec<Book>> {
        let books = self.books.read().map_err(poisoned)?;
        let mut all: Vec<Book> = books.values().cloned().collect();
        all.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(all)
    }

    async fn delete_book(&self, _ctx: &RequestContext, id: BookId) -> DomainResult<()> {
        let mut books = self.books.write().map_err(poisoned)?;
        books.remove(&id).map(|_| ()).ok_or(DomainError::NotFound)
    }

    async fn get_author(&self, _ctx: &RequestContext, id: AuthorId) -> DomainResult<Author> {
        let authors = self.authors.read().map_err(poisoned)?;
        authors.get(&id).cloned().ok_or(DomainError::NotFound)
    }

    async fn insert_author(&self, _ctx: &RequestContext, author: Author) -> DomainResult<()> {
        let mut authors = self.authors.write().map_err(poisoned)?;
        let id = author.id_typed();
        if authors.contains_key(&id) {
            return Err(DomainError::conflict(format!("author {id} already exists")));
        }
        authors.insert(id, author);
        Ok(())
    }

    async fn list_authors(&self, _ctx: &RequestContext) -> DomainResult<Vec<Author>> {
        let authors = self.authors.read().map_err(poisoned)?;
        let mut all: Vec<Author> = authors.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(all)
    }

    async fn books_by_author(
        &self,
        _ctx: &RequestContext,
        author_id: AuthorId,
    ) -> DomainResult<Vec<Book>> {
        {
            let authors = self.authors.read().map_err(poisoned)?;
            if !authors.contains_key(&author_id) {
                return Err(DomainError::NotFound);
            }
        }

        let books = self.books.read().map_err(poisoned)?;
        let mut matched: Vec<Book> = books
            .values()
            .filter(|b| b.author_id() == author_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(matched)
    }
}
