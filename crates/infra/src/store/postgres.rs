//! Postgres-backed catalog store.
//!
//! Every write includes the version token in the WHERE clause, so the stock
//! compare-and-swap happens inside a single UPDATE statement and needs no
//! explicit transaction.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use bookshop_catalog::{Author, Book};
use bookshop_core::{AuthorId, BookId, DomainError, DomainResult};

use crate::context::RequestContext;

use super::CatalogStore;

/// SQLSTATE codes we translate into domain errors.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the catalog tables when they don't exist yet (dev bootstrap;
    /// production deployments run migrations out of band).
    pub async fn ensure_schema(&self) -> DomainResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS authors (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id UUID PRIMARY KEY,
                title TEXT NOT NULL,
                author_id UUID NOT NULL REFERENCES authors (id),
                stock BIGINT NOT NULL CHECK (stock >= 0),
                version BIGINT NOT NULL DEFAULT 0,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }
}

fn storage_err(e: sqlx::Error) -> DomainError {
    DomainError::storage(e.to_string())
}

fn sqlstate(e: &sqlx::Error) -> Option<String> {
    e.as_database_error()
        .and_then(|d| d.code())
        .map(|c| c.to_string())
}

fn book_from_row(row: &PgRow) -> DomainResult<Book> {
    let id: uuid::Uuid = row.try_get("id").map_err(storage_err)?;
    let title: String = row.try_get("title").map_err(storage_err)?;
    let author_id: uuid::Uuid = row.try_get("author_id").map_err(storage_err)?;
    let stock: i64 = row.try_get("stock").map_err(storage_err)?;
    let version: i64 = row.try_get("version").map_err(storage_err)?;
    let created_at: chrono::DateTime<chrono::Utc> =
        row.try_get("created_at").map_err(storage_err)?;

    Ok(Book::from_stored(
        BookId::from_uuid(id),
        title,
        AuthorId::from_uuid(author_id),
        stock,
        version as u64,
        created_at,
    ))
}

fn author_from_row(row: &PgRow) -> DomainResult<Author> {
    let id: uuid::Uuid = row.try_get("id").map_err(storage_err)?;
    let name: String = row.try_get("name").map_err(storage_err)?;
    let created_at: chrono::DateTime<chrono::Utc> =
        row.try_get("created_at").map_err(storage_err)?;

    Author::new(AuthorId::from_uuid(id), name, created_at)
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn get_book(&self, _ctx: &RequestContext, id: BookId) -> DomainResult<Book> {
        let row = sqlx::query(
            "SELECT id, title, author_id, stock, version, created_at FROM books WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        match row {
            Some(row) => book_from_row(&row),
            None => Err(DomainError::NotFound),
        }
    }

    async fn update_stock(
        &self,
        ctx: &RequestContext,
        id: BookId,
        new_stock: i64,
        expected_version: u64,
    ) -> DomainResult<Book> {
        let row = sqlx::query(
            r#"
            UPDATE books
            SET stock = $1, version = version + 1
            WHERE id = $2 AND version = $3
            RETURNING id, title, author_id, stock, version, created_at
            "#,
        )
        .bind(new_stock)
        .bind(id.as_uuid())
        .bind(expected_version as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        if let Some(row) = row {
            return book_from_row(&row);
        }

        // Zero rows: either the token went stale or the book is gone.
        tracing::debug!(
            request_id = %ctx.request_id(),
            book_id = %id,
            expected_version,
            "stock CAS matched no row"
        );

        let exists = sqlx::query("SELECT 1 FROM books WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        if exists.is_some() {
            Err(DomainError::conflict(format!(
                "stale version for book {id}: expected {expected_version}"
            )))
        } else {
            Err(DomainError::NotFound)
        }
    }

    async fn insert_book(&self, _ctx: &RequestContext, book: Book) -> DomainResult<()> {
        let res = sqlx::query(
            r#"
            INSERT INTO books (id, title, author_id, stock, version, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(book.id_typed().as_uuid())
        .bind(book.title())
        .bind(book.author_id().as_uuid())
        .bind(book.stock())
        .bind(book.version() as i64)
        .bind(book.created_at())
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(()),
            Err(e) => match sqlstate(&e).as_deref() {
                Some(UNIQUE_VIOLATION) => Err(DomainError::conflict(format!(
                    "book {} already exists",
                    book.id_typed()
                ))),
                Some(FOREIGN_KEY_VIOLATION) => Err(DomainError::NotFound),
                _ => Err(storage_err(e)),
            },
        }
    }

    async fn list_books(&self, _ctx: &RequestContext) -> DomainResult<Vec<Book>> {
        let rows = sqlx::query(
            "SELECT id, title, author_id, stock, version, created_at FROM books ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter().map(book_from_row).collect()
    }

    async fn delete_book(&self, _ctx: &RequestContext, id: BookId) -> DomainResult<()> {
        let res = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        if res.rows_affected() == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    async fn get_author(&self, _ctx: &RequestContext, id: AuthorId) -> DomainResult<Author> {
        let row = sqlx::query("SELECT id, name, created_at FROM authors WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        match row {
            Some(row) => author_from_row(&row),
            None => Err(DomainError::NotFound),
        }
    }

    async fn insert_author(&self, _ctx: &RequestContext, author: Author) -> DomainResult<()> {
        let res = sqlx::query("INSERT INTO authors (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(author.id_typed().as_uuid())
            .bind(author.name())
            .bind(author.created_at())
            .execute(&self.pool)
            .await;

        match res {
            Ok(_) => Ok(()),
            Err(e) => match sqlstate(&e).as_deref() {
                Some(UNIQUE_VIOLATION) => Err(DomainError::conflict(format!(
                    "author {} already exists",
                    author.id_typed()
                ))),
                _ => Err(storage_err(e)),
            },
        }
    }

    async fn list_authors(&self, _ctx: &RequestContext) -> DomainResult<Vec<Author>> {
        let rows = sqlx::query("SELECT id, name, created_at FROM authors ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        rows.iter().map(author_from_row).collect()
    }

    async fn books_by_author(
        &self,
        ctx: &RequestContext,
        author_id: AuthorId,
    ) -> DomainResult<Vec<Book>> {
        // Distinguish "author unknown" from "author has no books".
        self.get_author(ctx, author_id).await?;

        let rows = sqlx::query(
            r#"
            SELECT id, title, author_id, stock, version, created_at
            FROM books WHERE author_id = $1 ORDER BY title
            "#,
        )
        .bind(author_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter().map(book_from_row).collect()
    }
}
