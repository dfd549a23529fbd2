//! Demo catalog seeding for dev environments.

use chrono::Utc;

use bookshop_catalog::{Author, Book};
use bookshop_core::{AuthorId, BookId, DomainResult};

use crate::context::RequestContext;
use crate::store::CatalogStore;

/// Seed the classic demo catalog (idempotence not required: callers seed a
/// fresh store at startup only).
pub async fn demo_catalog(store: &dyn CatalogStore) -> DomainResult<()> {
    let ctx = RequestContext::new();
    let now = Utc::now();

    let entries: &[(&str, &[(&str, i64)])] = &[
        ("Emily Brontë", &[("Wuthering Heights", 12)]),
        ("Charlotte Brontë", &[("Jane Eyre", 11)]),
        ("Edgar Allen Poe", &[("The Raven", 333), ("Eleonora", 555)]),
        ("Richard Carpenter", &[("Catweazle", 22)]),
    ];

    for (name, titles) in entries {
        let author_id = AuthorId::new();
        store
            .insert_author(&ctx, Author::new(author_id, *name, now)?)
            .await?;

        for (title, stock) in *titles {
            store
                .insert_book(
                    &ctx,
                    Book::new(BookId::new(), *title, author_id, *stock, now)?,
                )
                .await?;
        }
    }

    tracing::info!("seeded demo catalog");
    Ok(())
}
