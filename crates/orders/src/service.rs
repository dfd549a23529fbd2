use std::sync::Arc;

use bookshop_core::{DomainError, DomainResult};
use bookshop_infra::{CatalogStore, RequestContext};

use crate::order::{Order, OrderReceipt, validate_quantity};

/// Bounded retries for the stock compare-and-swap before surfacing `Conflict`.
const DEFAULT_MAX_RETRIES: u32 = 8;

/// The stock-adjustment operation: validate → lookup → decrement → persist.
///
/// Constructed with an injected store at startup; no global service state.
/// Submissions are **not idempotent** — resubmitting the same order
/// decrements again.
pub struct OrderService {
    store: Arc<dyn CatalogStore>,
    max_retries: u32,
}

impl OrderService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(store: Arc<dyn CatalogStore>, max_retries: u32) -> Self {
        Self { store, max_retries }
    }

    /// Submit an order, decrementing the book's stock.
    ///
    /// The lookup/persist span is atomic: the write is a compare-and-swap on
    /// the book's version, and a lost race re-runs lookup + decrement against
    /// fresh state. Two concurrent submissions can therefore never both apply
    /// against the same stock reading.
    pub async fn submit(&self, ctx: &RequestContext, order: Order) -> DomainResult<OrderReceipt> {
        validate_quantity(order.quantity)?;

        let mut attempt = 0;
        loop {
            let book = self.store.get_book(ctx, order.book_id).await?;
            let new_stock = book.decremented(order.quantity)?;

            match self
                .store
                .update_stock(ctx, order.book_id, new_stock, book.version())
                .await
            {
                Ok(updated) => {
                    tracing::info!(
                        request_id = %ctx.request_id(),
                        order_id = %order.order_id,
                        book_id = %order.book_id,
                        quantity = order.quantity,
                        stock = updated.stock(),
                        "order applied"
                    );
                    return Ok(OrderReceipt {
                        order_id: order.order_id,
                        book_id: order.book_id,
                        quantity: order.quantity,
                        stock: updated.stock(),
                    });
                }
                Err(DomainError::Conflict(reason)) => {
                    attempt += 1;
                    if attempt >= self.max_retries {
                        return Err(DomainError::conflict(reason));
                    }
                    tracing::debug!(
                        request_id = %ctx.request_id(),
                        book_id = %order.book_id,
                        attempt,
                        "stock CAS lost the race, retrying"
                    );
                }
                Err(other) => return Err(other),
            }
        }
    }
}
