use serde::Deserialize;

use bookshop_catalog::{Author, Book};
use bookshop_orders::OrderReceipt;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SubmitOrderRequest {
    pub book_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author_id: String,
    pub stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateAuthorRequest {
    pub name: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn book_to_json(book: &Book) -> serde_json::Value {
    serde_json::json!({
        "id": book.id_typed().to_string(),
        "title": book.title(),
        "author_id": book.author_id().to_string(),
        "stock": book.stock(),
    })
}

pub fn author_to_json(author: &Author) -> serde_json::Value {
    serde_json::json!({
        "id": author.id_typed().to_string(),
        "name": author.name(),
    })
}

pub fn receipt_to_json(receipt: &OrderReceipt) -> serde_json::Value {
    serde_json::json!({
        "order_id": receipt.order_id.to_string(),
        "book_id": receipt.book_id.to_string(),
        "quantity": receipt.quantity,
        "stock": receipt.stock,
    })
}
