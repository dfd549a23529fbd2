use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use bookshop_api::app::{build_app_with_services, services::AppServices};
use bookshop_infra::InMemoryCatalogStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, fresh in-memory store, ephemeral port.
        let services = Arc::new(AppServices::new(Arc::new(InMemoryCatalogStore::new())));
        let app = build_app_with_services(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_author(client: &reqwest::Client, base_url: &str, name: &str) -> String {
    let res = client
        .post(format!("{}/authors", base_url))
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn create_book(
    client: &reqwest::Client,
    base_url: &str,
    title: &str,
    author_id: &str,
    stock: i64,
) -> String {
    let res = client
        .post(format!("{}/books", base_url))
        .json(&json!({ "title": title, "author_id": author_id, "stock": stock }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn get_stock(client: &reqwest::Client, base_url: &str, book_id: &str) -> i64 {
    let res = client
        .get(format!("{}/books/{}", base_url, book_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    body["stock"].as_i64().unwrap()
}

#[tokio::test]
async fn health_endpoint_responds_ok() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn submit_order_decrements_and_persists_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let author_id = create_author(&client, &srv.base_url, "Emily Brontë").await;
    let book_id = create_book(&client, &srv.base_url, "Wuthering Heights", &author_id, 10).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({ "book_id": book_id, "quantity": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["stock"].as_i64().unwrap(), 7);
    assert_eq!(body["book_id"].as_str().unwrap(), book_id);

    assert_eq!(get_stock(&client, &srv.base_url, &book_id).await, 7);
}

#[tokio::test]
async fn order_for_unknown_book_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({ "book_id": uuid::Uuid::now_v7().to_string(), "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "not_found");
}

#[tokio::test]
async fn non_positive_quantity_is_rejected_without_touching_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let author_id = create_author(&client, &srv.base_url, "Charlotte Brontë").await;
    let book_id = create_book(&client, &srv.base_url, "Jane Eyre", &author_id, 11).await;

    for quantity in [0, -4] {
        let res = client
            .post(format!("{}/orders", srv.base_url))
            .json(&json!({ "book_id": book_id, "quantity": quantity }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"].as_str().unwrap(), "invalid_quantity");
    }

    assert_eq!(get_stock(&client, &srv.base_url, &book_id).await, 11);
}

#[tokio::test]
async fn over_order_is_unprocessable_and_stock_is_unchanged() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let author_id = create_author(&client, &srv.base_url, "Richard Carpenter").await;
    let book_id = create_book(&client, &srv.base_url, "Catweazle", &author_id, 5).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({ "book_id": book_id, "quantity": 6 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "insufficient_stock");

    assert_eq!(get_stock(&client, &srv.base_url, &book_id).await, 5);
}

#[tokio::test]
async fn resubmitting_an_order_decrements_twice() {
    // No idempotency keys: the same payload applies again.
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let author_id = create_author(&client, &srv.base_url, "Edgar Allen Poe").await;
    let book_id = create_book(&client, &srv.base_url, "Eleonora", &author_id, 10).await;

    let payload = json!({ "book_id": book_id, "quantity": 4 });

    let first: serde_json::Value = client
        .post(format!("{}/orders", srv.base_url))
        .json(&payload)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["stock"].as_i64().unwrap(), 6);

    let second: serde_json::Value = client
        .post(format!("{}/orders", srv.base_url))
        .json(&payload)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["stock"].as_i64().unwrap(), 2);
}

#[tokio::test]
async fn concurrent_orders_for_the_last_units_cannot_both_succeed() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let author_id = create_author(&client, &srv.base_url, "Edgar Allen Poe").await;
    let book_id = create_book(&client, &srv.base_url, "The Raven", &author_id, 8).await;

    let submit = |client: reqwest::Client, base_url: String, book_id: String| async move {
        client
            .post(format!("{}/orders", base_url))
            .json(&json!({ "book_id": book_id, "quantity": 5 }))
            .send()
            .await
            .unwrap()
            .status()
    };

    let (a, b) = tokio::join!(
        submit(client.clone(), srv.base_url.clone(), book_id.clone()),
        submit(client.clone(), srv.base_url.clone(), book_id.clone()),
    );

    let statuses = [a, b];
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::CREATED)
            .count(),
        1,
        "exactly one submission should succeed, got {statuses:?}"
    );
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::UNPROCESSABLE_ENTITY)
            .count(),
        1,
        "the loser should fail on insufficient stock, got {statuses:?}"
    );

    assert_eq!(get_stock(&client, &srv.base_url, &book_id).await, 3);
}

#[tokio::test]
async fn book_creation_validates_title_and_author() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let author_id = create_author(&client, &srv.base_url, "Emily Brontë").await;

    let res = client
        .post(format!("{}/books", srv.base_url))
        .json(&json!({ "title": "   ", "author_id": author_id, "stock": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/books", srv.base_url))
        .json(&json!({
            "title": "Orphaned",
            "author_id": uuid::Uuid::now_v7().to_string(),
            "stock": 3
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn author_books_listing_returns_only_their_titles() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let poe = create_author(&client, &srv.base_url, "Edgar Allen Poe").await;
    let bronte = create_author(&client, &srv.base_url, "Emily Brontë").await;

    create_book(&client, &srv.base_url, "The Raven", &poe, 333).await;
    create_book(&client, &srv.base_url, "Eleonora", &poe, 555).await;
    create_book(&client, &srv.base_url, "Wuthering Heights", &bronte, 12).await;

    let res = client
        .get(format!("{}/authors/{}/books", srv.base_url, poe))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Eleonora", "The Raven"]);
}

#[tokio::test]
async fn deleted_book_is_gone_and_orders_against_it_fail() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let author_id = create_author(&client, &srv.base_url, "Richard Carpenter").await;
    let book_id = create_book(&client, &srv.base_url, "Catweazle", &author_id, 22).await;

    let res = client
        .delete(format!("{}/books/{}", srv.base_url, book_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({ "book_id": book_id, "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
