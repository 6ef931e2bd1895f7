//! End-to-end test for the in-memory catalog demo.
//!
//! The catalog never touches Postgres, so the pool is created lazily and
//! no database needs to be running.

use dealership_api::{create_router, AppState, CatalogStore};
use serde_json::{json, Value as JsonValue};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

async fn spawn_server() -> anyhow::Result<String> {
    let pool = PgPoolOptions::new().connect_lazy("postgresql://localhost/unused")?;
    let app_state = AppState {
        pool,
        catalog: Arc::new(CatalogStore::with_seed_items()),
    };
    let router = create_router(app_state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://127.0.0.1:{port}"))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_catalog_lifecycle() -> anyhow::Result<()> {
    let base_url = spawn_server().await?;
    let client = reqwest::Client::new();

    // Seeded store holds the 13 stock items.
    let all: Vec<JsonValue> = client
        .get(format!("{base_url}/catalog"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(all.len(), 13);

    // Repeated id filter returns only the requested subset.
    let filtered: Vec<JsonValue> = client
        .get(format!("{base_url}/catalog?id=3&id=5&id=999"))
        .send()
        .await?
        .json()
        .await?;
    let ids: Vec<&str> = filtered.iter().filter_map(|o| o["id"].as_str()).collect();
    assert_eq!(ids, vec!["3", "5"]);

    // Single lookup: hit and miss.
    let resp = client.get(format!("{base_url}/catalog/2")).send().await?;
    assert_eq!(resp.status(), 200);
    let item: JsonValue = resp.json().await?;
    assert_eq!(item["name"], "Apple iPhone 12 Mini, 256GB, Blue");

    let resp = client.get(format!("{base_url}/catalog/999")).send().await?;
    assert_eq!(resp.status(), 404);

    // New item gets max numeric id + 1.
    let resp = client
        .post(format!("{base_url}/catalog"))
        .json(&json!({ "name": "Kindle Paperwhite", "data": { "capacity": "16 GB" } }))
        .send()
        .await?;
    assert_eq!(resp.status(), 201);
    let created: JsonValue = resp.json().await?;
    assert_eq!(created["id"], "14");
    assert_eq!(created["data"]["capacity"], "16 GB");

    // Delete is 204 once, 404 afterwards.
    let resp = client.delete(format!("{base_url}/catalog/14")).send().await?;
    assert_eq!(resp.status(), 204);
    let resp = client.delete(format!("{base_url}/catalog/14")).send().await?;
    assert_eq!(resp.status(), 404);

    Ok(())
}
