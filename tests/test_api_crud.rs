//! Full CRUD pass over the relational API against a live Postgres.
//!
//! Requires DATABASE_URL; the test is skipped when it is not set so the
//! suite stays runnable on machines without a database.

use dealership_api::storage::schema;
use dealership_api::{create_router, AppState, CatalogStore};
use serde_json::{json, Value as JsonValue};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

async fn spawn_server(pool: PgPool) -> anyhow::Result<String> {
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

async fn clean_tables(pool: &PgPool) -> anyhow::Result<()> {
    // Children first so the FK constraints stay happy.
    for table in ["sales", "people", "cars", "countries"] {
        sqlx::query(&format!("DELETE FROM {table}")).execute(pool).await?;
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_crud_lifecycle() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping test_crud_lifecycle");
        return Ok(());
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    schema::create_tables(&pool).await?;
    clean_tables(&pool).await?;

    let base_url = spawn_server(pool).await?;
    let client = reqwest::Client::new();

    // --- countries -------------------------------------------------------

    let resp = client
        .post(format!("{base_url}/countries"))
        .json(&json!({ "name": "Chile" }))
        .send()
        .await?;
    assert_eq!(resp.status(), 201);
    let chile: JsonValue = resp.json().await?;
    let chile_id = chile["id"].as_i64().unwrap();

    // Unique name, second insert must be rejected.
    let resp = client
        .post(format!("{base_url}/countries"))
        .json(&json!({ "name": "Chile" }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{base_url}/countries"))
        .json(&json!({ "name": "Argentina" }))
        .send()
        .await?;
    assert_eq!(resp.status(), 201);

    // Blank name fails validation.
    let resp = client
        .post(format!("{base_url}/countries"))
        .json(&json!({ "name": "   " }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    let countries: Vec<JsonValue> = client
        .get(format!("{base_url}/countries"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(countries.len(), 2);

    // Pagination bounds.
    let page: Vec<JsonValue> = client
        .get(format!("{base_url}/countries?skip=1&limit=1"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(page.len(), 1);
    let resp = client
        .get(format!("{base_url}/countries?limit=0"))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    // Case-insensitive substring search.
    let found: Vec<JsonValue> = client
        .get(format!("{base_url}/countries/search?name=chi"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "Chile");

    // Terms under two characters are rejected.
    let resp = client
        .get(format!("{base_url}/countries/search?name=c"))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    // --- people ----------------------------------------------------------

    // Referencing a country that does not exist is rejected up front.
    let resp = client
        .post(format!("{base_url}/people"))
        .json(&json!({
            "first_name": "Ada", "last_name": "Lovelace",
            "age": 36, "country_id": 999_999_999
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{base_url}/people"))
        .json(&json!({
            "first_name": "Ada", "last_name": "Lovelace",
            "age": 36, "country_id": chile_id
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 201);
    let ada: JsonValue = resp.json().await?;
    let ada_id = ada["id"].as_i64().unwrap();

    // Age outside [0, 150] fails validation.
    let resp = client
        .post(format!("{base_url}/people"))
        .json(&json!({ "first_name": "Old", "last_name": "Timer", "age": 151 }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    // Partial update touches only the supplied field.
    let resp = client
        .put(format!("{base_url}/people/{ada_id}"))
        .json(&json!({ "age": 37 }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let updated: JsonValue = resp.json().await?;
    assert_eq!(updated["age"], 37);
    assert_eq!(updated["first_name"], "Ada");
    assert_eq!(updated["country_id"].as_i64(), Some(chile_id));

    // Empty update body returns the record unchanged.
    let resp = client
        .put(format!("{base_url}/people/{ada_id}"))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let unchanged: JsonValue = resp.json().await?;
    assert_eq!(unchanged, updated);

    // Explicit null is only legal for the nullable country link.
    let resp = client
        .put(format!("{base_url}/people/{ada_id}"))
        .json(&json!({ "first_name": null }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    // Expansion resolves the linked country.
    let with_country: JsonValue = client
        .get(format!("{base_url}/people/{ada_id}/with-country"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(with_country["first_name"], "Ada");
    assert_eq!(with_country["country"]["name"], "Chile");

    // The list variant expands every element.
    let expanded: Vec<JsonValue> = client
        .get(format!("{base_url}/people/with-country"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(expanded.len(), 1);
    assert_eq!(expanded[0]["country"]["name"], "Chile");

    // Search matches either name component.
    let found: Vec<JsonValue> = client
        .get(format!("{base_url}/people/search?name=love"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(found.len(), 1);

    // --- cars ------------------------------------------------------------

    let resp = client
        .post(format!("{base_url}/cars"))
        .json(&json!({
            "brand": "Toyota", "model": "Corolla",
            "year": 2020, "chassis_number": "CHS-0001"
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 201);
    let corolla: JsonValue = resp.json().await?;
    let corolla_id = corolla["id"].as_i64().unwrap();

    // Duplicate chassis number is rejected.
    let resp = client
        .post(format!("{base_url}/cars"))
        .json(&json!({
            "brand": "Honda", "model": "Civic",
            "year": 2021, "chassis_number": "CHS-0001"
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    // Year outside [1900, 2025] fails validation.
    let resp = client
        .post(format!("{base_url}/cars"))
        .json(&json!({
            "brand": "Ford", "model": "T",
            "year": 1899, "chassis_number": "CHS-0002"
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    let by_chassis: JsonValue = client
        .get(format!("{base_url}/cars/chassis/CHS-0001"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(by_chassis["id"].as_i64(), Some(corolla_id));
    let resp = client
        .get(format!("{base_url}/cars/chassis/NOPE"))
        .send()
        .await?;
    assert_eq!(resp.status(), 404);

    let found: Vec<JsonValue> = client
        .get(format!("{base_url}/cars/search?brand=toy&model=rolla"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(found.len(), 1);

    // Updating a car to a chassis number another car holds is rejected;
    // re-asserting its own chassis is not a collision.
    let resp = client
        .post(format!("{base_url}/cars"))
        .json(&json!({
            "brand": "Honda", "model": "Civic",
            "year": 2021, "chassis_number": "CHS-0002"
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 201);
    let civic: JsonValue = resp.json().await?;
    let civic_id = civic["id"].as_i64().unwrap();

    let resp = client
        .put(format!("{base_url}/cars/{civic_id}"))
        .json(&json!({ "chassis_number": "CHS-0001" }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    let resp = client
        .put(format!("{base_url}/cars/{corolla_id}"))
        .json(&json!({ "chassis_number": "CHS-0001" }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);

    let resp = client.delete(format!("{base_url}/cars/{civic_id}")).send().await?;
    assert_eq!(resp.status(), 204);

    // --- sales -----------------------------------------------------------

    // A sale must point at an existing car.
    let resp = client
        .post(format!("{base_url}/sales"))
        .json(&json!({
            "buyer_name": "Grace Hopper", "price": 15000.0,
            "car_id": 999_999_999
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{base_url}/sales"))
        .json(&json!({
            "buyer_name": "Grace Hopper", "price": 15000.0,
            "car_id": corolla_id
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 201);
    let sale: JsonValue = resp.json().await?;
    let sale_id = sale["id"].as_i64().unwrap();
    // sale_date defaulted by the database.
    assert!(sale["sale_date"].is_string());

    // Zero or negative prices fail validation.
    let resp = client
        .post(format!("{base_url}/sales"))
        .json(&json!({ "buyer_name": "X", "price": 0.0, "car_id": corolla_id }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    let by_car: Vec<JsonValue> = client
        .get(format!("{base_url}/sales/car/{corolla_id}"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(by_car.len(), 1);

    let by_buyer: Vec<JsonValue> = client
        .get(format!("{base_url}/sales/buyer/hopper"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(by_buyer.len(), 1);

    let with_car: JsonValue = client
        .get(format!("{base_url}/sales/{sale_id}/with-car"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(with_car["car"]["brand"], "Toyota");

    let car_with_sales: JsonValue = client
        .get(format!("{base_url}/cars/{corolla_id}/with-sales"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(car_with_sales["sales"].as_array().unwrap().len(), 1);

    let found: Vec<JsonValue> = client
        .get(format!("{base_url}/sales/search?buyer=grace&price_min=10000&price_max=20000"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(found.len(), 1);

    // Date bounds are inclusive: a window around the defaulted sale_date
    // matches, a window entirely before or after it does not.
    let found: Vec<JsonValue> = client
        .get(format!("{base_url}/sales/search"))
        .query(&[("date_from", "2000-01-01T00:00:00Z")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(found.len(), 1);
    let found: Vec<JsonValue> = client
        .get(format!("{base_url}/sales/search"))
        .query(&[("date_from", "2999-01-01T00:00:00Z")])
        .send()
        .await?
        .json()
        .await?;
    assert!(found.is_empty());
    let found: Vec<JsonValue> = client
        .get(format!("{base_url}/sales/search"))
        .query(&[("date_to", "2999-01-01T00:00:00Z")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(found.len(), 1);
    let found: Vec<JsonValue> = client
        .get(format!("{base_url}/sales/search"))
        .query(&[("date_to", "2000-01-01T00:00:00Z")])
        .send()
        .await?
        .json()
        .await?;
    assert!(found.is_empty());

    // A car with recorded sales cannot be deleted; the constraint
    // violation is reported without driver internals.
    let resp = client
        .delete(format!("{base_url}/cars/{corolla_id}"))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);
    let body: JsonValue = resp.json().await?;
    assert_eq!(body["error"], "record is still referenced by other records");

    // --- deletions -------------------------------------------------------

    // Deleting the country detaches Ada instead of deleting her.
    let resp = client
        .delete(format!("{base_url}/countries/{chile_id}"))
        .send()
        .await?;
    assert_eq!(resp.status(), 204);
    let with_country: JsonValue = client
        .get(format!("{base_url}/people/{ada_id}/with-country"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(with_country["first_name"], "Ada");
    assert!(with_country["country"].is_null());
    let expanded: Vec<JsonValue> = client
        .get(format!("{base_url}/people/with-country"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(expanded.len(), 1);
    assert!(expanded[0]["country"].is_null());

    // Delete is not idempotent: the second call is a 404.
    let resp = client.delete(format!("{base_url}/sales/{sale_id}")).send().await?;
    assert_eq!(resp.status(), 204);
    let resp = client.delete(format!("{base_url}/sales/{sale_id}")).send().await?;
    assert_eq!(resp.status(), 404);

    // With its sale gone the car can go too.
    let resp = client
        .delete(format!("{base_url}/cars/{corolla_id}"))
        .send()
        .await?;
    assert_eq!(resp.status(), 204);

    let resp = client.get(format!("{base_url}/people/999999")).send().await?;
    assert_eq!(resp.status(), 404);

    // Health check rides the same pool.
    let resp = client.get(format!("{base_url}/health")).send().await?;
    assert_eq!(resp.status(), 200);

    Ok(())
}
