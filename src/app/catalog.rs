//! In-memory demo catalog.
//!
//! A process-lifetime list of free-form items with no persistence and no
//! relation to the relational entities. Kept deliberately behind this one
//! type: demo-only, not a storage engine. Concurrent writers are
//! serialized by the lock but the id-generation read-modify-write is only
//! atomic within a single call.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tokio::sync::RwLock;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogItem {
    /// Monotonic decimal string, generated as max(numeric ids) + 1.
    pub id: String,
    pub name: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCatalogItem {
    pub name: String,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,
}

#[derive(Default)]
pub struct CatalogStore {
    items: RwLock<Vec<CatalogItem>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the stock demo items (ids "1" through "13").
    pub fn with_seed_items() -> Self {
        Self {
            items: RwLock::new(seed_items()),
        }
    }

    pub async fn list(&self) -> Vec<CatalogItem> {
        self.items.read().await.clone()
    }

    pub async fn list_by_ids(&self, ids: &[String]) -> Vec<CatalogItem> {
        self.items
            .read()
            .await
            .iter()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<CatalogItem> {
        self.items.read().await.iter().find(|item| item.id == id).cloned()
    }

    /// Appends with a generated id: max numeric existing id + 1, or "1"
    /// when no numeric ids exist.
    pub async fn add(&self, req: CreateCatalogItem) -> CatalogItem {
        let mut items = self.items.write().await;
        let next_id = items
            .iter()
            .filter_map(|item| item.id.parse::<u64>().ok())
            .max()
            .map(|max| max + 1)
            .unwrap_or(1);
        let item = CatalogItem {
            id: next_id.to_string(),
            name: req.name,
            data: req.data,
        };
        items.push(item.clone());
        item
    }

    /// Returns whether an item was removed.
    pub async fn remove(&self, id: &str) -> bool {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        items.len() < before
    }
}

fn seed_items() -> Vec<CatalogItem> {
    let raw = json!([
        {"id": "1", "name": "Google Pixel 6 Pro",
         "data": {"color": "Cloudy White", "capacity": "128 GB"}},
        {"id": "2", "name": "Apple iPhone 12 Mini, 256GB, Blue", "data": null},
        {"id": "3", "name": "Apple iPhone 12 Pro Max",
         "data": {"color": "Cloudy White", "capacity GB": 512}},
        {"id": "4", "name": "Apple iPhone 11, 64GB",
         "data": {"price": 389.99, "color": "Purple"}},
        {"id": "5", "name": "Samsung Galaxy Z Fold2",
         "data": {"price": 689.99, "color": "Brown"}},
        {"id": "6", "name": "Apple AirPods",
         "data": {"generation": "3rd", "price": 120}},
        {"id": "7", "name": "Apple MacBook Pro 16",
         "data": {"year": 2019, "price": 1849.99, "CPU model": "Intel Core i9",
                  "Hard disk size": "1 TB"}},
        {"id": "8", "name": "Apple Watch Series 8",
         "data": {"Strap Colour": "Elderberry", "Case Size": "41mm"}},
        {"id": "9", "name": "Beats Studio3 Wireless",
         "data": {"Color": "Red",
                  "Description": "High-performance wireless noise cancelling headphones"}},
        {"id": "10", "name": "Apple iPad Mini 5th Gen",
         "data": {"Capacity": "64 GB", "Screen size": 7.9}},
        {"id": "11", "name": "Apple iPad Mini 5th Gen",
         "data": {"Capacity": "254 GB", "Screen size": 7.9}},
        {"id": "12", "name": "Apple iPad Air",
         "data": {"Generation": "4th", "Price": "419.99", "Capacity": "64 GB"}},
        {"id": "13", "name": "Apple iPad Air",
         "data": {"Generation": "4th", "Price": "519.99", "Capacity": "256 GB"}}
    ]);
    serde_json::from_value(raw).unwrap_or_default()
}
