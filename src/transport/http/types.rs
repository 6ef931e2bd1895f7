use crate::app::catalog::CatalogStore;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Storage gateway: each operation checks out its own pooled
    /// connection and releases it on completion.
    pub pool: PgPool,
    /// Demo-only, non-persistent catalog.
    pub catalog: Arc<CatalogStore>,
}
