pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::catalog::CatalogStore;
pub use domain::error::ApiError;
pub use transport::http::{create_router, ApiDoc, AppState};
