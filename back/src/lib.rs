mod error;
pub mod store;
mod tasks;

use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::AppError;
pub use store::TaskStore;

/// Builds the HTTP application over the given store.
pub fn app(store: Arc<TaskStore>) -> Router {
    tasks::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(store)
}
