use std::sync::Arc;

use crate::store::CancellationStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres in deployment, in-memory when no `DATABASE_URL` is set.
    pub store: Arc<dyn CancellationStore>,
}
