use std::sync::Arc;

use tavern_db::Database;
use tokio::task;
use tracing::error;

use crate::error::ApiError;
use crate::generate::Generator;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub generator: Arc<dyn Generator>,
}

impl AppStateInner {
    pub fn new(db: Database, generator: Arc<dyn Generator>) -> AppState {
        Arc::new(Self { db, generator })
    }
}

/// Run a store call off the async runtime.
pub async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> tavern_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal("Background task failed".into())
        })?
        .map_err(ApiError::from)
}
