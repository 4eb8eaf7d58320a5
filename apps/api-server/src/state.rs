//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ContentService;
use quill_core::ports::{CategoryRepository, PostRepository};
use quill_infra::database::{InMemoryStore, PostgresCategoryRepository, PostgresPostRepository};
use quill_infra::{DatabaseConfig, connect};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentService>,
}

impl AppState {
    /// Build the application state with appropriate repository implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        let (posts, categories) = match db_config {
            Some(config) => match connect(config).await {
                Ok(conn) => {
                    let posts: Arc<dyn PostRepository> =
                        Arc::new(PostgresPostRepository::new(conn.clone()));
                    let categories: Arc<dyn CategoryRepository> =
                        Arc::new(PostgresCategoryRepository::new(conn));
                    (posts, categories)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    in_memory_repositories()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                in_memory_repositories()
            }
        };

        tracing::info!("Application state initialized");

        Self {
            content: Arc::new(ContentService::new(posts, categories)),
        }
    }

    /// In-memory state for tests.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        let (posts, categories) = in_memory_repositories();
        Self {
            content: Arc::new(ContentService::new(posts, categories)),
        }
    }
}

fn in_memory_repositories() -> (Arc<dyn PostRepository>, Arc<dyn CategoryRepository>) {
    let store = InMemoryStore::new();
    let (posts, categories) = store.repositories();
    (Arc::new(posts), Arc::new(categories))
}
