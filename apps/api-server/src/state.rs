//! Application state - shared across all handlers.

use std::sync::Arc;

use murmur_core::ports::{PostRepository, UserRepository};
use murmur_infra::database::{DatabaseConfig, DatabaseConnections};
use murmur_infra::database::{InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
use murmur_infra::database::{PostgresPostRepository, PostgresUserRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        if let Some(config) = db_config {
            match DatabaseConnections::init(config).await {
                Ok(connections) => {
                    let conn = Arc::new(connections);
                    tracing::info!("Application state initialized (postgres)");
                    return Self {
                        users: Arc::new(PostgresUserRepository::new(conn.main.clone())),
                        posts: Arc::new(PostgresPostRepository::new(conn.main.clone())),
                        db: Some(conn),
                    };
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
        }

        #[cfg(not(feature = "postgres"))]
        {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory repositories");
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory()
    }

    /// State backed purely by the in-memory store. Data does not survive a
    /// restart.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            db: None,
        }
    }
}
