//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod agents;
mod connection;
mod converters;
mod engagement;
mod reviews;
mod users;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::{AgentHubError, Result};

pub use agents::AgentCounts;
pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use users::UserCounts;

/// Infer the database backend from the connection URL
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(AgentHubError::database_config(format!(
            "Cannot infer database backend from URL: {}. Supported URL formats: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// Normalize backend aliases
pub fn normalize_backend_name(backend: &str) -> String {
    match backend {
        "mariadb" => "mysql".to_string(),
        other => other.to_string(),
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct HubStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl HubStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(AgentHubError::database_config(
                "database_url is not set".to_string(),
            ));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        let storage = HubStorage {
            db,
            backend_name: backend_name.to_string(),
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// Direct database handle (for health checks and tests)
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
