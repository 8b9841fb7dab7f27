use std::sync::Arc;

use url::Url;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::database::{Database, DatabaseSetupError};
use crate::search_index::{HttpSearchIndex, SearchIndex};

/// Main service state - owns the database handle and the catalog engine.
#[derive(Clone)]
pub struct State {
    database: Database,
    catalog: Catalog,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => Url::parse(&format!("sqlite://{}", path.display()))
                .map_err(|_| StateSetupError::InvalidDatabaseUrl),
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("database URL: {}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        let search_index: Option<Arc<dyn SearchIndex>> = config
            .search_index_url
            .clone()
            .map(|url| Arc::new(HttpSearchIndex::new(url)) as Arc<dyn SearchIndex>);
        if search_index.is_none() {
            tracing::info!("no search index configured, notifications disabled");
        }

        let catalog = Catalog::new(database.clone(), search_index);

        Ok(Self { database, catalog })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Readiness probe: the service is up when the database answers.
    pub async fn is_ready(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&**self.database())
            .await
            .is_ok()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("sqlite path could not be expressed as a database URL")]
    InvalidDatabaseUrl,

    #[error("failed to set up the database: {0}")]
    DatabaseSetup(#[from] DatabaseSetupError),
}
