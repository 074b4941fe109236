use crate::core::config::DatabaseConfig;
use crate::features::files::models::File;
use crate::features::folders::models::Folder;
use crate::features::repositories::models::{MemberInfo, Repository};
use crate::modules::documents::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| sqlx::Error::Configuration("DATABASE_URL is not set".into()))?;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// One store per collection, shared by the feature services
#[derive(Clone)]
pub struct DocumentStores {
    pub repositories: Arc<dyn DocumentStore<Repository>>,
    pub members: Arc<dyn DocumentStore<MemberInfo>>,
    pub folders: Arc<dyn DocumentStore<Folder>>,
    pub files: Arc<dyn DocumentStore<File>>,
}

impl DocumentStores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            repositories: Arc::new(PgDocumentStore::<Repository>::new(pool.clone())),
            members: Arc::new(PgDocumentStore::<MemberInfo>::new(pool.clone())),
            folders: Arc::new(PgDocumentStore::<Folder>::new(pool.clone())),
            files: Arc::new(PgDocumentStore::<File>::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            repositories: Arc::new(MemoryDocumentStore::<Repository>::new()),
            members: Arc::new(MemoryDocumentStore::<MemberInfo>::new()),
            folders: Arc::new(MemoryDocumentStore::<Folder>::new()),
            files: Arc::new(MemoryDocumentStore::<File>::new()),
        }
    }
}
