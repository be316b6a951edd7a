use crate::service::ShortenerService;
use shortlink_core::{LinkRepository, Shortener, StorageError};
use shortlink_generator::RandomGenerator;
use shortlink_storage::{InMemoryRepository, MySqlRepository, StorageArgs, StorageBackend};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Builds the shared service over the storage backend selected on the
/// command line. The MySQL schema is created when missing.
pub async fn build_shortener(
    storage: &StorageArgs,
    generate_timeout: Duration,
) -> Result<Arc<dyn Shortener>, StorageError> {
    match storage.backend {
        StorageBackend::InMemory => Ok(assemble(InMemoryRepository::new(), generate_timeout)),
        StorageBackend::Mysql => {
            let dsn = storage.mysql_dsn.as_deref().ok_or_else(|| {
                StorageError::Unavailable(
                    "mysql dsn is required when storage backend is mysql".to_string(),
                )
            })?;
            let repository = MySqlRepository::connect(dsn).await?;
            repository.ensure_schema().await?;
            info!("connected to mysql");
            Ok(assemble(repository, generate_timeout))
        }
    }
}

fn assemble<R: LinkRepository>(repository: R, generate_timeout: Duration) -> Arc<dyn Shortener> {
    Arc::new(
        ShortenerService::new(repository, RandomGenerator::new())
            .with_generate_timeout(generate_timeout),
    )
}
