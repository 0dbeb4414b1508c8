// Insulation assessment engine - Dependency injection and public surface
pub mod application;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use crate::application::assessment_service::AssessmentService;
use crate::application::history_store::HistoryStore;
use crate::application::key_value_store::KeyValueStore;
use crate::infrastructure::config::{AssessmentConfig, StorageBackend};
use crate::infrastructure::file_store::FileKeyValueStore;
use crate::infrastructure::memory_store::InMemoryKeyValueStore;

/// Wire the storage adapter, history store and assessment service from configuration.
pub fn bootstrap(config: &AssessmentConfig) -> anyhow::Result<AssessmentService> {
    config.validate()?;

    // Create storage adapter (infrastructure layer)
    let store: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryKeyValueStore::new()),
        StorageBackend::File => {
            let directory = config
                .storage
                .directory
                .clone()
                .ok_or_else(|| anyhow::anyhow!("storage.directory is required for the file backend"))?;
            tracing::info!("Persisting assessment history under {}", directory.display());
            Arc::new(FileKeyValueStore::new(directory))
        }
    };

    // Create services (application layer)
    let history = Arc::new(HistoryStore::with_capacity(store, config.history.capacity)?);
    Ok(AssessmentService::new(history))
}
