use async_trait::async_trait;
use jiff::Timestamp;
use parking_lot::RwLock;
use shortlink_core::repository::{LinkRecord, LinkRepository, Result};
use shortlink_core::{ShortCode, StorageError};
use std::collections::HashMap;

/// In-memory storage entry for a link mapping.
#[derive(Debug, Clone)]
struct Entry {
    long_url: String,
    created_at: Timestamp,
}

impl Entry {
    fn into_record(self, short_code: ShortCode) -> LinkRecord {
        LinkRecord {
            short_code,
            long_url: self.long_url,
            created_at: self.created_at,
        }
    }
}

/// In-memory implementation of [`LinkRepository`].
///
/// A single reader/writer lock guards the whole namespace: lookups share it,
/// inserts take it exclusively, so the duplicate check and the insert happen
/// atomically. Nothing survives a process restart.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: RwLock<HashMap<String, Entry>>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.storage.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.read().is_empty()
    }
}

#[async_trait]
impl LinkRepository for InMemoryRepository {
    async fn add_link(&self, record: LinkRecord) -> Result<()> {
        let mut storage = self.storage.write();

        if storage.contains_key(record.short_code.as_str()) {
            return Err(StorageError::Conflict(record.short_code.into_string()));
        }

        storage.insert(
            record.short_code.into_string(),
            Entry {
                long_url: record.long_url,
                created_at: record.created_at,
            },
        );
        Ok(())
    }

    async fn get_link(&self, code: &ShortCode) -> Result<LinkRecord> {
        let storage = self.storage.read();

        match storage.get(code.as_str()) {
            Some(entry) => Ok(entry.clone().into_record(code.clone())),
            None => Err(StorageError::NotFound(code.to_string())),
        }
    }
}
