pub mod config;
pub mod memory;
pub mod mysql;

pub use config::{StorageArgs, StorageBackend};
pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use shortlink_core::repository::{LinkRecord, LinkRepository, Result};
pub use shortlink_core::StorageError;
