use clap::{Args, ValueEnum};
use std::fmt::{Display, Formatter};

pub const STORAGE_BACKEND_ENV: &str = "SHORTLINK_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "SHORTLINK_MYSQL_DSN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::InMemory => write!(f, "in-memory"),
            StorageBackend::Mysql => write!(f, "mysql"),
        }
    }
}

/// Storage selection shared by every binary.
#[derive(Debug, Clone, Args)]
pub struct StorageArgs {
    #[arg(
        long = "storage",
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackend::InMemory
    )]
    pub backend: StorageBackend,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("backend", "mysql"))]
    pub mysql_dsn: Option<String>,
}
