use async_trait::async_trait;
use jiff::Timestamp;
use shortlink_core::repository::{LinkRecord, LinkRepository, Result};
use shortlink_core::{ShortCode, StorageError};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Row, Transaction};
use tracing::{trace, warn};

/// DDL for the `links` table.
pub const LINKS_DDL: &str = include_str!("../ddl/mysql/links.sql");

/// MySQL implementation of the repository contract.
///
/// Every operation runs exactly one statement inside its own transaction and
/// ends it through [`finish`]: commit on success, rollback otherwise. Codes
/// are the primary key, so a duplicate insert is rejected by the database
/// itself and surfaces as [`StorageError::Conflict`].
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `links` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(LINKS_DDL)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

/// Ends `tx` according to `outcome`.
///
/// A failed commit drops the still-open transaction, which makes sqlx queue a
/// rollback on the connection before it goes back to the pool. A failed
/// explicit rollback is logged and discarded so the caller sees `outcome`.
async fn finish<T>(tx: Transaction<'static, MySql>, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await.map_err(map_sqlx_error)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "transaction rollback failed");
            }
            Err(err)
        }
    }
}

fn parse_created_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", seconds))
    })
}

fn decode_row(code: &ShortCode, row: &MySqlRow) -> Result<LinkRecord> {
    let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(LinkRecord {
        short_code: code.clone(),
        long_url,
        created_at: parse_created_at(created_at)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl LinkRepository for MySqlRepository {
    async fn add_link(&self, record: LinkRecord) -> Result<()> {
        trace!(short_code = %record.short_code, "inserting link");

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let outcome = sqlx::query(
            r#"
            INSERT INTO links (short_code, long_url, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(record.short_code.as_str())
        .bind(record.long_url.as_str())
        .bind(record.created_at.as_second())
        .execute(&mut *tx)
        .await
        .map(|_| ())
        .map_err(|err| {
            if is_unique_violation(&err) {
                StorageError::Conflict(record.short_code.to_string())
            } else {
                map_sqlx_error(err)
            }
        });

        finish(tx, outcome).await
    }

    async fn get_link(&self, code: &ShortCode) -> Result<LinkRecord> {
        trace!(short_code = %code, "selecting link");

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let row = sqlx::query(
            r#"
            SELECT long_url, created_at
            FROM links
            WHERE short_code = ?
            "#,
        )
        .bind(code.as_str())
        .fetch_one(&mut *tx)
        .await;

        let outcome = match row {
            Ok(row) => decode_row(code, &row),
            Err(sqlx::Error::RowNotFound) => Err(StorageError::NotFound(code.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        };

        finish(tx, outcome).await
    }
}
