//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling using deadpool-postgres, and the
//! [`NoteStore`] implementation backed by the `note` table.
//!
//! Every store operation checks out one pooled connection, runs exactly one
//! parameterized statement, and drops the connection guard on every exit
//! path, including when the request future is cancelled.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_postgres::{
    Config, ManagerConfig, Pool, PoolConfig, PoolError, RecyclingMethod, Runtime, Timeouts,
};
use notevault_core::{NewNote, Note, NoteId, NoteUpdate, Page, StorageError, StorageResult};
use notevault_storage::NoteStore;
use tokio_postgres::{NoTls, Row};

use crate::config::env_var;
use crate::error::{ApiError, ApiResult};

// ============================================================================
// SQL
// ============================================================================

const INSERT_NOTE: &str = "INSERT INTO note (title, body, author, is_public) \
     VALUES ($1, $2, $3, $4) \
     RETURNING id";

const SELECT_NOTE: &str = "SELECT id, title, body, author, is_public, created_at, updated_at \
     FROM note \
     WHERE id = $1";

const LIST_NOTES: &str = "SELECT id, title, body, author, is_public, created_at, updated_at \
     FROM note \
     ORDER BY id \
     LIMIT $1 OFFSET $2";

// NULL parameters keep the stored value. GREATEST keeps updated_at from
// ever preceding created_at.
const UPDATE_NOTE: &str = "UPDATE note SET \
     title = COALESCE($2, title), \
     body = COALESCE($3, body), \
     author = COALESCE($4, author), \
     is_public = COALESCE($5, is_public), \
     updated_at = GREATEST(now(), created_at) \
     WHERE id = $1";

const DELETE_NOTE: &str = "DELETE FROM note WHERE id = $1";

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Wait/create/recycle timeout for pooled connections
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "note".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    ///
    /// Environment variables (unset or empty values fall back to defaults):
    /// - `PG_HOST` (localhost), `PG_PORT` (5432), `PG_USER` (postgres),
    ///   `PG_PASSWORD` (postgres), `PG_DATABASE_NAME` (note)
    /// - `NOTEVAULT_DB_POOL_SIZE` (16), `NOTEVAULT_DB_TIMEOUT_SECS` (30)
    ///
    /// Malformed numeric values are rejected with `InvalidInput`.
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(env_var)
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let defaults = Self::default();

        let port = parse_positive(&lookup, "PG_PORT")?.unwrap_or(defaults.port);
        let max_size = parse_positive(&lookup, "NOTEVAULT_DB_POOL_SIZE")?
            .unwrap_or(defaults.max_size);
        let timeout = parse_positive(&lookup, "NOTEVAULT_DB_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Ok(Self {
            host: lookup("PG_HOST").unwrap_or(defaults.host),
            port,
            dbname: lookup("PG_DATABASE_NAME").unwrap_or(defaults.dbname),
            user: lookup("PG_USER").unwrap_or(defaults.user),
            password: lookup("PG_PASSWORD").unwrap_or(defaults.password),
            max_size,
            timeout,
        })
    }

    /// Connection URL with the password masked, for logging.
    pub fn redacted_url(&self) -> String {
        format!(
            "postgres://{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.dbname
        )
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_config = PoolConfig::new(self.max_size);
        pool_config.timeouts = Timeouts {
            wait: Some(self.timeout),
            create: Some(self.timeout),
            recycle: Some(self.timeout),
        };
        cfg.pool = Some(pool_config);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

/// Parse an optional positive integer setting.
fn parse_positive<T>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> ApiResult<Option<T>>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(Some(value)),
        _ => Err(ApiError::invalid_input(format!(
            "Invalid {}: {:?} is not a positive integer",
            key, raw
        ))),
    }
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// Database client that wraps a connection pool and implements
/// [`NoteStore`] against the `note` table.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Round-trip a trivial query to verify connectivity.
    pub async fn ping(&self) -> ApiResult<()> {
        let conn = self.pool.get().await?;
        conn.simple_query("SELECT 1").await?;
        Ok(())
    }

    /// Run a batch of SQL statements, e.g. the reference schema.
    pub async fn execute_batch(&self, sql: &str) -> ApiResult<()> {
        let conn = self.pool.get().await?;
        conn.batch_execute(sql).await?;
        Ok(())
    }

    /// Close the pool. Checked-out connections are dropped when returned.
    pub fn close(&self) {
        self.pool.close();
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> StorageResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(pool_error)
    }
}

fn pool_error(err: PoolError) -> StorageError {
    StorageError::PoolUnavailable {
        reason: err.to_string(),
    }
}

fn statement_error(operation: &'static str) -> impl FnOnce(tokio_postgres::Error) -> StorageError {
    move |err| StorageError::backend(operation, err)
}

/// Map a `note` row into the entity.
fn note_from_row(row: &Row) -> Result<Note, tokio_postgres::Error> {
    Ok(Note {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("body")?,
        author: row.try_get("author")?,
        is_public: row.try_get("is_public")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl NoteStore for DbClient {
    async fn create(&self, note: &NewNote) -> StorageResult<NoteId> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(
                INSERT_NOTE,
                &[&note.title, &note.content, &note.author, &note.is_public],
            )
            .await
            .map_err(statement_error("insert note"))?;
        row.try_get(0).map_err(statement_error("insert note"))
    }

    async fn get(&self, id: NoteId) -> StorageResult<Note> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_opt(SELECT_NOTE, &[&id])
            .await
            .map_err(statement_error("select note"))?
            .ok_or(StorageError::NotFound { id })?;
        note_from_row(&row).map_err(statement_error("select note"))
    }

    async fn list(&self, page: Page) -> StorageResult<Vec<Note>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(LIST_NOTES, &[&page.limit(), &page.offset()])
            .await
            .map_err(statement_error("list notes"))?;
        rows.iter()
            .map(note_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(statement_error("list notes"))
    }

    async fn update(&self, id: NoteId, update: &NoteUpdate) -> StorageResult<()> {
        let conn = self.get_conn().await?;
        let affected = conn
            .execute(
                UPDATE_NOTE,
                &[
                    &id,
                    &update.title,
                    &update.content,
                    &update.author,
                    &update.is_public,
                ],
            )
            .await
            .map_err(statement_error("update note"))?;
        if affected == 0 {
            return Err(StorageError::NotFound { id });
        }
        Ok(())
    }

    async fn delete(&self, id: NoteId) -> StorageResult<()> {
        let conn = self.get_conn().await?;
        let affected = conn
            .execute(DELETE_NOTE, &[&id])
            .await
            .map_err(statement_error("delete note"))?;
        if affected == 0 {
            return Err(StorageError::NotFound { id });
        }
        Ok(())
    }
}
