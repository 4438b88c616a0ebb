use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Row};
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{json_path, Condition, DocumentStore, Filter, SortSpec};
use crate::infrastructure::likes_store::SqliteLikesStore;

/// SQLite-backed document database. Owns the connection pool; open it at
/// process start, share it through `Arc`, and `close` it at shutdown.
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open a pool for `url` (e.g. `sqlite:data/content_api.db`) and create the schema
    pub async fn connect(url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::ConfigurationError(format!("Invalid database URL {}: {}", url, e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect to {}: {}", url, e)))?;

        let db = Self { pool };
        db.initialize().await?;
        info!("Connected to document database at {}", url);
        Ok(db)
    }

    /// Private in-memory database. A single long-lived connection keeps the data alive.
    pub async fn new_in_memory() -> AppResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to connect to in-memory SQLite: {}", e))
            })?;

        let db = Self { pool };
        db.initialize().await?;
        Ok(db)
    }

    /// Create document and like tables
    pub async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                data TEXT NOT NULL,
                UNIQUE (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create documents table: {}", e)))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS likes (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                target_id TEXT NOT NULL,
                target_kind TEXT NOT NULL,
                status TEXT NOT NULL,
                added_at INTEGER NOT NULL,
                UNIQUE (user_id, target_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create likes table: {}", e)))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_likes_target_status ON likes(target_id, status, added_at DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create likes index: {}", e)))?;

        Ok(())
    }

    /// Likes store sharing this database's pool
    pub fn likes_store(&self) -> SqliteLikesStore {
        SqliteLikesStore::new(self.pool.clone())
    }

    pub async fn health_check(&self) -> AppResult<()> {
        if self.is_closed() {
            return Err(AppError::DatabaseError("Database pool is closed".to_string()));
        }
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Database health check failed: {}", e)))?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Document database closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &Filter) {
    for condition in filter.conditions() {
        match condition {
            Condition::Eq { field, value } => {
                qb.push(" AND json_extract(data, ");
                qb.push_bind(json_path(field));
                qb.push(") = ");
                qb.push_bind(value.clone());
            }
            Condition::In { field, values } => {
                if values.is_empty() {
                    qb.push(" AND 0 = 1");
                    continue;
                }
                qb.push(" AND json_extract(data, ");
                qb.push_bind(json_path(field));
                qb.push(") IN (");
                let mut separated = qb.separated(", ");
                for value in values {
                    separated.push_bind(value.clone());
                }
                separated.push_unseparated(")");
            }
        }
    }
}

fn parse_document(collection: &str, raw: &str) -> AppResult<Value> {
    serde_json::from_str(raw).map_err(|e| {
        AppError::DeserializationError(format!("Corrupt document in '{}': {}", collection, e))
    })
}

fn encode_document(document: &Value) -> AppResult<String> {
    serde_json::to_string(document)
        .map_err(|e| AppError::SerializationError(format!("Failed to encode document: {}", e)))
}

#[async_trait]
impl DocumentStore for SqliteDatabase {
    async fn find_by_id(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        let row = sqlx::query("SELECT data FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to get {} document {}: {}", collection, id, e))
            })?;

        match row {
            Some(row) => Ok(Some(parse_document(collection, row.get("data"))?)),
            None => Ok(None),
        }
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: &SortSpec,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<Value>> {
        let direction = sort.direction.as_sql();
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT data FROM documents WHERE collection = ");
        qb.push_bind(collection.to_string());
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY json_extract(data, ");
        qb.push_bind(json_path(&sort.field));
        qb.push(format!(") {}, seq {}", direction, direction));
        qb.push(" LIMIT ");
        qb.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        qb.push(" OFFSET ");
        qb.push_bind(i64::try_from(skip).unwrap_or(i64::MAX));

        debug!(collection, sort_by = %sort.field, skip, limit, "find documents");

        let rows = qb.build().fetch_all(&self.pool).await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to query {} documents: {}", collection, e))
        })?;

        rows.iter()
            .map(|row| parse_document(collection, row.get("data")))
            .collect()
    }

    async fn count(&self, collection: &str, filter: &Filter) -> AppResult<u64> {
        let mut qb =
            QueryBuilder::<Sqlite>::new("SELECT COUNT(*) AS count FROM documents WHERE collection = ");
        qb.push_bind(collection.to_string());
        push_filter(&mut qb, filter);

        let row = qb.build().fetch_one(&self.pool).await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to count {} documents: {}", collection, e))
        })?;

        Ok(row.get::<i64, _>("count").max(0) as u64)
    }

    async fn insert(&self, collection: &str, id: &str, document: &Value) -> AppResult<()> {
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES (?, ?, ?)")
            .bind(collection)
            .bind(id)
            .bind(encode_document(document)?)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to insert {} document {}: {}",
                    collection, id, e
                ))
            })?;
        Ok(())
    }

    async fn replace(&self, collection: &str, id: &str, document: &Value) -> AppResult<bool> {
        let result = sqlx::query("UPDATE documents SET data = ? WHERE collection = ? AND id = ?")
            .bind(encode_document(document)?)
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to replace {} document {}: {}",
                    collection, id, e
                ))
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to delete {} document {}: {}",
                    collection, id, e
                ))
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, collection: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ?")
            .bind(collection)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to clear {}: {}", collection, e))
            })?;
        Ok(result.rows_affected())
    }
}
