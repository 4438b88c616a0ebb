// Likes Store - one like/dislike record per (user, target) pair

use async_trait::async_trait;
use chrono::DateTime;
use sqlx::sqlite::{Sqlite, SqlitePool, SqliteRow};
use sqlx::{QueryBuilder, Row};

use crate::error::{AppError, AppResult};
use crate::models::documents::LikesCounters;
use crate::models::likes::{LikeRecord, LikeStatus};
use crate::models::pagination::SortDirection;

#[async_trait]
pub trait LikesStore: Send + Sync {
    async fn get_like(&self, user_id: &str, target_id: &str) -> AppResult<Option<LikeRecord>>;

    /// The user's records for any of `target_ids`, in no particular order
    async fn get_likes_for_targets(
        &self,
        user_id: &str,
        target_ids: &[String],
    ) -> AppResult<Vec<LikeRecord>>;

    /// Records on `target_id` with `status`, ordered by `added_at`
    async fn get_top_likes(
        &self,
        target_id: &str,
        status: LikeStatus,
        limit: u64,
        order: SortDirection,
    ) -> AppResult<Vec<LikeRecord>>;

    async fn count_by_status(&self, target_id: &str) -> AppResult<LikesCounters>;

    /// Insert or overwrite the record for (user_id, target_id).
    /// `added_at` only moves when the status actually changes.
    async fn upsert_like(&self, record: &LikeRecord) -> AppResult<()>;

    async fn clear(&self) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct SqliteLikesStore {
    pool: SqlitePool,
}

impl SqliteLikesStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const LIKE_COLUMNS: &str = "user_id, target_id, target_kind, status, added_at";

fn row_to_record(row: &SqliteRow) -> AppResult<LikeRecord> {
    let added_at_ms: i64 = row.get("added_at");
    let added_at = DateTime::from_timestamp_millis(added_at_ms).ok_or_else(|| {
        AppError::DeserializationError(format!("Invalid like timestamp: {}", added_at_ms))
    })?;
    let status: String = row.get("status");
    let target_kind: String = row.get("target_kind");

    Ok(LikeRecord {
        user_id: row.get("user_id"),
        target_id: row.get("target_id"),
        target_kind: target_kind.parse()?,
        status: status
            .parse()
            .map_err(|_| AppError::DeserializationError(format!("Invalid like status: {}", status)))?,
        added_at,
    })
}

#[async_trait]
impl LikesStore for SqliteLikesStore {
    async fn get_like(&self, user_id: &str, target_id: &str) -> AppResult<Option<LikeRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM likes WHERE user_id = ? AND target_id = ?",
            LIKE_COLUMNS
        ))
        .bind(user_id)
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to get like for {}: {}", target_id, e)))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn get_likes_for_targets(
        &self,
        user_id: &str,
        target_ids: &[String],
    ) -> AppResult<Vec<LikeRecord>> {
        if target_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM likes WHERE user_id = ", LIKE_COLUMNS));
        qb.push_bind(user_id.to_string());
        qb.push(" AND target_id IN (");
        let mut separated = qb.separated(", ");
        for id in target_ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(")");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to get likes for user {}: {}", user_id, e)))?;

        rows.iter().map(row_to_record).collect()
    }

    async fn get_top_likes(
        &self,
        target_id: &str,
        status: LikeStatus,
        limit: u64,
        order: SortDirection,
    ) -> AppResult<Vec<LikeRecord>> {
        let direction = order.as_sql();
        let rows = sqlx::query(&format!(
            "SELECT {} FROM likes WHERE target_id = ? AND status = ? ORDER BY added_at {}, seq {} LIMIT ?",
            LIKE_COLUMNS, direction, direction
        ))
        .bind(target_id)
        .bind(status.as_str())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to get top likes for {}: {}", target_id, e)))?;

        rows.iter().map(row_to_record).collect()
    }

    async fn count_by_status(&self, target_id: &str) -> AppResult<LikesCounters> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN status = 'Like' THEN 1 ELSE 0 END), 0) AS likes,
                COALESCE(SUM(CASE WHEN status = 'Dislike' THEN 1 ELSE 0 END), 0) AS dislikes
            FROM likes
            WHERE target_id = ?
            "#,
        )
        .bind(target_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count likes for {}: {}", target_id, e)))?;

        Ok(LikesCounters {
            likes_count: row.get::<i64, _>("likes").max(0) as u64,
            dislikes_count: row.get::<i64, _>("dislikes").max(0) as u64,
        })
    }

    async fn upsert_like(&self, record: &LikeRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO likes (user_id, target_id, target_kind, status, added_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (user_id, target_id) DO UPDATE SET
                added_at = CASE WHEN likes.status = excluded.status
                                THEN likes.added_at ELSE excluded.added_at END,
                status = excluded.status,
                target_kind = excluded.target_kind
            "#,
        )
        .bind(&record.user_id)
        .bind(&record.target_id)
        .bind(record.target_kind.as_str())
        .bind(record.status.as_str())
        .bind(record.added_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!(
                "Failed to save like of {} on {}: {}",
                record.user_id, record.target_id, e
            ))
        })?;
        Ok(())
    }

    async fn clear(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM likes")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to clear likes: {}", e)))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite_database::SqliteDatabase;
    use crate::models::likes::TargetKind;
    use chrono::{TimeZone, Utc};

    fn record(user: &str, target: &str, status: LikeStatus, second: u32) -> LikeRecord {
        LikeRecord {
            user_id: user.to_string(),
            target_id: target.to_string(),
            target_kind: TargetKind::Post,
            status,
            added_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, second).unwrap(),
        }
    }

    async fn store() -> SqliteLikesStore {
        SqliteDatabase::new_in_memory().await.unwrap().likes_store()
    }

    #[tokio::test]
    async fn test_get_like_roundtrips_record() {
        let likes = store().await;
        let like = record("u1", "p1", LikeStatus::Dislike, 5);
        likes.upsert_like(&like).await.unwrap();

        assert_eq!(likes.get_like("u1", "p1").await.unwrap(), Some(like));
        assert_eq!(likes.get_like("u2", "p1").await.unwrap(), None);
        assert_eq!(likes.get_like("u1", "p2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_record_per_pair() {
        let likes = store().await;
        likes.upsert_like(&record("u1", "p1", LikeStatus::Like, 1)).await.unwrap();
        likes.upsert_like(&record("u1", "p1", LikeStatus::Dislike, 2)).await.unwrap();

        let stored = likes.get_like("u1", "p1").await.unwrap().unwrap();
        assert_eq!(stored.status, LikeStatus::Dislike);
        assert_eq!(stored.added_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 2).unwrap());

        let counters = likes.count_by_status("p1").await.unwrap();
        assert_eq!(counters.likes_count, 0);
        assert_eq!(counters.dislikes_count, 1);
    }

    #[tokio::test]
    async fn test_repeating_same_status_keeps_timestamp() {
        let likes = store().await;
        likes.upsert_like(&record("u1", "p1", LikeStatus::Like, 1)).await.unwrap();
        likes.upsert_like(&record("u1", "p1", LikeStatus::Like, 9)).await.unwrap();

        let stored = likes.get_like("u1", "p1").await.unwrap().unwrap();
        assert_eq!(stored.added_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap());
    }

    #[tokio::test]
    async fn test_top_likes_only_likes_newest_first() {
        let likes = store().await;
        likes.upsert_like(&record("u1", "p1", LikeStatus::Like, 1)).await.unwrap();
        likes.upsert_like(&record("u2", "p1", LikeStatus::Dislike, 2)).await.unwrap();
        likes.upsert_like(&record("u3", "p1", LikeStatus::Like, 3)).await.unwrap();
        likes.upsert_like(&record("u4", "p1", LikeStatus::Like, 4)).await.unwrap();
        likes.upsert_like(&record("u5", "p1", LikeStatus::Like, 5)).await.unwrap();
        likes.upsert_like(&record("u6", "p2", LikeStatus::Like, 6)).await.unwrap();

        let top = likes
            .get_top_likes("p1", LikeStatus::Like, 3, SortDirection::Desc)
            .await
            .unwrap();
        let users: Vec<_> = top.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(users, vec!["u5", "u4", "u3"]);

        let counters = likes.count_by_status("p1").await.unwrap();
        assert_eq!(counters.likes_count, 4);
        assert_eq!(counters.dislikes_count, 1);
    }

    #[tokio::test]
    async fn test_batch_lookup_is_scoped_to_user() {
        let likes = store().await;
        likes.upsert_like(&record("u1", "p1", LikeStatus::Like, 1)).await.unwrap();
        likes.upsert_like(&record("u1", "p3", LikeStatus::Dislike, 2)).await.unwrap();
        likes.upsert_like(&record("u2", "p2", LikeStatus::Like, 3)).await.unwrap();

        let targets = vec!["p1".to_string(), "p2".to_string(), "p3".to_string()];
        let mut found = likes.get_likes_for_targets("u1", &targets).await.unwrap();
        found.sort_by(|a, b| a.target_id.cmp(&b.target_id));
        let pairs: Vec<_> = found.iter().map(|r| (r.target_id.as_str(), r.status)).collect();
        assert_eq!(pairs, vec![("p1", LikeStatus::Like), ("p3", LikeStatus::Dislike)]);

        assert!(likes.get_likes_for_targets("u1", &[]).await.unwrap().is_empty());
    }
}
