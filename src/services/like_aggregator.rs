// Like Aggregator - per-viewer like status and newest likers for content targets

use chrono::SecondsFormat;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::error::AppResult;
use crate::infrastructure::likes_store::LikesStore;
use crate::infrastructure::user_directory::UserDirectory;
use crate::models::likes::{LikeRecord, LikeStatus};
use crate::models::pagination::SortDirection;
use crate::models::views::NewestLike;

/// Number of likers projected into `newestLikes`
pub const NEWEST_LIKES_LIMIT: u64 = 3;

#[derive(Clone)]
pub struct LikeAggregator {
    likes: Arc<dyn LikesStore>,
    users: Arc<dyn UserDirectory>,
}

impl LikeAggregator {
    pub fn new(likes: Arc<dyn LikesStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { likes, users }
    }

    /// The viewer's own status on one target. Anonymous viewers always get `None`
    /// without touching storage.
    pub async fn resolve_status(&self, target_id: &str, user_id: Option<&str>) -> AppResult<LikeStatus> {
        let Some(user_id) = user_id else {
            return Ok(LikeStatus::None);
        };

        Ok(self
            .likes
            .get_like(user_id, target_id)
            .await?
            .map(|record| record.status)
            .unwrap_or_default())
    }

    /// Statuses for a page of targets in one storage round trip.
    /// The result is index-aligned with `target_ids`.
    pub async fn resolve_statuses(
        &self,
        target_ids: &[String],
        user_id: Option<&str>,
    ) -> AppResult<Vec<LikeStatus>> {
        let Some(user_id) = user_id else {
            return Ok(vec![LikeStatus::None; target_ids.len()]);
        };

        let by_target: HashMap<String, LikeStatus> = self
            .likes
            .get_likes_for_targets(user_id, target_ids)
            .await?
            .into_iter()
            .map(|record| (record.target_id, record.status))
            .collect();

        Ok(target_ids
            .iter()
            .map(|id| by_target.get(id).copied().unwrap_or_default())
            .collect())
    }

    /// Most recent `Like` records on a target, newest first, joined with liker logins
    pub async fn resolve_newest(&self, target_id: &str, limit: u64) -> AppResult<Vec<NewestLike>> {
        let records = self
            .likes
            .get_top_likes(target_id, LikeStatus::Like, limit, SortDirection::Desc)
            .await?;
        let logins = self.logins_for(records.iter()).await?;
        Ok(project_newest(records, &logins))
    }

    /// `resolve_newest` for a page of targets, index-aligned with `target_ids`.
    /// Logins for every liker on the page are fetched in a single lookup.
    pub async fn resolve_newest_many(
        &self,
        target_ids: &[String],
        limit: u64,
    ) -> AppResult<Vec<Vec<NewestLike>>> {
        let per_target = try_join_all(target_ids.iter().map(|id| {
            self.likes
                .get_top_likes(id, LikeStatus::Like, limit, SortDirection::Desc)
        }))
        .await?;

        let logins = self.logins_for(per_target.iter().flatten()).await?;

        Ok(per_target
            .into_iter()
            .map(|records| project_newest(records, &logins))
            .collect())
    }

    async fn logins_for<'a>(
        &self,
        records: impl Iterator<Item = &'a LikeRecord>,
    ) -> AppResult<HashMap<String, String>> {
        let mut user_ids: Vec<String> = Vec::new();
        for record in records {
            if !user_ids.contains(&record.user_id) {
                user_ids.push(record.user_id.clone());
            }
        }

        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.users.logins(&user_ids).await
    }
}

fn project_newest(records: Vec<LikeRecord>, logins: &HashMap<String, String>) -> Vec<NewestLike> {
    records
        .into_iter()
        .map(|record| {
            let login = match logins.get(&record.user_id) {
                Some(login) => login.clone(),
                None => {
                    warn!(user_id = %record.user_id, target_id = %record.target_id, "liker has no user record");
                    String::new()
                }
            };
            NewestLike {
                added_at: record.added_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                user_id: record.user_id,
                login,
            }
        })
        .collect()
}
