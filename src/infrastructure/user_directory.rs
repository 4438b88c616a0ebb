// User Directory - resolves user ids to logins for like projections

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::cache::Cache;
use crate::infrastructure::database::{Collection, DocumentStore, Filter, SortSpec};
use crate::models::documents::{UserDocument, USERS};
use crate::models::pagination::SortDirection;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Logins for the given ids. Unknown ids are absent from the result.
    async fn logins(&self, user_ids: &[String]) -> AppResult<HashMap<String, String>>;

    /// Drop every cached login; called after users are removed in bulk
    async fn forget_all(&self);
}

/// Directory over the `users` collection with an LRU cache of resolved logins
pub struct DocumentUserDirectory {
    users: Collection<UserDocument>,
    cache: Arc<Mutex<Cache<String, String>>>,
}

impl DocumentUserDirectory {
    pub fn new(store: Arc<dyn DocumentStore>, cache_capacity: usize) -> Self {
        Self {
            users: Collection::new(store, USERS),
            cache: Arc::new(Mutex::new(Cache::new(cache_capacity))),
        }
    }
}

#[async_trait]
impl UserDirectory for DocumentUserDirectory {
    async fn logins(&self, user_ids: &[String]) -> AppResult<HashMap<String, String>> {
        let mut resolved = HashMap::with_capacity(user_ids.len());
        let mut misses = Vec::new();

        {
            let mut cache = self.cache.lock().await;
            for id in user_ids {
                if resolved.contains_key(id) || misses.contains(id) {
                    continue;
                }
                match cache.get(id) {
                    Some(login) => {
                        resolved.insert(id.clone(), login.clone());
                    }
                    None => misses.push(id.clone()),
                }
            }
        }

        if misses.is_empty() {
            return Ok(resolved);
        }

        debug!(count = misses.len(), "resolving logins from users collection");
        let limit = misses.len() as u64;
        let users = self
            .users
            .find(
                &Filter::is_in("id", misses),
                &SortSpec::new("createdAt", SortDirection::Asc),
                0,
                limit,
            )
            .await?;

        let mut cache = self.cache.lock().await;
        for user in users {
            cache.insert(user.id.clone(), user.login.clone());
            resolved.insert(user.id, user.login);
        }

        Ok(resolved)
    }

    async fn forget_all(&self) {
        self.cache.lock().await.clear();
        debug!("login cache flushed");
    }
}
