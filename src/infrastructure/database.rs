// Document Store Interface - Collections of JSON documents keyed by opaque ids
// Query services only see this trait; the SQLite implementation lives in sqlite_database.rs

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::pagination::SortDirection;

/// One predicate on a top-level document field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq { field: String, value: String },
    In { field: String, values: Vec<String> },
}

/// Conjunction of field predicates. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            conditions: vec![Condition::Eq {
                field: field.into(),
                value: value.into(),
            }],
        }
    }

    pub fn is_in(field: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            conditions: vec![Condition::In {
                field: field.into(),
                values,
            }],
        }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

/// Sort by any document field. The field name is passed through unchecked.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// JSON path for a field name; dots address nested objects (`extendedLikesInfo.likesCount`)
pub fn json_path(field: &str) -> String {
    field
        .split('.')
        .filter(|segment| !segment.is_empty())
        .fold(String::from("$"), |mut path, segment| {
            path.push_str(".\"");
            path.push_str(&segment.replace('"', ""));
            path.push('"');
            path
        })
}

/// Storage handle shared by every component
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_by_id(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: &SortSpec,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<Value>>;
    async fn count(&self, collection: &str, filter: &Filter) -> AppResult<u64>;

    async fn insert(&self, collection: &str, id: &str, document: &Value) -> AppResult<()>;
    /// Returns false when no document with `id` exists
    async fn replace(&self, collection: &str, id: &str, document: &Value) -> AppResult<bool>;
    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool>;
    /// Remove every document of a collection, returning how many were removed
    async fn clear(&self, collection: &str) -> AppResult<u64>;
}

/// Typed view over one collection of a `DocumentStore`
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            name: self.name,
            _marker: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(store: Arc<dyn DocumentStore>, name: &'static str) -> Self {
        Self {
            store,
            name,
            _marker: PhantomData,
        }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<T>> {
        match self.store.find_by_id(self.name, id).await? {
            Some(value) => Ok(Some(self.decode(value)?)),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.store.find_by_id(self.name, id).await?.is_some())
    }

    pub async fn find(
        &self,
        filter: &Filter,
        sort: &SortSpec,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<T>> {
        self.store
            .find(self.name, filter, sort, skip, limit)
            .await?
            .into_iter()
            .map(|value| self.decode(value))
            .collect()
    }

    pub async fn count(&self, filter: &Filter) -> AppResult<u64> {
        self.store.count(self.name, filter).await
    }

    pub async fn insert(&self, id: &str, document: &T) -> AppResult<()> {
        let value = self.encode(document)?;
        self.store.insert(self.name, id, &value).await
    }

    pub async fn replace(&self, id: &str, document: &T) -> AppResult<bool> {
        let value = self.encode(document)?;
        self.store.replace(self.name, id, &value).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        self.store.delete(self.name, id).await
    }

    pub async fn clear(&self) -> AppResult<u64> {
        self.store.clear(self.name).await
    }

    fn decode(&self, value: Value) -> AppResult<T> {
        serde_json::from_value(value).map_err(|e| {
            AppError::DeserializationError(format!(
                "Malformed document in '{}': {}",
                self.name, e
            ))
        })
    }

    fn encode(&self, document: &T) -> AppResult<Value> {
        serde_json::to_value(document).map_err(|e| {
            AppError::SerializationError(format!(
                "Failed to encode document for '{}': {}",
                self.name, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_path_quotes_each_segment() {
        assert_eq!(json_path("createdAt"), "$.\"createdAt\"");
        assert_eq!(
            json_path("extendedLikesInfo.likesCount"),
            "$.\"extendedLikesInfo\".\"likesCount\""
        );
        assert_eq!(json_path("we\"ird"), "$.\"weird\"");
        assert_eq!(json_path("a..b."), "$.\"a\".\"b\"");
    }

    #[test]
    fn filter_builders_hold_one_condition() {
        assert_eq!(
            Filter::eq("blogId", "1").conditions(),
            &[Condition::Eq {
                field: "blogId".into(),
                value: "1".into()
            }]
        );
        assert!(Filter::all().conditions().is_empty());
        assert_eq!(
            Filter::is_in("id", vec!["a".into()]).conditions(),
            &[Condition::In {
                field: "id".into(),
                values: vec!["a".into()]
            }]
        );
    }
}
