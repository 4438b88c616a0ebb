use std::sync::Arc;

use crate::{
    config::Config,
    error::AppResult,
    infrastructure::{
        middleware::{HasAdminCredentials, HasJwtService},
        DocumentIdGenerator, DocumentStore, DocumentUserDirectory, JwtService, LikesStore,
        SqliteDatabase, UserDirectory,
    },
    services::{
        BlogsQueryService, CommentsQueryService, ContentService, LikeAggregator, PostsQueryService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub database: Arc<SqliteDatabase>,
    pub blogs: BlogsQueryService,
    pub posts: PostsQueryService,
    pub comments: CommentsQueryService,
    pub content: ContentService,
    pub jwt: JwtService,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let database =
            SqliteDatabase::connect(&config.database.url, config.database.max_connections).await?;
        Ok(Self::from_database(Arc::new(database), config))
    }

    /// Wire every component onto an already opened database
    pub fn from_database(database: Arc<SqliteDatabase>, config: Config) -> Self {
        let store: Arc<dyn DocumentStore> = database.clone();
        let likes: Arc<dyn LikesStore> = Arc::new(database.likes_store());
        let users: Arc<dyn UserDirectory> =
            Arc::new(DocumentUserDirectory::new(store.clone(), config.cache.capacity));
        let aggregator = LikeAggregator::new(likes.clone(), users.clone());

        Self {
            blogs: BlogsQueryService::new(store.clone()),
            posts: PostsQueryService::new(store.clone(), aggregator.clone()),
            comments: CommentsQueryService::new(store.clone(), aggregator),
            content: ContentService::new(
                store,
                likes,
                users,
                Arc::new(DocumentIdGenerator::new(0)),
            ),
            jwt: JwtService::new(&config.auth.jwt_secret),
            database,
            config,
        }
    }
}

impl HasJwtService for AppState {
    fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}

impl HasAdminCredentials for AppState {
    fn admin_credentials(&self) -> (&str, &str) {
        (&self.config.auth.admin_login, &self.config.auth.admin_password)
    }
}
