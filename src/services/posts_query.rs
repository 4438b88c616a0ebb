// Posts Query Service - paginated post listings with per-viewer like annotations

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{Collection, DocumentStore, Filter};
use crate::models::documents::{BlogDocument, PostDocument, BLOGS, POSTS};
use crate::models::pagination::{paginate, PageQuery, Paginated};
use crate::models::views::PostView;
use crate::services::like_aggregator::{LikeAggregator, NEWEST_LIKES_LIMIT};

#[derive(Clone)]
pub struct PostsQueryService {
    posts: Collection<PostDocument>,
    blogs: Collection<BlogDocument>,
    aggregator: LikeAggregator,
}

impl PostsQueryService {
    pub fn new(store: Arc<dyn DocumentStore>, aggregator: LikeAggregator) -> Self {
        Self {
            posts: Collection::new(store.clone(), POSTS),
            blogs: Collection::new(store, BLOGS),
            aggregator,
        }
    }

    /// One page of posts, scoped to `blog_id` when given.
    /// A scoped listing of an unknown blog is `NotFound`, never an empty page.
    #[instrument(skip(self, query), fields(sort_by = %query.sort_by, page = query.page_number))]
    pub async fn get_page(
        &self,
        query: &PageQuery,
        blog_id: Option<&str>,
        user_id: Option<&str>,
    ) -> AppResult<Paginated<PostView>> {
        let filter = match blog_id {
            Some(blog_id) => {
                if !self.blogs.exists(blog_id).await? {
                    return Err(AppError::NotFound(format!("Blog with id {} not found", blog_id)));
                }
                Filter::eq("blogId", blog_id)
            }
            None => Filter::all(),
        };

        let sort = query.sort_spec();
        let (total_count, posts) = futures::try_join!(
            self.posts.count(&filter),
            self.posts.find(&filter, &sort, query.skip(), query.limit()),
        )?;
        debug!(total_count, returned = posts.len(), "fetched post page");

        let items = self.attach_likes(posts, user_id).await?;
        Ok(paginate(items, query.page_size, query.page_number, total_count))
    }

    pub async fn get_all(&self, query: &PageQuery, user_id: Option<&str>) -> AppResult<Paginated<PostView>> {
        self.get_page(query, None, user_id).await
    }

    pub async fn get_for_blog(
        &self,
        blog_id: &str,
        query: &PageQuery,
        user_id: Option<&str>,
    ) -> AppResult<Paginated<PostView>> {
        self.get_page(query, Some(blog_id), user_id).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str, user_id: Option<&str>) -> AppResult<PostView> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", id)))?;

        let my_status = self.aggregator.resolve_status(&post.id, user_id).await?;
        let newest_likes = self.aggregator.resolve_newest(&post.id, NEWEST_LIKES_LIMIT).await?;
        Ok(PostView::assemble(post, my_status, newest_likes))
    }

    async fn attach_likes(&self, posts: Vec<PostDocument>, user_id: Option<&str>) -> AppResult<Vec<PostView>> {
        let ids: Vec<String> = posts.iter().map(|post| post.id.clone()).collect();
        let statuses = self.aggregator.resolve_statuses(&ids, user_id).await?;
        let newest = self.aggregator.resolve_newest_many(&ids, NEWEST_LIKES_LIMIT).await?;

        Ok(posts
            .into_iter()
            .zip(statuses)
            .zip(newest)
            .map(|((post, my_status), newest_likes)| PostView::assemble(post, my_status, newest_likes))
            .collect())
    }
}
