// Comments Query Service - comment listings under a post with per-viewer like status

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{Collection, DocumentStore, Filter};
use crate::models::documents::{CommentDocument, PostDocument, COMMENTS, POSTS};
use crate::models::pagination::{paginate, PageQuery, Paginated};
use crate::models::views::CommentView;
use crate::services::like_aggregator::LikeAggregator;

#[derive(Clone)]
pub struct CommentsQueryService {
    comments: Collection<CommentDocument>,
    posts: Collection<PostDocument>,
    aggregator: LikeAggregator,
}

impl CommentsQueryService {
    pub fn new(store: Arc<dyn DocumentStore>, aggregator: LikeAggregator) -> Self {
        Self {
            comments: Collection::new(store.clone(), COMMENTS),
            posts: Collection::new(store, POSTS),
            aggregator,
        }
    }

    /// One page of comments, scoped to `post_id` when given
    #[instrument(skip(self, query), fields(sort_by = %query.sort_by, page = query.page_number))]
    pub async fn get_page(
        &self,
        query: &PageQuery,
        post_id: Option<&str>,
        user_id: Option<&str>,
    ) -> AppResult<Paginated<CommentView>> {
        let filter = match post_id {
            Some(post_id) => {
                if !self.posts.exists(post_id).await? {
                    return Err(AppError::NotFound(format!("Post with id {} not found", post_id)));
                }
                Filter::eq("postId", post_id)
            }
            None => Filter::all(),
        };

        let sort = query.sort_spec();
        let (total_count, comments) = futures::try_join!(
            self.comments.count(&filter),
            self.comments.find(&filter, &sort, query.skip(), query.limit()),
        )?;
        debug!(total_count, returned = comments.len(), "fetched comment page");

        let ids: Vec<String> = comments.iter().map(|comment| comment.id.clone()).collect();
        let statuses = self.aggregator.resolve_statuses(&ids, user_id).await?;
        let items = comments
            .into_iter()
            .zip(statuses)
            .map(|(comment, my_status)| CommentView::assemble(comment, my_status))
            .collect();

        Ok(paginate(items, query.page_size, query.page_number, total_count))
    }

    pub async fn get_for_post(
        &self,
        post_id: &str,
        query: &PageQuery,
        user_id: Option<&str>,
    ) -> AppResult<Paginated<CommentView>> {
        self.get_page(query, Some(post_id), user_id).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str, user_id: Option<&str>) -> AppResult<CommentView> {
        let comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment with id {} not found", id)))?;

        let my_status = self.aggregator.resolve_status(&comment.id, user_id).await?;
        Ok(CommentView::assemble(comment, my_status))
    }
}
