// Blogs Query Service - paginated blog listings

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{Collection, DocumentStore, Filter};
use crate::models::documents::{BlogDocument, BLOGS};
use crate::models::pagination::{paginate, PageQuery, Paginated};

#[derive(Clone)]
pub struct BlogsQueryService {
    blogs: Collection<BlogDocument>,
}

impl BlogsQueryService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            blogs: Collection::new(store, BLOGS),
        }
    }

    #[instrument(skip(self, query), fields(sort_by = %query.sort_by, page = query.page_number))]
    pub async fn get_page(&self, query: &PageQuery) -> AppResult<Paginated<BlogDocument>> {
        let filter = Filter::all();
        let sort = query.sort_spec();
        let (total_count, blogs) = futures::try_join!(
            self.blogs.count(&filter),
            self.blogs.find(&filter, &sort, query.skip(), query.limit()),
        )?;
        debug!(total_count, returned = blogs.len(), "fetched blog page");

        Ok(paginate(blogs, query.page_size, query.page_number, total_count))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<BlogDocument> {
        self.blogs
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Blog with id {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::id_generator::DocumentIdGenerator;
    use crate::infrastructure::sqlite_database::SqliteDatabase;
    use crate::infrastructure::user_directory::DocumentUserDirectory;
    use crate::models::pagination::SortDirection;
    use crate::services::content_service::ContentService;

    #[tokio::test]
    async fn test_lists_and_fetches_blogs() {
        let db = Arc::new(SqliteDatabase::new_in_memory().await.unwrap());
        let content = ContentService::new(
            db.clone(),
            Arc::new(db.likes_store()),
            Arc::new(DocumentUserDirectory::new(db.clone(), 16)),
            Arc::new(DocumentIdGenerator::new(3)),
        );
        let blogs = BlogsQueryService::new(db);

        let empty = blogs.get_page(&PageQuery::default()).await.unwrap();
        assert_eq!(empty.pages_count, 0);
        assert!(empty.items.is_empty());

        for name in ["beta", "alpha", "gamma"] {
            content.create_blog(name, "d", "https://a.com").await.unwrap();
        }
        let query = PageQuery {
            sort_by: "name".to_string(),
            sort_direction: SortDirection::Asc,
            page_number: 1,
            page_size: 2,
        };
        let page = blogs.get_page(&query).await.unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.pages_count, 2);
        let names: Vec<&str> = page.items.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);

        let fetched = blogs.get_by_id(&page.items[0].id).await.unwrap();
        assert_eq!(fetched, page.items[0]);
        assert!(matches!(blogs.get_by_id("999").await, Err(AppError::NotFound(_))));
    }
}
