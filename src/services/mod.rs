// Services - like aggregation, content queries, and content writes

pub mod blogs_query;
pub mod comments_query;
pub mod content_service;
pub mod like_aggregator;
pub mod posts_query;

pub use blogs_query::BlogsQueryService;
pub use comments_query::CommentsQueryService;
pub use content_service::ContentService;
pub use like_aggregator::{LikeAggregator, NEWEST_LIKES_LIMIT};
pub use posts_query::PostsQueryService;
