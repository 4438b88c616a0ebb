// Content models - stored documents, request inputs, like records and response views

pub mod documents;
pub mod inputs;
pub mod likes;
pub mod pagination;
pub mod views;

pub use documents::{
    timestamp_now, BlogDocument, CommentDocument, LikesCounters, PostDocument, UserDocument,
};
pub use inputs::{
    BlogInput, BlogPostInput, CommentInput, LikeStatusInput, PostInput, UserInput, Validate,
};
pub use likes::{LikeRecord, LikeStatus, TargetKind};
pub use pagination::{paginate, PageQuery, Paginated, RawPageQuery, SortDirection};
pub use views::{CommentView, ExtendedLikesInfo, LikesInfo, NewestLike, PostView};
