// Wire-visible output shapes for posts and comments

use serde::{Deserialize, Serialize};

use crate::models::documents::{CommentDocument, PostDocument};
use crate::models::likes::LikeStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewestLike {
    pub added_at: String,
    pub user_id: String,
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedLikesInfo {
    pub likes_count: u64,
    pub dislikes_count: u64,
    pub my_status: LikeStatus,
    pub newest_likes: Vec<NewestLike>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub content: String,
    pub blog_id: String,
    pub blog_name: String,
    pub created_at: String,
    pub extended_likes_info: ExtendedLikesInfo,
}

impl PostView {
    /// Build the view with like data already resolved for the viewer
    pub fn assemble(post: PostDocument, my_status: LikeStatus, newest_likes: Vec<NewestLike>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            short_description: post.short_description,
            content: post.content,
            blog_id: post.blog_id,
            blog_name: post.blog_name,
            created_at: post.created_at,
            extended_likes_info: ExtendedLikesInfo {
                likes_count: post.likes.likes_count,
                dislikes_count: post.likes.dislikes_count,
                my_status,
                newest_likes,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesInfo {
    pub likes_count: u64,
    pub dislikes_count: u64,
    pub my_status: LikeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub content: String,
    pub user_id: String,
    pub user_login: String,
    pub created_at: String,
    pub likes_info: LikesInfo,
}

impl CommentView {
    pub fn assemble(comment: CommentDocument, my_status: LikeStatus) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            user_id: comment.user_id,
            user_login: comment.user_login,
            created_at: comment.created_at,
            likes_info: LikesInfo {
                likes_count: comment.likes.likes_count,
                dislikes_count: comment.likes.dislikes_count,
                my_status,
            },
        }
    }
}
