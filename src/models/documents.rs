// Stored document shapes for each collection

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const BLOGS: &str = "blogs";
pub const POSTS: &str = "posts";
pub const COMMENTS: &str = "comments";
pub const USERS: &str = "users";

/// Like/dislike counters embedded in a likeable document.
/// Maintained by the like write path; read-only for queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesCounters {
    pub likes_count: u64,
    pub dislikes_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDocument {
    pub id: String,
    pub name: String,
    pub description: String,
    pub website_url: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub content: String,
    pub blog_id: String,
    pub blog_name: String,
    pub created_at: String,
    #[serde(rename = "extendedLikesInfo", default)]
    pub likes: LikesCounters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDocument {
    pub id: String,
    pub post_id: String,
    pub content: String,
    pub user_id: String,
    pub user_login: String,
    pub created_at: String,
    #[serde(rename = "likesInfo", default)]
    pub likes: LikesCounters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub id: String,
    pub login: String,
    pub email: String,
    pub created_at: String,
}

/// RFC 3339 UTC timestamp with millisecond precision; sorts lexicographically
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
