// Content Service - write paths for users, blogs, posts, comments and like statuses

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{Collection, DocumentStore};
use crate::infrastructure::id_generator::DocumentIdGenerator;
use crate::infrastructure::likes_store::LikesStore;
use crate::infrastructure::user_directory::UserDirectory;
use crate::models::documents::{
    timestamp_now, BlogDocument, CommentDocument, LikesCounters, PostDocument, UserDocument, BLOGS,
    COMMENTS, POSTS, USERS,
};
use crate::models::likes::{LikeRecord, LikeStatus, TargetKind};

#[derive(Clone)]
pub struct ContentService {
    blogs: Collection<BlogDocument>,
    posts: Collection<PostDocument>,
    comments: Collection<CommentDocument>,
    users: Collection<UserDocument>,
    likes: Arc<dyn LikesStore>,
    user_directory: Arc<dyn UserDirectory>,
    ids: Arc<DocumentIdGenerator>,
}

impl ContentService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        likes: Arc<dyn LikesStore>,
        user_directory: Arc<dyn UserDirectory>,
        ids: Arc<DocumentIdGenerator>,
    ) -> Self {
        Self {
            blogs: Collection::new(store.clone(), BLOGS),
            posts: Collection::new(store.clone(), POSTS),
            comments: Collection::new(store.clone(), COMMENTS),
            users: Collection::new(store, USERS),
            likes,
            user_directory,
            ids,
        }
    }

    pub async fn create_user(&self, login: &str, email: &str) -> AppResult<UserDocument> {
        let user = UserDocument {
            id: self.ids.next_document_id(),
            login: login.to_string(),
            email: email.to_string(),
            created_at: timestamp_now(),
        };
        self.users.insert(&user.id, &user).await?;
        info!(user_id = %user.id, login, "created user");
        Ok(user)
    }

    pub async fn create_blog(
        &self,
        name: &str,
        description: &str,
        website_url: &str,
    ) -> AppResult<BlogDocument> {
        let blog = BlogDocument {
            id: self.ids.next_document_id(),
            name: name.to_string(),
            description: description.to_string(),
            website_url: website_url.to_string(),
            created_at: timestamp_now(),
        };
        self.blogs.insert(&blog.id, &blog).await?;
        info!(blog_id = %blog.id, "created blog");
        Ok(blog)
    }

    pub async fn blog_exists(&self, blog_id: &str) -> AppResult<bool> {
        self.blogs.exists(blog_id).await
    }

    pub async fn update_blog(
        &self,
        blog_id: &str,
        name: &str,
        description: &str,
        website_url: &str,
    ) -> AppResult<()> {
        let mut blog = self
            .blogs
            .find_by_id(blog_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Blog with id {} not found", blog_id)))?;

        blog.name = name.to_string();
        blog.description = description.to_string();
        blog.website_url = website_url.to_string();
        self.blogs.replace(blog_id, &blog).await?;
        info!(blog_id, "updated blog");
        Ok(())
    }

    pub async fn delete_blog(&self, blog_id: &str) -> AppResult<()> {
        if !self.blogs.delete(blog_id).await? {
            return Err(AppError::NotFound(format!("Blog with id {} not found", blog_id)));
        }
        info!(blog_id, "deleted blog");
        Ok(())
    }

    /// Create a post under an existing blog, copying the blog's name into the post
    pub async fn create_post(
        &self,
        blog_id: &str,
        title: &str,
        short_description: &str,
        content: &str,
    ) -> AppResult<PostDocument> {
        let blog = self
            .blogs
            .find_by_id(blog_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Blog with id {} not found", blog_id)))?;

        let post = PostDocument {
            id: self.ids.next_document_id(),
            title: title.to_string(),
            short_description: short_description.to_string(),
            content: content.to_string(),
            blog_id: blog.id,
            blog_name: blog.name,
            created_at: timestamp_now(),
            likes: LikesCounters::default(),
        };
        self.posts.insert(&post.id, &post).await?;
        info!(post_id = %post.id, blog_id, "created post");
        Ok(post)
    }

    /// Rewrite a post's text and parent blog. Counters and `createdAt` are kept.
    pub async fn update_post(
        &self,
        post_id: &str,
        blog_id: &str,
        title: &str,
        short_description: &str,
        content: &str,
    ) -> AppResult<()> {
        let mut post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", post_id)))?;
        let blog = self
            .blogs
            .find_by_id(blog_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Blog with id {} not found", blog_id)))?;

        post.title = title.to_string();
        post.short_description = short_description.to_string();
        post.content = content.to_string();
        post.blog_id = blog.id;
        post.blog_name = blog.name;
        self.posts.replace(post_id, &post).await?;
        info!(post_id, blog_id, "updated post");
        Ok(())
    }

    pub async fn delete_post(&self, post_id: &str) -> AppResult<()> {
        if !self.posts.delete(post_id).await? {
            return Err(AppError::NotFound(format!("Post with id {} not found", post_id)));
        }
        info!(post_id, "deleted post");
        Ok(())
    }

    /// Create a comment on an existing post, copying the author's login into the comment
    pub async fn create_comment(
        &self,
        post_id: &str,
        user_id: &str,
        content: &str,
    ) -> AppResult<CommentDocument> {
        if !self.posts.exists(post_id).await? {
            return Err(AppError::NotFound(format!("Post with id {} not found", post_id)));
        }
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user_id)))?;

        let comment = CommentDocument {
            id: self.ids.next_document_id(),
            post_id: post_id.to_string(),
            content: content.to_string(),
            user_id: user.id,
            user_login: user.login,
            created_at: timestamp_now(),
            likes: LikesCounters::default(),
        };
        self.comments.insert(&comment.id, &comment).await?;
        info!(comment_id = %comment.id, post_id, "created comment");
        Ok(comment)
    }

    pub async fn set_post_like_status(
        &self,
        user_id: &str,
        post_id: &str,
        status: LikeStatus,
    ) -> AppResult<()> {
        let mut post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", post_id)))?;

        post.likes = self
            .record_status(user_id, post_id, TargetKind::Post, status)
            .await?;
        self.posts.replace(post_id, &post).await?;
        Ok(())
    }

    pub async fn set_comment_like_status(
        &self,
        user_id: &str,
        comment_id: &str,
        status: LikeStatus,
    ) -> AppResult<()> {
        let mut comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment with id {} not found", comment_id)))?;

        comment.likes = self
            .record_status(user_id, comment_id, TargetKind::Comment, status)
            .await?;
        self.comments.replace(comment_id, &comment).await?;
        Ok(())
    }

    /// Upsert the like record and return freshly counted totals for the target
    async fn record_status(
        &self,
        user_id: &str,
        target_id: &str,
        target_kind: TargetKind,
        status: LikeStatus,
    ) -> AppResult<LikesCounters> {
        self.likes
            .upsert_like(&LikeRecord {
                user_id: user_id.to_string(),
                target_id: target_id.to_string(),
                target_kind,
                status,
                added_at: Utc::now(),
            })
            .await?;
        info!(user_id, target_id, %status, kind = target_kind.as_str(), "like status set");
        self.likes.count_by_status(target_id).await
    }

    /// Wipe every collection and all like records
    pub async fn clear_all(&self) -> AppResult<()> {
        self.blogs.clear().await?;
        self.posts.clear().await?;
        self.comments.clear().await?;
        self.users.clear().await?;
        self.user_directory.forget_all().await;
        self.likes.clear().await?;
        info!("all content data cleared");
        Ok(())
    }
}
