// Content HTTP Interface - axum routes over the query and write services

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};

use crate::{
    app_state::AppState,
    error::{ensure_valid, AppResult, FieldError},
    infrastructure::middleware::{
        viewer_context_middleware, AdminUser, AuthenticatedUser, JsonBody, Vc,
    },
    models::{
        BlogDocument, BlogInput, BlogPostInput, CommentInput, CommentView, LikeStatus,
        LikeStatusInput, PageQuery, Paginated, PostInput, PostView, RawPageQuery, UserDocument,
        UserInput, Validate,
    },
};

pub fn create_content_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/blogs", get(list_blogs).post(create_blog))
        .route("/blogs/{id}", get(get_blog).put(update_blog).delete(delete_blog))
        .route("/blogs/{id}/posts", get(list_blog_posts).post(create_blog_post))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post).put(update_post).delete(delete_post))
        .route("/posts/{id}/comments", get(list_post_comments).post(create_comment))
        .route("/posts/{id}/like-status", put(set_post_like_status))
        .route("/users", post(create_user))
        .route("/comments/{id}", get(get_comment))
        .route("/comments/{id}/like-status", put(set_comment_like_status))
        .route("/testing/all-data", delete(clear_all_data))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            viewer_context_middleware::<AppState>,
        ))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.database.health_check().await?;
    Ok(Json(json!({ "status": "ok" })))
}

async fn list_blogs(
    State(state): State<AppState>,
    Query(raw): Query<RawPageQuery>,
) -> AppResult<Json<Paginated<BlogDocument>>> {
    let query = PageQuery::from(raw);
    Ok(Json(state.blogs.get_page(&query).await?))
}

async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BlogDocument>> {
    Ok(Json(state.blogs.get_by_id(&id).await?))
}

async fn create_blog(
    State(state): State<AppState>,
    _admin: AdminUser,
    JsonBody(input): JsonBody<BlogInput>,
) -> AppResult<(StatusCode, Json<BlogDocument>)> {
    let input = input.validated()?;
    let blog = state
        .content
        .create_blog(&input.name, &input.description, &input.website_url)
        .await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

async fn update_blog(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<BlogInput>,
) -> AppResult<StatusCode> {
    let input = input.validated()?;
    state
        .content
        .update_blog(&id, &input.name, &input.description, &input.website_url)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_blog(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.content.delete_blog(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Field checks plus the `blogId` reference check, reported together
async fn validated_post(state: &AppState, input: PostInput) -> AppResult<PostInput> {
    let input = input.trimmed();
    let mut errors = input.errors();
    if !input.blog_id.is_empty() && !state.content.blog_exists(&input.blog_id).await? {
        errors.push(FieldError::new("blogId", "Should be existing id"));
    }
    ensure_valid(errors)?;
    Ok(input)
}

async fn create_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    JsonBody(input): JsonBody<PostInput>,
) -> AppResult<(StatusCode, Json<PostView>)> {
    let input = validated_post(&state, input).await?;
    let post = state
        .content
        .create_post(&input.blog_id, &input.title, &input.short_description, &input.content)
        .await?;
    Ok((StatusCode::CREATED, Json(PostView::assemble(post, LikeStatus::None, Vec::new()))))
}

async fn create_blog_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(blog_id): Path<String>,
    JsonBody(input): JsonBody<BlogPostInput>,
) -> AppResult<(StatusCode, Json<PostView>)> {
    let input = input.validated()?;
    let post = state
        .content
        .create_post(&blog_id, &input.title, &input.short_description, &input.content)
        .await?;
    Ok((StatusCode::CREATED, Json(PostView::assemble(post, LikeStatus::None, Vec::new()))))
}

async fn update_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<PostInput>,
) -> AppResult<StatusCode> {
    let input = validated_post(&state, input).await?;
    state
        .content
        .update_post(&id, &input.blog_id, &input.title, &input.short_description, &input.content)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.content.delete_post(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_comment(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(post_id): Path<String>,
    JsonBody(input): JsonBody<CommentInput>,
) -> AppResult<(StatusCode, Json<CommentView>)> {
    let input = input.validated()?;
    let comment = state.content.create_comment(&post_id, &user_id, &input.content).await?;
    Ok((StatusCode::CREATED, Json(CommentView::assemble(comment, LikeStatus::None))))
}

async fn create_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    JsonBody(input): JsonBody<UserInput>,
) -> AppResult<(StatusCode, Json<UserDocument>)> {
    let input = input.validated()?;
    let user = state.content.create_user(&input.login, &input.email).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_posts(
    State(state): State<AppState>,
    vc: Vc,
    Query(raw): Query<RawPageQuery>,
) -> AppResult<Json<Paginated<PostView>>> {
    let query = PageQuery::from(raw);
    Ok(Json(state.posts.get_all(&query, vc.user_id()).await?))
}

async fn get_post(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<String>,
) -> AppResult<Json<PostView>> {
    Ok(Json(state.posts.get_by_id(&id, vc.user_id()).await?))
}

async fn list_blog_posts(
    State(state): State<AppState>,
    vc: Vc,
    Path(blog_id): Path<String>,
    Query(raw): Query<RawPageQuery>,
) -> AppResult<Json<Paginated<PostView>>> {
    let query = PageQuery::from(raw);
    Ok(Json(state.posts.get_for_blog(&blog_id, &query, vc.user_id()).await?))
}

async fn list_post_comments(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<String>,
    Query(raw): Query<RawPageQuery>,
) -> AppResult<Json<Paginated<CommentView>>> {
    let query = PageQuery::from(raw);
    Ok(Json(state.comments.get_for_post(&post_id, &query, vc.user_id()).await?))
}

async fn get_comment(
    State(state): State<AppState>,
    vc: Vc,
    Path(id): Path<String>,
) -> AppResult<Json<CommentView>> {
    Ok(Json(state.comments.get_by_id(&id, vc.user_id()).await?))
}

async fn set_post_like_status(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(post_id): Path<String>,
    JsonBody(input): JsonBody<LikeStatusInput>,
) -> AppResult<StatusCode> {
    let status = input.status()?;
    state.content.set_post_like_status(&user_id, &post_id, status).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_comment_like_status(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(comment_id): Path<String>,
    JsonBody(input): JsonBody<LikeStatusInput>,
) -> AppResult<StatusCode> {
    let status = input.status()?;
    state.content.set_comment_like_status(&user_id, &comment_id, status).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_all_data(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.content.clear_all().await?;
    Ok(StatusCode::NO_CONTENT)
}
