use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use content_api::{
    app_state::AppState,
    config::{AuthConfig, CacheConfig, Config, DatabaseConfig, ServerConfig},
    content_interface::create_content_router,
    infrastructure::SqliteDatabase,
    models::LikeStatus,
};

fn test_config() -> Config {
    Config {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
            admin_login: "admin".to_string(),
            admin_password: "qwerty".to_string(),
        },
        cache: CacheConfig { capacity: 100 },
    }
}

async fn setup() -> (AppState, Router) {
    let db = Arc::new(SqliteDatabase::new_in_memory().await.unwrap());
    let state = AppState::from_database(db, test_config());
    let app = create_content_router(state.clone());
    (state, app)
}

fn token_for(state: &AppState, user_id: &str) -> String {
    state.jwt.create_token(user_id, Duration::minutes(5)).unwrap()
}

/// Sends a request with an optional `Authorization` header value and raw body
async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<String>,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(authorization) = authorization {
        builder = builder.header(header::AUTHORIZATION, authorization);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let authorization = token.map(|token| format!("Bearer {}", token));
    send_raw(app, method, uri, authorization, body.map(|body| body.to_string())).await
}

fn basic(login: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", login, password)))
}

async fn admin_send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let authorization = Some(basic("admin", "qwerty"));
    send_raw(app, method, uri, authorization, body.map(|body| body.to_string())).await
}

fn errored_fields(body: &Value) -> Vec<&str> {
    body["errorsMessages"]
        .as_array()
        .map(|errors| errors.iter().filter_map(|e| e["field"].as_str()).collect())
        .unwrap_or_default()
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, token, None).await
}

fn empty_page() -> Value {
    json!({ "pagesCount": 0, "page": 1, "pageSize": 10, "totalCount": 0, "items": [] })
}

#[tokio::test]
async fn empty_post_listing_has_zero_pages() {
    let (_state, app) = setup().await;
    let (status, body) = get(&app, "/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, empty_page());
}

#[tokio::test]
async fn missing_entities_are_404() {
    let (_state, app) = setup().await;
    for uri in ["/posts/999", "/blogs/999/posts", "/posts/999/comments", "/comments/999", "/posts/not%20an%20id"] {
        let (status, _) = get(&app, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn blog_without_posts_lists_empty_page() {
    let (state, app) = setup().await;
    let blog = state
        .content
        .create_blog("Name", "Description", "https://testurl.com")
        .await
        .unwrap();

    let (status, body) = get(&app, &format!("/blogs/{}/posts", blog.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, empty_page());
}

#[tokio::test]
async fn created_post_is_returned_with_zeroed_like_info() {
    let (state, app) = setup().await;
    let blog = state
        .content
        .create_blog("Name", "Description", "https://testurl.com")
        .await
        .unwrap();
    let post = state
        .content
        .create_post(&blog.id, "Title", "Short Description", "Content")
        .await
        .unwrap();

    let (status, body) = get(&app, &format!("/posts/{}", post.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": post.id,
            "title": "Title",
            "shortDescription": "Short Description",
            "content": "Content",
            "blogId": blog.id,
            "blogName": "Name",
            "createdAt": post.created_at,
            "extendedLikesInfo": {
                "likesCount": 0,
                "dislikesCount": 0,
                "myStatus": "None",
                "newestLikes": []
            }
        })
    );

    // Same envelope through the blog listing
    let (_, page) = get(&app, &format!("/blogs/{}/posts", blog.id), None).await;
    assert_eq!(page["totalCount"], 1);
    assert_eq!(page["pagesCount"], 1);
    assert_eq!(page["items"][0], body);
}

#[tokio::test]
async fn like_status_is_personal_while_counters_are_shared() {
    let (state, app) = setup().await;
    let blog = state.content.create_blog("Name", "d", "https://testurl.com").await.unwrap();
    let post = state.content.create_post(&blog.id, "Title", "S", "C").await.unwrap();
    let alice = state.content.create_user("alice", "alice@example.com").await.unwrap();
    let bob = state.content.create_user("bob", "bob@example.com").await.unwrap();
    let alice_token = token_for(&state, &alice.id);
    let bob_token = token_for(&state, &bob.id);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/posts/{}/like-status", post.id),
        Some(&alice_token),
        Some(json!({ "likeStatus": "Like" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let uri = format!("/posts/{}", post.id);
    let (_, as_alice) = get(&app, &uri, Some(&alice_token)).await;
    let (_, as_bob) = get(&app, &uri, Some(&bob_token)).await;
    let (_, anonymous) = get(&app, &uri, None).await;
    let (_, bad_token) = get(&app, &uri, Some("not-a-token")).await;

    assert_eq!(as_alice["extendedLikesInfo"]["myStatus"], "Like");
    assert_eq!(as_bob["extendedLikesInfo"]["myStatus"], "None");
    assert_eq!(anonymous["extendedLikesInfo"]["myStatus"], "None");
    assert_eq!(bad_token["extendedLikesInfo"]["myStatus"], "None");
    for view in [&as_alice, &as_bob, &anonymous] {
        assert_eq!(view["extendedLikesInfo"]["likesCount"], 1);
        let newest = &view["extendedLikesInfo"]["newestLikes"];
        assert_eq!(newest.as_array().unwrap().len(), 1);
        assert_eq!(newest[0]["userId"], alice.id.as_str());
        assert_eq!(newest[0]["login"], "alice");
    }

    let (_, listing) = get(&app, "/posts", Some(&alice_token)).await;
    assert_eq!(listing["items"][0], as_alice);
}

#[tokio::test]
async fn newest_likes_cap_at_three() {
    let (state, app) = setup().await;
    let blog = state.content.create_blog("Name", "d", "https://testurl.com").await.unwrap();
    let post = state.content.create_post(&blog.id, "Title", "S", "C").await.unwrap();
    for n in 0..5 {
        let user = state
            .content
            .create_user(&format!("login{}", n), &format!("u{}@example.com", n))
            .await
            .unwrap();
        state
            .content
            .set_post_like_status(&user.id, &post.id, LikeStatus::Like)
            .await
            .unwrap();
    }

    let (_, body) = get(&app, &format!("/posts/{}", post.id), None).await;
    assert_eq!(body["extendedLikesInfo"]["likesCount"], 5);
    let newest = body["extendedLikesInfo"]["newestLikes"].as_array().unwrap().clone();
    assert_eq!(newest.len(), 3);
    let stamps: Vec<&str> = newest.iter().map(|n| n["addedAt"].as_str().unwrap()).collect();
    assert!(stamps.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn like_routes_validate_caller_and_input() {
    let (state, app) = setup().await;
    let blog = state.content.create_blog("Name", "d", "https://testurl.com").await.unwrap();
    let post = state.content.create_post(&blog.id, "Title", "S", "C").await.unwrap();
    let user = state.content.create_user("login1", "email@gmail.com").await.unwrap();
    let token = token_for(&state, &user.id);
    let uri = format!("/posts/{}/like-status", post.id);

    let (status, _) = send(&app, Method::PUT, &uri, None, Some(json!({ "likeStatus": "Like" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({ "likeStatus": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errored_fields(&body), vec!["likeStatus"]);

    let (status, body) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errored_fields(&body), vec!["likeStatus"]);

    let (status, _) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({ "likeStatus": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bearer = Some(format!("Bearer {}", token));
    let (status, _) = send_raw(&app, Method::PUT, &uri, bearer, Some("not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        send(&app, Method::PUT, "/comments/999/like-status", Some(&token), Some(json!({ "likeStatus": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/posts/999/like-status",
        Some(&token),
        Some(json!({ "likeStatus": "Like" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(&app, &format!("/posts/{}", post.id), None).await;
    assert_eq!(body["extendedLikesInfo"]["likesCount"], 0);
}

#[tokio::test]
async fn single_comment_listing_uses_defaults() {
    let (state, app) = setup().await;
    let blog = state.content.create_blog("Name", "d", "https://testurl.com").await.unwrap();
    let post = state.content.create_post(&blog.id, "Title", "S", "C").await.unwrap();
    let user = state.content.create_user("login1", "email@gmail.com").await.unwrap();
    let comment = state
        .content
        .create_comment(&post.id, &user.id, "content content content content more 20")
        .await
        .unwrap();

    let (status, body) = get(&app, &format!("/posts/{}/comments", post.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let expected_comment = json!({
        "id": comment.id,
        "content": "content content content content more 20",
        "userId": user.id,
        "userLogin": "login1",
        "createdAt": comment.created_at,
        "likesInfo": { "likesCount": 0, "dislikesCount": 0, "myStatus": "None" }
    });
    assert_eq!(
        body,
        json!({
            "pagesCount": 1,
            "page": 1,
            "pageSize": 10,
            "totalCount": 1,
            "items": [expected_comment.clone()]
        })
    );

    let token = token_for(&state, &user.id);
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/comments/{}/like-status", comment.id),
        Some(&token),
        Some(json!({ "likeStatus": "Dislike" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, mine) = get(&app, &format!("/comments/{}", comment.id), Some(&token)).await;
    assert_eq!(mine["likesInfo"], json!({ "likesCount": 0, "dislikesCount": 1, "myStatus": "Dislike" }));
}

#[tokio::test]
async fn query_string_controls_paging_and_sorting() {
    let (state, app) = setup().await;
    let blog = state.content.create_blog("Name", "d", "https://testurl.com").await.unwrap();
    for title in ["b", "d", "a", "c"] {
        state.content.create_post(&blog.id, title, "S", "C").await.unwrap();
    }

    let (_, body) = get(&app, "/posts?sortBy=title&sortDirection=asc&pageNumber=2&pageSize=3", None).await;
    assert_eq!(body["pagesCount"], 2);
    assert_eq!(body["page"], 2);
    assert_eq!(body["pageSize"], 3);
    assert_eq!(body["totalCount"], 4);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["title"], "d");

    let (status, body) = get(&app, "/posts?pageSize=abc&pageNumber=-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 10);
    assert_eq!(body["items"][0]["title"], "c");
}

#[tokio::test]
async fn testing_endpoint_wipes_all_data() {
    let (state, app) = setup().await;
    let blog = state.content.create_blog("Name", "d", "https://testurl.com").await.unwrap();
    state.content.create_post(&blog.id, "Title", "S", "C").await.unwrap();

    let (status, _) = send(&app, Method::DELETE, "/testing/all-data", None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get(&app, "/posts", None).await;
    assert_eq!(body, empty_page());
    let (status, _) = get(&app, &format!("/blogs/{}/posts", blog.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_ok() {
    let (_state, app) = setup().await;
    let (status, body) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn file_backed_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("content.db").display());

    let db = Arc::new(SqliteDatabase::connect(&url, 2).await.unwrap());
    let state = AppState::from_database(db.clone(), test_config());
    let blog = state.content.create_blog("Name", "d", "https://testurl.com").await.unwrap();
    state.content.create_post(&blog.id, "Title", "S", "C").await.unwrap();
    db.close().await;
    assert!(db.is_closed());

    let reopened = Arc::new(SqliteDatabase::connect(&url, 2).await.unwrap());
    let app = create_content_router(AppState::from_database(reopened.clone(), test_config()));
    let (_, body) = get(&app, &format!("/blogs/{}/posts", blog.id), None).await;
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["items"][0]["blogName"], "Name");
    reopened.close().await;
}

fn post_body(blog_id: &str) -> Value {
    json!({
        "title": "Title",
        "shortDescription": "Short Description",
        "content": "Content",
        "blogId": blog_id,
    })
}

#[tokio::test]
async fn blogs_are_managed_by_admin() {
    let (_state, app) = setup().await;
    let body = json!({ "name": "Name", "description": "Description", "websiteUrl": "https://testurl.com" });

    let (status, _) = send(&app, Method::POST, "/blogs", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let wrong = Some(basic("admin", "wrong"));
    let (status, _) = send_raw(&app, Method::POST, "/blogs", wrong, Some(body.to_string())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, created) = admin_send(&app, Method::POST, "/blogs", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Name");
    assert_eq!(created["websiteUrl"], "https://testurl.com");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = get(&app, &format!("/blogs/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    let (_, listed) = get(&app, "/blogs", None).await;
    assert_eq!(listed["totalCount"], 1);
    assert_eq!(listed["items"][0], created);

    let invalid = json!({ "name": "  ", "description": "Description", "websiteUrl": "http://x" });
    let (status, errors) = admin_send(&app, Method::PUT, &format!("/blogs/{}", id), Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errored_fields(&errors), vec!["name", "websiteUrl"]);

    let renamed = json!({ "name": "Renamed", "description": "New", "websiteUrl": "https://new.com" });
    let (status, _) = admin_send(&app, Method::PUT, &format!("/blogs/{}", id), Some(renamed.clone())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, fetched) = get(&app, &format!("/blogs/{}", id), None).await;
    assert_eq!(fetched["name"], "Renamed");
    let (status, _) = admin_send(&app, Method::PUT, "/blogs/999", Some(renamed)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = admin_send(&app, Method::DELETE, &format!("/blogs/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get(&app, &format!("/blogs/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = admin_send(&app, Method::DELETE, &format!("/blogs/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn posts_are_created_updated_and_deleted_by_admin() {
    let (state, app) = setup().await;
    let blog = state.content.create_blog("Name", "d", "https://testurl.com").await.unwrap();
    let other = state.content.create_blog("Other", "d", "https://other.com").await.unwrap();

    let (status, _) = send(&app, Method::POST, "/posts", None, Some(post_body(&blog.id))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, errors) = admin_send(&app, Method::POST, "/posts", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errored_fields(&errors), vec!["title", "shortDescription", "content", "blogId"]);

    let (status, errors) = admin_send(&app, Method::POST, "/posts", Some(post_body("999"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors["errorsMessages"][0], json!({ "message": "Should be existing id", "field": "blogId" }));

    let (status, created) = admin_send(&app, Method::POST, "/posts", Some(post_body(&blog.id))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["blogName"], "Name");
    assert_eq!(created["extendedLikesInfo"]["myStatus"], "None");
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/posts/{}", id);

    let (status, nested) =
        admin_send(&app, Method::POST, &format!("/blogs/{}/posts", other.id), Some(post_body(""))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(nested["blogId"], other.id.as_str());
    let (status, _) = admin_send(&app, Method::POST, "/blogs/999/posts", Some(post_body(""))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, errors) = admin_send(&app, Method::POST, "/blogs/999/posts", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errored_fields(&errors), vec!["title", "shortDescription", "content"]);

    let mut moved = post_body(&other.id);
    moved["title"] = json!("Moved");
    let (status, _) = send(&app, Method::PUT, &uri, None, Some(moved.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = admin_send(&app, Method::PUT, &uri, Some(moved.clone())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, fetched) = get(&app, &uri, None).await;
    assert_eq!(fetched["title"], "Moved");
    assert_eq!(fetched["blogName"], "Other");
    assert_eq!(fetched["createdAt"], created["createdAt"]);
    let (status, _) = admin_send(&app, Method::PUT, "/posts/999", Some(moved)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = admin_send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get(&app, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = admin_send(&app, Method::DELETE, "/posts/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_are_created_by_authenticated_users() {
    let (state, app) = setup().await;
    let blog = state.content.create_blog("Name", "d", "https://testurl.com").await.unwrap();
    let post = state.content.create_post(&blog.id, "Title", "S", "C").await.unwrap();
    let (status, user) = admin_send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "login": "login1", "email": "email@gmail.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let token = token_for(&state, user["id"].as_str().unwrap());
    let uri = format!("/posts/{}/comments", post.id);
    let content = json!({ "content": "content content content content more 20" });

    let (status, _) = send(&app, Method::POST, &uri, None, Some(content.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let short = json!({ "content": "incorrect content" });
    let (status, errors) = send(&app, Method::POST, &uri, Some(&token), Some(short)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errored_fields(&errors), vec!["content"]);

    let (status, _) = send(&app, Method::POST, "/posts/999/comments", Some(&token), Some(content.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, created) = send(&app, Method::POST, &uri, Some(&token), Some(content)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["userLogin"], "login1");
    assert_eq!(created["likesInfo"], json!({ "likesCount": 0, "dislikesCount": 0, "myStatus": "None" }));

    let (_, listed) = get(&app, &uri, None).await;
    assert_eq!(listed["totalCount"], 1);
    assert_eq!(listed["items"][0]["id"], created["id"]);
}

#[tokio::test]
async fn users_require_admin_and_valid_fields() {
    let (_state, app) = setup().await;
    let body = json!({ "login": "login1", "email": "email@gmail.com" });

    let (status, _) = send(&app, Method::POST, "/users", None, Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, errors) =
        admin_send(&app, Method::POST, "/users", Some(json!({ "login": "x", "email": "nope" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errored_fields(&errors), vec!["login", "email"]);
}
