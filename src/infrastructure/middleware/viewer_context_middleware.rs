// ViewerContext Middleware - resolves the optional authenticated user
// and injects a ViewerContext into request extensions

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::infrastructure::{security::JwtService, viewer::ViewerContext};

/// Application state able to verify access tokens
pub trait HasJwtService {
    fn jwt(&self) -> &JwtService;
}

/// Never rejects: a missing or invalid token yields an anonymous viewer
pub async fn viewer_context_middleware<T>(
    State(app_state): State<T>,
    mut request: Request,
    next: Next,
) -> Response
where
    T: HasJwtService + Clone + Send + Sync + 'static,
{
    let viewer_context = create_viewer_context(request.headers(), app_state.jwt());
    request.extensions_mut().insert(viewer_context);
    next.run(request).await
}

/// Bearer token from the Authorization header, if present and well-formed
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

pub fn create_viewer_context(headers: &HeaderMap, jwt: &JwtService) -> Arc<ViewerContext> {
    let request_id = format!("req-{}", Uuid::new_v4());
    let user_id = extract_bearer_token(headers).and_then(|token| jwt.user_id_from_token(token));

    let viewer_context = match user_id {
        Some(user_id) => ViewerContext::authenticated(user_id, request_id),
        None => ViewerContext::anonymous(request_id),
    };
    Arc::new(viewer_context)
}
