// ViewerContext Extractors - handler-facing access to the request viewer

use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::infrastructure::viewer::ViewerContext;

/// Viewer of the current request, anonymous or authenticated.
/// Cloning only clones the inner `Arc`.
#[derive(Debug, Clone)]
pub struct Vc(Arc<ViewerContext>);

impl std::ops::Deref for Vc {
    type Target = ViewerContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Vc
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Routes mounted without the middleware still get a usable anonymous viewer
        let vc = parts
            .extensions
            .get::<Arc<ViewerContext>>()
            .cloned()
            .unwrap_or_else(|| {
                Arc::new(ViewerContext::anonymous(format!("req-{}", Uuid::new_v4())))
            });
        Ok(Vc(vc))
    }
}

/// Authenticated user id; rejects anonymous requests with 401
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Arc<ViewerContext>>()
            .and_then(|vc| vc.user_id.clone())
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError::Unauthorized("Valid access token required".to_string()))
    }
}
