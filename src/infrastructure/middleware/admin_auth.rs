// Admin Auth - HTTP Basic credentials guarding the management routes

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

use crate::error::AppError;

/// Application state holding the configured admin login and password
pub trait HasAdminCredentials {
    fn admin_credentials(&self) -> (&str, &str);
}

/// Marker for a request carrying valid admin Basic credentials
#[derive(Debug, Clone, Copy)]
pub struct AdminUser;

/// `(login, password)` decoded from `Authorization: Basic ...`
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?.trim();
    let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
    let (login, password) = decoded.split_once(':')?;
    Some((login.to_string(), password.to_string()))
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: HasAdminCredentials + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (expected_login, expected_password) = state.admin_credentials();
        match basic_credentials(&parts.headers) {
            Some((login, password)) if login == expected_login && password == expected_password => {
                Ok(AdminUser)
            }
            Some((login, _)) => {
                debug!(login = %login, "rejected admin credentials");
                Err(AppError::Unauthorized("Invalid admin credentials".to_string()))
            }
            None => Err(AppError::Unauthorized("Admin credentials required".to_string())),
        }
    }
}
