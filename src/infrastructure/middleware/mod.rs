// Request middleware and extractors: viewer context, admin auth, JSON bodies

pub mod admin_auth;
pub mod json_body;
pub mod viewer_context_extractor;
pub mod viewer_context_middleware;

pub use admin_auth::{AdminUser, HasAdminCredentials};
pub use json_body::JsonBody;
pub use viewer_context_extractor::{AuthenticatedUser, Vc};
pub use viewer_context_middleware::{create_viewer_context, viewer_context_middleware, HasJwtService};
