// Content API - blogs, posts and comments with per-viewer like annotations

// Infrastructure - document store, likes store, user directory, auth
pub mod infrastructure;

// Stored documents, like records, views and pagination
pub mod models;

// Like aggregation, content queries and writes
pub mod services;

// HTTP surface
pub mod app_state;
pub mod content_interface;

// Common utilities
pub mod config;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
