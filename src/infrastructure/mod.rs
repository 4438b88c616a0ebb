// Core infrastructure modules
pub mod cache;           // Bounded LRU cache
pub mod database;        // Document store interface
pub mod id_generator;    // Document ID generation
pub mod likes_store;     // Like records per (user, target)
pub mod middleware;      // Viewer resolution for HTTP requests
pub mod security;        // Access token verification
pub mod sqlite_database; // SQLite-backed document database
pub mod user_directory;  // User id -> login lookups
pub mod viewer;          // Viewer context

pub use cache::Cache;
pub use database::{Collection, Condition, DocumentStore, Filter, SortSpec};
pub use id_generator::DocumentIdGenerator;
pub use likes_store::{LikesStore, SqliteLikesStore};
pub use security::JwtService;
pub use sqlite_database::SqliteDatabase;
pub use user_directory::{DocumentUserDirectory, UserDirectory};
pub use viewer::ViewerContext;
