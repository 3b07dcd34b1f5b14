//! Storyvault
//!
//! CRUD access to a small "stories" collection with a dual backend: a
//! Supabase (PostgREST) data store when configured, and a local JSON snapshot
//! fallback otherwise. The repository surface never fails loudly; backend
//! errors are logged and flattened to `None`/`false`/empty results.

pub mod backend;
pub mod config;
pub mod error;
pub mod repository;
pub mod story;

// Re-export commonly used types
pub use backend::{
    BoxedStoryBackend, FileSnapshotStore, LocalBackend, MemorySnapshotStore, RemoteBackend,
    SnapshotStore, StoryBackend,
};
pub use config::RemoteConfig;
pub use error::{StoreError, StoreResult};
pub use repository::StoryRepository;
pub use story::Story;
