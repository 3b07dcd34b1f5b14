//! Storage backends
//!
//! One seam, two implementations: a Supabase (PostgREST) remote store and a
//! local whole-snapshot store. The repository picks one per call based on
//! configuration.

mod local;
mod remote;

pub use local::{FileSnapshotStore, LocalBackend, MemorySnapshotStore, SnapshotStore};
pub use remote::RemoteBackend;

use crate::error::StoreResult;
use crate::story::Story;
use async_trait::async_trait;

/// Storage backend for the story collection.
///
/// Not-found semantics differ between implementations on mutation:
/// the local backend returns [`StoreError::NotFound`](crate::StoreError) when
/// the id does not exist, while the remote backend reports success on a
/// zero-row match (PostgREST does not treat an empty match set as an error).
/// The repository surfaces this as-is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryBackend: Send + Sync {
    /// All visible stories, ordered by `created_at` descending
    async fn fetch_visible(&self) -> StoreResult<Vec<Story>>;

    /// Point lookup by id; an absent id is an error at this layer
    async fn fetch_by_id(&self, id: &str) -> StoreResult<Story>;

    /// Insert a new story; the backend assigns id and timestamps
    async fn insert(&self, title: &str, content: &str, is_visible: bool) -> StoreResult<()>;

    /// Replace title, content, and visibility, refreshing `updated_at`
    async fn update(
        &self,
        id: &str,
        title: &str,
        content: &str,
        is_visible: bool,
    ) -> StoreResult<()>;

    /// Change only visibility, refreshing `updated_at`
    async fn update_visibility(&self, id: &str, is_visible: bool) -> StoreResult<()>;

    /// Remove a story by id
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

/// Boxed backend type
pub type BoxedStoryBackend = Box<dyn StoryBackend>;
