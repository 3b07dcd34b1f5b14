//! Story repository
//!
//! The public surface over the two storage backends. Every operation picks
//! the active backend from configuration, makes a single best-effort attempt,
//! and converts any failure into the operation's absent/failure value. Errors
//! never reach the caller.

use crate::backend::{BoxedStoryBackend, LocalBackend, RemoteBackend, StoryBackend};
use crate::config::RemoteConfig;
use crate::story::Story;
use rand::Rng;
use tracing::{debug, warn};

/// CRUD access to the story collection with remote/local backend fallback.
pub struct StoryRepository {
    config: RemoteConfig,
    remote: Option<BoxedStoryBackend>,
    local: LocalBackend,
}

impl StoryRepository {
    /// Build a repository from the environment: Supabase config from env
    /// vars, local fallback at the default snapshot path.
    pub fn from_env() -> Self {
        let config = RemoteConfig::from_env();
        let remote = match RemoteBackend::new(&config) {
            Ok(backend) => Some(Box::new(backend) as BoxedStoryBackend),
            Err(_) => None,
        };
        Self {
            config,
            remote,
            local: LocalBackend::with_default_store(),
        }
    }

    /// Build a repository from explicit parts. The remote backend is only
    /// consulted while `config.is_configured()` holds.
    pub fn with_backends(
        config: RemoteConfig,
        remote: Option<BoxedStoryBackend>,
        local: LocalBackend,
    ) -> Self {
        Self {
            config,
            remote,
            local,
        }
    }

    /// The single backend-selection point: re-evaluates the configuration
    /// predicate on every call.
    fn backend(&self) -> &dyn StoryBackend {
        match &self.remote {
            Some(remote) if self.config.is_configured() => {
                debug!(backend = "remote", "using Supabase backend");
                remote.as_ref()
            }
            _ => {
                debug!(backend = "local", "using local snapshot backend");
                &self.local
            }
        }
    }

    /// A uniformly random visible story, or `None` when there are no visible
    /// stories or the backend fails. Not seeded; repeated calls may differ.
    pub async fn random_story(&self) -> Option<Story> {
        let stories = match self.backend().fetch_visible().await {
            Ok(stories) => stories,
            Err(e) => {
                warn!(operation = "random_story", error = %e, "story fetch failed");
                return None;
            }
        };
        if stories.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..stories.len());
        stories.into_iter().nth(index)
    }

    /// All visible stories, most recent first. Empty on failure, never an
    /// error.
    pub async fn all_stories(&self) -> Vec<Story> {
        match self.backend().fetch_visible().await {
            Ok(stories) => stories,
            Err(e) => {
                warn!(operation = "all_stories", error = %e, "story fetch failed");
                Vec::new()
            }
        }
    }

    /// Look up a story by id, visible or not. Any failure (including an
    /// unknown id) is `None`.
    pub async fn story_by_id(&self, id: &str) -> Option<Story> {
        match self.backend().fetch_by_id(id).await {
            Ok(story) => Some(story),
            Err(e) => {
                warn!(operation = "story_by_id", id, error = %e, "story lookup failed");
                None
            }
        }
    }

    /// Create a story. Returns whether the write took effect.
    pub async fn create_story(&self, title: &str, content: &str, is_visible: bool) -> bool {
        match self.backend().insert(title, content, is_visible).await {
            Ok(()) => true,
            Err(e) => {
                warn!(operation = "create_story", error = %e, "story create failed");
                false
            }
        }
    }

    /// Replace a story's title, content, and visibility.
    ///
    /// On the local backend an unknown id returns `false`; the remote backend
    /// reports `true` even when no row matched (see
    /// [`StoryBackend`](crate::backend::StoryBackend)).
    pub async fn update_story(
        &self,
        id: &str,
        title: &str,
        content: &str,
        is_visible: bool,
    ) -> bool {
        match self.backend().update(id, title, content, is_visible).await {
            Ok(()) => true,
            Err(e) => {
                warn!(operation = "update_story", id, error = %e, "story update failed");
                false
            }
        }
    }

    /// Change only a story's visibility.
    pub async fn update_story_visibility(&self, id: &str, is_visible: bool) -> bool {
        match self.backend().update_visibility(id, is_visible).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    operation = "update_story_visibility",
                    id,
                    error = %e,
                    "visibility update failed"
                );
                false
            }
        }
    }

    /// Delete a story by id. Same zero-match asymmetry as [`update_story`].
    ///
    /// [`update_story`]: StoryRepository::update_story
    pub async fn delete_story(&self, id: &str) -> bool {
        match self.backend().delete(id).await {
            Ok(()) => true,
            Err(e) => {
                warn!(operation = "delete_story", id, error = %e, "story delete failed");
                false
            }
        }
    }
}

impl Default for StoryRepository {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemorySnapshotStore, MockStoryBackend};
    use crate::error::StoreError;

    fn local_repo() -> StoryRepository {
        StoryRepository::with_backends(
            RemoteConfig::disabled(),
            None,
            LocalBackend::new(MemorySnapshotStore::new()),
        )
    }

    #[tokio::test]
    async fn test_all_stories_sorted_and_addressable_by_id() {
        let repo = local_repo();
        let stories = repo.all_stories().await;
        assert!(!stories.is_empty());

        for pair in stories.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
        for story in &stories {
            let fetched = repo.story_by_id(&story.id).await.unwrap();
            assert_eq!(&fetched, story);
        }
    }

    #[tokio::test]
    async fn test_random_story_never_returns_hidden() {
        let repo = local_repo();
        assert!(repo.update_story_visibility("story-2", false).await);

        for _ in 0..20 {
            let story = repo.random_story().await.unwrap();
            assert!(story.is_visible);
            assert_ne!(story.id, "story-2");
        }
    }

    #[tokio::test]
    async fn test_random_story_none_when_all_hidden() {
        let repo = local_repo();
        for id in ["story-1", "story-2", "story-3"] {
            assert!(repo.update_story_visibility(id, false).await);
        }

        assert!(repo.random_story().await.is_none());
        assert!(repo.all_stories().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_then_read_back() {
        let repo = local_repo();
        assert!(repo.create_story("A New Story", "<p>Hello</p>", true).await);

        let stories = repo.all_stories().await;
        let created = stories.iter().find(|s| s.title == "A New Story").unwrap();
        assert_eq!(created.content, "<p>Hello</p>");
        assert!(created.is_visible);
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(stories.iter().filter(|s| s.id == created.id).count(), 1);
    }

    #[tokio::test]
    async fn test_hidden_create_is_not_listed() {
        let repo = local_repo();
        let listed_before = repo.all_stories().await.len();

        assert!(repo.create_story("Draft", "<p>WIP</p>", false).await);

        let listed = repo.all_stories().await;
        assert_eq!(listed.len(), listed_before);
        assert!(listed.iter().all(|s| s.title != "Draft"));
    }

    #[tokio::test]
    async fn test_update_semantics() {
        let repo = local_repo();
        let before = repo.story_by_id("story-1").await.unwrap();

        assert!(repo.update_story("story-1", "Edited", "<p>Edited</p>", false).await);

        let after = repo.story_by_id("story-1").await.unwrap();
        assert_eq!(after.title, "Edited");
        assert_eq!(after.content, "<p>Edited</p>");
        assert!(!after.is_visible);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_mutations_on_unknown_id_return_false() {
        let repo = local_repo();
        let before = repo.all_stories().await;

        assert!(!repo.update_story("missing", "t", "c", true).await);
        assert!(!repo.update_story_visibility("missing", true).await);
        assert!(!repo.delete_story("missing").await);
        assert!(repo.story_by_id("missing").await.is_none());

        assert_eq!(repo.all_stories().await, before);
    }

    #[tokio::test]
    async fn test_delete_is_terminal() {
        let repo = local_repo();
        assert!(repo.delete_story("story-1").await);
        assert!(!repo.delete_story("story-1").await);
        assert!(repo.story_by_id("story-1").await.is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_repo_ignores_remote() {
        let mut remote = MockStoryBackend::new();
        remote.expect_fetch_visible().never();

        let repo = StoryRepository::with_backends(
            RemoteConfig::disabled(),
            Some(Box::new(remote)),
            LocalBackend::new(MemorySnapshotStore::new()),
        );

        // Served by the local backend (seed set), remote never consulted
        assert_eq!(repo.all_stories().await.len(), 3);
    }

    #[tokio::test]
    async fn test_configured_repo_uses_remote() {
        let mut remote = MockStoryBackend::new();
        remote
            .expect_fetch_visible()
            .times(1)
            .returning(|| Ok(vec![]));

        let repo = StoryRepository::with_backends(
            RemoteConfig::new("https://project.supabase.co", "anon-key"),
            Some(Box::new(remote)),
            LocalBackend::new(MemorySnapshotStore::new()),
        );

        assert!(repo.all_stories().await.is_empty());
    }

    #[tokio::test]
    async fn test_remote_failures_flatten_to_absent_values() {
        let mut remote = MockStoryBackend::new();
        remote
            .expect_fetch_visible()
            .returning(|| Err(StoreError::remote("connection refused")));
        remote
            .expect_fetch_by_id()
            .returning(|id| Err(StoreError::not_found(id)));
        remote
            .expect_insert()
            .returning(|_, _, _| Err(StoreError::remote("insert failed")));
        remote
            .expect_update()
            .returning(|_, _, _, _| Err(StoreError::remote("update failed")));
        remote
            .expect_delete()
            .returning(|_| Err(StoreError::remote("delete failed")));

        let repo = StoryRepository::with_backends(
            RemoteConfig::new("https://project.supabase.co", "anon-key"),
            Some(Box::new(remote)),
            LocalBackend::new(MemorySnapshotStore::new()),
        );

        assert!(repo.random_story().await.is_none());
        assert!(repo.all_stories().await.is_empty());
        assert!(repo.story_by_id("story-1").await.is_none());
        assert!(!repo.create_story("t", "c", true).await);
        assert!(!repo.update_story("story-1", "t", "c", true).await);
        assert!(!repo.delete_story("story-1").await);
    }

    #[tokio::test]
    async fn test_remote_zero_match_mutations_report_success() {
        // PostgREST reports success on an empty match set; the repository
        // passes that through unchanged.
        let mut remote = MockStoryBackend::new();
        remote.expect_update().returning(|_, _, _, _| Ok(()));
        remote.expect_delete().returning(|_| Ok(()));

        let repo = StoryRepository::with_backends(
            RemoteConfig::new("https://project.supabase.co", "anon-key"),
            Some(Box::new(remote)),
            LocalBackend::new(MemorySnapshotStore::new()),
        );

        assert!(repo.update_story("no-such-id", "t", "c", true).await);
        assert!(repo.delete_story("no-such-id").await);
    }
}
