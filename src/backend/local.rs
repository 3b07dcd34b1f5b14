//! Local snapshot backend
//!
//! Persists the whole story collection as one JSON document in a single slot
//! (a file). Every mutation is a read-modify-write of the full snapshot;
//! concurrent writers race last-write-wins. When no slot is available the
//! backend serves a built-in seed set and silently drops writes.

use crate::error::{StoreError, StoreResult};
use crate::story::Story;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::StoryBackend;

/// A single persisted slot holding serialized bytes.
///
/// An absent slot is a valid outcome (`Ok(None)`), not an error.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the slot contents, or `None` if the slot has never been written
    async fn read(&self) -> StoreResult<Option<Vec<u8>>>;

    /// Replace the slot contents
    async fn write(&self, bytes: &[u8]) -> StoreResult<()>;
}

/// File-backed snapshot slot
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default path (~/.config/storyvault/stories.json)
    pub fn default_path() -> StoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| StoreError::config("Could not determine home directory"))?;
        let path = home.join(".config").join("storyvault").join("stories.json");
        Ok(Self::new(path))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path).await?;
        Ok(Some(bytes))
    }

    async fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.path, bytes).await?;
        debug!(path = %self.path.display(), "wrote story snapshot");
        Ok(())
    }
}

/// In-memory snapshot slot (for tests and throwaway use)
#[derive(Default)]
pub struct MemorySnapshotStore {
    bytes: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemorySnapshotStore {
    /// Create an empty in-memory slot
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.bytes.lock().await.clone())
    }

    async fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        *self.bytes.lock().await = Some(bytes.to_vec());
        Ok(())
    }
}

/// Built-in example stories served when the slot holds no data.
///
/// Owned by the local backend; injected only as the initial snapshot value,
/// never mutated in place.
pub(crate) fn seed_stories() -> Vec<Story> {
    let seed = |id: &str, title: &str, content: &str, day: u32, hour: u32, minute: u32| {
        let at = Utc
            .with_ymd_and_hms(2024, 1, day, hour, minute, 0)
            .single()
            .unwrap_or_default();
        Story {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            is_visible: true,
            created_at: at,
            updated_at: at,
        }
    };

    vec![
        seed(
            "story-1",
            "My Journey Through High School",
            "<p>High school has been one of the most transformative experiences of my life. \
             Every challenge I faced, every friendship I made, and every lesson I learned has \
             shaped me into the person I am today.</p>\
             <p><strong>The most important thing I learned</strong> is that it's okay to not \
             have everything figured out. Trust yourself, be kind to others, and don't be \
             afraid to step outside your comfort zone.</p>",
            10,
            10,
            0,
        ),
        seed(
            "story-2",
            "The Power of Kindness",
            "<p>I used to think that being kind meant being weak. But one day, everything \
             changed: a girl I barely knew sat down next to me at lunch and asked if I was \
             okay.</p>\
             <p>Her simple act made me realize that <em>kindness isn't weakness - it's \
             strength</em>. When you're kind to someone, they're more likely to be kind to \
             others. It creates a ripple effect, one small act at a time.</p>",
            12,
            14,
            30,
        ),
        seed(
            "story-3",
            "Learning to Fail",
            "<p>Failure used to terrify me. Then I joined the school debate team, and I was \
             terrible at first - I lost every single debate for the first month.</p>\
             <p>My coach said something that changed everything: <strong>\"Every expert was \
             once a beginner.\"</strong> I kept practicing, and by the end of the year we won \
             the state championship. Failure isn't the opposite of success - it's a stepping \
             stone to it.</p>",
            14,
            9,
            15,
        ),
    ]
}

/// Local backend operating on a whole-collection snapshot.
pub struct LocalBackend {
    store: Option<Box<dyn SnapshotStore>>,
}

impl LocalBackend {
    /// Create a backend over the given snapshot slot
    pub fn new(store: impl SnapshotStore + 'static) -> Self {
        Self {
            store: Some(Box::new(store)),
        }
    }

    /// Backend with no slot: reads serve the seed set, writes are dropped
    pub fn detached() -> Self {
        Self { store: None }
    }

    /// Backend over the default file slot, detached when no home directory
    /// can be resolved
    pub fn with_default_store() -> Self {
        match FileSnapshotStore::default_path() {
            Ok(store) => Self::new(store),
            Err(e) => {
                warn!(error = %e, "no snapshot slot available, using detached local backend");
                Self::detached()
            }
        }
    }

    /// Load the full collection. Absent, unreadable, or unparsable slots all
    /// degrade to the seed set; this path never fails the call.
    async fn load_snapshot(&self) -> Vec<Story> {
        let Some(store) = &self.store else {
            debug!("no snapshot slot, serving seed stories");
            return seed_stories();
        };

        match store.read().await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(stories) => stories,
                Err(e) => {
                    warn!(error = %e, "snapshot slot holds invalid JSON, serving seed stories");
                    seed_stories()
                }
            },
            Ok(None) => seed_stories(),
            Err(e) => {
                warn!(error = %e, "failed to read snapshot slot, serving seed stories");
                seed_stories()
            }
        }
    }

    /// Write the full collection back. Failures are logged and swallowed;
    /// with no slot this is a no-op.
    async fn save_snapshot(&self, stories: &[Story]) {
        let Some(store) = &self.store else {
            debug!("no snapshot slot, dropping write");
            return;
        };

        let bytes = match serde_json::to_vec_pretty(stories) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "failed to serialize story snapshot");
                return;
            }
        };
        if let Err(e) = store.write(&bytes).await {
            warn!(error = %e, "failed to write story snapshot");
        }
    }
}

#[async_trait]
impl StoryBackend for LocalBackend {
    async fn fetch_visible(&self) -> StoreResult<Vec<Story>> {
        let mut stories: Vec<Story> = self
            .load_snapshot()
            .await
            .into_iter()
            .filter(|story| story.is_visible)
            .collect();
        // Most recent first; ties keep input order (not contractual)
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(stories)
    }

    async fn fetch_by_id(&self, id: &str) -> StoreResult<Story> {
        self.load_snapshot()
            .await
            .into_iter()
            .find(|story| story.id == id)
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn insert(&self, title: &str, content: &str, is_visible: bool) -> StoreResult<()> {
        let mut stories = self.load_snapshot().await;
        stories.push(Story::new(title, content, is_visible));
        self.save_snapshot(&stories).await;
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        title: &str,
        content: &str,
        is_visible: bool,
    ) -> StoreResult<()> {
        let mut stories = self.load_snapshot().await;
        let story = stories
            .iter_mut()
            .find(|story| story.id == id)
            .ok_or_else(|| StoreError::not_found(id))?;

        story.title = title.to_string();
        story.content = content.to_string();
        story.is_visible = is_visible;
        story.touch();

        self.save_snapshot(&stories).await;
        Ok(())
    }

    async fn update_visibility(&self, id: &str, is_visible: bool) -> StoreResult<()> {
        let mut stories = self.load_snapshot().await;
        let story = stories
            .iter_mut()
            .find(|story| story.id == id)
            .ok_or_else(|| StoreError::not_found(id))?;

        story.is_visible = is_visible;
        story.touch();

        self.save_snapshot(&stories).await;
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut stories = self.load_snapshot().await;
        let index = stories
            .iter()
            .position(|story| story.id == id)
            .ok_or_else(|| StoreError::not_found(id))?;

        stories.remove(index);
        self.save_snapshot(&stories).await;
        Ok(())
    }
}
