//! Supabase (PostgREST) backend

use crate::config::RemoteConfig;
use crate::error::{StoreError, StoreResult};
use crate::story::Story;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;

use super::StoryBackend;

const STORIES_TABLE: &str = "stories";

/// Remote backend talking to a Supabase project's PostgREST API.
///
/// Filtering is equality on named columns (`id=eq.{id}`), ordering by a named
/// column; mutations are best-effort single round trips with no affected-row
/// count requested.
pub struct RemoteBackend {
    base_url: String,
    anon_key: String,
    http_client: Client,
}

impl RemoteBackend {
    /// Create a remote backend from a valid configuration.
    ///
    /// Fails when the configuration is absent or still holds template
    /// placeholders.
    pub fn new(config: &RemoteConfig) -> StoreResult<Self> {
        if !config.is_configured() {
            return Err(StoreError::config("Supabase URL or anon key not configured"));
        }
        let base_url = config
            .url
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string();
        let anon_key = config.anon_key.clone().unwrap_or_default();

        Ok(Self {
            base_url,
            anon_key,
            http_client: Client::new(),
        })
    }

    /// REST endpoint for the stories table
    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, STORIES_TABLE)
    }

    /// Attach the Supabase auth headers
    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    /// Map a non-2xx response to a remote error carrying status and body
    async fn check(response: Response) -> StoreResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        Err(StoreError::remote(format!(
            "Supabase API error (status {}): {}",
            status, error_text
        )))
    }
}

#[async_trait]
impl StoryBackend for RemoteBackend {
    async fn fetch_visible(&self) -> StoreResult<Vec<Story>> {
        let request = self
            .authed(self.http_client.get(self.table_url()))
            .query(&[
                ("select", "*"),
                ("is_visible", "eq.true"),
                ("order", "created_at.desc"),
            ]);

        let response = Self::check(request.send().await?).await?;
        let stories: Vec<Story> = response.json().await?;

        tracing::debug!(count = stories.len(), "fetched visible stories from Supabase");
        Ok(stories)
    }

    async fn fetch_by_id(&self, id: &str) -> StoreResult<Story> {
        // The single-object representation turns "no match" into an API error,
        // which the repository flattens to None.
        let id_filter = format!("eq.{}", id);
        let request = self
            .authed(self.http_client.get(self.table_url()))
            .header("Accept", "application/vnd.pgrst.object+json")
            .query(&[("select", "*"), ("id", id_filter.as_str())]);

        let response = Self::check(request.send().await?).await?;
        let story: Story = response.json().await?;
        Ok(story)
    }

    async fn insert(&self, title: &str, content: &str, is_visible: bool) -> StoreResult<()> {
        // id and timestamps come from column defaults server-side
        let body = json!([{
            "title": title,
            "content": content,
            "is_visible": is_visible,
        }]);

        let request = self
            .authed(self.http_client.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(&body);

        Self::check(request.send().await?).await?;
        tracing::debug!(title, "inserted story into Supabase");
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        title: &str,
        content: &str,
        is_visible: bool,
    ) -> StoreResult<()> {
        let body = json!({
            "title": title,
            "content": content,
            "is_visible": is_visible,
            "updated_at": Utc::now(),
        });

        let request = self
            .authed(self.http_client.patch(self.table_url()))
            .header("Prefer", "return=minimal")
            .query(&[("id", &format!("eq.{}", id))])
            .json(&body);

        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn update_visibility(&self, id: &str, is_visible: bool) -> StoreResult<()> {
        let body = json!({
            "is_visible": is_visible,
            "updated_at": Utc::now(),
        });

        let request = self
            .authed(self.http_client.patch(self.table_url()))
            .header("Prefer", "return=minimal")
            .query(&[("id", &format!("eq.{}", id))])
            .json(&body);

        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let request = self
            .authed(self.http_client.delete(self.table_url()))
            .query(&[("id", &format!("eq.{}", id))]);

        Self::check(request.send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let config = RemoteConfig::new("https://project.supabase.co/", "anon-key");
        let backend = RemoteBackend::new(&config).unwrap();
        assert_eq!(
            backend.table_url(),
            "https://project.supabase.co/rest/v1/stories"
        );
    }

    #[test]
    fn test_new_rejects_unconfigured() {
        assert!(RemoteBackend::new(&RemoteConfig::disabled()).is_err());

        let placeholder = RemoteConfig::new("your_supabase_url_here", "anon-key");
        assert!(RemoteBackend::new(&placeholder).is_err());
    }
}
