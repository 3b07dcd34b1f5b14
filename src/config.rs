//! Remote backend configuration
//!
//! Two environment values select the remote backend; anything else falls back
//! to the local snapshot store.

use std::env;

/// Environment variable holding the Supabase project URL
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
/// Environment variable holding the Supabase anon key
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";

/// Placeholder values shipped in `.env` templates; treated as "not configured"
const PLACEHOLDER_URL: &str = "your_supabase_url_here";
const PLACEHOLDER_ANON_KEY: &str = "your_supabase_anon_key_here";

/// Remote backend configuration, read once and assumed static for the
/// process lifetime.
#[derive(Debug, Clone, Default)]
pub struct RemoteConfig {
    /// Supabase project URL
    pub url: Option<String>,
    /// Supabase anon key
    pub anon_key: Option<String>,
}

impl RemoteConfig {
    /// Build a configuration from explicit values
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            anon_key: Some(anon_key.into()),
        }
    }

    /// Load configuration from `SUPABASE_URL` and `SUPABASE_ANON_KEY`
    pub fn from_env() -> Self {
        Self {
            url: env::var(ENV_SUPABASE_URL).ok(),
            anon_key: env::var(ENV_SUPABASE_ANON_KEY).ok(),
        }
    }

    /// A configuration that always selects the local backend
    pub fn disabled() -> Self {
        Self::default()
    }

    /// True only when both values are present, non-empty, and neither is a
    /// template placeholder. Pure; safe to re-evaluate on every call.
    pub fn is_configured(&self) -> bool {
        let url_ok = self
            .url
            .as_deref()
            .is_some_and(|url| !url.is_empty() && url != PLACEHOLDER_URL);
        let key_ok = self
            .anon_key
            .as_deref()
            .is_some_and(|key| !key.is_empty() && key != PLACEHOLDER_ANON_KEY);
        url_ok && key_ok
    }
}
