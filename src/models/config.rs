//! Application configuration structures.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Default cache file location, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = ".feedsky/cache.json";

/// Root application configuration.
///
/// Loaded from an optional TOML file; every field falls back to a default
/// so a missing file is not an error.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Post composition settings
    #[serde(default)]
    pub post: PostConfig,

    /// Link-preview embed settings
    #[serde(default)]
    pub embed: EmbedConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.post.max_graphemes == 0 {
            return Err(AppError::validation("post.max_graphemes must be > 0"));
        }
        if self.embed.image_width == 0 || self.embed.image_height == 0 {
            return Err(AppError::validation(
                "embed.image_width and embed.image_height must be > 0",
            ));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Post composition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostConfig {
    /// Platform limit on post length, in grapheme clusters
    #[serde(default = "defaults::max_graphemes")]
    pub max_graphemes: usize,

    /// Language tags attached to each post
    #[serde(default = "defaults::langs")]
    pub langs: Vec<String>,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            max_graphemes: defaults::max_graphemes(),
            langs: defaults::langs(),
        }
    }
}

/// Link-preview embed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Attach a link-preview card to posts
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    /// Resize thumbnails before upload (keeps blobs under the platform
    /// size cap)
    #[serde(default = "defaults::enabled")]
    pub resize: bool,

    /// Thumbnail bounding-box width in pixels
    #[serde(default = "defaults::image_width")]
    pub image_width: u32,

    /// Thumbnail bounding-box height in pixels
    #[serde(default = "defaults::image_height")]
    pub image_height: u32,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            resize: defaults::enabled(),
            image_width: defaults::image_width(),
            image_height: defaults::image_height(),
        }
    }
}

/// Bluesky account credentials, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account handle or DID
    pub identifier: String,

    /// App password
    pub password: String,

    /// Service endpoint URL
    pub service: String,
}

impl Credentials {
    /// Read credentials from `BSKY_HANDLE`, `BSKY_PASSWORD` and
    /// `BSKY_SERVICE`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            env::var("BSKY_HANDLE").ok(),
            env::var("BSKY_PASSWORD").ok(),
            env::var("BSKY_SERVICE").ok(),
        )
    }

    /// Build credentials from raw variable values.
    ///
    /// Handle and password are required non-empty; the service URL falls
    /// back to the public endpoint.
    pub fn from_vars(
        handle: Option<String>,
        password: Option<String>,
        service: Option<String>,
    ) -> Result<Self> {
        let identifier = handle
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::config("BSKY_HANDLE is not set"))?;
        let password = password
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::config("BSKY_PASSWORD is not set"))?;
        let service = service
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(defaults::service);

        Ok(Self {
            identifier,
            password,
            service,
        })
    }
}

/// Per-run bot options, set from the command line.
#[derive(Debug, Clone)]
pub struct BotOptions {
    /// Path of the publish-history cache file
    pub cache_file: PathBuf,

    /// Maximum number of fingerprints kept in the cache
    pub cache_limit: usize,

    /// Publish quota for the very first run (no cache file yet)
    pub initial_post_limit: usize,

    /// Publish quota for steady-state runs
    pub post_limit: usize,

    /// Compute but do not publish
    pub dry_run: bool,
}

impl Default for BotOptions {
    fn default() -> Self {
        Self {
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            cache_limit: 100,
            initial_post_limit: 1,
            post_limit: 1,
            dry_run: false,
        }
    }
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; feedsky/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Post defaults
    pub fn max_graphemes() -> usize {
        300
    }
    pub fn langs() -> Vec<String> {
        vec!["en".into()]
    }

    // Embed defaults
    pub fn enabled() -> bool {
        true
    }
    pub fn image_width() -> u32 {
        1200
    }
    pub fn image_height() -> u32 {
        630
    }

    // Service defaults
    pub fn service() -> String {
        "https://bsky.social".into()
    }
}
