//! # Configuration
//!
//! Where the registry lives and how to authenticate against it.
//!
//! Resolution order, lowest to highest precedence:
//! 1. Built-in defaults (`http://localhost:9081`, no token)
//! 2. TOML file (`--config`, or `$HOME/.meshery/meshport.toml` if present)
//! 3. Environment (`MESHPORT_URL`, `MESHPORT_TOKEN`)
//! 4. `--url` flag
//!
//! ```toml
//! [server]
//! url = "https://meshery.example.com"
//!
//! [auth]
//! token = "..."
//! ```

use meshport_core::ImportError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Registry URL used when nothing else is configured.
pub const DEFAULT_REGISTRY_URL: &str = "http://localhost:9081";

/// Name of the per-user Meshery folder under `$HOME`.
pub const MESHERY_FOLDER: &str = ".meshery";

/// File name of the configuration inside the Meshery folder.
const CONFIG_FILE_NAME: &str = "meshport.toml";

/// Environment variable overriding the registry URL.
pub const ENV_URL: &str = "MESHPORT_URL";

/// Environment variable overriding the bearer token.
pub const ENV_TOKEN: &str = "MESHPORT_TOKEN";

// =============================================================================
// CONFIG TYPES
// =============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registry server settings.
    pub server: ServerConfig,
    /// Authentication settings.
    pub auth: AuthConfig,
}

/// Registry server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the registry.
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REGISTRY_URL.to_string(),
        }
    }
}

/// Authentication settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer token sent with every request.
    pub token: Option<String>,
}

// =============================================================================
// LOADING
// =============================================================================

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self, ImportError> {
        toml::from_str(contents).map_err(|e| ImportError::Config(e.to_string()))
    }

    /// Load the configuration file.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used if present and defaults apply otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ImportError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Self::default()),
            },
        };

        tracing::debug!("Loading configuration from {:?}", path);
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            ImportError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Overlay `MESHPORT_URL` and `MESHPORT_TOKEN` read through `lookup`.
    #[must_use]
    pub fn with_env_from<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.with_overrides(lookup(ENV_URL), lookup(ENV_TOKEN))
    }

    /// Overlay a URL and a token; empty values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.server.url = url;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.auth.token = Some(token);
        }
        self
    }

    /// Full resolution: file, then environment, then the `--url` flag.
    pub fn resolve(path: Option<&Path>, url_flag: Option<String>) -> Result<Self, ImportError> {
        Self::resolve_with(path, url_flag, |key| std::env::var(key).ok())
    }

    /// [`Config::resolve`] with the environment read through `lookup`.
    pub fn resolve_with<F>(
        path: Option<&Path>,
        url_flag: Option<String>,
        lookup: F,
    ) -> Result<Self, ImportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::load(path)?
            .with_env_from(lookup)
            .with_overrides(url_flag, None);
        config.validate()?;
        Ok(config)
    }

    /// Check that the registry URL is usable.
    pub fn validate(&self) -> Result<(), ImportError> {
        if !meshport_core::is_valid_url(&self.server.url) {
            return Err(ImportError::Config(format!(
                "registry URL {:?} is not an absolute URL",
                self.server.url
            )));
        }
        Ok(())
    }

    /// Registry base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.server.url.trim_end_matches('/')
    }
}

/// `$HOME/.meshery`, if a home directory is known.
#[must_use]
pub fn meshery_folder() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(MESHERY_FOLDER))
}

/// `$HOME/.meshery/meshport.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    meshery_folder().map(|folder| folder.join(CONFIG_FILE_NAME))
}

// =============================================================================
// TESTS
// =============================================================================
