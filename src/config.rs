//! Configuration for the bridge
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (blaze.toml)
//! - Environment variables (BLAZE_*)
//!
//! ## Example config file (blaze.toml):
//! ```toml
//! [library]
//! name = "blaze_wrapper"
//! # path = "/opt/blaze/libblaze_wrapper.so"
//!
//! [fetch]
//! connect_timeout_secs = 3
//! read_timeout_secs = 3
//!
//! [resolver]
//! max_uri_len = 2048
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;

/// Main configuration for the bridge
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    /// Native library settings
    #[serde(default)]
    pub library: LibraryConfig,

    /// Remote fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Resolver callback settings
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Native library configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Explicit path to the shared library; takes precedence over `name`
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Base library name, resolved to a platform file name and searched
    /// on the loader path
    #[serde(default = "default_library_name")]
    pub name: String,
}

/// Remote schema fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Connect timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Read timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl FetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Upper bound for one fetch: connect plus read
    pub fn total_timeout(&self) -> Duration {
        self.connect_timeout() + self.read_timeout()
    }
}

/// Resolver callback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Maximum accepted byte length of a reference URI. Longer input is
    /// treated as a resolution failure rather than scanned further.
    #[serde(default = "default_max_uri_len")]
    pub max_uri_len: usize,
}

// Default value functions
fn default_library_name() -> String {
    "blaze_wrapper".to_string()
}

fn default_timeout_secs() -> u64 {
    3
}

fn default_max_uri_len() -> usize {
    2048
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: None,
            name: default_library_name(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_timeout_secs(),
            read_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_uri_len: default_max_uri_len(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = ["blaze.toml", ".blaze.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Environment variables (BLAZE_*), e.g. BLAZE_LIBRARY__PATH
        builder = builder.add_source(
            Environment::with_prefix("BLAZE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
