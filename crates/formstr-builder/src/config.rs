use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_RELAYS: &[&str] = &[
    "wss://relay.damus.io",
    "wss://relay.primal.net",
    "wss://nos.lol",
    "wss://relay.nostr.wirednet.jp",
    "wss://nostr-01.yakihonne.com",
    "wss://relay.snort.social",
    "wss://relay.nostr.band",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// User configuration for the builder, read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub default_relays: Vec<String>,
    pub draft_dir: Option<PathBuf>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_relays: DEFAULT_RELAYS.iter().map(|relay| relay.to_string()).collect(),
            draft_dir: None,
        }
    }
}

impl BuilderConfig {
    /// Loads `path`, or the platform config file when `path` is `None`.
    ///
    /// A missing file yields the defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::read(path),
            None => match project_dirs() {
                Some(dirs) => {
                    let path = dirs.config_dir().join(CONFIG_FILE_NAME);
                    if path.exists() {
                        Self::read(&path)
                    } else {
                        Ok(Self::default())
                    }
                }
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_toml_str(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw, path)?;
        tracing::debug!(path = %path.display(), relays = config.default_relays.len(), "loaded builder config");
        Ok(config)
    }

    /// Directory holding persisted drafts.
    pub fn draft_dir(&self) -> PathBuf {
        if let Some(dir) = &self.draft_dir {
            return dir.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join("drafts"))
            .unwrap_or_else(|| PathBuf::from(".formstr").join("drafts"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("app", "formstr", "formstr")
}
