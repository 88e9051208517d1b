use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{clock::DEFAULT_ROUND_SECS, error::ConfigError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub round_secs: u32,
    /// Bundled list used when no `words_file` is given.
    pub word_list: String,
    pub words_file: Option<PathBuf>,
    pub players: Vec<String>,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_secs: DEFAULT_ROUND_SECS,
            word_list: "polish".to_string(),
            words_file: None,
            players: Vec::new(),
            seed: None,
        }
    }
}

impl Config {
    fn validated(self) -> Result<Self, ConfigError> {
        if self.round_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(self)
    }
}

/// Read-only source of game preferences; nothing about a play-through is
/// ever written back.
pub trait ConfigStore {
    fn load(&self) -> Result<Config, ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "pword") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("pword_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// A missing file is not an error: defaults apply.
    fn load(&self) -> Result<Config, ConfigError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice::<Config>(&bytes)?.validated()
    }
}
