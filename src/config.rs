use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::verse::{default_decorations, Verse};

pub const DEFAULT_MASK: char = 'O';

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub reference: String,
    pub text: String,
    pub decorations: Vec<String>,
    pub mask: char,
}

impl Default for Config {
    fn default() -> Self {
        let verse = Verse::default();
        Self {
            reference: verse.reference,
            text: verse.text,
            decorations: default_decorations(),
            mask: DEFAULT_MASK,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mask.is_whitespace() || self.mask.is_control() {
            return Err(ConfigError::InvalidMask(self.mask));
        }
        Ok(())
    }

    pub fn verse(&self) -> Verse {
        Verse::new(self.reference.clone(), self.text.clone())
            .with_decorations(self.decorations.clone())
    }
}

pub trait ConfigStore {
    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    fn load(&self) -> Result<Config, ConfigError>;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "versemask") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("versemask_config.json")
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
    fn load(&self) -> Result<Config, ConfigError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let cfg = serde_json::from_slice::<Config>(&bytes).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), reference = %cfg.reference, "config loaded");
        Ok(cfg)
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, data).map_err(io_err)?;
        info!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

/// Read a verse body from a plain text file. Trailing line breaks are
/// dropped; everything else, including spacing, is kept as written.
pub fn read_text_file<P: AsRef<Path>>(path: P) -> Result<String, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.trim_end_matches(['\n', '\r']).to_string())
}
