//! File logging. The terminal belongs to the UI, so log lines go to a file
//! (by default under the user's state directory) instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_LEVEL: &str = "info";
const LOG_FILE: &str = "versemask.log";

/// Log file under the platform state directory. Platforms without one
/// (macOS, Windows) use the local data directory instead.
pub fn default_log_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "versemask")?;
    let dir = dirs
        .state_dir()
        .unwrap_or_else(|| dirs.data_local_dir())
        .to_path_buf();
    Some(dir.join(LOG_FILE))
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub path: Option<PathBuf>,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
            level: DEFAULT_LEVEL.to_string(),
        }
    }
}

impl LoggingConfig {
    /// `RUST_LOG` wins over the configured level when set.
    pub fn filter(&self) -> EnvFilter {
        if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
        }
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Returns the file being written to, or
/// `None` when logging could not be set up; the app runs either way.
pub fn init_logging(config: &LoggingConfig) -> Option<PathBuf> {
    let path = config.path.clone()?;
    let file = open_log_file(&path).ok()?;

    fmt::Subscriber::builder()
        .with_env_filter(config.filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .ok()?;

    Some(path)
}
