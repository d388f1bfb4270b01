//! Log file setup
//!
//! The terminal belongs to the UI, so diagnostics go to a file in the
//! XDG cache directory (`~/.cache/tripgen/tripgen.log` on Linux). The
//! level is read from `RUST_LOG` and defaults to `tripgen=info`.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "tripgen=info";

/// Name of the log file inside the cache directory
const LOG_FILE_NAME: &str = "tripgen.log";

/// Errors that can occur while setting up logging
#[derive(Debug, Error)]
pub enum LoggingError {
    /// No home directory to derive a cache path from
    #[error("Could not determine a cache directory for the log file")]
    NoCacheDir,

    /// The log file or its directory could not be created
    #[error("Could not open log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber was already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Returns the default log location, if a cache directory can be determined
pub fn default_log_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "tripgen")?;
    Some(project_dirs.cache_dir().join(LOG_FILE_NAME))
}

/// Opens a log file for appending, creating parent directories as needed
pub fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    let io_error = |source| LoggingError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)
}

/// Installs the global tracing subscriber writing to `path` (or the default
/// location).
///
/// # Returns
/// The path of the log file in use
pub fn init(path: Option<&Path>) -> Result<PathBuf, LoggingError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_log_path().ok_or(LoggingError::NoCacheDir)?,
    };
    let file = open_log_file(&path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(path)
}
