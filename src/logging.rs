//! Logging setup
//!
//! The dashboard owns the terminal, so in TUI mode logs go to a file in the
//! XDG cache directory (`~/.cache/skycast/skycast.log` on Linux). One-shot
//! mode logs to stderr. `RUST_LOG` overrides the default `skycast=info` filter.
//!
//! A log file that has grown past [`MAX_LOG_BYTES`] is moved aside to
//! `skycast.log.old` at startup, so at most two files are kept.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "skycast=info";

/// Size at which the log file is rotated
pub const MAX_LOG_BYTES: u64 = 1024 * 1024;

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error, for non-interactive runs
    Stderr,
    /// Append to a file
    File(PathBuf),
    /// No log output
    Disabled,
}

impl LogTarget {
    /// File target in the cache directory, or `Disabled` when there is none
    pub fn default_file() -> Self {
        ProjectDirs::from("", "", "skycast")
            .map(|dirs| LogTarget::File(dirs.cache_dir().join("skycast.log")))
            .unwrap_or(LogTarget::Disabled)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global tracing subscriber
pub fn init(target: &LogTarget) -> io::Result<()> {
    match target {
        LogTarget::Disabled => Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(io::stderr)
            .try_init()
            .map_err(io::Error::other),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            rotate_if_large(path, MAX_LOG_BYTES)?;
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(io::Error::other)
        }
    }
}

/// Move `path` to `<path>.old` when it is at least `limit` bytes
fn rotate_if_large(path: &Path, limit: u64) -> io::Result<()> {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if size < limit {
        return Ok(());
    }

    let mut rotated = path.as_os_str().to_owned();
    rotated.push(".old");
    fs::rename(path, rotated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_disabled_target_is_a_no_op() {
        assert!(init(&LogTarget::Disabled).is_ok());
    }

    #[test]
    fn test_default_file_lives_in_cache_dir() {
        if let LogTarget::File(path) = LogTarget::default_file() {
            assert!(path.ends_with("skycast.log"));
        }
    }

    #[test]
    fn test_small_log_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skycast.log");
        fs::write(&path, "short").unwrap();

        rotate_if_large(&path, 1024).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
        assert!(!dir.path().join("skycast.log.old").exists());
    }

    #[test]
    fn test_large_log_is_moved_aside() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skycast.log");
        fs::write(dir.path().join("skycast.log.old"), "older").unwrap();
        fs::write(&path, "x".repeat(64)).unwrap();

        rotate_if_large(&path, 64).unwrap();

        assert!(!path.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("skycast.log.old")).unwrap(),
            "x".repeat(64)
        );
    }

    #[test]
    fn test_missing_log_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(rotate_if_large(&dir.path().join("skycast.log"), 1).is_ok());
    }
}
