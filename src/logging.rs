//! Logging infrastructure for crop-advisor.
//!
//! Provides structured file logging with daily rotation to platform-standard directories.
//! Standard output stays reserved for recommendations.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use directories::ProjectDirs;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, reload};

/// Prefix of every log file this tool writes.
const LOG_FILE_PREFIX: &str = "crop-advisor";

/// Log files older than this are removed by [`cleanup_old_logs`].
const RETENTION_DAYS: u64 = 7;

/// Handle for swapping the active level filter after startup.
pub type ReloadHandle = reload::Handle<EnvFilter, Registry>;

/// Result of initializing the logging system.
pub struct LoggingContext {
    /// Guard that must be held for the application lifetime to ensure logs are flushed.
    pub _guard: WorkerGuard,
    /// The session ID for this invocation.
    pub session_id: String,
    /// The directory where logs are written.
    pub log_directory: PathBuf,
    /// Handle for applying the configured log level once config is loaded.
    pub reload_handle: ReloadHandle,
    /// True when `RUST_LOG` supplied the filter; configured levels then don't apply.
    pub filter_from_env: bool,
}

/// Error that occurred during logging initialization.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct LoggingError {
    pub message: String,
}

impl LoggingError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Generates a 6-character random hex session ID.
fn generate_session_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let bytes: [u8; 3] = rng.random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Platform log directory.
///
/// macOS: ~/Library/Logs/crop-advisor/
/// Linux: ~/.local/state/crop-advisor/
/// Windows: %LocalAppData%\crop-advisor\data\logs\
fn log_directory() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        return dirs::home_dir().map(|home| home.join("Library").join("Logs").join(LOG_FILE_PREFIX));
    }

    let project_dirs = ProjectDirs::from("dev", "crop-advisor", "crop-advisor")?;
    project_dirs
        .state_dir()
        .map(PathBuf::from)
        .or_else(|| Some(project_dirs.data_local_dir().join("logs")))
}

/// Initializes the logging system.
///
/// The returned `WorkerGuard` must be held for the application lifetime.
pub fn init() -> Result<LoggingContext, LoggingError> {
    let session_id = generate_session_id();

    let log_dir =
        log_directory().ok_or_else(|| LoggingError::new("Failed to determine log directory"))?;

    fs::create_dir_all(&log_dir)
        .map_err(|e| LoggingError::new(format!("Failed to create log directory: {}", e)))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let (env_filter, filter_from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new("info"), false),
    };
    let (filter_layer, reload_handle) = reload::Layer::new(env_filter);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| LoggingError::new(format!("Failed to install subscriber: {}", e)))?;

    info!(session_id = %session_id, "session_start");

    Ok(LoggingContext {
        _guard: guard,
        session_id,
        log_directory: log_dir,
        reload_handle,
        filter_from_env,
    })
}

/// Replace the active filter with `level` (any `EnvFilter` directive string).
pub fn update_log_level(handle: &ReloadHandle, level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_new(level)
        .map_err(|e| format!("Invalid log level '{}': {}", level, e))?;
    handle
        .reload(filter)
        .map_err(|e| format!("Failed to update log level: {}", e))
}

/// Cleans up log files older than the retention period.
///
/// Scans the log directory for `crop-advisor.*` files and deletes those older than 7 days.
/// Errors are logged at WARN level but never abort the run.
pub fn cleanup_old_logs(log_dir: &Path) -> u32 {
    let retention_duration = Duration::from_secs(RETENTION_DAYS * 24 * 60 * 60);

    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Failed to read log directory for cleanup");
            return 0;
        }
    };

    let now = SystemTime::now();
    let mut deleted_count = 0u32;

    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();

        // Only process crop-advisor.* log files
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if is_log_file(name) => name.to_string(),
            _ => continue,
        };

        let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) => {
                warn!(file = %file_name, error = %e, "Failed to get modification time for log file");
                continue;
            }
        };

        let age = match now.duration_since(modified) {
            Ok(d) => d,
            Err(_) => continue, // File is in the future, skip
        };

        if age > retention_duration {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(file = %file_name, age_days = age.as_secs() / 86400, "Deleted old log file");
                    deleted_count += 1;
                }
                Err(e) => {
                    warn!(file = %file_name, error = %e, "Failed to delete old log file");
                }
            }
        }
    }

    if deleted_count > 0 {
        debug!(count = deleted_count, "Log cleanup completed");
    }
    deleted_count
}

fn is_log_file(name: &str) -> bool {
    name.strip_prefix(LOG_FILE_PREFIX)
        .is_some_and(|rest| rest.starts_with('.') && rest.len() > 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, age: Duration) {
        let file = fs::File::create(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn test_session_id_is_six_hex_chars() {
        let id = generate_session_id();
        assert_eq!(id.len(), 6);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_is_log_file() {
        assert!(is_log_file("crop-advisor.2026-10-01"));
        assert!(!is_log_file("crop-advisor"));
        assert!(!is_log_file("crop-advisor."));
        assert!(!is_log_file("crop-advisorx.2026-10-01"));
        assert!(!is_log_file("other.2026-10-01"));
    }

    #[test]
    fn test_cleanup_removes_only_old_log_files() {
        let dir = tempfile::tempdir().unwrap();
        let old_log = dir.path().join("crop-advisor.2026-09-01");
        let fresh_log = dir.path().join("crop-advisor.2026-10-17");
        let old_other = dir.path().join("notes.txt");
        let week = Duration::from_secs(RETENTION_DAYS * 24 * 60 * 60);

        touch(&old_log, week + Duration::from_secs(3600));
        touch(&fresh_log, Duration::from_secs(60));
        touch(&old_other, week * 4);

        assert_eq!(cleanup_old_logs(dir.path()), 1);
        assert!(!old_log.exists());
        assert!(fresh_log.exists());
        assert!(old_other.exists());
    }

    #[test]
    fn test_cleanup_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(&dir.path().join("missing")), 0);
    }

    #[test]
    fn test_update_log_level_rejects_bad_directive() {
        let (_layer, handle) = reload::Layer::<EnvFilter, Registry>::new(EnvFilter::new("info"));
        assert!(update_log_level(&handle, "crop_advisor=notalevel").is_err());
    }

    #[test]
    fn test_update_log_level_accepts_level() {
        let (layer, handle) = reload::Layer::<EnvFilter, Registry>::new(EnvFilter::new("info"));
        let _subscriber = tracing_subscriber::registry().with(layer);
        assert!(update_log_level(&handle, "debug").is_ok());
    }
}
