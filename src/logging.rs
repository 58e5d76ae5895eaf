//! File logging. The terminal belongs to the UI, so `tracing` output goes to
//! a daily rolling file under the state directory.

use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_state_dir};

const FILE_PREFIX: &str = "encore.log";

fn log_dir(settings: &LoggingSettings) -> Option<PathBuf> {
    settings.directory.clone().or_else(default_state_dir)
}

/// `RUST_LOG` when set, else the configured directives.
fn filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("encore=info"))
}

/// Install the global subscriber. The returned guard flushes the file on drop
/// and must be held until exit; `None` means logging is off.
pub fn init(settings: &LoggingSettings) -> Option<WorkerGuard> {
    if !settings.enabled {
        return None;
    }
    let Some(dir) = log_dir(settings) else {
        eprintln!("encore: no state directory for logs, logging disabled");
        return None;
    };
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("encore: cannot create {}: {e}, logging disabled", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(&dir, FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let installed = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter(settings))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init();
    if let Err(e) = installed {
        eprintln!("encore: logging already initialised: {e}");
        return None;
    }
    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_directory_wins() {
        let settings = LoggingSettings {
            directory: Some(PathBuf::from("/var/log/encore")),
            ..LoggingSettings::default()
        };
        assert_eq!(log_dir(&settings), Some(PathBuf::from("/var/log/encore")));
    }

    #[test]
    fn disabled_logging_installs_nothing() {
        let settings = LoggingSettings {
            enabled: false,
            ..LoggingSettings::default()
        };
        assert!(init(&settings).is_none());
    }

    #[test]
    fn invalid_directives_do_not_panic() {
        let settings = LoggingSettings {
            filter: "encore=[not valid".to_string(),
            ..LoggingSettings::default()
        };
        let _ = filter(&settings);
    }
}
