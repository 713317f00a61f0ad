use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.bikeshare-explorer/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing
/// parents):
/// - `~/.bikeshare-explorer/`
/// - `~/.bikeshare-explorer/logs/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let explorer_dir = home.join(".bikeshare-explorer");
    std::fs::create_dir_all(&explorer_dir)?;
    std::fs::create_dir_all(explorer_dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
///
/// The `log_file` parameter is accepted for forward-compatibility but file
/// logging is not yet wired – all output currently goes to stderr, keeping
/// stdout free for the interactive prompts and reports.
pub fn setup_logging(log_level: &str, _log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let normalised = match log_level.to_uppercase().as_str() {
        "DEBUG" | "CRITICAL" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        other => other.to_lowercase(),
    };

    let filter = EnvFilter::try_new(&normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Data-directory discovery ───────────────────────────────────────────────────

/// Attempt to locate the directory holding the city CSV files.
///
/// Checks the following paths in order and returns the first that exists:
/// 1. `./data/` under the current working directory
/// 2. `~/.bikeshare-explorer/data/`
///
/// Returns `None` when neither path exists; the caller then falls back to
/// a plain `data/` path so the missing-directory error names something
/// sensible.
pub fn discover_data_dir() -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join("data"));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".bikeshare-explorer").join("data"));
    }
    candidates.into_iter().find(|p| p.is_dir())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── test_ensure_directories ───────────────────────────────────────────────

    #[test]
    fn test_ensure_directories() {
        let tmp = TempDir::new().expect("tempdir");

        // Override HOME so that dirs::home_dir() resolves to our temp dir.
        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", tmp.path());

        let result = ensure_directories();

        // Restore HOME.
        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }

        result.expect("ensure_directories should succeed");

        let explorer_dir = tmp.path().join(".bikeshare-explorer");
        assert!(explorer_dir.is_dir(), ".bikeshare-explorer dir must exist");
        assert!(
            explorer_dir.join("logs").is_dir(),
            "logs subdir must exist"
        );
    }

    // ── test_discover_data_dir ────────────────────────────────────────────────

    #[test]
    fn test_discover_data_dir_finds_home_data() {
        let tmp = TempDir::new().expect("tempdir");
        let data = tmp.path().join(".bikeshare-explorer").join("data");
        std::fs::create_dir_all(&data).expect("create data dir");

        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", tmp.path());

        let found = discover_data_dir();

        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }

        // The cwd candidate may exist on a dev machine, so only require that
        // *some* candidate was found and that the home one is acceptable.
        let found = found.expect("a data dir should be discovered");
        assert!(found.ends_with("data"));
    }
}
