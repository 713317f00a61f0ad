use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Interactive statistics over US bikeshare trip data
///
/// The city/month/day selection is always interactive; the flags here only
/// configure where the datasets live and how the tool logs.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bikeshare-explorer",
    about = "Interactive statistics over US bikeshare trip data",
    version
)]
pub struct Settings {
    /// Directory containing the city CSV files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to
/// `~/.bikeshare-explorer/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".bikeshare-explorer").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl From<&Settings> for LastUsedParams {
    fn from(settings: &Settings) -> Self {
        Self {
            data_dir: settings.data_dir.clone(),
            log_level: Some(settings.log_level.clone()),
        }
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on
        // the command line (CLI always wins).
        if !is_arg_explicitly_set(&matches, "data_dir") && settings.data_dir.is_none() {
            settings.data_dir = last.data_dir;
        }
        if !is_arg_explicitly_set(&matches, "log_level") {
            if let Some(v) = last.log_level {
                settings.log_level = v;
            }
        }

        settings = Self::apply_debug_flag(settings);

        // Persist current settings for next run.
        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::warn!("Could not persist settings: {}", e);
        }

        settings
    }

    /// `--debug` overrides whatever log level was configured.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

/// Whether the user explicitly passed the argument on the command line, as
/// opposed to it taking its default value.
///
/// NOTE: clap stores the arg id using the *field name* (underscores), not
/// the long-flag spelling (hyphens).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, id: &str) -> bool {
    matches!(
        matches.value_source(id),
        Some(clap::parser::ValueSource::CommandLine)
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<OsString> {
        std::iter::once("bikeshare-explorer")
            .chain(list.iter().copied())
            .map(OsString::from)
            .collect()
    }

    // ── LastUsedParams round trip ─────────────────────────────────────────────

    #[test]
    fn test_last_used_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = LastUsedParams::config_path_in(tmp.path());

        let params = LastUsedParams {
            data_dir: Some(PathBuf::from("/srv/bikeshare")),
            log_level: Some("WARNING".to_string()),
        };
        params.save_to(&path).unwrap();

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.data_dir, Some(PathBuf::from("/srv/bikeshare")));
        assert_eq!(loaded.log_level, Some("WARNING".to_string()));
    }

    #[test]
    fn test_last_used_load_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let loaded = LastUsedParams::load_from(&tmp.path().join("nope.json"));
        assert!(loaded.data_dir.is_none());
        assert!(loaded.log_level.is_none());
    }

    #[test]
    fn test_last_used_load_corrupt_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("last_used.json");
        std::fs::write(&path, "{not json").unwrap();
        let loaded = LastUsedParams::load_from(&path);
        assert!(loaded.data_dir.is_none());
    }

    #[test]
    fn test_last_used_clear_at() {
        let tmp = TempDir::new().unwrap();
        let path = LastUsedParams::config_path_in(tmp.path());
        LastUsedParams::default().save_to(&path).unwrap();
        assert!(path.exists());
        LastUsedParams::clear_at(&path).unwrap();
        assert!(!path.exists());
    }

    // ── load_with_last_used_impl ──────────────────────────────────────────────

    #[test]
    fn test_cli_value_wins_over_last_used() {
        let tmp = TempDir::new().unwrap();
        let path = LastUsedParams::config_path_in(tmp.path());
        LastUsedParams {
            data_dir: Some(PathBuf::from("/old")),
            log_level: Some("ERROR".to_string()),
        }
        .save_to(&path)
        .unwrap();

        let settings =
            Settings::load_with_last_used_impl(args(&["--data-dir", "/new"]), &path);
        assert_eq!(settings.data_dir, Some(PathBuf::from("/new")));
        // log_level not given on the CLI, so the stored value applies.
        assert_eq!(settings.log_level, "ERROR");
    }

    #[test]
    fn test_last_used_fills_unset_fields() {
        let tmp = TempDir::new().unwrap();
        let path = LastUsedParams::config_path_in(tmp.path());
        LastUsedParams {
            data_dir: Some(PathBuf::from("/srv/data")),
            log_level: None,
        }
        .save_to(&path)
        .unwrap();

        let settings = Settings::load_with_last_used_impl(args(&[]), &path);
        assert_eq!(settings.data_dir, Some(PathBuf::from("/srv/data")));
        assert_eq!(settings.log_level, "INFO");
    }

    #[test]
    fn test_settings_are_persisted_for_next_run() {
        let tmp = TempDir::new().unwrap();
        let path = LastUsedParams::config_path_in(tmp.path());

        Settings::load_with_last_used_impl(args(&["--data-dir", "/srv/d"]), &path);

        let stored = LastUsedParams::load_from(&path);
        assert_eq!(stored.data_dir, Some(PathBuf::from("/srv/d")));
    }

    #[test]
    fn test_clear_removes_saved_config() {
        let tmp = TempDir::new().unwrap();
        let path = LastUsedParams::config_path_in(tmp.path());
        LastUsedParams {
            data_dir: Some(PathBuf::from("/old")),
            log_level: None,
        }
        .save_to(&path)
        .unwrap();

        let settings = Settings::load_with_last_used_impl(args(&["--clear"]), &path);
        assert!(!path.exists());
        // Stored data_dir must not leak into the cleared run.
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn test_debug_flag_forces_debug_level() {
        let tmp = TempDir::new().unwrap();
        let path = LastUsedParams::config_path_in(tmp.path());
        let settings = Settings::load_with_last_used_impl(
            args(&["--debug", "--log-level", "ERROR"]),
            &path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }
}
