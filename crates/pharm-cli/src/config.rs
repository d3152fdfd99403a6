//! TOML configuration.
//!
//! Resolution order:
//! 1. `--config <PATH>`
//! 2. `PHARM_REPORTS_CONFIG` environment variable
//! 3. `pharm-reports.toml` in the working directory, if present
//! 4. built-in defaults
//!
//! Relative paths inside a config file are resolved against the file's
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "PHARM_REPORTS_CONFIG";

/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pharm-reports.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Pharmacy registry CSV.
    pub registry_path: PathBuf,
    /// Directory with the `공급내역보고_*` template workbooks.
    pub template_dir: PathBuf,
    /// Root of the per-submission artifact store.
    pub artifact_dir: PathBuf,
    pub artifact_ttl_hours: u32,
    /// Supply report date is this many days before today.
    pub report_date_offset_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::from("ykiho_db.csv"),
            template_dir: PathBuf::from("templates"),
            artifact_dir: PathBuf::from("uploads"),
            artifact_ttl_hours: 24,
            report_date_offset_days: 1,
        }
    }
}

impl AppConfig {
    pub fn artifact_ttl(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.artifact_ttl_hours))
    }

    fn resolve_relative_to(mut self, base: &Path) -> Self {
        for path in [
            &mut self.registry_path,
            &mut self.template_dir,
            &mut self.artifact_dir,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}

/// Configuration plus the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
}

/// Pick the config file to read, if any.
pub fn config_path(explicit: Option<&Path>, env_value: Option<&str>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(value));
    }
    let local = cwd.join(DEFAULT_CONFIG_FILE);
    local.is_file().then_some(local)
}

/// Parse one config file.
pub fn read_config(path: &Path) -> Result<AppConfig> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let config: AppConfig =
        toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(config.resolve_relative_to(base))
}

/// Load the configuration following the resolution order above.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let env_value = std::env::var(CONFIG_ENV_VAR).ok();
    let cwd = std::env::current_dir().context("determine working directory")?;
    match config_path(explicit, env_value.as_deref(), &cwd) {
        Some(path) => {
            let config = read_config(&path)?;
            debug!(path = %path.display(), "loaded configuration");
            Ok(LoadedConfig {
                config,
                source: Some(path),
            })
        }
        None => Ok(LoadedConfig {
            config: AppConfig::default(),
            source: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_beats_env_beats_local_file() {
        let dir = TempDir::new().unwrap();
        let explicit = Path::new("/etc/pharm.toml");
        assert_eq!(
            config_path(Some(explicit), Some("/env.toml"), dir.path()),
            Some(explicit.to_path_buf())
        );
        assert_eq!(
            config_path(None, Some("/env.toml"), dir.path()),
            Some(PathBuf::from("/env.toml"))
        );
        assert_eq!(config_path(None, Some("  "), dir.path()), None);

        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "").unwrap();
        assert_eq!(
            config_path(None, None, dir.path()),
            Some(dir.path().join(DEFAULT_CONFIG_FILE))
        );
    }

    #[test]
    fn partial_file_keeps_defaults_and_resolves_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pharm.toml");
        fs::write(&path, "artifact_ttl_hours = 2\nregistry_path = \"db/ykiho.csv\"\n").unwrap();

        let config = read_config(&path).unwrap();
        assert_eq!(config.artifact_ttl(), TimeDelta::hours(2));
        assert_eq!(config.registry_path, dir.path().join("db/ykiho.csv"));
        assert_eq!(config.template_dir, dir.path().join("templates"));
        assert_eq!(config.report_date_offset_days, 1);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pharm.toml");
        fs::write(&path, "registry = \"x\"\n").unwrap();
        assert!(read_config(&path).is_err());
    }
}
