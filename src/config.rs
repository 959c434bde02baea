use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "customer_dashboard.json";

/// Environment variable naming the dataset to open at startup.
pub const DATA_ENV_VAR: &str = "CUSTOMER_DATA";

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Dataset opened at startup. Without one the user picks a file.
    pub data_path: Option<PathBuf>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            window_width: 1280.0,
            window_height: 900.0,
        }
    }
}

impl DashboardConfig {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Defaults, then the config file, then `CUSTOMER_DATA`, then the first
    /// positional argument. A broken config file is logged and skipped.
    pub fn resolve(args: impl IntoIterator<Item = String>) -> Self {
        let file = Path::new(CONFIG_FILE);
        let base = if file.exists() {
            match Self::from_file(file) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("Ignoring config file: {e:#}");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        base.with_overrides(std::env::var_os(DATA_ENV_VAR).map(PathBuf::from), args)
    }

    fn with_overrides(
        mut self,
        env_path: Option<PathBuf>,
        args: impl IntoIterator<Item = String>,
    ) -> Self {
        if let Some(path) = env_path.filter(|p| !p.as_os_str().is_empty()) {
            self.data_path = Some(path);
        }
        if let Some(arg) = args.into_iter().next() {
            self.data_path = Some(PathBuf::from(arg));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "data_path": "customers.parquet" }"#).unwrap();

        let cfg = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(cfg.data_path, Some(PathBuf::from("customers.parquet")));
        assert_eq!(cfg.window_width, DashboardConfig::default().window_width);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "data_pth": "typo.parquet" }"#).unwrap();

        assert!(DashboardConfig::from_file(&path).is_err());
    }

    #[test]
    fn argument_beats_environment_beats_file() {
        let base = DashboardConfig {
            data_path: Some(PathBuf::from("from_file.csv")),
            ..DashboardConfig::default()
        };

        let cfg = base.clone().with_overrides(None, Vec::new());
        assert_eq!(cfg.data_path, Some(PathBuf::from("from_file.csv")));

        let cfg = base
            .clone()
            .with_overrides(Some(PathBuf::from("from_env.json")), Vec::new());
        assert_eq!(cfg.data_path, Some(PathBuf::from("from_env.json")));

        let cfg = base.with_overrides(
            Some(PathBuf::from("from_env.json")),
            vec!["from_arg.parquet".to_string()],
        );
        assert_eq!(cfg.data_path, Some(PathBuf::from("from_arg.parquet")));
    }
}
