use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Address of the assessment server when nothing is configured.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// server_url = "http://127.0.0.1:5000"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the risk assessment server.
    pub server_url: Option<String>,

    /// Request timeout. Unset means requests may wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Configured server, or [`DEFAULT_SERVER_URL`].
    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Replace the server URL after a basic sanity check.
    pub fn set_server_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!(
                "Invalid server URL '{url}'. It must start with http:// or https://."
            ));
        }

        self.server_url = Some(url.trim_end_matches('/').to_string());
        Ok(())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "risk-assessment", "risk-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("risk-core-config-{}-{name}", std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn server_url_falls_back_to_default() {
        let cfg = Config::default();
        assert_eq!(cfg.server_url(), DEFAULT_SERVER_URL);
        assert_eq!(cfg.timeout_secs, None);
    }

    #[test]
    fn set_server_url_trims_trailing_slash() {
        let mut cfg = Config::default();
        cfg.set_server_url(" https://risk.example.org/ ").unwrap();
        assert_eq!(cfg.server_url(), "https://risk.example.org");
    }

    #[test]
    fn set_server_url_rejects_missing_scheme() {
        let mut cfg = Config::default();
        let err = cfg.set_server_url("risk.example.org").unwrap_err();

        assert!(err.to_string().contains("must start with http://"));
        assert_eq!(cfg.server_url, None);
    }

    #[test]
    fn load_missing_file_gives_default() {
        let cfg = Config::load_from(&scratch_path("missing")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let path = scratch_path("save");
        let cfg = Config { server_url: Some("http://10.0.0.5:5000".into()), timeout_secs: Some(15) };

        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn malformed_file_reports_path() {
        let path = scratch_path("bad");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "server_url = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }
}
