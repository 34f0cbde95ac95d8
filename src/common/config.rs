//! User configuration (`~/.config/linux-setup/config.toml`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "linux-setup";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Remote used for Flatpak installs that do not name one.
    pub flatpak_remote: String,
    pub flatpak_remote_url: String,
    /// Written to `/etc/dnf/dnf.conf` during repository setup.
    pub dnf_parallel_downloads: u32,
    /// Hide packages with no install method on this system from the menu.
    pub hide_unavailable: bool,
    /// Module streams per package key, replacing the catalog's.
    pub modules: BTreeMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flatpak_remote: "flathub".to_string(),
            flatpak_remote_url: "https://flathub.org/repo/flathub.flatpakrepo".to_string(),
            dnf_parallel_downloads: 10,
            hide_unavailable: true,
            modules: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Unable to determine user config directory")?
            .join(APP_DIR)
            .join(CONFIG_FILE))
    }

    /// Load from `path`, or the default location. A missing file gives the
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.dnf_parallel_downloads, 10);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "dnf_parallel_downloads = 5\n\n[modules]\nnode = [\"nodejs:20\"]\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.dnf_parallel_downloads, 5);
        assert_eq!(config.flatpak_remote, "flathub");
        assert!(config.hide_unavailable);
        assert_eq!(config.modules["node"], vec!["nodejs:20".to_string()]);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "hide_unavailable = \"maybe\"").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config"));
    }
}
