use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated config directory for one test.
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Config path that does not exist, so defaults apply.
    pub fn default_config(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    /// Write a config file and return its path.
    pub fn write_config(&self, content: &str) -> Result<PathBuf> {
        let path = self.path().join("custom.toml");
        fs::write(&path, content)?;
        Ok(path)
    }
}
