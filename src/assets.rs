//! Configuration asset loading with an embedded fallback
//!
//! - If `CONFIG_FILE` is NOT set: use the embedded `config.yaml` only
//! - If `CONFIG_FILE` IS set and the file is missing: seed it with the embedded default
//! - If `CONFIG_FILE` IS set and the file exists: read it from the filesystem

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

const CONFIG_NAME: &str = "config.yaml";

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Config loader with optional filesystem override
pub struct AssetLoader {
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader.
    ///
    /// `config_file` should be `Some` only if the env var was set.
    pub fn new(config_file: Option<PathBuf>) -> Self {
        Self { config_file }
    }

    /// Create a loader from the `CONFIG_FILE` environment variable.
    pub fn from_env() -> Self {
        Self::new(std::env::var("CONFIG_FILE").ok().map(PathBuf::from))
    }

    /// Configured external config path, if any
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// The embedded default config
    pub fn embedded_config() -> io::Result<Cow<'static, [u8]>> {
        EmbeddedConfig::get(CONFIG_NAME)
            .map(|f| f.data)
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        tracing::trace!("Loading config from embedded assets");
        Self::embedded_config()
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write the embedded default to the configured path if it is missing.
    ///
    /// Returns whether a file was written.
    pub fn seed_if_configured(&self) -> io::Result<bool> {
        let Some(ref path) = self.config_file else {
            return Ok(false);
        };
        if path.exists() {
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &*Self::embedded_config()?)?;
        tracing::info!(path = %path.display(), "Seeded config file with embedded default");
        Ok(true)
    }

    /// Extract the embedded config to the filesystem (init command)
    ///
    /// Uses the configured path, or `./config.yaml` if none is set.
    pub fn init(&self, force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();
        let path = self
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_NAME));

        if !force && path.exists() {
            report.skipped.push(path.display().to_string());
            return Ok(report);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &*Self::embedded_config()?)?;
        report.written.push(path.display().to_string());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_present() {
        let content = AssetLoader::new(None).read_config_string().unwrap();
        assert!(content.contains("total_rounds"));
    }

    #[test]
    fn test_external_config_takes_priority() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(&path, "game:\n  total_rounds: 3\n").unwrap();

        let loader = AssetLoader::new(Some(path));
        let content = loader.read_config_string().unwrap();
        assert_eq!(content, "game:\n  total_rounds: 3\n");
    }

    #[test]
    fn test_missing_external_falls_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let loader = AssetLoader::new(Some(dir.path().join("absent.yaml")));

        let content = loader.read_config_string().unwrap();
        assert!(content.contains("seconds_per_round"));
    }

    #[test]
    fn test_seed_writes_missing_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let loader = AssetLoader::new(Some(path.clone()));

        assert!(loader.seed_if_configured().unwrap());
        assert!(path.exists());
        assert!(!loader.seed_if_configured().unwrap());
    }

    #[test]
    fn test_seed_without_path_is_noop() {
        assert!(!AssetLoader::new(None).seed_if_configured().unwrap());
    }

    #[test]
    fn test_init_skips_existing_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "# mine\n").unwrap();
        let loader = AssetLoader::new(Some(path.clone()));

        let report = loader.init(false).unwrap();
        assert!(report.written.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

        let report = loader.init(true).unwrap();
        assert_eq!(report.written.len(), 1);
        assert!(fs::read_to_string(&path).unwrap().contains("total_rounds"));
    }
}
