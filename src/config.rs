//! YAML configuration for the exporter.

use crate::error::ExportError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "RUNPOD_EXPORTER_CONFIG";
const CONFIG_FILENAME: &str = "config.yml";

/// Exporter configuration, loaded once per run and passed down the pipeline
/// explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Optional at parse time so a missing key reports as a credential
    /// error rather than a YAML shape error.
    api_key: Option<String>,
    /// Directory watched by the textfile collector.
    pub textfile_path: PathBuf,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        if !path.exists() {
            return Err(ExportError::ConfigMissing(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ExportError::Filesystem {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ExportError::ConfigInvalid {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the API key, or fails the run if none is configured.
    pub fn api_key(&self, path: &Path) -> Result<&str, ExportError> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ExportError::CredentialMissing(path.to_path_buf())),
        }
    }
}

/// Resolves the config path: env override, then `config.yml` in the working
/// directory, then the user config directory.
pub fn default_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return local;
    }
    dirs::home_dir()
        .map(|home| {
            home.join(".config")
                .join("runpod-exporter")
                .join(CONFIG_FILENAME)
        })
        .unwrap_or(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.yml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "api_key: secret\ntextfile_path: /var/lib/metrics\n");

        let config = Config::load(&path).unwrap();

        assert_eq!(config.api_key(&path).unwrap(), "secret");
        assert_eq!(config.textfile_path, PathBuf::from("/var/lib/metrics"));
    }

    #[test]
    fn missing_file_is_config_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.yml");

        let err = Config::load(&path).unwrap_err();

        assert!(matches!(err, ExportError::ConfigMissing(p) if p == path));
    }

    #[test]
    fn invalid_yaml_is_config_invalid() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "api_key: [unclosed\n");

        let err = Config::load(&path).unwrap_err();

        assert!(matches!(err, ExportError::ConfigInvalid { .. }));
    }

    #[test]
    fn missing_api_key_is_credential_missing() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "textfile_path: /tmp\n");

        let config = Config::load(&path).unwrap();
        let err = config.api_key(&path).unwrap_err();

        assert!(matches!(err, ExportError::CredentialMissing(_)));
    }

    #[test]
    fn empty_api_key_is_credential_missing() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "api_key: \"\"\ntextfile_path: /tmp\n");

        let config = Config::load(&path).unwrap();

        assert!(matches!(
            config.api_key(&path),
            Err(ExportError::CredentialMissing(_))
        ));
    }

    #[test]
    #[serial]
    fn env_var_overrides_default_path() {
        std::env::set_var(CONFIG_ENV_VAR, "/etc/runpod-exporter/config.yml");
        let path = default_path();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(path, PathBuf::from("/etc/runpod-exporter/config.yml"));
    }

    #[test]
    #[serial]
    fn default_path_falls_back_to_config_filename() {
        std::env::remove_var(CONFIG_ENV_VAR);
        let path = default_path();

        assert!(path.to_string_lossy().ends_with("config.yml"));
    }
}
