use anyhow::Context;
use fairdice_core::SessionSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file contents. Dice given here are used when none are passed on
/// the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub dice: Vec<String>,
    #[serde(flatten)]
    pub session: SessionSettings,
}

impl CliConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fairdice").join("config.json"))
    }

    /// Explicit path if given, else the default location if it exists,
    /// else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;

        tracing::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Command line dice win over the file's.
    pub fn dice_or(&self, cli_dice: Vec<String>) -> Vec<String> {
        if cli_dice.is_empty() {
            self.dice.clone()
        } else {
            cli_dice
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"rounds": 3, "dice": ["1,2,3", "4,5,6", "7,8,9"]}}"#
        )
        .unwrap();

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.session.rounds, 3);
        assert_eq!(config.session.precision, 4);
        assert_eq!(config.dice.len(), 3);
    }

    #[test]
    fn test_cli_dice_override_file() {
        let config = CliConfig {
            dice: vec!["1,1,1".to_string()],
            ..Default::default()
        };

        assert_eq!(config.dice_or(vec![]), vec!["1,1,1".to_string()]);
        assert_eq!(
            config.dice_or(vec!["2,2,2".to_string()]),
            vec!["2,2,2".to_string()]
        );
    }

    #[test]
    fn test_missing_or_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CliConfig::load(Some(&dir.path().join("missing.json"))).is_err());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ rounds: ").unwrap();
        let err = CliConfig::load(Some(&broken)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse settings file"));
    }
}
