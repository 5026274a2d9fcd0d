use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for dossier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Word templates used for generated documents
    pub templates: TemplatePaths,

    /// Unit name used when a command is not given one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_prison: Option<String>,

    /// Directory relative output paths are resolved against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatePaths {
    /// Monthly work report, numbered `{1}`..`{59}` tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,

    /// Daily inspection log, named tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_log: Option<PathBuf>,

    /// Monthly checklist, named tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist: Option<PathBuf>,
}

impl Config {
    /// Load config from the config directory, or defaults when there is none
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }

        Ok(Config::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save config to the config directory
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::get_config_path() {
            self.save_to(&config_path)?;
        }

        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dossier").join("config.toml"))
    }

    /// Initialize default config file
    pub fn init_default() -> Result<()> {
        let config = Config::default();
        config.save()?;
        Ok(())
    }

    /// Resolve an output path against `output_dir` unless it is absolute
    pub fn output_path(&self, path: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn prison_name(&self, given: Option<&str>) -> String {
        given
            .map(str::to_string)
            .or_else(|| self.default_prison.clone())
            .unwrap_or_else(|| "监狱".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip_through_toml() {
        let config = Config {
            templates: TemplatePaths {
                report: Some(PathBuf::from("/srv/templates/月报.docx")),
                daily_log: None,
                checklist: Some(PathBuf::from("checklist.docx")),
            },
            default_prison: Some("女子监狱".to_string()),
            output_dir: None,
        };

        let text = toml::to_string_pretty(&config).unwrap();
        assert!(!text.contains("daily_log"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str("default_prison = \"第一监狱\"\n").unwrap();
        assert_eq!(parsed.templates, TemplatePaths::default());
        assert_eq!(parsed.prison_name(None), "第一监狱");
        assert_eq!(parsed.prison_name(Some("第二监狱")), "第二监狱");
        assert_eq!(Config::default().prison_name(None), "监狱");
    }

    #[test]
    fn test_output_path() {
        let config = Config {
            output_dir: Some(PathBuf::from("/tmp/out")),
            ..Config::default()
        };
        assert_eq!(config.output_path(Path::new("a.docx")), PathBuf::from("/tmp/out/a.docx"));
        assert_eq!(config.output_path(Path::new("/x/a.docx")), PathBuf::from("/x/a.docx"));
    }
}
