use crate::application::history_store::DEFAULT_HISTORY_CAPACITY;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AssessmentConfig {
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistorySettings {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    pub directory: Option<PathBuf>,
}

impl AssessmentConfig {
    /// Parse an inline TOML document.
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.history.capacity == 0 {
            anyhow::bail!("history.capacity must be at least 1");
        }
        if self.storage.backend == StorageBackend::File && self.storage.directory.is_none() {
            anyhow::bail!("storage.directory is required for the file backend");
        }
        Ok(())
    }
}

/// Load `config/assessment.toml` (optional) with `INSULATION__SECTION__KEY` environment overrides.
pub fn load_assessment_config() -> anyhow::Result<AssessmentConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/assessment").required(false))
        .add_source(
            config::Environment::with_prefix("INSULATION")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AssessmentConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
