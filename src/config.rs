//! Configuration record consumed by the core. Loaded from a TOML file with
//! field-level defaults; an `apiKeyEnv` environment variable present at
//! load time auto-toggles `ai.enabled`, mirroring the teacher's
//! env-wins-over-file precedence in `legacy_src/config.rs::get_api_key`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShipSafeError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: Thresholds,
    pub analyzers: AnalyzerSettings,
    pub ai: AiSettings,
    pub ci: CiSettings,
    pub output: OutputSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            analyzers: AnalyzerSettings::default(),
            ai: AiSettings::default(),
            ci: CiSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub green: u8,
    pub yellow: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { green: 80, yellow: 50 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerToggle {
    pub enabled: bool,
}

impl Default for AnalyzerToggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexitySettings {
    pub enabled: bool,
    pub threshold: u32,
}

impl Default for ComplexitySettings {
    fn default() -> Self {
        Self { enabled: true, threshold: 15 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    pub secrets: AnalyzerToggle,
    pub patterns: AnalyzerToggle,
    pub complexity: ComplexitySettings,
    pub coverage: AnalyzerToggle,
    pub imports: AnalyzerToggle,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            secrets: AnalyzerToggle::default(),
            patterns: AnalyzerToggle::default(),
            complexity: ComplexitySettings::default(),
            coverage: AnalyzerToggle::default(),
            imports: AnalyzerToggle::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub enabled: bool,
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    #[serde(rename = "apiKeyEnv")]
    pub api_key_env: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "openai-compatible".to_string(),
            endpoint: String::new(),
            model: String::new(),
            api_key_env: "SHIPSAFE_AI_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailOn {
    Red,
    Yellow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CiSettings {
    #[serde(rename = "failOn")]
    pub fail_on: FailOn,
    pub comment: bool,
}

impl Default for CiSettings {
    fn default() -> Self {
        Self { fail_on: FailOn::Red, comment: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { format: OutputFormat::Terminal }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(ShipSafeError::Io)?;
                toml::from_str(&content).map_err(|e| ShipSafeError::Config(e.to_string()))?
            }
            None => Config::default(),
        };

        if std::env::var(&config.ai.api_key_env).is_ok() {
            config.ai.enabled = true;
        }

        Ok(config)
    }

    /// The AI API key, read from the environment variable named by
    /// `ai.apiKeyEnv`. `None` if unset, regardless of `ai.enabled`.
    pub fn ai_api_key(&self) -> Option<String> {
        std::env::var(&self.ai.api_key_env).ok()
    }
}
