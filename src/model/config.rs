use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "NUANCE_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Environment variable overriding the generation model
const ENV_MODEL: &str = "NUANCE_MODEL";

/// Default model for extraction, summaries and counterfactuals
const DEFAULT_MODEL: &str = "gpt-4o";

/// Settings for calls to the text generation service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    /// Extra extraction attempts after the first one
    pub max_retries: u32,
    /// Caller-level timeout around each generation request
    pub timeout_secs: u64,
    pub extraction_temperature: f64,
    pub summary_temperature: f64,
    pub counterfactual_temperature: f64,
    pub extraction_max_tokens: u64,
    pub summary_max_tokens: u64,
    pub counterfactual_max_tokens: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_retries: 3,
            timeout_secs: 60,
            extraction_temperature: 0.0,
            summary_temperature: 0.3,
            counterfactual_temperature: 0.7,
            extraction_max_tokens: 4096,
            summary_max_tokens: 2048,
            counterfactual_max_tokens: 1024,
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub generation: GenerationConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut generation = Self::load_config_file(&config_path)
            .map(|cf| cf.generation)
            .unwrap_or_default();

        if let Ok(model) = std::env::var(ENV_MODEL)
            && !model.trim().is_empty()
        {
            generation.model = model;
        }

        Self {
            generation,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(path, &contents),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    fn parse_config(path: &Path, contents: &str) -> Option<ConfigFile> {
        let contents = contents.trim();
        if contents.is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Some(ConfigFile::default());
        }

        match serde_yaml::from_str(contents) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Loaded configuration from file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
