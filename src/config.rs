use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::chunker::DEFAULT_MAX_CHARS;
use crate::error::{GlossaError, Result};

fn default_temperature() -> f32 {
    0.1
}

fn default_max_chunk_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub translate: TranslateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to
    pub host: String,
    /// Port to bind the HTTP server to
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Base URL of the OpenAI-compatible chat completion API
    pub endpoint: String,
    /// Model used for translation
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Sampling temperature; kept low so the model follows the JSON instructions
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Character budget per chunk
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
    /// HTTP client timeout for a single completion request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            translate: TranslateConfig {
                endpoint: "https://api.groq.com/openai/v1".to_string(),
                model: "llama-3.3-70b-versatile".to_string(),
                api_key_env: "GROQ_API_KEY".to_string(),
                temperature: default_temperature(),
                max_chunk_chars: default_max_chunk_chars(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GlossaError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| GlossaError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GlossaError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| GlossaError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply `GLOSSA_*` overrides from the process environment
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(host) = std::env::var("GLOSSA_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("GLOSSA_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| GlossaError::Config(format!("GLOSSA_PORT must be a valid port: {}", port)))?;
        }
        if let Ok(endpoint) = std::env::var("GLOSSA_ENDPOINT") {
            self.translate.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("GLOSSA_MODEL") {
            self.translate.model = model;
        }
        debug!("Effective configuration: {:?}", self);
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.translate.model.trim().is_empty() {
            return Err(GlossaError::Config("translate.model must not be empty".to_string()));
        }
        if self.translate.max_chunk_chars == 0 {
            return Err(GlossaError::Config(
                "translate.max_chunk_chars must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.translate.temperature) {
            return Err(GlossaError::Config(format!(
                "translate.temperature must be between 0 and 2, got {}",
                self.translate.temperature
            )));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl TranslateConfig {
    /// Read the API key from the environment variable named by `api_key_env`
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(GlossaError::MissingApiKey(self.api_key_env.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.translate.max_chunk_chars, 600);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glossa.toml");

        let mut config = Config::default();
        config.translate.model = "llama-3.1-8b-instant".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.translate.model, "llama-3.1-8b-instant");
        assert_eq!(loaded.server.port, 8000);
    }

    #[test]
    fn test_optional_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glossa.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "0.0.0.0"
port = 9000

[translate]
endpoint = "http://localhost:11434/v1"
model = "qwen2.5:7b"
api_key_env = "LOCAL_KEY"
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.translate.temperature, 0.1);
        assert_eq!(config.translate.max_chunk_chars, 600);
        assert_eq!(config.translate.timeout_secs, 120);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.translate.max_chunk_chars = 0;
        assert!(matches!(config.validate(), Err(GlossaError::Config(_))));

        let mut config = Config::default();
        config.translate.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_file("/nonexistent/glossa.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = Config::default();
        config.translate.api_key_env = "GLOSSA_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        let err = config.translate.api_key().unwrap_err();
        assert!(matches!(err, GlossaError::MissingApiKey(ref var) if var == "GLOSSA_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
