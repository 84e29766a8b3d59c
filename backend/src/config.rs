use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub frontend_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_url")]
    pub api_url: String,
    #[serde(default = "default_assistant_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_assistant_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_app_title")]
    pub app_title: String,
    #[serde(default)]
    pub referer: Option<String>,
    /// Only ever read from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_upstream_timeout() -> u64 {
    30
}

fn default_max_upload() -> usize {
    10 * 1024 * 1024
}

fn default_assistant_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_assistant_model() -> String {
    "deepseek/deepseek-chat".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    600
}

fn default_assistant_timeout() -> u64 {
    45
}

fn default_app_title() -> String {
    "SmartBloom AI Assistant".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_dir: None,
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_url: default_assistant_url(),
            model: default_assistant_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_assistant_timeout(),
            app_title: default_app_title(),
            referer: None,
            api_key: None,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AssistantConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl GatewayConfig {
    /// Reads `GATEWAY_CONFIG` (or `config/gateway.yaml` next to the
    /// workspace) and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("GATEWAY_CONFIG").unwrap_or_else(|_| {
            match env::var("CARGO_MANIFEST_DIR") {
                Ok(manifest_dir) => format!("{}/../config/gateway.yaml", manifest_dir),
                Err(_) => "config/gateway.yaml".to_string(),
            }
        });

        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        let mut config = Self::from_yaml_str(&raw)?;
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        log::info!("Loaded gateway configuration from {}", path);
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT".into(),
                reason: format!("`{}` is not a port number", port),
            })?;
        }
        if let Some(url) = lookup("UPSTREAM_URL") {
            self.upstream.base_url = url;
        }
        if let Some(dir) = lookup("FRONTEND_DIR") {
            self.server.frontend_dir = Some(dir);
        }
        self.assistant.api_key = lookup("ASSISTANT_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.upstream.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "upstream.base_url".into(),
                reason: format!("`{}` is not an http(s) URL", url),
            });
        }
        if self.upstream.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid {
                key: "upstream.max_upload_bytes".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn frontend_dir(&self) -> String {
        if let Some(dir) = &self.server.frontend_dir {
            return dir.clone();
        }
        if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
            format!("{}/../frontend/dist", manifest_dir)
        } else {
            "/usr/src/app/frontend/dist".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const MINIMAL: &str = "upstream:\n  base_url: http://127.0.0.1:8000\n";

    #[test]
    fn minimal_file_gets_defaults() {
        let config = GatewayConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.upstream.timeout_secs, 30);
        assert_eq!(config.assistant.model, "deepseek/deepseek-chat");
        assert_eq!(config.assistant.max_tokens, 600);
        assert!(config.assistant.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = GatewayConfig::from_yaml_str(MINIMAL).unwrap();
        let env: HashMap<&str, &str> = [
            ("PORT", "9000"),
            ("UPSTREAM_URL", "https://classifier.internal"),
            ("ASSISTANT_API_KEY", " secret "),
        ]
        .into_iter()
        .collect();

        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.upstream.base_url, "https://classifier.internal");
        assert_eq!(config.assistant.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut config = GatewayConfig::from_yaml_str(MINIMAL).unwrap();
        config
            .apply_overrides(|k| (k == "ASSISTANT_API_KEY").then(|| "  ".to_string()))
            .unwrap();
        assert!(config.assistant.api_key.is_none());
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut config = GatewayConfig::from_yaml_str(MINIMAL).unwrap();
        let err = config
            .apply_overrides(|k| (k == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn non_http_upstream_fails_validation() {
        let config =
            GatewayConfig::from_yaml_str("upstream:\n  base_url: ftp://example.org\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_upstream_section_is_an_error() {
        assert!(matches!(
            GatewayConfig::from_yaml_str("server:\n  port: 1\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn explicit_frontend_dir_wins() {
        let mut config = GatewayConfig::from_yaml_str(MINIMAL).unwrap();
        config.server.frontend_dir = Some("/srv/www".into());
        assert_eq!(config.frontend_dir(), "/srv/www");
    }
}
