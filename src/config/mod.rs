use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Environment variable names read at startup.
pub mod env_keys {
    pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
    pub const GROQ_MODEL: &str = "GROQ_MODEL";
    pub const GMAIL_USER: &str = "GMAIL_USER";
    pub const GMAIL_PASS: &str = "GMAIL_PASS";
    pub const MAIL_FROM: &str = "MAIL_FROM";
    pub const PORT: &str = "PORT";
    pub const HOST: &str = "HOST";
    pub const STATIC_DIR: &str = "STATIC_DIR";
}

const REDACTED: &str = "********";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub completion: CompletionConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the browser UI, served at `/` when it exists.
    pub static_dir: String,
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender address. Falls back to `username` when unset.
    pub from: Option<String>,
    pub subject: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: "public".to_string(),
            body_limit_bytes: 2 * 1024 * 1024,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            api_key: None,
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.2,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            username: None,
            password: None,
            from: None,
            subject: "Meeting Summary".to_string(),
        }
    }
}

impl MailConfig {
    pub fn sender(&self) -> Option<&str> {
        self.from
            .as_deref()
            .or(self.username.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

impl Config {
    /// Build the process configuration: optional toml file, then environment overrides.
    ///
    /// An explicit `path` must exist. The default location is only read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = global::config_file()?;
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    info!("No config file at {:?}, using defaults", default_path);
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides using `lookup` to resolve variables.
    /// Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(env_keys::GROQ_API_KEY) {
            self.completion.api_key = Some(key);
        }
        if let Some(model) = get(env_keys::GROQ_MODEL) {
            self.completion.model = model;
        }
        if let Some(user) = get(env_keys::GMAIL_USER) {
            self.mail.username = Some(user);
        }
        if let Some(pass) = get(env_keys::GMAIL_PASS) {
            self.mail.password = Some(pass);
        }
        if let Some(from) = get(env_keys::MAIL_FROM) {
            self.mail.from = Some(from);
        }
        if let Some(host) = get(env_keys::HOST) {
            self.server.host = host;
        }
        if let Some(dir) = get(env_keys::STATIC_DIR) {
            self.server.static_dir = dir;
        }
        if let Some(port) = get(env_keys::PORT) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{} must be a port number, got '{}'", env_keys::PORT, port))?;
        }

        Ok(())
    }

    /// Problems that do not stop the service but will make a relay fail.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.completion.api_key.as_deref().map_or(true, str::is_empty) {
            warnings.push(format!(
                "{} is not set; summary requests will be rejected upstream",
                env_keys::GROQ_API_KEY
            ));
        }
        if self.mail.username.is_none() || self.mail.password.is_none() {
            warnings.push(format!(
                "{}/{} are not set; email sharing will fail",
                env_keys::GMAIL_USER,
                env_keys::GMAIL_PASS
            ));
        }
        warnings
    }

    /// Copy of the config with credentials masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.completion.api_key.is_some() {
            copy.completion.api_key = Some(REDACTED.to_string());
        }
        if copy.mail.password.is_some() {
            copy.mail.password = Some(REDACTED.to_string());
        }
        copy
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_match_hosted_service() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.body_limit_bytes, 2 * 1024 * 1024);
        assert_eq!(config.completion.model, "llama-3.3-70b-versatile");
        assert!((config.completion.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.mail.subject, "Meeting Summary");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 8080

            [mail]
            username = "me@example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.mail.smtp_host, "smtp.gmail.com");
        assert_eq!(config.mail.sender(), Some("me@example.com"));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::from_toml_str("[server]\nport = 8080\n").unwrap();
        let vars = env(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("GMAIL_USER", "bot@example.com"),
            ("GMAIL_PASS", "app-pass"),
            ("PORT", "4000"),
        ]);

        config.apply_env(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.completion.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.mail.username.as_deref(), Some("bot@example.com"));
        assert_eq!(config.mail.password.as_deref(), Some("app-pass"));
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config::default();
        let vars = env(&[("GROQ_API_KEY", "   "), ("PORT", "")]);

        config.apply_env(|k| vars.get(k).cloned()).unwrap();

        assert!(config.completion.api_key.is_none());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let mut config = Config::default();
        let vars = env(&[("PORT", "http")]);

        let err = config.apply_env(|k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_mail_from_takes_precedence_over_username() {
        let mail = MailConfig {
            username: Some("login@example.com".to_string()),
            from: Some("team@example.com".to_string()),
            ..MailConfig::default()
        };
        assert_eq!(mail.sender(), Some("team@example.com"));
    }

    #[test]
    fn test_missing_credentials_warn() {
        let warnings = Config::default().warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_redacted_masks_secrets() {
        let mut config = Config::default();
        config.completion.api_key = Some("gsk_secret".to_string());
        config.mail.password = Some("hunter2".to_string());

        let shown = config.redacted().to_toml().unwrap();
        assert!(!shown.contains("gsk_secret"));
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains(REDACTED));
    }

    #[test]
    fn test_from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[completion]\nmodel = \"llama-3.1-8b-instant\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.completion.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_from_file_missing_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::from_file(&dir.path().join("absent.toml")).is_err());
    }
}
