use crate::config::AppConfig;
use crate::utils::error::{Result, StockError};
use crate::utils::validation::{validate_required_field, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerConfig>,
    pub upstream: UpstreamConfig,
    pub restock: Option<RestockConfig>,
    pub proxy: Option<ProxyConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub endpoint: Option<String>,
    pub referer: Option<String>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestockConfig {
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub path: Option<String>,
    pub rewrite_summary_images: Option<bool>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StockError::IoError)?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| StockError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn into_app_config(self) -> AppConfig {
        let defaults = AppConfig::default();
        AppConfig {
            bind: self.server.and_then(|s| s.bind).unwrap_or(defaults.bind),
            stock_endpoint: self.upstream.endpoint.unwrap_or(defaults.stock_endpoint),
            referer: self.upstream.referer.unwrap_or(defaults.referer),
            extra_headers: self.upstream.headers.unwrap_or_default(),
            timezone: self
                .restock
                .and_then(|r| r.timezone)
                .unwrap_or(defaults.timezone),
            proxy_path: self
                .proxy
                .as_ref()
                .and_then(|p| p.path.clone())
                .unwrap_or(defaults.proxy_path),
            rewrite_summary_images: self
                .proxy
                .and_then(|p| p.rewrite_summary_images)
                .unwrap_or(defaults.rewrite_summary_images),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let endpoint = validate_required_field("upstream.endpoint", &self.upstream.endpoint)?;
        crate::utils::validation::validate_url("upstream.endpoint", endpoint)?;
        self.clone().into_app_config().validate()
    }
}
