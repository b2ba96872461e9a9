pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{Result, StockError};
use crate::utils::validation::{
    validate_non_empty_string, validate_route_path, validate_socket_addr, validate_timezone,
    validate_url, Validate,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_STOCK_ENDPOINT: &str = "https://growagarden.gg/api/stock";
pub const DEFAULT_REFERER: &str = "https://growagarden.gg/stocks";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_PROXY_PATH: &str = "/api/image-proxy";

/// Routes the image proxy path must not shadow.
pub const RESERVED_PATHS: [&str; 4] = [
    "/healthz",
    "/api/stock/aktif",
    "/api/stock/active-summary",
    "/api/stock/restock-time",
];

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, clap::Parser)]
#[command(name = "garden-stock")]
#[command(about = "Restock timers and active stock for the garden game")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_BIND)]
    pub bind: String,

    #[arg(long, default_value = DEFAULT_STOCK_ENDPOINT)]
    pub stock_endpoint: String,

    #[arg(long, default_value = DEFAULT_REFERER)]
    pub referer: String,

    #[arg(long, default_value = DEFAULT_TIMEZONE, help = "Timezone whose midnight anchors restock windows")]
    pub timezone: String,

    #[arg(long, default_value = DEFAULT_PROXY_PATH)]
    pub proxy_path: String,

    #[arg(long, help = "Serve summary images from their original URLs")]
    pub direct_images: bool,

    #[arg(long, help = "TOML config file; replaces the flags above")]
    pub config: Option<String>,

    #[arg(long, help = "Emit JSON log lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Resolves the effective configuration, reading the TOML file when given.
    pub fn resolve(&self) -> Result<AppConfig> {
        match &self.config {
            Some(path) => Ok(toml_config::TomlConfig::from_file(path)?.into_app_config()),
            None => Ok(AppConfig {
                bind: self.bind.clone(),
                stock_endpoint: self.stock_endpoint.clone(),
                referer: self.referer.clone(),
                extra_headers: HashMap::new(),
                timezone: self.timezone.clone(),
                proxy_path: self.proxy_path.clone(),
                rewrite_summary_images: !self.direct_images,
            }),
        }
    }
}

/// Effective service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub bind: String,
    pub stock_endpoint: String,
    pub referer: String,
    pub extra_headers: HashMap<String, String>,
    pub timezone: String,
    pub proxy_path: String,
    pub rewrite_summary_images: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            stock_endpoint: DEFAULT_STOCK_ENDPOINT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            extra_headers: HashMap::new(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            proxy_path: DEFAULT_PROXY_PATH.to_string(),
            rewrite_summary_images: true,
        }
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        validate_timezone("timezone", &self.timezone)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("bind", &self.bind)?;
        validate_url("stock_endpoint", &self.stock_endpoint)?;
        validate_non_empty_string("referer", &self.referer)?;
        validate_timezone("timezone", &self.timezone)?;
        validate_route_path("proxy_path", &self.proxy_path)?;
        if RESERVED_PATHS.contains(&self.proxy_path.as_str()) {
            return Err(StockError::InvalidConfigValueError {
                field: "proxy_path".to_string(),
                value: self.proxy_path.clone(),
                reason: "Path is already used by another route".to_string(),
            });
        }
        Ok(())
    }
}

/// Validated view used by the running service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    stock_endpoint: String,
    timezone: Tz,
    proxy_path: String,
    rewrite_summary_images: bool,
}

impl ServiceConfig {
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            stock_endpoint: config.stock_endpoint.clone(),
            timezone: config.tz()?,
            proxy_path: config.proxy_path.clone(),
            rewrite_summary_images: config.rewrite_summary_images,
        })
    }
}

impl ConfigProvider for ServiceConfig {
    fn stock_endpoint(&self) -> &str {
        &self.stock_endpoint
    }

    fn timezone(&self) -> Tz {
        self.timezone
    }

    fn proxy_path(&self) -> &str {
        &self.proxy_path
    }

    fn rewrite_summary_images(&self) -> bool {
        self.rewrite_summary_images
    }
}
