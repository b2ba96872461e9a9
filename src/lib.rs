pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpStockFetcher;
pub use config::{AppConfig, ServiceConfig};
pub use core::StockService;
pub use server::AppState;
pub use utils::error::{Result, StockError};
