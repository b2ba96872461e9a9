use crate::domain::model::StockSnapshot;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub trait ConfigProvider: Send + Sync {
    fn stock_endpoint(&self) -> &str;
    fn timezone(&self) -> Tz;
    fn proxy_path(&self) -> &str;
    /// Whether summary images are rewritten to the image proxy.
    fn rewrite_summary_images(&self) -> bool;
}

#[async_trait]
pub trait StockSource: Send + Sync {
    /// Fetches the current stock and validates it into a typed snapshot.
    async fn fetch_stock(&self) -> Result<StockSnapshot>;
}
