use crate::core::restock::RestockBoard;
use crate::core::shaper::{shape_stock, ShapeOptions};
use crate::core::summary::{assemble_summary, ImageProxyRewriter, SUMMARY_ORDER};
use crate::domain::model::{ActiveSummary, ShapedStock};
use crate::domain::ports::{Clock, ConfigProvider, StockSource};
use crate::utils::error::Result;
use std::sync::Arc;

/// Per-request orchestration: one fetch, one transformation.
#[derive(Clone)]
pub struct StockService {
    source: Arc<dyn StockSource>,
    clock: Arc<dyn Clock>,
    config: Arc<dyn ConfigProvider>,
}

impl StockService {
    pub fn new(
        source: Arc<dyn StockSource>,
        clock: Arc<dyn Clock>,
        config: Arc<dyn ConfigProvider>,
    ) -> Self {
        Self {
            source,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &dyn ConfigProvider {
        self.config.as_ref()
    }

    /// Non-empty categories with `{name, value, image}` items.
    pub async fn active_stock(&self) -> Result<ShapedStock> {
        let snapshot = self.source.fetch_stock().await?;
        let shaped = shape_stock(&snapshot, ShapeOptions::ACTIVE);
        tracing::debug!("Active categories: {:?}", shaped.labels());
        Ok(shaped)
    }

    /// Flat egg, seed and gear list with each category's countdown.
    pub async fn active_summary(&self) -> Result<ActiveSummary> {
        let snapshot = self.source.fetch_stock().await?;
        let board = self.restock_board();
        let shaped = shape_stock(&snapshot, ShapeOptions::SUMMARY);

        // Route images through the proxy unless direct URLs are configured
        let rewriter = self
            .config
            .rewrite_summary_images()
            .then(|| ImageProxyRewriter::new(self.config.proxy_path()));
        let stock_active = assemble_summary(&shaped, &board, &SUMMARY_ORDER, rewriter.as_ref());

        tracing::debug!("Summary assembled with {} entries", stock_active.len());
        Ok(ActiveSummary { stock_active })
    }

    /// Timers only; no upstream call.
    pub fn restock_board(&self) -> RestockBoard {
        RestockBoard::compute(self.clock.now(), self.config.timezone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Category, StockItem, StockSnapshot};
    use crate::domain::ports::FixedClock;
    use crate::utils::error::StockError;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use chrono_tz::Tz;

    struct StaticSource(Option<StockSnapshot>);

    #[async_trait]
    impl StockSource for StaticSource {
        async fn fetch_stock(&self) -> Result<StockSnapshot> {
            self.0.clone().ok_or_else(|| StockError::MalformedPayload {
                message: "offline".to_string(),
            })
        }
    }

    struct MockConfig {
        rewrite: bool,
    }

    impl ConfigProvider for MockConfig {
        fn stock_endpoint(&self) -> &str {
            "http://test.local/api/stock"
        }

        fn timezone(&self) -> Tz {
            chrono_tz::America::New_York
        }

        fn proxy_path(&self) -> &str {
            "/api/image-proxy"
        }

        fn rewrite_summary_images(&self) -> bool {
            self.rewrite
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-07-15T14:30:01Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn item(name: &str) -> StockItem {
        StockItem {
            name: name.to_string(),
            value: None,
            image: None,
        }
    }

    fn service(snapshot: Option<StockSnapshot>, rewrite: bool) -> StockService {
        StockService::new(
            Arc::new(StaticSource(snapshot)),
            Arc::new(FixedClock(now())),
            Arc::new(MockConfig { rewrite }),
        )
    }

    #[tokio::test]
    async fn test_end_to_end_summary_scenario() {
        let mut snapshot = StockSnapshot::default();
        snapshot.categories.insert(Category::Egg, vec![item("Common Egg")]);
        snapshot.categories.insert(Category::Seed, vec![]);
        snapshot.categories.insert(Category::Gear, vec![item("Trowel")]);

        let summary = service(Some(snapshot), true).active_summary().await.unwrap();

        assert_eq!(summary.stock_active.len(), 2);
        assert_eq!(summary.stock_active[0].name, "Common Egg");
        assert_eq!(summary.stock_active[0].image, None);
        assert_eq!(summary.stock_active[0].restock_time, "00h 29m 59s");
        assert_eq!(summary.stock_active[1].name, "Trowel");
        assert_eq!(summary.stock_active[1].restock_time, "00h 04m 59s");
    }

    #[tokio::test]
    async fn test_summary_image_rewrite_can_be_disabled() {
        let mut snapshot = StockSnapshot::default();
        snapshot.categories.insert(Category::Gear, vec![item("Trowel")]);
        snapshot
            .image_data
            .insert("Trowel".to_string(), "https://img/trowel.png".to_string());

        let proxied = service(Some(snapshot.clone()), true).active_summary().await.unwrap();
        assert_eq!(
            proxied.stock_active[0].image.as_deref(),
            Some("/api/image-proxy?url=https%3A%2F%2Fimg%2Ftrowel.png")
        );

        let direct = service(Some(snapshot), false).active_summary().await.unwrap();
        assert_eq!(direct.stock_active[0].image.as_deref(), Some("https://img/trowel.png"));
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_whole_response() {
        let svc = service(None, true);
        assert!(svc.active_stock().await.is_err());
        assert!(svc.active_summary().await.is_err());
    }

    #[test]
    fn test_restock_board_uses_injected_clock() {
        let board = service(None, true).restock_board();
        assert_eq!(board.countdown_for(Category::Egg), Some("00h 29m 59s"));
    }
}
