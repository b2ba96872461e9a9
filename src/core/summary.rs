use crate::core::restock::RestockBoard;
use crate::domain::model::{Category, ShapedStock, SummaryEntry};
use url::form_urlencoded;

/// Category order of the active-stock summary.
pub const SUMMARY_ORDER: [Category; 3] = [Category::Egg, Category::Seed, Category::Gear];

/// Rewrites remote image URLs to go through the same-origin image proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageProxyRewriter {
    proxy_path: String,
}

impl ImageProxyRewriter {
    pub fn new(proxy_path: impl Into<String>) -> Self {
        Self {
            proxy_path: proxy_path.into(),
        }
    }

    pub fn rewrite(&self, image_url: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(image_url.as_bytes()).collect();
        format!("{}?url={}", self.proxy_path, encoded)
    }

    /// A missing image stays missing; it never becomes a proxy URL.
    pub fn rewrite_opt(&self, image_url: Option<&str>) -> Option<String> {
        image_url.map(|url| self.rewrite(url))
    }
}

/// Flattens the shaped stock into `{name, image, restockTime}` entries.
///
/// Categories are visited in `order`; absent categories and categories
/// without a restock timer contribute nothing.
pub fn assemble_summary(
    shaped: &ShapedStock,
    board: &RestockBoard,
    order: &[Category],
    proxy: Option<&ImageProxyRewriter>,
) -> Vec<SummaryEntry> {
    let mut entries = Vec::new();

    for &category in order {
        let Some(items) = shaped.get(category) else {
            continue;
        };
        let Some(countdown) = board.countdown_for(category) else {
            tracing::debug!("No restock timer for {}, skipping", category.label());
            continue;
        };

        entries.extend(items.iter().map(|item| SummaryEntry {
            name: item.name.clone(),
            image: match proxy {
                Some(rewriter) => rewriter.rewrite_opt(item.image.as_deref()),
                None => item.image.clone(),
            },
            restock_time: countdown.to_string(),
        }));
    }

    entries
}
