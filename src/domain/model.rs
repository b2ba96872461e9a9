use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;

pub const EGG_INTERVAL_MS: i64 = 30 * MINUTE_MS;
pub const GEAR_INTERVAL_MS: i64 = 5 * MINUTE_MS;
pub const COSMETIC_INTERVAL_MS: i64 = 4 * HOUR_MS;
pub const NIGHT_INTERVAL_MS: i64 = HOUR_MS;

/// Upstream stock category, declared in the order categories are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Gear,
    Egg,
    Seed,
    Cosmetic,
    Honey,
    Night,
    Easter,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Gear,
        Category::Egg,
        Category::Seed,
        Category::Cosmetic,
        Category::Honey,
        Category::Night,
        Category::Easter,
    ];

    /// Key of the category array in the upstream payload.
    pub fn key(self) -> &'static str {
        match self {
            Category::Gear => "gearStock",
            Category::Egg => "eggStock",
            Category::Seed => "seedsStock",
            Category::Cosmetic => "cosmeticsStock",
            Category::Honey => "honeyStock",
            Category::Night => "nightStock",
            Category::Easter => "easterStock",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Gear => "Gear",
            Category::Egg => "Egg",
            Category::Seed => "Seed",
            Category::Cosmetic => "Cosmetic",
            Category::Honey => "Honey",
            Category::Night => "Night",
            Category::Easter => "Easter",
        }
    }

    /// Restock interval in milliseconds; `None` means the category has no timer.
    /// Seed shares the gear interval.
    pub fn restock_interval_ms(self) -> Option<i64> {
        match self {
            Category::Egg => Some(EGG_INTERVAL_MS),
            Category::Gear | Category::Seed => Some(GEAR_INTERVAL_MS),
            Category::Cosmetic => Some(COSMETIC_INTERVAL_MS),
            Category::Night => Some(NIGHT_INTERVAL_MS),
            Category::Honey | Category::Easter => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockItem {
    pub name: String,
    pub value: Option<serde_json::Number>,
    pub image: Option<String>,
}

/// Typed view of one upstream stock response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockSnapshot {
    pub categories: BTreeMap<Category, Vec<StockItem>>,
    pub image_data: HashMap<String, String>,
}

impl StockSnapshot {
    pub fn items(&self, category: Category) -> &[StockItem] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Reset boundaries around one instant for a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryWindow {
    pub interval_ms: i64,
    pub last_reset: DateTime<Utc>,
    pub next_reset: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapedItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Number>,
    pub image: Option<String>,
}

/// Non-empty categories keyed by label, kept in category order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedStock {
    pub categories: Vec<(Category, Vec<ShapedItem>)>,
}

impl ShapedStock {
    pub fn get(&self, category: Category) -> Option<&[ShapedItem]> {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, items)| items.as_slice())
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.categories.iter().map(|(c, _)| c.label()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Serialize for ShapedStock {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (category, items) in &self.categories {
            map.serialize_entry(category.label(), items)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntry {
    pub name: String,
    pub image: Option<String>,
    pub restock_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSummary {
    pub stock_active: Vec<SummaryEntry>,
}
