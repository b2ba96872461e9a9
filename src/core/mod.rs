pub mod restock;
pub mod service;
pub mod shaper;
pub mod summary;

pub use crate::domain::model::{
    ActiveSummary, Category, CategoryWindow, ShapedItem, ShapedStock, StockItem, StockSnapshot,
    SummaryEntry,
};
pub use crate::domain::ports::{Clock, ConfigProvider, FixedClock, StockSource, SystemClock};
pub use crate::utils::error::Result;
pub use service::StockService;
