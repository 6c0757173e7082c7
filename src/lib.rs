// Pantry Keeper - Core Library
// Exposes the lifecycle engine and the receipt parser for use in the CLI,
// the API server, and tests

pub mod clock;
pub mod shelf_life;
pub mod status;
pub mod item;
pub mod store;
pub mod refresh;
pub mod normalize;
pub mod extract;
pub mod line_items;
pub mod receipt;
pub mod pipeline;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use shelf_life::{CategoryShelfLife, ShelfLifeTable, GLOBAL_DEFAULT_DAYS};
pub use status::{evaluate, expiring_threshold, FreshnessStatus, StatusReading};
pub use item::{ItemUpdate, NewItem, PantryItem};
pub use store::{NoopSink, PantryStore, ShoppingListSink};
pub use refresh::{millis_until_next_midnight, RefreshScheduler, DEFAULT_REFRESH_PERIOD};
pub use normalize::{candidate_lines, clean_line};
pub use extract::{extract_date, extract_store_name, extract_total, MAX_NAME_LEN};
pub use line_items::{parse_line_items, MAX_LINE_ITEMS};
pub use receipt::{ParsedReceipt, ReceiptLineItem};
pub use pipeline::{
    IngestionResult, OcrEngine, OcrText, ReceiptPipeline, FALLBACK_OCR_MODEL,
    MAX_RAW_TEXT_LEN, PRIMARY_OCR_MODEL,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
