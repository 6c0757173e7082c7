// Pantry Keeper CLI
// `demo` walks the lifecycle store; `parse <file>` runs the receipt parser
// over a raw OCR text dump.

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use pantry_keeper::{
    FreshnessStatus, NewItem, OcrEngine, OcrText, PantryItem, PantryStore, ReceiptPipeline,
    ShelfLifeTable, ShoppingListSink, SystemClock,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("parse") => {
            let path = args
                .get(2)
                .ok_or_else(|| anyhow!("Usage: pantry-keeper parse <ocr-text-file>"))?;
            run_parse(Path::new(path))
        }
        _ => run_demo(),
    }
}

// ============================================================================
// DEMO MODE
// ============================================================================

/// Sink that narrates cart additions on stdout.
struct PrintCartSink;

impl ShoppingListSink for PrintCartSink {
    fn add_to_cart(&self, item: &PantryItem) {
        println!("   🛒 Added to shopping list: {}", item.name);
    }
}

fn status_icon(status: FreshnessStatus) -> &'static str {
    match status {
        FreshnessStatus::Fresh => "🟢",
        FreshnessStatus::Expiring => "🟡",
        FreshnessStatus::Expired => "🔴",
        FreshnessStatus::Consumed => "⚪",
    }
}

fn print_items(store: &PantryStore) {
    for item in store.items() {
        println!(
            "   {} {:<20} {:<12} qty {:<3} expires {}  ({} days, {})",
            status_icon(item.status),
            item.name,
            item.category,
            item.quantity,
            item.expiry_date,
            item.days_remaining,
            item.status.as_str()
        );
    }
}

fn run_demo() -> Result<()> {
    println!("🥫 Pantry Keeper - Lifecycle Demo");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let table = ShelfLifeTable::with_defaults();
    println!("✓ Shelf-life table loaded ({} categories)", table.category_count());

    let mut store = PantryStore::with_demo_items(table, Box::new(SystemClock))
        .with_cart_sink(Arc::new(PrintCartSink));

    println!("\n📦 Pantry ({} items):", store.len());
    print_items(&store);

    println!("\n⏳ Expiring soon:");
    for item in store.expiring_items() {
        println!("   🟡 {} - {} day(s) left", item.name, item.days_remaining);
    }

    // Add a fresh item without an expiry date: derived from the table
    println!("\n➕ Adding \"Milk\" (Dairy, no expiry given)...");
    let today = chrono::Local::now().date_naive();
    let id = store.add_item(NewItem {
        name: "Milk".to_string(),
        category: "Dairy".to_string(),
        quantity: 1,
        purchased_date: today,
        expiry_date: None,
        shelf_life_override: None,
    });
    let added = store.get(&id).expect("just added");
    println!("✓ Expiry derived: {} ({})", added.expiry_date, added.status.as_str());

    // Consume it: quantity drops to zero and the cart is notified
    println!("\n🍽️  Marking \"Milk\" consumed...");
    store.set_status(&id, FreshnessStatus::Consumed);

    println!("\n📦 Final state:");
    print_items(&store);

    Ok(())
}

// ============================================================================
// PARSE MODE
// ============================================================================

/// Placeholder OCR engine for text-file parsing (no image, no model call).
struct UnavailableOcr;

impl OcrEngine for UnavailableOcr {
    fn image_to_text(&self, _image: &[u8], _model: &str) -> Result<OcrText> {
        Err(anyhow!("no OCR capability configured"))
    }
}

fn run_parse(path: &Path) -> Result<()> {
    println!("🧾 Pantry Keeper - Receipt Parser");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read OCR text file: {:?}", path))?;
    println!("✓ Loaded {} chars of raw OCR text", raw.chars().count());

    let pipeline = ReceiptPipeline::new(Arc::new(UnavailableOcr));
    let receipt = pipeline.parse_text(&raw);

    println!("\n🏪 Store: {}", receipt.store_name);
    println!("📅 Date:  {}", receipt.date);
    println!("💰 Total: {}", receipt.total);
    println!("\n🛍️  Items ({}):", receipt.items.len());
    for item in &receipt.items {
        println!("   {:<30} x{:<3} ${}", item.name, item.quantity, item.price);
    }

    Ok(())
}
