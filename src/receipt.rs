// 🧾 Parsed Receipt Wire Types
// Amounts stay as two-decimal strings at the parse boundary - this is the
// raw representation before items are normalized into pantry entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One extracted receipt line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLineItem {
    pub name: String,
    pub quantity: u32,

    /// Unit price as a two-decimal string (e.g. "3.99")
    pub price: String,

    /// Defaulted pending later classification
    pub category: String,

    /// Suggested expiration window, defaulted pending later classification
    pub expiration_days: u32,
}

impl ReceiptLineItem {
    pub fn new(name: String, quantity: u32, price: f64) -> Self {
        ReceiptLineItem {
            name,
            quantity,
            price: format!("{:.2}", price),
            category: "other".to_string(),
            expiration_days: 7,
        }
    }

    /// Placeholder entry substituted when parsing found no items but OCR
    /// itself worked.
    pub fn placeholder() -> Self {
        ReceiptLineItem::new("Receipt items detected".to_string(), 1, 0.0)
    }

    /// Placeholder entry for the full-fallback receipt (OCR unavailable).
    pub fn unprocessed() -> Self {
        ReceiptLineItem::new("Unable to process receipt".to_string(), 1, 0.0)
    }
}

/// Structured result of receipt ingestion.
///
/// Invariant: `items` is never empty - a placeholder is substituted when no
/// line survives parsing, so downstream consumers always get at least one
/// entry to correct manually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    pub items: Vec<ReceiptLineItem>,
    pub store_name: String,
    pub date: NaiveDate,

    /// Total as a two-decimal string (e.g. "7.98"); "0.00" when unknown
    pub total: String,
}

impl ParsedReceipt {
    /// Assemble a receipt, substituting the placeholder item when needed.
    pub fn assemble(
        items: Vec<ReceiptLineItem>,
        store_name: String,
        date: NaiveDate,
        total: f64,
    ) -> Self {
        let items = if items.is_empty() {
            vec![ReceiptLineItem::placeholder()]
        } else {
            items
        };

        ParsedReceipt {
            items,
            store_name,
            date,
            total: format!("{:.2}", total),
        }
    }

    /// Degraded receipt returned when the OCR capability is unavailable.
    pub fn fallback(ingestion_date: NaiveDate) -> Self {
        ParsedReceipt {
            items: vec![ReceiptLineItem::unprocessed()],
            store_name: "Unknown Store".to_string(),
            date: ingestion_date,
            total: "0.00".to_string(),
        }
    }
}
