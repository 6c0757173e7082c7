// 📦 Pantry Item Model
// Identity is a UUID string that never changes; quantity, dates, and the
// derived freshness fields are values that change over time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::status::FreshnessStatus;

// ============================================================================
// ITEM
// ============================================================================

/// A tracked pantry item.
///
/// `days_remaining` and `status` are always derived from
/// `(expiry_date, quantity, total_shelf_life_days, today)` by the status
/// engine - the store recomputes them after every mutation. The only
/// exception is an explicit manual status override, which stays authoritative
/// until the next mutation recomputes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryItem {
    /// Stable identity (UUID) - never changes
    pub id: String,

    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub purchased_date: NaiveDate,
    pub expiry_date: NaiveDate,

    /// Caller-supplied shelf-life override in days (beats the table)
    pub shelf_life_override: Option<u32>,

    // Derived fields - owned by the status engine
    pub total_shelf_life_days: u32,
    pub days_remaining: i64,
    pub status: FreshnessStatus,
}

// ============================================================================
// INPUTS
// ============================================================================

/// Input for adding an item.
///
/// Expiry date is optional: when omitted it is derived as
/// purchase date + resolved shelf life.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub purchased_date: NaiveDate,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub shelf_life_override: Option<u32>,
}

/// Partial edit of an existing item. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub purchased_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub shelf_life_override: Option<Option<u32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_parses_without_optional_fields() {
        let json = r#"{
            "name": "Milk",
            "category": "Dairy",
            "quantity": 2,
            "purchased_date": "2025-01-25"
        }"#;

        let item: NewItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.name, "Milk");
        assert_eq!(item.expiry_date, None);
        assert_eq!(item.shelf_life_override, None);
    }

    #[test]
    fn test_item_update_defaults_to_no_changes() {
        let update: ItemUpdate = serde_json::from_str("{}").unwrap();

        assert!(update.name.is_none());
        assert!(update.quantity.is_none());
        assert!(update.shelf_life_override.is_none());
    }
}
