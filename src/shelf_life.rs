// 🥫 Shelf-Life Reference Table
// Category → item → days mapping with per-category defaults.
// Immutable reference data, loaded once at startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Fallback when even the category is unknown.
pub const GLOBAL_DEFAULT_DAYS: u32 = 7;

// ============================================================================
// TABLE DEFINITION
// ============================================================================

/// Per-category shelf-life data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryShelfLife {
    /// Default days for any item in this category without its own entry
    pub default_days: u32,

    /// Exact item-name entries (stored lowercased; lookups are
    /// case-insensitive because OCR and manual entry disagree on case)
    #[serde(default)]
    pub items: HashMap<String, u32>,
}

/// ShelfLifeTable - static reference data mapping categories and item names
/// to expected shelf life in days.
///
/// Resolution precedence (highest first):
/// 1. Explicit per-item override supplied by the caller
/// 2. Exact item-name match within the category
/// 3. The category's default
/// 4. `GLOBAL_DEFAULT_DAYS` (7) if the category itself is unknown
///
/// Resolution always terminates with a number; unknown names and categories
/// are not errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfLifeTable {
    categories: HashMap<String, CategoryShelfLife>,
}

impl ShelfLifeTable {
    /// Create an empty table (everything resolves to the global default)
    pub fn new() -> Self {
        ShelfLifeTable {
            categories: HashMap::new(),
        }
    }

    /// Load a table from a JSON file
    ///
    /// Format: `{ "Dairy": { "default_days": 7, "items": { "milk": 7 } }, ... }`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read shelf-life file: {:?}", path.as_ref()))?;

        let categories: HashMap<String, CategoryShelfLife> =
            serde_json::from_str(&content).context("Failed to parse shelf-life JSON")?;

        Ok(ShelfLifeTable::from_categories(categories))
    }

    /// Build a table from already-assembled category data
    pub fn from_categories(categories: HashMap<String, CategoryShelfLife>) -> Self {
        // Normalize keys so lookups are case-insensitive
        let categories = categories
            .into_iter()
            .map(|(cat, mut entry)| {
                entry.items = entry
                    .items
                    .into_iter()
                    .map(|(name, days)| (name.to_lowercase(), days))
                    .collect();
                (cat.to_lowercase(), entry)
            })
            .collect();

        ShelfLifeTable { categories }
    }

    /// Table with the built-in grocery categories pre-loaded
    ///
    /// Covers the eight categories the product exposes on manual add:
    /// Dairy, Produce, Bakery, Meat, Snacks, Beverages, Frozen Foods, Grains.
    pub fn with_defaults() -> Self {
        let mut categories = HashMap::new();

        categories.insert(
            "Dairy".to_string(),
            CategoryShelfLife {
                default_days: 7,
                items: HashMap::from([
                    ("milk".to_string(), 7),
                    ("yogurt".to_string(), 14),
                    ("cheese".to_string(), 21),
                    ("butter".to_string(), 30),
                    ("eggs".to_string(), 28),
                ]),
            },
        );

        categories.insert(
            "Produce".to_string(),
            CategoryShelfLife {
                default_days: 5,
                items: HashMap::from([
                    ("bananas".to_string(), 5),
                    ("apples".to_string(), 21),
                    ("spinach".to_string(), 5),
                    ("lettuce".to_string(), 7),
                    ("potatoes".to_string(), 30),
                    ("onions".to_string(), 30),
                ]),
            },
        );

        categories.insert(
            "Bakery".to_string(),
            CategoryShelfLife {
                default_days: 4,
                items: HashMap::from([
                    ("bread".to_string(), 5),
                    ("bagels".to_string(), 5),
                    ("tortillas".to_string(), 14),
                ]),
            },
        );

        categories.insert(
            "Meat".to_string(),
            CategoryShelfLife {
                default_days: 3,
                items: HashMap::from([
                    ("chicken".to_string(), 2),
                    ("ground beef".to_string(), 2),
                    ("bacon".to_string(), 7),
                    ("deli ham".to_string(), 5),
                ]),
            },
        );

        categories.insert(
            "Snacks".to_string(),
            CategoryShelfLife {
                default_days: 90,
                items: HashMap::from([
                    ("chips".to_string(), 60),
                    ("crackers".to_string(), 120),
                ]),
            },
        );

        categories.insert(
            "Beverages".to_string(),
            CategoryShelfLife {
                default_days: 30,
                items: HashMap::from([
                    ("orange juice".to_string(), 10),
                    ("soda".to_string(), 180),
                ]),
            },
        );

        categories.insert(
            "Frozen Foods".to_string(),
            CategoryShelfLife {
                default_days: 180,
                items: HashMap::new(),
            },
        );

        categories.insert(
            "Grains".to_string(),
            CategoryShelfLife {
                default_days: 120,
                items: HashMap::from([
                    ("rice".to_string(), 365),
                    ("pasta".to_string(), 365),
                    ("oats".to_string(), 180),
                ]),
            },
        );

        ShelfLifeTable::from_categories(categories)
    }

    /// Resolve shelf life in days for an item
    ///
    /// Precedence: caller override > exact item match > category default >
    /// global default. Total over its inputs; never errors.
    pub fn resolve(&self, item_name: &str, category: &str, override_days: Option<u32>) -> u32 {
        if let Some(days) = override_days {
            return days;
        }

        match self.categories.get(&category.to_lowercase()) {
            Some(entry) => entry
                .items
                .get(&item_name.trim().to_lowercase())
                .copied()
                .unwrap_or(entry.default_days),
            None => GLOBAL_DEFAULT_DAYS,
        }
    }

    /// Number of categories loaded
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

impl Default for ShelfLifeTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================
