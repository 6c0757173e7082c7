// 🗄️ Pantry Lifecycle Store
// Owns the authoritative item collection. Every mutation funnels through
// here, and every mutation ends with a status recompute so the derived
// fields never drift from their inputs.

use chrono::Duration;
use std::sync::Arc;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::item::{ItemUpdate, NewItem, PantryItem};
use crate::shelf_life::ShelfLifeTable;
use crate::status::{evaluate, expiring_threshold, FreshnessStatus};

// ============================================================================
// OUTBOUND PORT - SHOPPING LIST
// ============================================================================

/// Outbound notification port for the shopping-list collaborator.
///
/// Fire-and-forget: implementations must not block or fail the status
/// update that triggered them. The store calls this when an item is marked
/// consumed so it can be re-purchased.
pub trait ShoppingListSink: Send + Sync {
    fn add_to_cart(&self, item: &PantryItem);
}

/// Default sink - drops the notification.
pub struct NoopSink;

impl ShoppingListSink for NoopSink {
    fn add_to_cart(&self, _item: &PantryItem) {}
}

// ============================================================================
// STORE
// ============================================================================

/// The authoritative pantry collection.
///
/// Single logical writer: all mutations are serialized through these entry
/// points, so no internal locking is needed. Multi-client deployments wrap
/// the whole store in `Arc<Mutex<PantryStore>>` (what the server binary and
/// the refresh scheduler do).
pub struct PantryStore {
    items: Vec<PantryItem>,
    table: ShelfLifeTable,
    clock: Box<dyn Clock>,
    cart: Arc<dyn ShoppingListSink>,
}

impl PantryStore {
    /// Create an empty store with the built-in shelf-life table and the
    /// system clock.
    pub fn new() -> Self {
        Self::with_parts(ShelfLifeTable::with_defaults(), Box::new(SystemClock))
    }

    /// Create a store with an explicit table and clock (tests pin the clock).
    pub fn with_parts(table: ShelfLifeTable, clock: Box<dyn Clock>) -> Self {
        PantryStore {
            items: Vec::new(),
            table,
            clock,
            cart: Arc::new(NoopSink),
        }
    }

    /// Attach a shopping-list sink (builder style).
    pub fn with_cart_sink(mut self, sink: Arc<dyn ShoppingListSink>) -> Self {
        self.cart = sink;
        self
    }

    /// Store pre-seeded with a handful of groceries for the CLI demo.
    pub fn with_demo_items(table: ShelfLifeTable, clock: Box<dyn Clock>) -> Self {
        let today = clock.today();
        let mut store = Self::with_parts(table, clock);

        let seed: [(&str, &str, u32, i64, i64); 6] = [
            // (name, category, quantity, purchased days ago, expires in days)
            ("Whole Milk 2%", "Dairy", 2, 5, 2),
            ("Organic Bananas", "Produce", 6, 2, 7),
            ("Whole Wheat Bread", "Bakery", 1, 4, -1),
            ("Greek Yogurt", "Dairy", 4, 3, 12),
            ("Fresh Spinach", "Produce", 1, 1, 5),
            ("Cheddar Cheese", "Dairy", 1, 2, 6),
        ];

        for (name, category, quantity, ago, ahead) in seed {
            store.add_item(NewItem {
                name: name.to_string(),
                category: category.to_string(),
                quantity,
                purchased_date: today - Duration::days(ago),
                expiry_date: Some(today + Duration::days(ahead)),
                shelf_life_override: None,
            });
        }

        store
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Add an item; returns its new id.
    ///
    /// Expiry is derived from purchase date + resolved shelf life when the
    /// caller did not supply one.
    pub fn add_item(&mut self, new: NewItem) -> String {
        let total_shelf_life_days =
            self.table
                .resolve(&new.name, &new.category, new.shelf_life_override);

        let expiry_date = new.expiry_date.unwrap_or_else(|| {
            new.purchased_date + Duration::days(total_shelf_life_days as i64)
        });

        let reading = evaluate(
            new.quantity,
            expiry_date,
            total_shelf_life_days,
            self.clock.today(),
        );

        let id = Uuid::new_v4().to_string();
        self.items.push(PantryItem {
            id: id.clone(),
            name: new.name,
            category: new.category,
            quantity: new.quantity,
            purchased_date: new.purchased_date,
            expiry_date,
            shelf_life_override: new.shelf_life_override,
            total_shelf_life_days,
            days_remaining: reading.days_remaining,
            status: reading.status,
        });

        id
    }

    /// Partial edit. Returns false if the id is unknown.
    ///
    /// Shelf life is re-resolved when name/category/override changed, and
    /// expiry is re-derived from purchase + shelf life when the date inputs
    /// changed without an explicit expiry in the same update.
    pub fn update_item(&mut self, id: &str, update: ItemUpdate) -> bool {
        let today = self.clock.today();
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return false;
        };

        let mut shelf_life_inputs_changed = false;
        let mut purchase_changed = false;

        if let Some(name) = update.name {
            shelf_life_inputs_changed |= name != item.name;
            item.name = name;
        }
        if let Some(category) = update.category {
            shelf_life_inputs_changed |= category != item.category;
            item.category = category;
        }
        if let Some(override_days) = update.shelf_life_override {
            shelf_life_inputs_changed |= override_days != item.shelf_life_override;
            item.shelf_life_override = override_days;
        }
        if let Some(quantity) = update.quantity {
            item.quantity = quantity;
        }
        if let Some(purchased) = update.purchased_date {
            purchase_changed |= purchased != item.purchased_date;
            item.purchased_date = purchased;
        }

        if shelf_life_inputs_changed {
            item.total_shelf_life_days =
                self.table
                    .resolve(&item.name, &item.category, item.shelf_life_override);
        }

        if let Some(expiry) = update.expiry_date {
            item.expiry_date = expiry;
        } else if shelf_life_inputs_changed || purchase_changed {
            item.expiry_date =
                item.purchased_date + Duration::days(item.total_shelf_life_days as i64);
        }

        let reading = evaluate(
            item.quantity,
            item.expiry_date,
            item.total_shelf_life_days,
            today,
        );
        item.days_remaining = reading.days_remaining;
        item.status = reading.status;

        true
    }

    /// Apply a quantity delta, flooring at zero. Returns false if the id is
    /// unknown. Reaching zero sets Consumed via the recompute, not here.
    pub fn update_quantity(&mut self, id: &str, delta: i64) -> bool {
        let today = self.clock.today();
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return false;
        };

        item.quantity = (item.quantity as i64 + delta).max(0) as u32;

        let reading = evaluate(
            item.quantity,
            item.expiry_date,
            item.total_shelf_life_days,
            today,
        );
        item.days_remaining = reading.days_remaining;
        item.status = reading.status;

        true
    }

    /// Manual status override. Returns false if the id is unknown.
    ///
    /// The override stays authoritative until the next mutation or scheduled
    /// pass recomputes. Marking Consumed forces quantity to zero and notifies
    /// the shopping-list sink (fire-and-forget).
    pub fn set_status(&mut self, id: &str, status: FreshnessStatus) -> bool {
        let today = self.clock.today();
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return false;
        };

        if status == FreshnessStatus::Consumed {
            item.quantity = 0;
        }

        // days_remaining stays derived; only the status label is overridden
        item.days_remaining = (item.expiry_date - today).num_days();
        item.status = status;

        if status == FreshnessStatus::Consumed {
            self.cart.add_to_cart(item);
        }

        true
    }

    /// Unconditional hard delete. Returns false if the id was unknown.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    /// Re-derive days_remaining and status for every item. Driven by the
    /// refresh scheduler so items cross boundaries as time passes even with
    /// no user interaction.
    pub fn recompute_all(&mut self) {
        let today = self.clock.today();
        for item in &mut self.items {
            let reading = evaluate(
                item.quantity,
                item.expiry_date,
                item.total_shelf_life_days,
                today,
            );
            item.days_remaining = reading.days_remaining;
            item.status = reading.status;
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn items(&self) -> &[PantryItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&PantryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items inside their expiring window: not consumed, not yet expired,
    /// and within `expiring_threshold` days of expiry. Uses the same
    /// threshold function as the evaluator, so the filter and the engine
    /// stay in lock-step.
    pub fn expiring_items(&self) -> Vec<&PantryItem> {
        self.items
            .iter()
            .filter(|i| {
                i.status != FreshnessStatus::Consumed
                    && i.days_remaining >= 0
                    && i.days_remaining <= expiring_threshold(i.total_shelf_life_days)
            })
            .collect()
    }
}

impl Default for PantryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_on(today: NaiveDate) -> PantryStore {
        PantryStore::with_parts(
            ShelfLifeTable::with_defaults(),
            Box::new(FixedClock::on_date(today)),
        )
    }

    fn milk(purchased: NaiveDate) -> NewItem {
        NewItem {
            name: "Milk".to_string(),
            category: "Dairy".to_string(),
            quantity: 2,
            purchased_date: purchased,
            expiry_date: None,
            shelf_life_override: None,
        }
    }

    /// Test sink that records every consumed item's name.
    struct RecordingSink(Mutex<Vec<String>>);

    impl ShoppingListSink for RecordingSink {
        fn add_to_cart(&self, item: &PantryItem) {
            self.0.lock().unwrap().push(item.name.clone());
        }
    }

    #[test]
    fn test_add_derives_expiry_from_shelf_life() {
        // Dairy "Milk" resolves to 7 days: 2025-01-25 + 7 = 2025-02-01.
        // On 2025-01-30 that is 2 days remaining, threshold 3 → expiring.
        let mut store = store_on(date(2025, 1, 30));
        let id = store.add_item(milk(date(2025, 1, 25)));

        let item = store.get(&id).unwrap();
        assert_eq!(item.expiry_date, date(2025, 2, 1));
        assert_eq!(item.total_shelf_life_days, 7);
        assert_eq!(item.days_remaining, 2);
        assert_eq!(item.status, FreshnessStatus::Expiring);
    }

    #[test]
    fn test_add_respects_explicit_expiry_and_override() {
        let mut store = store_on(date(2025, 1, 30));

        let id = store.add_item(NewItem {
            name: "Milk".to_string(),
            category: "Dairy".to_string(),
            quantity: 1,
            purchased_date: date(2025, 1, 28),
            expiry_date: Some(date(2025, 3, 1)),
            shelf_life_override: Some(30),
        });

        let item = store.get(&id).unwrap();
        // Explicit expiry wins over derivation, override wins over the table
        assert_eq!(item.expiry_date, date(2025, 3, 1));
        assert_eq!(item.total_shelf_life_days, 30);
        assert_eq!(item.status, FreshnessStatus::Fresh);
    }

    #[test]
    fn test_quantity_delta_floors_at_zero_and_consumes() {
        let mut store = store_on(date(2025, 1, 30));
        let id = store.add_item(milk(date(2025, 1, 28)));

        assert!(store.update_quantity(&id, -1));
        assert_eq!(store.get(&id).unwrap().quantity, 1);
        assert_ne!(store.get(&id).unwrap().status, FreshnessStatus::Consumed);

        // Over-decrement floors at zero; the recompute flips to consumed
        assert!(store.update_quantity(&id, -5));
        let item = store.get(&id).unwrap();
        assert_eq!(item.quantity, 0);
        assert_eq!(item.status, FreshnessStatus::Consumed);

        // Restocking leaves consumed behind
        assert!(store.update_quantity(&id, 3));
        assert_ne!(store.get(&id).unwrap().status, FreshnessStatus::Consumed);
    }

    #[test]
    fn test_set_status_consumed_zeroes_quantity_and_notifies_cart() {
        let sink = Arc::new(RecordingSink(Mutex::new(Vec::new())));
        let mut store = store_on(date(2025, 1, 30)).with_cart_sink(sink.clone());
        let id = store.add_item(milk(date(2025, 1, 28)));

        assert!(store.set_status(&id, FreshnessStatus::Consumed));

        let item = store.get(&id).unwrap();
        assert_eq!(item.quantity, 0);
        assert_eq!(item.status, FreshnessStatus::Consumed);
        assert_eq!(sink.0.lock().unwrap().as_slice(), ["Milk"]);
    }

    #[test]
    fn test_manual_override_lasts_until_next_mutation() {
        let mut store = store_on(date(2025, 1, 30));
        let id = store.add_item(milk(date(2025, 1, 28)));

        // Force Expired even though the dates say otherwise
        assert!(store.set_status(&id, FreshnessStatus::Expired));
        assert_eq!(store.get(&id).unwrap().status, FreshnessStatus::Expired);

        // Next quantity mutation recomputes from the dates again
        assert!(store.update_quantity(&id, 1));
        assert_ne!(store.get(&id).unwrap().status, FreshnessStatus::Expired);
    }

    #[test]
    fn test_update_item_rederives_shelf_life_and_expiry() {
        let mut store = store_on(date(2025, 1, 30));
        let id = store.add_item(milk(date(2025, 1, 25)));

        // Recategorize to Grains ("rice" entry: 365 days) with a new name
        assert!(store.update_item(
            &id,
            ItemUpdate {
                name: Some("Rice".to_string()),
                category: Some("Grains".to_string()),
                ..Default::default()
            }
        ));

        let item = store.get(&id).unwrap();
        assert_eq!(item.total_shelf_life_days, 365);
        assert_eq!(item.expiry_date, date(2025, 1, 25) + Duration::days(365));
        assert_eq!(item.status, FreshnessStatus::Fresh);
    }

    #[test]
    fn test_update_item_explicit_expiry_beats_derivation() {
        let mut store = store_on(date(2025, 1, 30));
        let id = store.add_item(milk(date(2025, 1, 25)));

        assert!(store.update_item(
            &id,
            ItemUpdate {
                purchased_date: Some(date(2025, 1, 29)),
                expiry_date: Some(date(2025, 1, 31)),
                ..Default::default()
            }
        ));

        assert_eq!(store.get(&id).unwrap().expiry_date, date(2025, 1, 31));
    }

    #[test]
    fn test_update_unknown_id_is_rejected() {
        let mut store = store_on(date(2025, 1, 30));

        assert!(!store.update_quantity("nope", 1));
        assert!(!store.set_status("nope", FreshnessStatus::Fresh));
        assert!(!store.update_item("nope", ItemUpdate::default()));
        assert!(!store.remove_item("nope"));
    }

    #[test]
    fn test_remove_item_is_a_hard_delete() {
        let mut store = store_on(date(2025, 1, 30));
        let id = store.add_item(milk(date(2025, 1, 28)));

        assert_eq!(store.len(), 1);
        assert!(store.remove_item(&id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_expiring_filter_agrees_with_engine_formula() {
        let today = date(2025, 1, 30);
        let mut store = store_on(today);

        // A spread of items across all states
        for (name, category, quantity, ahead) in [
            ("Milk", "Dairy", 2, 2i64),
            ("Bread", "Bakery", 1, -1),
            ("Rice", "Grains", 1, 300),
            ("Chips", "Snacks", 0, 10),
            ("Spinach", "Produce", 1, 0),
            ("Yogurt", "Dairy", 3, 40),
        ] {
            store.add_item(NewItem {
                name: name.to_string(),
                category: category.to_string(),
                quantity,
                purchased_date: today - Duration::days(1),
                expiry_date: Some(today + Duration::days(ahead)),
                shelf_life_override: None,
            });
        }

        let filtered: Vec<&str> = store
            .expiring_items()
            .iter()
            .map(|i| i.id.as_str())
            .collect();

        // Manual scan using the engine formula must agree exactly
        let manual: Vec<&str> = store
            .items()
            .iter()
            .filter(|i| {
                let reading =
                    evaluate(i.quantity, i.expiry_date, i.total_shelf_life_days, today);
                reading.status != FreshnessStatus::Consumed
                    && reading.days_remaining >= 0
                    && reading.days_remaining <= expiring_threshold(i.total_shelf_life_days)
            })
            .map(|i| i.id.as_str())
            .collect();

        assert_eq!(filtered, manual);
        assert!(!filtered.is_empty());
    }

    #[test]
    fn test_recompute_all_moves_items_across_boundaries() {
        // Same collection, two different days
        let purchased = date(2025, 1, 25);
        let mut store = store_on(date(2025, 1, 26));
        let id = store.add_item(milk(purchased)); // expiry 2025-02-01

        assert_eq!(store.get(&id).unwrap().status, FreshnessStatus::Fresh);

        // Jump the clock to 2025-01-30 and recompute: now inside the window
        let mut later = PantryStore::with_parts(
            ShelfLifeTable::with_defaults(),
            Box::new(FixedClock::on_date(date(2025, 1, 30))),
        );
        later.items = store.items.clone();
        later.recompute_all();
        assert_eq!(later.get(&id).unwrap().status, FreshnessStatus::Expiring);
        assert_eq!(later.get(&id).unwrap().days_remaining, 2);
    }

    #[test]
    fn test_demo_items_cover_multiple_states() {
        let store = PantryStore::with_demo_items(
            ShelfLifeTable::with_defaults(),
            Box::new(FixedClock::on_date(date(2025, 1, 30))),
        );

        assert_eq!(store.len(), 6);
        assert!(store
            .items()
            .iter()
            .any(|i| i.status == FreshnessStatus::Expired));
        assert!(store
            .items()
            .iter()
            .any(|i| i.status == FreshnessStatus::Expiring));
    }
}
