// 🔄 Background Status Refresh
// Items must cross status boundaries as real time passes, with no user
// interaction. Two timers: a fixed-interval tick to keep displays current,
// and a one-shot aligned to the next local midnight so day rollovers are
// caught immediately instead of up to a minute late.

use chrono::{Duration as ChronoDuration, Local, NaiveDateTime};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::store::PantryStore;

/// Default recompute interval (matches the product's minute tick).
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// Milliseconds from `now` until the next local midnight.
pub fn millis_until_next_midnight(now: NaiveDateTime) -> u64 {
    let next_midnight = (now.date() + ChronoDuration::days(1))
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (next_midnight - now).num_milliseconds().max(0) as u64
}

/// Handle over the two recompute tasks. Dropping it (or calling
/// `shutdown`) cancels both as a unit, so no timer outlives the store.
pub struct RefreshScheduler {
    interval_task: JoinHandle<()>,
    midnight_task: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Start the recompute schedule: once immediately, then every `period`,
    /// plus one extra pass at the next local midnight followed by daily
    /// passes. Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<Mutex<PantryStore>>, period: Duration) -> Self {
        let interval_store = Arc::clone(&store);
        let interval_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                // First tick completes immediately
                ticker.tick().await;
                if let Ok(mut store) = interval_store.lock() {
                    store.recompute_all();
                }
            }
        });

        let midnight_task = tokio::spawn(async move {
            let wait = millis_until_next_midnight(Local::now().naive_local());
            tokio::time::sleep(Duration::from_millis(wait)).await;
            loop {
                if let Ok(mut store) = store.lock() {
                    store.recompute_all();
                }
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
            }
        });

        RefreshScheduler {
            interval_task,
            midnight_task,
        }
    }

    /// Cancel both timers.
    pub fn shutdown(&self) {
        self.interval_task.abort();
        self.midnight_task.abort();
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::NewItem;
    use crate::status::FreshnessStatus;
    use chrono::NaiveDate;

    #[test]
    fn test_millis_until_next_midnight() {
        let now = NaiveDate::from_ymd_opt(2025, 1, 30)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        assert_eq!(millis_until_next_midnight(now), 60_000);

        let midnight = NaiveDate::from_ymd_opt(2025, 1, 30)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(millis_until_next_midnight(midnight), 86_400_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_recomputes_immediately() {
        let mut store = PantryStore::new();
        let today = chrono::Local::now().date_naive();

        // Expired by the dates, but manually overridden to Fresh; the
        // scheduler's first pass must recompute it back to Expired.
        let id = store.add_item(NewItem {
            name: "Old Bread".to_string(),
            category: "Bakery".to_string(),
            quantity: 1,
            purchased_date: today - ChronoDuration::days(10),
            expiry_date: Some(today - ChronoDuration::days(2)),
            shelf_life_override: None,
        });
        store.set_status(&id, FreshnessStatus::Fresh);

        let shared = Arc::new(Mutex::new(store));
        let scheduler = RefreshScheduler::spawn(Arc::clone(&shared), Duration::from_secs(60));

        tokio::time::advance(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;

        assert_eq!(
            shared.lock().unwrap().get(&id).unwrap().status,
            FreshnessStatus::Expired
        );
        scheduler.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_both_tasks() {
        let shared = Arc::new(Mutex::new(PantryStore::new()));
        let scheduler = RefreshScheduler::spawn(Arc::clone(&shared), Duration::from_secs(60));

        scheduler.shutdown();
        tokio::task::yield_now().await;

        assert!(scheduler.interval_task.is_finished());
        assert!(scheduler.midnight_task.is_finished());
    }
}
