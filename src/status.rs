// 🚦 Freshness Status Engine
// Pure derivation of {days_remaining, status} from quantity, expiry date,
// total shelf life, and an explicit "today". No hidden state, idempotent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// STATUS
// ============================================================================

/// Freshness state of a pantry item.
///
/// Transitions fresh → expiring → expired are driven purely by elapsed time.
/// `Consumed` is reachable from any state (quantity driven to zero or a
/// manual override) and the automatic recompute never demotes out of it
/// while quantity stays zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessStatus {
    Fresh,
    Expiring,
    Expired,
    Consumed,
}

impl FreshnessStatus {
    /// Wire/display form ("fresh", "expiring", "expired", "consumed")
    pub fn as_str(&self) -> &'static str {
        match self {
            FreshnessStatus::Fresh => "fresh",
            FreshnessStatus::Expiring => "expiring",
            FreshnessStatus::Expired => "expired",
            FreshnessStatus::Consumed => "consumed",
        }
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Result of one status evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReading {
    /// Whole calendar days until expiry; negative = past expiry
    pub days_remaining: i64,
    pub status: FreshnessStatus,
}

/// Days-remaining cutoff for the "expiring" state: 40% of total shelf life,
/// rounded up.
///
/// A proportional window means long-lived staples and short-lived produce
/// both get a meaningful early warning (a flat day count would not).
/// The store's expiring filter uses this same function, so the filter and
/// the evaluator cannot drift apart.
pub fn expiring_threshold(total_shelf_life_days: u32) -> i64 {
    (total_shelf_life_days as f64 * 0.4).ceil() as i64
}

/// Evaluate freshness for one item.
///
/// Algorithm:
/// 1. `days_remaining` = whole days from `today` to `expiry_date`
/// 2. quantity 0 → Consumed, regardless of date
/// 3. days_remaining < 0 → Expired
/// 4. days_remaining <= expiring_threshold → Expiring
/// 5. otherwise → Fresh
///
/// Pure function: same inputs, same output, no side effects.
pub fn evaluate(
    quantity: u32,
    expiry_date: NaiveDate,
    total_shelf_life_days: u32,
    today: NaiveDate,
) -> StatusReading {
    let days_remaining = (expiry_date - today).num_days();

    let status = if quantity == 0 {
        FreshnessStatus::Consumed
    } else if days_remaining < 0 {
        FreshnessStatus::Expired
    } else if days_remaining <= expiring_threshold(total_shelf_life_days) {
        FreshnessStatus::Expiring
    } else {
        FreshnessStatus::Fresh
    };

    StatusReading {
        days_remaining,
        status,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_zero_quantity_is_consumed_regardless_of_date() {
        let today = date(2025, 1, 30);

        // Far in the future, far in the past, today itself
        for expiry in [date(2026, 1, 1), date(2020, 1, 1), today] {
            let reading = evaluate(0, expiry, 7, today);
            assert_eq!(reading.status, FreshnessStatus::Consumed);
        }
    }

    #[test]
    fn test_past_expiry_is_expired_for_any_shelf_life() {
        let today = date(2025, 1, 30);
        let expiry = date(2025, 1, 29);

        for shelf_life in [1, 7, 30, 365] {
            let reading = evaluate(3, expiry, shelf_life, today);
            assert_eq!(reading.status, FreshnessStatus::Expired);
            assert_eq!(reading.days_remaining, -1);
        }
    }

    #[test]
    fn test_threshold_is_forty_percent_rounded_up() {
        assert_eq!(expiring_threshold(7), 3); // ceil(2.8)
        assert_eq!(expiring_threshold(5), 2); // ceil(2.0)
        assert_eq!(expiring_threshold(10), 4); // exact
        assert_eq!(expiring_threshold(1), 1); // ceil(0.4)
        assert_eq!(expiring_threshold(0), 0);
        assert_eq!(expiring_threshold(365), 146);
    }

    #[test]
    fn test_expiring_window_boundaries() {
        let today = date(2025, 1, 30);

        // Shelf life 7 → threshold 3. days_remaining 3 = expiring, 4 = fresh.
        let at_threshold = evaluate(1, date(2025, 2, 2), 7, today);
        assert_eq!(at_threshold.days_remaining, 3);
        assert_eq!(at_threshold.status, FreshnessStatus::Expiring);

        let past_threshold = evaluate(1, date(2025, 2, 3), 7, today);
        assert_eq!(past_threshold.days_remaining, 4);
        assert_eq!(past_threshold.status, FreshnessStatus::Fresh);

        // Expires today = 0 days remaining = still expiring, not expired
        let today_expiry = evaluate(1, today, 7, today);
        assert_eq!(today_expiry.days_remaining, 0);
        assert_eq!(today_expiry.status, FreshnessStatus::Expiring);
    }

    #[test]
    fn test_dairy_scenario() {
        // Purchased 2025-01-25, Dairy default 7 days → expiry 2025-02-01.
        // On 2025-01-30: 2 days remaining, threshold 3 → expiring.
        let reading = evaluate(2, date(2025, 2, 1), 7, date(2025, 1, 30));

        assert_eq!(reading.days_remaining, 2);
        assert_eq!(reading.status, FreshnessStatus::Expiring);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let today = date(2025, 1, 30);
        let expiry = date(2025, 2, 10);

        let first = evaluate(4, expiry, 14, today);
        let second = evaluate(4, expiry, 14, today);

        assert_eq!(first, second);
    }

    #[test]
    fn test_status_wire_form() {
        assert_eq!(FreshnessStatus::Fresh.as_str(), "fresh");
        assert_eq!(FreshnessStatus::Consumed.as_str(), "consumed");

        let json = serde_json::to_string(&FreshnessStatus::Expiring).unwrap();
        assert_eq!(json, "\"expiring\"");

        let parsed: FreshnessStatus = serde_json::from_str("\"expired\"").unwrap();
        assert_eq!(parsed, FreshnessStatus::Expired);
    }
}
