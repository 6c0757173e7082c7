// 🔎 Receipt Field Extractor
// Heuristic extraction of store name, transaction date, and total from
// normalized receipt lines. Every extractor is total: garbage input yields
// a default, never an error.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Store names and item names are bounded to this many characters.
pub const MAX_NAME_LEN: usize = 60;

static LETTERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]{3,}").unwrap());

// ISO-like (4-digit year first) preferred over the short slashed/dashed form
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\b\d{4}[-/.]\d{1,2}[-/.]\d{1,2}\b)|(\b\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4}\b)")
        .unwrap()
});

// Optional currency code/symbol, then a number with optional thousands
// grouping and optional two-decimal fraction
static MONEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?:USD|INR|EUR|GBP|CAD|AUD)\s*)?\$?\s*([0-9]{1,3}(?:,[0-9]{3})*|[0-9]+)(?:\.[0-9]{2})?")
        .unwrap()
});

static TOTAL_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)total|amount due|balance").unwrap());

/// Truncate to a character budget without splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// ============================================================================
// STORE NAME
// ============================================================================

/// First candidate line containing at least three consecutive letters,
/// truncated to 60 characters. "Unknown Store" if nothing qualifies.
pub fn extract_store_name(lines: &[String]) -> String {
    lines
        .iter()
        .find(|l| LETTERS.is_match(l))
        .map(|l| truncate_chars(l, MAX_NAME_LEN))
        .unwrap_or_else(|| "Unknown Store".to_string())
}

// ============================================================================
// DATE
// ============================================================================

/// Find a transaction date in the raw text, defaulting to `today`.
///
/// Component disambiguation: first > 31 ⇒ year-month-day; else last > 31 ⇒
/// year-last, day-month-year when the middle exceeds 12, month-day-year
/// otherwise. A reading that is not a real calendar date (month 13 and the
/// like) gets one day/month swap attempt before falling back to `today`.
/// Ambiguous two-digit years fall back to `today` outright.
pub fn extract_date(text: &str, today: NaiveDate) -> NaiveDate {
    let Some(m) = DATE.find(text) else {
        return today;
    };

    let raw = m.as_str().replace('.', "-").replace('/', "-");
    let parts: Vec<i64> = raw.split('-').filter_map(|p| p.parse().ok()).collect();
    if parts.len() != 3 {
        return today;
    }

    let (y, m, d) = if parts[0] > 31 {
        (parts[0], parts[1], parts[2])
    } else if parts[2] > 31 {
        if parts[1] > 12 {
            // DD-MM-YYYY
            (parts[2], parts[1], parts[0])
        } else {
            // MM-DD-YYYY
            (parts[2], parts[0], parts[1])
        }
    } else {
        return today;
    };

    NaiveDate::from_ymd_opt(y as i32, m.max(1) as u32, d.max(1) as u32)
        // Invalid reading: try the other day/month ordering once
        .or_else(|| NaiveDate::from_ymd_opt(y as i32, d.max(1) as u32, m.max(1) as u32))
        .unwrap_or(today)
}

// ============================================================================
// TOTAL
// ============================================================================

/// True for receipt summary lines (total / amount due / balance). These
/// carry the total and must not be parsed as purchased items.
pub fn is_summary_line(line: &str) -> bool {
    TOTAL_WORDS.is_match(line)
}

/// All monetary amounts in a piece of text, in order.
fn money_amounts(text: &str) -> Vec<f64> {
    MONEY
        .find_iter(text)
        .filter_map(|m| {
            let digits: String = m
                .as_str()
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            digits.parse::<f64>().ok()
        })
        .collect()
}

/// Receipt total: prefer the last amount on a line mentioning
/// total/amount due/balance; else the maximum amount anywhere in the text;
/// else 0.00.
pub fn extract_total(text: &str, lines: &[String]) -> f64 {
    let mut total = 0.0;

    if let Some(total_line) = lines.iter().find(|l| is_summary_line(l)) {
        if let Some(last) = money_amounts(total_line).last() {
            total = *last;
        }
    }

    if total == 0.0 {
        total = money_amounts(text)
            .into_iter()
            .fold(0.0_f64, |acc, a| acc.max(a));
    }

    total
}

// ============================================================================
// TESTS
// ============================================================================
