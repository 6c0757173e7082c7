// 🧾 Line-Item Parser
// Per-line heuristic: a name, a separator, an optional "x"-prefixed
// quantity, and a trailing price. Anything that doesn't match is silently
// discarded - misread lines are expected, not exceptional.

use regex::Regex;
use std::sync::LazyLock;

use crate::extract::{is_summary_line, truncate_chars, MAX_NAME_LEN};
use crate::receipt::ReceiptLineItem;

/// Cap on parsed items, to bound pathological inputs (a misread block of
/// text can otherwise produce hundreds of spurious matches).
pub const MAX_LINE_ITEMS: usize = 25;

static ITEM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<name>.*?)(?:\s+|\t)(?P<qty>x?\d+)?\s*\$?(?P<price>[0-9]+(?:\.[0-9]{2})?)$")
        .unwrap()
});

/// Parse one cleaned line into an item candidate.
///
/// Qualifies only if both a non-empty name and a parseable non-negative
/// price are present. Quantity defaults to 1 and is clamped to at least 1;
/// the name is truncated to 60 characters; the price is normalized to two
/// decimal places.
pub fn parse_line(line: &str) -> Option<ReceiptLineItem> {
    let caps = ITEM_LINE.captures(line)?;

    let name = caps.name("name")?.as_str().trim();
    if name.is_empty() {
        return None;
    }

    let price: f64 = caps.name("price")?.as_str().parse().ok()?;

    let quantity = caps
        .name("qty")
        .and_then(|q| {
            q.as_str()
                .trim_start_matches(|c| c == 'x' || c == 'X')
                .parse::<u32>()
                .ok()
        })
        .unwrap_or(1)
        .max(1);

    Some(ReceiptLineItem::new(
        truncate_chars(name, MAX_NAME_LEN),
        quantity,
        price,
    ))
}

/// Parse all candidate lines, keeping at most `MAX_LINE_ITEMS`.
/// Summary lines (total / amount due / balance) are the total's territory,
/// not items, even though they match the item shape.
pub fn parse_line_items(lines: &[String]) -> Vec<ReceiptLineItem> {
    lines
        .iter()
        .filter(|l| !is_summary_line(l))
        .filter_map(|l| parse_line(l))
        .take(MAX_LINE_ITEMS)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
