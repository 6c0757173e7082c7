// 🧹 OCR Text Normalizer
// Raw receipt OCR rarely keeps true line breaks, so runs of two-or-more
// whitespace characters count as structural separators too. Each surviving
// line is cleaned so the downstream numeric extractors see consistent input.

use regex::Regex;
use std::sync::LazyLock;

static LINE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n|\s{2,}").unwrap());

static INNER_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

// Whitespace before a currency symbol tightened to a single space
static CURRENCY_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([$£€])").unwrap());

// Thousands separator: a digit, a comma, then exactly three digits
static THOUSANDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]),([0-9]{3})").unwrap());

/// Clean one candidate line: tabs to spaces, inner whitespace collapsed,
/// currency symbols tightened against their amounts, thousands separators
/// stripped so locale punctuation cannot confuse numeric parsing.
pub fn clean_line(line: &str) -> String {
    let line = line.replace('\t', " ");
    let line = INNER_WS.replace_all(&line, " ");
    let line = CURRENCY_GAP.replace_all(&line, " $1");
    let line = THOUSANDS.replace_all(&line, "$1$2");
    line.trim().to_string()
}

/// Split raw OCR text into trimmed, non-empty, cleaned candidate lines.
pub fn candidate_lines(raw: &str) -> Vec<String> {
    LINE_SPLIT
        .split(raw)
        .map(clean_line)
        .filter(|l| !l.is_empty())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
