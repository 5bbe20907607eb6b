pub(crate) mod matches;
pub(crate) mod table;

pub use matches::MatchScraper;
pub use table::TableScraper;

use ::scraper::ElementRef;

/// All text below `element`, concatenated and trimmed.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parse the leading integer of `text` the way a lenient web client does:
/// surrounding whitespace is ignored, an optional sign is accepted, and
/// parsing stops at the first non-digit. Returns `None` when no digits lead
/// the text or the value does not fit in an `i32`.
pub(crate) fn parse_leading_int(text: &str) -> Option<i32> {
    let text = text.trim();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let value: i64 = rest[..digits_end].parse().ok()?;
    i32::try_from(if negative { -value } else { value }).ok()
}
