use std::sync::LazyLock;

use regex::Regex;

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9\s\-()]{7,}$").expect("phone pattern is a valid regex")
});

/// Loose phone check: optional leading `+`, then at least seven digits, spaces,
/// hyphens or parentheses. Surrounding whitespace is ignored.
pub fn is_valid_phone(raw: &str) -> bool {
    PHONE_PATTERN.is_match(raw.trim())
}
