use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static SPREADSHEET_UNSAFE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x08\x0B-\x0C\x0E-\x1F\x7F-\x9F]")
        .expect("hardcoded control character regex is valid")
});

/// Removes C0 and DEL/C1 control characters that corrupt spreadsheet cells.
///
/// Tab, line feed and carriage return are kept.
#[must_use]
pub fn clean(text: &str) -> Cow<'_, str> {
    SPREADSHEET_UNSAFE.replace_all(text, "")
}
