use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
	// Constant pattern, cannot fail to compile
	Regex::new(r"[\t\n\x0C\r ]+").unwrap()
});

/// Collapses every maximal run of ASCII whitespace (tab, newline, form
/// feed, carriage return, space) into a single space.
///
/// Unicode spaces such as U+00A0 are kept as ordinary characters, since
/// passwords may contain them on purpose.
/// Leading and trailing runs are collapsed too, not trimmed:
/// `"\t a  b\n"` → `" a b "`.
pub fn normalize_line(line: &str) -> Cow<'_, str> {
	WHITESPACE_RUN.replace_all(line, " ")
}

/// Returns every window of exactly `length` characters, advancing one
/// character at a time.
///
/// # Notes
/// - UTF-8 safe: windows are counted in chars, not bytes.
/// - Returns an empty vector when the text is shorter than `length`
///   or when `length` is 0.
pub fn windows(chars: &[char], length: usize) -> Vec<String> {
	if length == 0 {
		return Vec::new();
	}
	chars.windows(length).map(|w| w.iter().collect()).collect()
}
