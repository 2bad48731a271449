//! Plain-text normalization applied to extracted documents

use regex::Regex;

/// Replaces non-ASCII runs with a single space and collapses whitespace.
///
/// The output is a single line with no leading or trailing whitespace.
pub struct TextNormalizer {
    non_ascii_regex: Regex,
    whitespace_regex: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        let non_ascii_regex = Regex::new(r"[^\x00-\x7F]+").expect("Invalid non-ASCII regex");
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");

        Self {
            non_ascii_regex,
            whitespace_regex,
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        let ascii = self.non_ascii_regex.replace_all(text, " ");
        let collapsed = self.whitespace_regex.replace_all(&ascii, " ");
        collapsed.trim().to_string()
    }
}
