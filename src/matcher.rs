//! Shared pattern-matching primitives used by all three hooks.
//!
//! Rule patterns come from user-editable configuration files, so every regex
//! entry point here treats an invalid pattern as a non-match instead of an
//! error: one bad rule must not suppress matching for the rest of a rule
//! group. The regex crate's linear-time engine bounds evaluation cost per
//! pattern, which matters because patterns originate outside the binary.

use regex::RegexBuilder;

/// Case-insensitive substring test.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive whole-word keyword test. The keyword is regex-escaped and
/// anchored with word boundaries, so "test" does not match inside "contest".
pub fn word_match_ci(haystack: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    let pattern = format!(r"\b{}\b", regex::escape(keyword));
    regex_search_ci(haystack, &pattern)
}

/// Case-insensitive regex search. An invalid pattern is skipped silently
/// (logged at debug) and reported as no-match.
pub fn regex_search_ci(haystack: &str, pattern: &str) -> bool {
    search(haystack, pattern, false)
}

/// Like [`regex_search_ci`] but with multi-line mode (`^`/`$` match line
/// boundaries), for scanning captured command output.
pub fn regex_search_ci_multiline(haystack: &str, pattern: &str) -> bool {
    search(haystack, pattern, true)
}

fn search(haystack: &str, pattern: &str, multi_line: bool) -> bool {
    match RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(multi_line)
        .build()
    {
        Ok(re) => re.is_match(haystack),
        Err(_) => {
            log::debug!("skipping invalid pattern: {pattern}");
            false
        }
    }
}
