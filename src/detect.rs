//! Output Classifier: failure-signature detection in captured Bash output.
//!
//! Unlike the intent scorer this does not accumulate strength: each category
//! is a boolean presence flag, and its pattern list stops at the first match.
//! Categories are independent — output can be a test failure and a runtime
//! error at the same time.

use crate::matcher;

pub const TEST_FAILURE_PATTERNS: &[&str] = &[
    r"\bFAIL\b",
    r"\bfailed\b.*test",
    r"test.*\bfailed\b",
    r"AssertionError",
    r"assertion failed",
    r"Expected.*but (got|received)",
    r"expected.*to (equal|be|match)",
    r"\d+ (failed|failing)",
    r"FAILED",
    r"✗|✕|×",
    r"jest.*failed",
    r"vitest.*failed",
    r"pytest.*failed",
    r"mocha.*failing",
    r"Tests? failed",
];

pub const BUILD_ERROR_PATTERNS: &[&str] = &[
    r"error\[E\d+\]",
    r"error:.*\n.*\^",
    r"SyntaxError:",
    r"TypeError:",
    r"ReferenceError:",
    r"cannot find module",
    r"Module not found",
    r"compilation failed",
    r"Build failed",
    r"npm ERR!",
    r"yarn error",
    r"error TS\d+:",
    r"tsc.*error",
];

pub const RUNTIME_ERROR_PATTERNS: &[&str] = &[
    r"Traceback \(most recent call last\)",
    r"Exception:",
    r"Error:",
    r"panic:",
    r"ECONNREFUSED",
    r"ENOENT",
    r"EPERM",
    r"Segmentation fault",
    r"stack trace",
    r"at .*:\d+:\d+",
    r#"File ".*", line \d+"#,
    r"^\s+at\s+",
];

/// Multi-label report of failure categories found in command output.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OutputReport {
    pub has_error: bool,
    pub test_failure: bool,
    pub build_error: bool,
    pub runtime_error: bool,
    /// Which pattern fired per category. Diagnostics only, never scored.
    pub matched: Vec<String>,
}

/// Scan output text for the three failure categories.
pub fn classify(output: &str) -> OutputReport {
    let mut report = OutputReport::default();

    for pattern in TEST_FAILURE_PATTERNS {
        if matcher::regex_search_ci_multiline(output, pattern) {
            report.has_error = true;
            report.test_failure = true;
            report.matched.push(format!("test: {pattern}"));
            break;
        }
    }

    for pattern in BUILD_ERROR_PATTERNS {
        if matcher::regex_search_ci_multiline(output, pattern) {
            report.has_error = true;
            report.build_error = true;
            report.matched.push(format!("build: {pattern}"));
            break;
        }
    }

    for pattern in RUNTIME_ERROR_PATTERNS {
        if matcher::regex_search_ci_multiline(output, pattern) {
            report.has_error = true;
            report.runtime_error = true;
            report.matched.push(format!("runtime: {pattern}"));
            break;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_output_sets_nothing() {
        let report = classify("Build succeeded");
        assert!(!report.has_error);
        assert!(!report.test_failure);
        assert!(!report.build_error);
        assert!(!report.runtime_error);
        assert!(report.matched.is_empty());
    }

    #[test]
    fn test_count_sets_test_failure() {
        let report = classify("3 tests failed, 12 passed");
        assert!(report.has_error);
        assert!(report.test_failure);
    }

    #[test]
    fn rust_compile_error_sets_build_error() {
        let report = classify("error[E0308]: mismatched types");
        assert!(report.build_error);
        assert!(!report.test_failure);
    }

    #[test]
    fn npm_error_sets_build_error() {
        assert!(classify("npm ERR! missing script: build").build_error);
    }

    #[test]
    fn traceback_sets_runtime_error_independently() {
        let out = "Traceback (most recent call last):\n  File \"app.py\", line 3\n";
        let report = classify(out);
        assert!(report.runtime_error);
        assert!(!report.test_failure);
        assert!(!report.build_error);
    }

    #[test]
    fn categories_are_independent_labels() {
        let out = "test login FAILED\npanic: index out of range";
        let report = classify(out);
        assert!(report.test_failure);
        assert!(report.runtime_error);
    }

    #[test]
    fn first_match_per_category_only() {
        // Output matching several test patterns records exactly one descriptor
        let out = "FAIL: 2 tests failed FAILED";
        let report = classify(out);
        let test_hits = report
            .matched
            .iter()
            .filter(|m| m.starts_with("test:"))
            .count();
        assert_eq!(test_hits, 1);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(classify("ASSERTION FAILED at line 3").test_failure);
    }

    #[test]
    fn indented_stack_frame_needs_multiline() {
        let out = "command output\n    at handler (app.js)\n";
        assert!(classify(out).runtime_error);
    }

    #[test]
    fn failure_glyph_detected() {
        assert!(classify("✗ should render the header").test_failure);
    }
}
