//! Extraction of file paths a shell command would read.
//!
//! Deliberately token-shaped rather than shell-accurate: the goal is to catch
//! the common read idioms (cat, pagers, head/tail windows, grep, stream
//! editors), not to model bash. Commands like `ls` are not read idioms and
//! pass through untouched.

use regex::Regex;

use crate::config::Readers;

/// Matches optional flag tokens between the command word and its file
/// argument. A file argument never starts a shell operator.
const FLAGS: &str = r"(?:-[^\s;|&>]+\s+)*";

/// Word characters a file argument may contain — stops at whitespace and
/// shell operators so `cat foo; rm` extracts `foo`, not `foo; rm`.
const ARG: &str = r"([^\s;|&>]+)";

/// Candidate file paths the command would read, surrounding quotes stripped.
pub fn read_targets(command: &str, readers: &Readers) -> Vec<String> {
    if command.is_empty() {
        return Vec::new();
    }
    let mut targets = Vec::new();

    // cat/less/more/head/tail FILE — file follows optional flags
    for cmd in &readers.file_args {
        let pattern = format!(r"\b{}\s+{FLAGS}{ARG}", regex::escape(cmd));
        capture_target(command, &pattern, &mut targets);
    }

    // grep [FLAGS] PATTERN FILE — first non-flag argument is the pattern
    for cmd in &readers.skip_first_arg {
        let pattern = format!(r"\b{}\s+{FLAGS}\S+\s+{ARG}", regex::escape(cmd));
        capture_target(command, &pattern, &mut targets);
    }

    // awk/sed SCRIPT... FILE — file is the final word
    for cmd in &readers.last_arg {
        let pattern = format!(r"\b{}\s+.*\s+{ARG}$", regex::escape(cmd));
        capture_target(command, &pattern, &mut targets);
    }

    targets
}

fn capture_target(command: &str, pattern: &str, out: &mut Vec<String>) {
    let Ok(re) = Regex::new(pattern) else {
        log::debug!("skipping invalid reader pattern: {pattern}");
        return;
    };
    if let Some(caps) = re.captures(command)
        && let Some(m) = caps.get(1)
    {
        let path = m.as_str().trim_matches(['"', '\'']).to_string();
        if !path.is_empty() {
            out.push(path);
        }
    }
}
