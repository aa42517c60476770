//! Best-effort logging under `~/.local/share/cc-skillgate/`.
//!
//! Two outputs: leveled diagnostics in `hook.log` (via the `log` facade) and
//! a tab-separated verdict record in `decisions.log`. Logging must never
//! block a hook: every failure here (no HOME, unwritable directory, bad env
//! value) is silently absorbed and the process carries on without it.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{Config, WriteLogger};

use crate::gate::Verdict;

/// Characters of the logged subject retained per record.
const SUBJECT_LIMIT: usize = 200;

/// Install the file logger. Level comes from `CC_SKILLGATE_LOG`
/// (`debug`, `info`, or `off`); unset or unrecognized means warnings only.
pub fn init() {
    let level = match std::env::var("CC_SKILLGATE_LOG").as_deref() {
        Ok("debug") => LevelFilter::Debug,
        Ok("info") => LevelFilter::Info,
        Ok("off") => return,
        _ => LevelFilter::Warn,
    };

    let Some(path) = data_path("hook.log") else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };

    let _ = WriteLogger::init(level, Config::default(), file);
}

fn data_path(file: &str) -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".local/share/cc-skillgate").join(file))
}

/// Record a gate verdict: a line in `decisions.log` plus a leveled entry in
/// `hook.log`. Blocks log at warn so they survive the default level; allows
/// are info and only appear when verbosity is raised.
pub fn log_verdict(tool_name: &str, subject: &str, verdict: &Verdict) {
    let subject: String = subject.chars().take(SUBJECT_LIMIT).collect();
    let (decision, reason) = match verdict {
        Verdict::Allow => ("allow", String::new()),
        Verdict::Block { reason } => ("block", reason.replace('\n', "; ")),
    };

    append_decision(tool_name, &subject, decision, &reason);

    match verdict {
        Verdict::Allow => log::info!("allow\t{tool_name}\t{subject}"),
        Verdict::Block { .. } => log::warn!("block\t{tool_name}\t{subject}\t{reason}"),
    }
}

fn append_decision(tool_name: &str, subject: &str, decision: &str, reason: &str) {
    let Some(path) = data_path("decisions.log") else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let ts = timestamp_now();
    let _ = writeln!(file, "{ts}\t{decision}\t{tool_name}\t{subject}\t{reason}");
}

/// Simple UTC timestamp without external deps.
fn timestamp_now() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = dur.as_secs();
    let days = secs / 86400;
    let rem = secs % 86400;
    let h = rem / 3600;
    let m = (rem % 3600) / 60;
    let s = rem % 60;
    let (year, month, day) = epoch_days_to_date(days);
    format!("{year:04}-{month:02}-{day:02}T{h:02}:{m:02}:{s:02}Z")
}

/// Convert days since Unix epoch to (year, month, day).
fn epoch_days_to_date(days: u64) -> (u64, u64, u64) {
    // Civil calendar from days algorithm (Howard Hinnant)
    let z = days + 719468;
    let era = z / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_zero_is_1970() {
        assert_eq!(epoch_days_to_date(0), (1970, 1, 1));
    }

    #[test]
    fn known_date_round() {
        // 2024-02-29 is day 19782
        assert_eq!(epoch_days_to_date(19782), (2024, 2, 29));
    }
}
