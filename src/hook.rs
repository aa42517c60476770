//! Hook entry points: envelope parsing, dispatch, rendering, and exit codes.
//!
//! Every error crossing this boundary degrades to the hook's neutral outcome
//! — no suggestion for the advisory hooks, allow for the gate — with a
//! successful exit. These hooks must never be the reason the host assistant
//! stalls or aborts.

use serde::Deserialize;
use thiserror::Error;

use crate::config::SkillRules;
use crate::gate::{Gate, ToolInput, Verdict};
use crate::score::{self, SkillMatch};
use crate::{detect, logging};

/// Exit code signalling a blocking decision to the host.
pub const EXIT_BLOCK: i32 = 2;

/// Errors at the hook boundary. None is fatal; each maps to the neutral
/// outcome in the `run_*` functions.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("malformed event envelope: {0}")]
    Envelope(#[from] serde_json::Error),
}

// ── Event envelopes ──

#[derive(Debug, Deserialize)]
struct PromptEvent {
    #[serde(default)]
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct PreToolEvent {
    #[serde(default)]
    tool_name: String,
    #[serde(default)]
    tool_input: ToolInput,
}

#[derive(Debug, Deserialize)]
struct PostToolEvent {
    #[serde(default)]
    tool_name: String,
    #[serde(default)]
    tool_output: String,
}

// ── UserPromptSubmit ──

/// Score the prompt and print a suggestion block when any skill activates.
/// Always returns exit code 0 — suggestions are advisory, never blocking.
pub fn run_prompt(input: &str, rules: &SkillRules) -> i32 {
    match prompt_banner(input, rules) {
        Ok(Some(banner)) => println!("{banner}"),
        Ok(None) => {}
        Err(e) => log::warn!("prompt hook degraded to no suggestion: {e}"),
    }
    0
}

fn prompt_banner(input: &str, rules: &SkillRules) -> Result<Option<String>, HookError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    let event: PromptEvent = serde_json::from_str(input)?;
    if event.prompt.is_empty() {
        return Ok(None);
    }
    let matches = score::find_matches(&event.prompt, rules);
    if matches.is_empty() {
        return Ok(None);
    }
    Ok(Some(render_suggestions(&matches)))
}

const BANNER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

fn render_suggestions(matches: &[SkillMatch]) -> String {
    let top = &matches[0].name;

    let mut lines = vec![
        BANNER.to_string(),
        "🎯 SKILL SUGGESTION - Consider before proceeding".to_string(),
        BANNER.to_string(),
        String::new(),
    ];

    for m in matches {
        let indicator = if m.name == *top { "▶" } else { " " };
        lines.push(format!("  {indicator} {}", m.name));
    }

    lines.extend([
        String::new(),
        BANNER.to_string(),
        "REQUIRED: You must respond to this suggestion.".to_string(),
        String::new(),
        format!("→ Use skill: Invoke Skill tool with \"{top}\""),
        "→ Skip skill: Say \"[SKILL NOT NEEDED]\" in your response".to_string(),
        BANNER.to_string(),
    ]);

    lines.join("\n")
}

// ── PreToolUse ──

/// Gate the proposed tool call. Returns [`EXIT_BLOCK`] with a one-line JSON
/// directive on stdout when blocking; exit 0 and no output otherwise. A
/// malformed envelope fails open to allow.
pub fn run_pretool(input: &str, gate: &Gate) -> i32 {
    let event: PreToolEvent = match serde_json::from_str(input) {
        Ok(event) => event,
        Err(e) => {
            log::warn!("pretool hook failed open: {e}");
            return 0;
        }
    };

    let verdict = gate.check(&event.tool_name, &event.tool_input);
    logging::log_verdict(&event.tool_name, event.tool_input.summary(), &verdict);

    match verdict {
        Verdict::Allow => 0,
        Verdict::Block { reason } => {
            let directive = serde_json::json!({
                "decision": "block",
                "reason": reason,
            });
            println!("{directive}");
            EXIT_BLOCK
        }
    }
}

// ── PostToolUse ──

/// Scan captured Bash output for failure signatures and print an advisory
/// block when any are found. Always returns exit code 0.
pub fn run_posttool(input: &str) -> i32 {
    match posttool_banner(input) {
        Ok(Some(banner)) => println!("{banner}"),
        Ok(None) => {}
        Err(e) => log::warn!("posttool hook degraded to no report: {e}"),
    }
    0
}

fn posttool_banner(input: &str) -> Result<Option<String>, HookError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    let event: PostToolEvent = serde_json::from_str(input)?;
    // Only shell output is scanned; other tools exit with no report
    if event.tool_name != "Bash" || event.tool_output.is_empty() {
        return Ok(None);
    }
    let report = detect::classify(&event.tool_output);
    if !report.has_error {
        return Ok(None);
    }
    Ok(Some(render_error_report(&report)))
}

fn render_error_report(report: &detect::OutputReport) -> String {
    let mut detected = Vec::new();
    if report.test_failure {
        detected.push("Test failure");
    }
    if report.build_error {
        detected.push("Build error");
    }
    if report.runtime_error {
        detected.push("Runtime error");
    }

    let mut lines = vec![
        String::new(),
        BANNER.to_string(),
        "⚠️  ERROR DETECTED IN OUTPUT".to_string(),
        BANNER.to_string(),
        String::new(),
        format!("Detected: {}", detected.join(", ")),
        String::new(),
        "📚 RECOMMENDED SKILLS:".to_string(),
        "  ⚡ systematic-debugging (investigate root cause FIRST)".to_string(),
    ];

    if report.test_failure {
        lines.push("  ⚡ testing-anti-patterns (avoid common testing mistakes)".to_string());
    }

    lines.extend([
        String::new(),
        "⛔ DO NOT attempt quick fixes without investigation!".to_string(),
        BANNER.to_string(),
    ]);

    lines.join("\n")
}
