//! cc-skillgate: hook suite for Claude Code sessions.
//!
//! Three hooks share one binary and one rule core:
//!
//! - **UserPromptSubmit** — scores the prompt against configured skill rules
//!   and prints a suggestion block when a skill clears its threshold.
//! - **PreToolUse** — checks the proposed tool call against dangerous-command
//!   and sensitive-path patterns; blocking exits with code 2.
//! - **PostToolUse** — scans captured Bash output for test, build, and
//!   runtime failure signatures and prints a recovery advisory.
//!
//! # Architecture
//!
//! - **[`matcher`]** — Shared text predicates: substring, word-boundary, and regex matching.
//! - **[`score`]** — Intent scoring: weighted signal accumulation and ranked skill matches.
//! - **[`gate`]** — Safety gate: verdict dispatch per tool, shell read-target extraction.
//! - **[`detect`]** — Output classification: multi-label failure detection.
//! - **[`config`]** — Skill rule loading plus embedded gate defaults + user overlay merge.
//! - **[`hook`]** — Event envelopes, rendering, and exit-code policy.
//! - **[`logging`]** — Decision logging to `~/.local/share/cc-skillgate/hook.log`.

/// Skill rule and gate pattern configuration.
pub mod config;
/// Failure-signature detection in command output.
pub mod detect;
/// Tool-call verdicts and shell read-target scanning.
pub mod gate;
/// Hook entry points and output rendering.
pub mod hook;
/// File-based decision logging.
pub mod logging;
/// Text matching predicates shared by scorer, gate, and detector.
pub mod matcher;
/// Prompt scoring against skill rules.
pub mod score;

use gate::{Gate, ToolInput, Verdict};
use score::SkillMatch;

/// Evaluate one tool call against the embedded default gate patterns.
///
/// This is the main entry point for tests and simple usage. For user-config
/// overlays, build the [`Gate`] from [`config::GateConfig::load`] directly.
pub fn check_tool(tool_name: &str, input: &ToolInput) -> Verdict {
    Gate::new(config::GateConfig::default_config()).check(tool_name, input)
}

/// Score a prompt against a rule file's skills and return ranked matches.
pub fn suggest(prompt: &str, rules: &config::SkillRules) -> Vec<SkillMatch> {
    score::find_matches(prompt, rules)
}
