//! cc-skillgate: hook binary for Claude Code.
//!
//! One binary, three modes selected by the first argument:
//!
//!   cc-skillgate prompt    — UserPromptSubmit: skill suggestions
//!   cc-skillgate pretool   — PreToolUse: safety gate (exit 2 blocks)
//!   cc-skillgate posttool  — PostToolUse: output error advisory
//!
//! Each mode reads one JSON event from stdin. Anything that goes wrong —
//! unreadable stdin, malformed JSON, missing config — resolves to the
//! neutral outcome with exit 0 so a broken hook never stalls the session.

use std::io::Read;

use cc_skillgate::config::{GateConfig, SkillRules};
use cc_skillgate::gate::Gate;
use cc_skillgate::{hook, logging};

fn main() {
    logging::init();

    let mode = std::env::args().nth(1).unwrap_or_default();

    if mode == "--dump-gate-config" {
        match toml::to_string_pretty(&GateConfig::load()) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => eprintln!("failed to render gate config: {e}"),
        }
        return;
    }

    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        log::warn!("failed to read stdin; exiting neutral");
        std::process::exit(0);
    }

    let code = match mode.as_str() {
        "prompt" => {
            let rules = SkillRules::load();
            hook::run_prompt(&input, &rules)
        }
        "pretool" => {
            let gate = Gate::new(GateConfig::load());
            hook::run_pretool(&input, &gate)
        }
        "posttool" => hook::run_posttool(&input),
        other => {
            eprintln!("usage: cc-skillgate <prompt|pretool|posttool> (got {other:?})");
            0
        }
    };

    std::process::exit(code);
}
