//! Safety Gate: allow/block verdicts for proposed tool invocations.
//!
//! The gate is a narrow blocklist, not a capability allowlist: any tool it
//! does not recognize is allowed. Block is final — the first matching
//! condition produces the verdict and nothing further runs.

pub mod read_scan;

use serde::Deserialize;

use crate::config::GateConfig;
use crate::matcher;

/// Maximum number of command characters echoed back in a block reason.
const REASON_ECHO_LIMIT: usize = 50;

/// Verdict for a single tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Block { reason: String },
}

impl Verdict {
    pub fn is_block(&self) -> bool {
        matches!(self, Verdict::Block { .. })
    }
}

/// Tool-specific input map from the PreToolUse envelope. Fields are shaped
/// per tool; anything absent simply stays `None`/empty.
#[derive(Debug, Default, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub edits: Vec<Edit>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Edit {
    #[serde(default)]
    pub file_path: Option<String>,
}

impl ToolInput {
    /// Short description of the invocation for the decision log.
    pub fn summary(&self) -> &str {
        self.command
            .as_deref()
            .or(self.file_path.as_deref())
            .unwrap_or("")
    }
}

pub struct Gate {
    config: GateConfig,
}

impl Gate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Decide on a tool invocation, dispatching on tool identity.
    pub fn check(&self, tool_name: &str, input: &ToolInput) -> Verdict {
        match tool_name {
            "Bash" => self.check_command(input.command.as_deref().unwrap_or("")),
            "Read" => {
                let path = input.file_path.as_deref().unwrap_or("");
                if self.is_sensitive_path(path) {
                    return Verdict::Block {
                        reason: format!("Reading sensitive file blocked: {path}"),
                    };
                }
                Verdict::Allow
            }
            "Write" | "Edit" => {
                let path = input.file_path.as_deref().unwrap_or("");
                if self.is_sensitive_path(path) {
                    return Verdict::Block {
                        reason: format!("Modifying sensitive file blocked: {path}"),
                    };
                }
                Verdict::Allow
            }
            "MultiEdit" => {
                let path = input.file_path.as_deref().unwrap_or("");
                if self.is_sensitive_path(path) {
                    return Verdict::Block {
                        reason: format!("Modifying sensitive file blocked: {path}"),
                    };
                }
                for edit in &input.edits {
                    if self.is_sensitive_path(edit.file_path.as_deref().unwrap_or("")) {
                        return Verdict::Block {
                            reason: "Modifying sensitive file blocked".into(),
                        };
                    }
                }
                Verdict::Allow
            }
            _ => Verdict::Allow,
        }
    }

    /// Evaluate a shell command: dangerous forms first (they win when both
    /// would match), then the sensitive-read scan.
    fn check_command(&self, command: &str) -> Verdict {
        if self.is_dangerous(command) {
            let echo: String = command.chars().take(REASON_ECHO_LIMIT).collect();
            return Verdict::Block {
                reason: format!("Dangerous command blocked: {echo}..."),
            };
        }

        for path in read_scan::read_targets(command, &self.config.readers) {
            if self.is_sensitive_path(&path) {
                return Verdict::Block {
                    reason: "Command would read sensitive file".into(),
                };
            }
        }

        Verdict::Allow
    }

    fn is_dangerous(&self, command: &str) -> bool {
        !command.is_empty()
            && self
                .config
                .dangerous
                .patterns
                .iter()
                .any(|p| matcher::regex_search_ci(command, p))
    }

    fn is_sensitive_path(&self, path: &str) -> bool {
        !path.is_empty()
            && self
                .config
                .sensitive
                .patterns
                .iter()
                .any(|p| matcher::regex_search_ci(path, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> Gate {
        Gate::new(GateConfig::default_config())
    }

    fn bash(command: &str) -> Verdict {
        gate().check(
            "Bash",
            &ToolInput {
                command: Some(command.into()),
                ..Default::default()
            },
        )
    }

    fn path_tool(tool: &str, path: &str) -> Verdict {
        gate().check(
            tool,
            &ToolInput {
                file_path: Some(path.into()),
                ..Default::default()
            },
        )
    }

    // ── Dangerous commands ──

    #[test]
    fn block_rm_rf_root() {
        assert!(bash("rm -rf /").is_block());
        assert!(bash("rm -rf / ").is_block());
    }

    #[test]
    fn block_rm_rf_wildcard() {
        assert!(bash("rm -rf *").is_block());
    }

    #[test]
    fn block_rm_rf_parent() {
        assert!(bash("rm -rf ../").is_block());
    }

    #[test]
    fn block_rm_rf_home() {
        assert!(bash("rm -rf ~/").is_block());
    }

    #[test]
    fn allow_rm_rf_subdir() {
        // Scoped deletion is not in the dangerous set
        assert_eq!(bash("rm -rf ./build"), Verdict::Allow);
    }

    #[test]
    fn block_dd_to_disk() {
        assert!(bash("dd if=/dev/zero of=/dev/sda").is_block());
    }

    #[test]
    fn block_redirect_to_disk() {
        assert!(bash("echo junk > /dev/sda").is_block());
    }

    #[test]
    fn block_mkfs() {
        assert!(bash("mkfs.ext4 /dev/sdb1").is_block());
    }

    #[test]
    fn block_fork_bomb() {
        assert!(bash(":(){ :|:& };:").is_block());
    }

    #[test]
    fn block_chmod_777_root() {
        assert!(bash("chmod 777 /").is_block());
    }

    #[test]
    fn dangerous_reason_truncates_command() {
        let long = format!("rm -rf / {}", "x".repeat(300));
        let Verdict::Block { reason } = bash(&long) else {
            panic!("expected block");
        };
        assert!(reason.len() < 100, "reason not truncated: {reason}");
    }

    // ── Sensitive reads via shell ──

    #[test]
    fn block_cat_env() {
        assert!(bash("cat .env").is_block());
    }

    #[test]
    fn block_cat_env_quoted() {
        assert!(bash("cat '.env'").is_block());
        assert!(bash("cat \".env.production\"").is_block());
    }

    #[test]
    fn allow_cat_plain_file() {
        assert_eq!(bash("cat notes.txt"), Verdict::Allow);
    }

    #[test]
    fn block_head_ssh_key() {
        assert!(bash("head -5 ~/.ssh/id_rsa").is_block());
    }

    #[test]
    fn block_grep_netrc() {
        assert!(bash("grep -i password ~/.netrc").is_block());
    }

    #[test]
    fn allow_ls_ssh_dir() {
        // ls is not a read idiom — this documents the detector's boundary
        assert_eq!(bash("ls -la .ssh"), Verdict::Allow);
    }

    #[test]
    fn dangerous_wins_over_sensitive_read() {
        // Both conditions would match; the dangerous check runs first
        let Verdict::Block { reason } = bash("rm -rf / && cat .env") else {
            panic!("expected block");
        };
        assert!(reason.starts_with("Dangerous command blocked"));
    }

    // ── Direct file tools ──

    #[test]
    fn block_read_env() {
        assert!(path_tool("Read", "/work/app/.env").is_block());
    }

    #[test]
    fn block_read_pem() {
        assert!(path_tool("Read", "certs/server.pem").is_block());
    }

    #[test]
    fn allow_read_source_file() {
        assert_eq!(path_tool("Read", "src/main.rs"), Verdict::Allow);
    }

    #[test]
    fn sensitive_is_component_anchored() {
        // "environment" is not ".env"
        assert_eq!(path_tool("Read", "docs/environment.md"), Verdict::Allow);
    }

    #[test]
    fn block_write_npmrc() {
        assert!(path_tool("Write", "/home/user/.npmrc").is_block());
    }

    #[test]
    fn block_edit_kube_config() {
        assert!(path_tool("Edit", "/home/user/.kube/config").is_block());
    }

    #[test]
    fn block_multiedit_with_sensitive_edit() {
        let input = ToolInput {
            file_path: Some("src/lib.rs".into()),
            edits: vec![
                Edit {
                    file_path: Some("src/lib.rs".into()),
                },
                Edit {
                    file_path: Some(".env".into()),
                },
            ],
            ..Default::default()
        };
        assert!(gate().check("MultiEdit", &input).is_block());
    }

    #[test]
    fn allow_multiedit_plain_files() {
        let input = ToolInput {
            file_path: Some("src/lib.rs".into()),
            edits: vec![Edit {
                file_path: Some("src/main.rs".into()),
            }],
            ..Default::default()
        };
        assert_eq!(gate().check("MultiEdit", &input), Verdict::Allow);
    }

    // ── Default-allow policy ──

    #[test]
    fn unknown_tool_allowed() {
        let input = ToolInput {
            command: Some("rm -rf /".into()),
            ..Default::default()
        };
        // Not the shell tool → the command field is not even inspected
        assert_eq!(gate().check("WebFetch", &input), Verdict::Allow);
    }

    #[test]
    fn empty_input_allowed() {
        assert_eq!(gate().check("Bash", &ToolInput::default()), Verdict::Allow);
    }

    #[test]
    fn verdict_is_deterministic() {
        let first = bash("cat .env && ls");
        for _ in 0..5 {
            assert_eq!(bash("cat .env && ls"), first);
        }
    }

    #[test]
    fn case_insensitive_sensitive_path() {
        assert!(path_tool("Read", "/home/user/.SSH/id_rsa").is_block());
    }
}
