use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Embedded default gate patterns.
const DEFAULT_GATE_CONFIG: &str = include_str!("../gate.default.toml");

/// Activation threshold used when a skill does not configure its own.
pub const DEFAULT_THRESHOLD: i32 = 12;

// ── Skill rules (JSON) ──

/// On-disk schema for `skill-rules.json`.
///
/// Skills are kept in file order because entry order is the final ranking
/// tie-break in the scorer.
#[derive(Debug, Default, Deserialize)]
pub struct SkillRules {
    #[serde(default)]
    pub version: String,
    #[serde(default, deserialize_with = "skills_in_file_order")]
    pub skills: Vec<(String, SkillRule)>,
}

/// One named rule group. All matcher lists are optional; rule files written
/// against older schema versions load under the same struct and simply score
/// without the categories they lack.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRule {
    /// Only `"suggest"` groups are eligible for scoring. Other modes belong
    /// to a stricter enforcement path outside this binary.
    #[serde(default)]
    pub enforcement: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    /// Minimum score to activate; [`DEFAULT_THRESHOLD`] when absent.
    pub threshold: Option<i32>,
    #[serde(default)]
    pub strong_phrases: Vec<String>,
    #[serde(default)]
    pub exact_keywords: Vec<String>,
    #[serde(default)]
    pub contains_keywords: Vec<String>,
    #[serde(default)]
    pub intent_patterns: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    /// Legacy nested trigger form, honored identically to the flat lists.
    #[serde(default)]
    pub prompt_triggers: PromptTriggers,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTriggers {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub intent_patterns: Vec<String>,
}

fn default_priority() -> String {
    "medium".into()
}

/// Deserialize the skills map preserving file order, skipping malformed
/// entries so one bad skill cannot poison the whole rule file.
fn skills_in_file_order<'de, D>(de: D) -> Result<Vec<(String, SkillRule)>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: serde_json::Map<String, serde_json::Value> = Deserialize::deserialize(de)?;
    let mut skills = Vec::with_capacity(raw.len());
    for (name, value) in raw {
        match serde_json::from_value::<SkillRule>(value) {
            Ok(rule) => skills.push((name, rule)),
            Err(e) => log::warn!("skipping malformed skill entry {name:?}: {e}"),
        }
    }
    Ok(skills)
}

impl SkillRules {
    /// Parse a rule file from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load the rule file. Resolution order:
    /// 1. `$CC_SKILLGATE_RULES`
    /// 2. `~/.config/cc-skillgate/skill-rules.json`
    ///
    /// A missing or unparseable file yields an empty rule set — the prompt
    /// hook then has nothing to suggest, which is the neutral outcome.
    pub fn load() -> Self {
        let Some(path) = Self::rules_path() else {
            return Self::default();
        };
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match Self::from_json(&content) {
            Ok(rules) => rules,
            Err(e) => {
                log::warn!("unparseable rule file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    fn rules_path() -> Option<PathBuf> {
        if let Some(p) = std::env::var_os("CC_SKILLGATE_RULES") {
            return Some(PathBuf::from(p));
        }
        let home = std::env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".config/cc-skillgate/skill-rules.json"))
    }
}

// ── Gate patterns (TOML) ──

#[derive(Debug, Deserialize, Serialize)]
pub struct GateConfig {
    #[serde(default)]
    pub dangerous: PatternSet,
    #[serde(default)]
    pub sensitive: PatternSet,
    #[serde(default)]
    pub readers: Readers,
}

/// A list of case-insensitive regex patterns.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PatternSet {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Read-idiom command specs for the sensitive-read scanner, grouped by the
/// shape of their file argument.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Readers {
    /// File argument follows the command word, after optional flags.
    #[serde(default)]
    pub file_args: Vec<String>,
    /// First non-flag argument is not a file (grep PATTERN FILE).
    #[serde(default)]
    pub skip_first_arg: Vec<String>,
    /// File argument is the final word (awk/sed script then file).
    #[serde(default)]
    pub last_arg: Vec<String>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct GateOverlay {
    #[serde(default)]
    dangerous: PatternSetOverlay,
    #[serde(default)]
    sensitive: PatternSetOverlay,
    #[serde(default)]
    readers: ReadersOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct PatternSetOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    remove_patterns: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ReadersOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    file_args: Vec<String>,
    #[serde(default)]
    skip_first_arg: Vec<String>,
    #[serde(default)]
    last_arg: Vec<String>,
    #[serde(default)]
    remove_file_args: Vec<String>,
    #[serde(default)]
    remove_skip_first_arg: Vec<String>,
    #[serde(default)]
    remove_last_arg: Vec<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl GateConfig {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_GATE_CONFIG).expect("embedded default gate config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from `~/.config/cc-skillgate/gate.toml` (if it exists)
    ///
    /// An unreadable or malformed overlay is ignored; the defaults still
    /// apply, so a broken overlay can never disable the gate.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    fn load_overlay() -> Option<GateOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = PathBuf::from(home).join(".config/cc-skillgate/gate.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                log::warn!("gate overlay parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: GateOverlay) {
        let d = overlay.dangerous;
        merge_list(
            &mut self.dangerous.patterns,
            d.patterns,
            &d.remove_patterns,
            d.replace,
        );

        let s = overlay.sensitive;
        merge_list(
            &mut self.sensitive.patterns,
            s.patterns,
            &s.remove_patterns,
            s.replace,
        );

        let r = overlay.readers;
        merge_list(
            &mut self.readers.file_args,
            r.file_args,
            &r.remove_file_args,
            r.replace,
        );
        merge_list(
            &mut self.readers.skip_first_arg,
            r.skip_first_arg,
            &r.remove_skip_first_arg,
            r.replace,
        );
        merge_list(
            &mut self.readers.last_arg,
            r.last_arg,
            &r.remove_last_arg,
            r.replace,
        );
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: GateOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
