//! Intent Scorer: weighted multi-signal matching of a user prompt against
//! configured skill rules.
//!
//! Every category is evaluated for every eligible skill — there is no early
//! exit — and the per-skill sum is floored at zero so exclude penalties can
//! suppress a match but never produce a negative score.

use crate::config::{DEFAULT_THRESHOLD, SkillRule, SkillRules};
use crate::matcher;

// Scoring weights. Direct mention is the strongest, unconditional signal.
pub const SCORE_DIRECT_MENTION: i32 = 20;
pub const SCORE_STRONG_PHRASE: i32 = 15;
pub const SCORE_EXACT_KEYWORD: i32 = 10;
pub const SCORE_INTENT_PATTERN: i32 = 8;
pub const SCORE_CONTAINS_KEYWORD: i32 = 5;
pub const SCORE_EXCLUDE_PENALTY: i32 = -20;

/// A skill that met its activation threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillMatch {
    pub name: String,
    pub priority: String,
    pub score: i32,
}

/// Sort rank for a priority tag. Unknown tags sort after all known ones.
fn priority_rank(priority: &str) -> u8 {
    match priority {
        "critical" => 0,
        "high" => 1,
        "medium" => 2,
        "low" => 3,
        _ => 99,
    }
}

/// Score one rule group against a prompt.
pub fn score_skill(prompt: &str, name: &str, rule: &SkillRule) -> i32 {
    let mut score = 0;
    let prompt_lower = prompt.to_lowercase();

    // Direct mention of the skill name, with `-`/`_` normalized to spaces
    // ("use systematic debugging" and "use systematic-debugging" both count).
    let name_lower = name.to_lowercase();
    let name_spaced = name_lower.replace(['-', '_'], " ");
    if prompt_lower.contains(&name_spaced) || prompt_lower.contains(&name_lower) {
        score += SCORE_DIRECT_MENTION;
    }

    // Multi-word exact phrases
    for phrase in &rule.strong_phrases {
        if matcher::contains_ci(prompt, phrase) {
            score += SCORE_STRONG_PHRASE;
        }
    }

    // Word-boundary keywords
    for kw in &rule.exact_keywords {
        if matcher::word_match_ci(prompt, kw) {
            score += SCORE_EXACT_KEYWORD;
        }
    }

    // Plain substring keywords, legacy nested list included
    for kw in rule
        .contains_keywords
        .iter()
        .chain(&rule.prompt_triggers.keywords)
    {
        if matcher::contains_ci(prompt, kw) {
            score += SCORE_CONTAINS_KEYWORD;
        }
    }

    // Intent regexes run against the original-case prompt: patterns may
    // carry their own case directives. Legacy nested list included.
    for pat in rule
        .intent_patterns
        .iter()
        .chain(&rule.prompt_triggers.intent_patterns)
    {
        if matcher::regex_search_ci(prompt, pat) {
            score += SCORE_INTENT_PATTERN;
        }
    }

    // Negative patterns suppress superficially similar but unrelated phrasing
    for pat in &rule.exclude_patterns {
        if matcher::regex_search_ci(prompt, pat) {
            score += SCORE_EXCLUDE_PENALTY;
        }
    }

    score.max(0)
}

/// Find all suggest-mode skills scoring at or above their threshold, ranked
/// by score descending, then priority rank, then rule-file order.
///
/// The sort is stable, so two skills tied on score and priority keep the
/// order they appear in the rule file — repeated runs over identical input
/// always produce identical output.
pub fn find_matches(prompt: &str, rules: &SkillRules) -> Vec<SkillMatch> {
    let mut matches = Vec::new();

    for (name, rule) in &rules.skills {
        if rule.enforcement != "suggest" {
            continue;
        }
        let score = score_skill(prompt, name, rule);
        let threshold = rule.threshold.unwrap_or(DEFAULT_THRESHOLD);
        if score >= threshold {
            matches.push(SkillMatch {
                name: name.clone(),
                priority: rule.priority.clone(),
                score,
            });
        }
    }

    matches.sort_by_key(|m| (std::cmp::Reverse(m.score), priority_rank(&m.priority)));
    matches
}
