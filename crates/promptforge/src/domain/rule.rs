// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Rule data model
//!
//! Rules are declarative data: a matcher (tagged union of literal
//! substring, regular expression, or predicate), a replacement, a priority,
//! and a category. Literal and regex rules round-trip through serde so
//! user-authored rules can be loaded from JSON; predicate rules are
//! code-only.

use crate::error::{Error, Result};
use crate::domain::Domain;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Predicate matcher function.
pub type PredicateFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// How a rule decides whether it fires.
#[derive(Clone)]
pub enum Matcher {
    /// Case-insensitive literal substring.
    Literal(String),
    /// Compiled regular expression.
    Regex(Regex),
    /// Arbitrary predicate over the running text (code-only, not
    /// serializable).
    Predicate(PredicateFn),
}

impl Matcher {
    /// Build a regex matcher, surfacing pattern errors.
    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| Error::InvalidPattern(format!("{pattern}: {e}")))
    }

    /// Build a case-insensitive regex matcher.
    pub fn regex_ci(pattern: &str) -> Result<Self> {
        Self::regex(&format!("(?i){pattern}"))
    }

    /// Check whether this matcher fires on the text.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Literal(s) => text.to_lowercase().contains(&s.to_lowercase()),
            Self::Regex(re) => re.is_match(text),
            Self::Predicate(f) => f(text),
        }
    }
}

impl core::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Self::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Serde representation: literal and regex matchers carry their source
/// text; predicates cannot be represented.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", content = "pattern", rename_all = "snake_case")]
enum MatcherRepr {
    Literal(String),
    Regex(String),
}

impl Serialize for Matcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let repr = match self {
            Self::Literal(s) => MatcherRepr::Literal(s.clone()),
            Self::Regex(re) => MatcherRepr::Regex(re.as_str().to_string()),
            Self::Predicate(_) => {
                return Err(serde::ser::Error::custom(
                    "predicate matchers are not serializable",
                ))
            }
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Matcher {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        match MatcherRepr::deserialize(deserializer)? {
            MatcherRepr::Literal(s) => Ok(Self::Literal(s)),
            MatcherRepr::Regex(p) => {
                Matcher::regex(&p).map_err(|e| serde::de::Error::custom(e.to_string()))
            }
        }
    }
}

/// What a firing rule does to the running text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Replacement {
    /// Replace every matched span with a literal.
    Literal(String),
    /// Regex expansion template (`$1` style capture references).
    Template(String),
    /// Append a block to the text (used by enhancement rules).
    Append(String),
}

/// Rule category. Applied in this declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Colloquial phrasing upgraded to professional terminology.
    VagueTerms,
    /// Imperative openers rewritten into a professional framing.
    Structure,
    /// Trigger-gated additive guidance blocks.
    Enhancement,
    /// Domain terminology corrections.
    Terminology,
    /// Formatting fixes.
    Formatting,
    /// Contextual additions.
    Context,
}

/// All categories in application order.
pub const CATEGORY_ORDER: &[RuleCategory] = &[
    RuleCategory::VagueTerms,
    RuleCategory::Structure,
    RuleCategory::Enhancement,
    RuleCategory::Terminology,
    RuleCategory::Formatting,
    RuleCategory::Context,
];

impl RuleCategory {
    /// Canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VagueTerms => "vague_terms",
            Self::Structure => "structure",
            Self::Enhancement => "enhancement",
            Self::Terminology => "terminology",
            Self::Formatting => "formatting",
            Self::Context => "context",
        }
    }
}

/// A before/after example attached to a rule or domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleExample {
    /// Input phrasing.
    pub before: String,
    /// Improved phrasing.
    pub after: String,
    /// Why the change helps.
    pub explanation: String,
}

/// A single rewrite rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRule {
    /// Stable identifier.
    pub id: String,
    /// Owning domain.
    pub domain: Domain,
    /// Human description, reported when the rule fires.
    pub description: String,
    /// When the rule fires.
    pub matcher: Matcher,
    /// Negative gate: when present and matching, the rule is suppressed.
    /// Enhancement blocks use this for their "already present" check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<Matcher>,
    /// What the rule does.
    pub replacement: Replacement,
    /// Rules apply in descending priority within their category.
    pub priority: i32,
    /// Deactivated rules are skipped entirely.
    pub active: bool,
    /// Category, which fixes the application phase.
    pub category: RuleCategory,
    /// Illustrative examples.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<RuleExample>,
}

impl DomainRule {
    /// Create an active rule with default priority 0 and no examples.
    pub fn new(
        id: impl Into<String>,
        domain: Domain,
        description: impl Into<String>,
        matcher: Matcher,
        replacement: Replacement,
        category: RuleCategory,
    ) -> Self {
        Self {
            id: id.into(),
            domain,
            description: description.into(),
            matcher,
            guard: None,
            replacement,
            priority: 0,
            active: true,
            category,
            examples: Vec::new(),
        }
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the "already present" guard.
    pub fn with_guard(mut self, guard: Matcher) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Attach an example.
    pub fn with_example(
        mut self,
        before: impl Into<String>,
        after: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        self.examples.push(RuleExample {
            before: before.into(),
            after: after.into(),
            explanation: explanation.into(),
        });
        self
    }

    /// Whether the rule fires on the text: active, matcher hits, and the
    /// guard (if any) does not.
    pub fn fires(&self, text: &str) -> bool {
        self.active
            && self.matcher.matches(text)
            && !self.guard.as_ref().map(|g| g.matches(text)).unwrap_or(false)
    }

    /// Apply the rule to the text, returning the rewritten string.
    /// Assumes `fires` returned true.
    pub fn apply(&self, text: &str) -> String {
        match (&self.matcher, &self.replacement) {
            (Matcher::Regex(re), Replacement::Literal(lit)) => {
                re.replace_all(text, regex::NoExpand(lit)).into_owned()
            }
            (Matcher::Regex(re), Replacement::Template(tpl)) => {
                re.replace_all(text, tpl.as_str()).into_owned()
            }
            (Matcher::Literal(needle), Replacement::Literal(lit)) => {
                replace_case_insensitive(text, needle, lit)
            }
            (_, Replacement::Append(block)) => {
                let mut out = String::with_capacity(text.len() + block.len() + 2);
                out.push_str(text.trim_end());
                out.push_str("\n\n");
                out.push_str(block);
                out
            }
            // Literal matchers have no captures; the template is literal.
            (Matcher::Literal(needle), Replacement::Template(tpl)) => {
                replace_case_insensitive(text, needle, tpl)
            }
            // A predicate has no span to replace; only Append is meaningful.
            (Matcher::Predicate(_), Replacement::Literal(_) | Replacement::Template(_)) => {
                text.to_string()
            }
        }
    }
}

/// Replace all case-insensitive occurrences of `needle`, keeping the rest
/// of the text untouched.
fn replace_case_insensitive(text: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return text.to_string();
    }
    let lower_text = text.to_lowercase();
    let lower_needle = needle.to_lowercase();
    // Byte offsets into `lower_text` are only valid in `text` when
    // lowercasing preserved lengths; bail out on the rare Unicode cases
    // where it does not.
    if lower_text.len() != text.len() || lower_needle.len() != needle.len() {
        return text.to_string();
    }
    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    while let Some(pos) = lower_text[cursor..].find(&lower_needle) {
        let start = cursor + pos;
        match text.get(cursor..start) {
            Some(head) => result.push_str(head),
            None => break,
        }
        result.push_str(replacement);
        cursor = start + needle.len();
    }
    result.push_str(text.get(cursor..).unwrap_or(""));
    result
}

/// A record of one rule firing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedRule {
    /// Rule identifier.
    pub rule_id: String,
    /// Rule description.
    pub description: String,
    /// Rule category.
    pub category: RuleCategory,
    /// Qualitative impact note.
    pub impact: String,
}

/// One before/after improvement recorded during refinement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Improvement {
    /// Improvement kind (rule category name, or "degraded" for absorbed
    /// engine failures).
    pub kind: String,
    /// Text before the change.
    pub before: String,
    /// Text after the change.
    pub after: String,
    /// Why the change was made.
    pub reason: String,
}

/// Result of applying domain rules to a text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refinement {
    /// The rewritten text.
    pub refined: String,
    /// Rules that fired, in application order.
    pub rules_applied: Vec<AppliedRule>,
    /// Recorded improvements.
    pub improvements: Vec<Improvement>,
}
