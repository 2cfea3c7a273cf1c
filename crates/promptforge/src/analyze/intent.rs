// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Intent classification
//!
//! Keyword-accumulation scoring over six fixed categories. Exactly one
//! category wins per analysis; ties break by declaration order.

use super::tokenize::Token;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The six intent categories, in declaration (tie-break) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentCategory {
    /// Build something new.
    Create,
    /// Change something existing.
    Modify,
    /// Examine or measure something.
    Analyze,
    /// Describe or teach something.
    Explain,
    /// Find and fix a defect.
    Debug,
    /// Make something faster or cheaper.
    Optimize,
}

/// All categories in declaration order.
pub const ALL_CATEGORIES: &[IntentCategory] = &[
    IntentCategory::Create,
    IntentCategory::Modify,
    IntentCategory::Analyze,
    IntentCategory::Explain,
    IntentCategory::Debug,
    IntentCategory::Optimize,
];

impl IntentCategory {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Analyze => "analyze",
            Self::Explain => "explain",
            Self::Debug => "debug",
            Self::Optimize => "optimize",
        }
    }

    /// Trigger keywords. The first keyword is also the leading-word bonus
    /// trigger.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Create => &["create", "make", "build", "generate", "write", "add", "design"],
            Self::Modify => &["modify", "change", "update", "refactor", "rename", "edit", "adjust"],
            Self::Analyze => &["analyze", "review", "inspect", "measure", "evaluate", "compare", "audit"],
            Self::Explain => &["explain", "describe", "document", "summarize", "teach", "clarify"],
            Self::Debug => &["debug", "fix", "troubleshoot", "diagnose", "investigate", "repair"],
            Self::Optimize => &["optimize", "improve", "speed", "accelerate", "reduce", "tune", "faster"],
        }
    }

    /// Category-specific subcategory vocabulary; the subset that literally
    /// appears in the text becomes the intent's subcategories.
    pub fn subcategory_vocab(&self) -> &'static [&'static str] {
        match self {
            Self::Create => &["api", "schema", "component", "function", "table", "service", "script"],
            Self::Modify => &["migration", "signature", "layout", "config", "interface"],
            Self::Analyze => &["performance", "security", "complexity", "coverage", "usage"],
            Self::Explain => &["architecture", "tradeoffs", "algorithm", "workflow", "concept"],
            Self::Debug => &["crash", "leak", "deadlock", "regression", "timeout", "exception"],
            Self::Optimize => &["query", "latency", "memory", "throughput", "cost", "index"],
        }
    }
}

/// Classified intent for an analyzed text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// Winning category.
    pub category: IntentCategory,
    /// Accumulated confidence, clamped to [0, 1].
    pub confidence: f32,
    /// Subcategory vocabulary terms present in the text.
    pub subcategories: Vec<String>,
}

/// Confidence added per keyword hit.
const KEYWORD_WEIGHT: f32 = 0.2;
/// Bonus when the text starts with a category's first keyword.
const LEADING_BONUS: f32 = 0.3;

/// Classify intent from the token list and the raw lowercased text.
pub fn classify(tokens: &[Token], raw: &str) -> Intent {
    let lower = raw.to_lowercase();
    let lemmas: SmallVec<[&str; 32]> = tokens.iter().map(|t| t.lemma.as_str()).collect();
    let first_word = lower.split_whitespace().next().unwrap_or("");

    let mut best = (IntentCategory::Create, 0.0f32);
    for &category in ALL_CATEGORIES {
        let mut confidence = 0.0;
        for keyword in category.keywords() {
            if lemmas.contains(keyword) || lower.contains(keyword) {
                confidence += KEYWORD_WEIGHT;
            }
        }
        if first_word == category.keywords()[0] {
            confidence += LEADING_BONUS;
        }
        // Strictly-greater keeps declaration order as the tie-break.
        if confidence > best.1 {
            best = (category, confidence);
        }
    }

    let (category, confidence) = best;
    let subcategories = category
        .subcategory_vocab()
        .iter()
        .filter(|term| lower.contains(*term))
        .map(|term| term.to_string())
        .collect();

    Intent {
        category,
        confidence: confidence.min(1.0),
        subcategories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::tokenize::Tokenizer;

    fn intent_of(text: &str) -> Intent {
        classify(&Tokenizer::new().tokenize(text), text)
    }

    #[test]
    fn test_create_intent() {
        let intent = intent_of("create a users table");
        assert_eq!(intent.category, IntentCategory::Create);
        // "create" keyword hit + leading bonus.
        assert!(intent.confidence >= 0.5);
    }

    #[test]
    fn test_leading_bonus() {
        let leading = intent_of("debug the crash");
        let buried = intent_of("please look at the debug logs for the crash");
        assert_eq!(leading.category, IntentCategory::Debug);
        assert_eq!(buried.category, IntentCategory::Debug);
        assert!(leading.confidence > buried.confidence);
    }

    #[test]
    fn test_subcategories_present_in_text() {
        let intent = intent_of("optimize the query latency");
        assert_eq!(intent.category, IntentCategory::Optimize);
        assert!(intent.subcategories.contains(&"query".to_string()));
        assert!(intent.subcategories.contains(&"latency".to_string()));
        assert!(!intent.subcategories.contains(&"memory".to_string()));
    }

    #[test]
    fn test_tie_breaks_by_declaration_order() {
        // No keywords at all: everything scores 0, Create wins by order.
        let intent = intent_of("the weather is pleasant");
        assert_eq!(intent.category, IntentCategory::Create);
        assert_eq!(intent.confidence, 0.0);
    }

    #[test]
    fn test_confidence_clamped() {
        let intent =
            intent_of("create make build generate write add design a new api service table");
        assert_eq!(intent.category, IntentCategory::Create);
        assert_eq!(intent.confidence, 1.0);
    }

    #[test]
    fn test_empty_text() {
        let intent = intent_of("");
        assert_eq!(intent.category, IntentCategory::Create);
        assert_eq!(intent.confidence, 0.0);
        assert!(intent.subcategories.is_empty());
    }
}
