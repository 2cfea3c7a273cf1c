// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Linguistic analysis
//!
//! Extracts tokens, entity spans, intent, and heuristic scores from raw
//! text. `analyze` is total: it never fails for any string input. Oversized
//! input is silently truncated to [`MAX_ANALYZED_CHARS`] characters before
//! analysis; this is the crate's single truncation policy.

pub mod entity;
pub mod intent;
pub mod metrics;
pub mod tokenize;

pub use entity::{Entity, EntityLabel};
pub use intent::{Intent, IntentCategory};
pub use metrics::Language;
pub use tokenize::{PartOfSpeech, Token, Tokenizer};

use crate::domain::{Domain, ALL_DOMAINS};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Maximum number of characters analyzed; longer input is truncated
/// silently.
pub const MAX_ANALYZED_CHARS: usize = 10_000;

/// The six placeholder syntaxes that flip `has_variables`.
static PLACEHOLDER_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\{\{\s*\w+\s*\}\}", // {{x}}
        r"\$\w+",             // $x
        r"(?:^|\s):\w+",      // :x
        r"%\w+%",             // %x%
        r"\[\w+\]",           // [x]
        r"<\w+>",             // <x>
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

/// Aggregate result of linguistic analysis. Immutable after construction;
/// all bounded scores are clamped to their stated ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// Analyzed tokens.
    pub tokens: Vec<Token>,
    /// Extracted entity spans (may overlap).
    pub entities: Vec<Entity>,
    /// Classified intent.
    pub intent: Intent,
    /// Structural complexity in [0, 1]; 0 for empty input.
    pub complexity: f32,
    /// Ambiguity in [0, 1]; 1 for empty input.
    pub ambiguity: f32,
    /// Whether any placeholder syntax is present.
    pub has_variables: bool,
    /// Detected language.
    pub language: Language,
    /// Domains hinted at by keyword presence.
    pub domain_hints: Vec<Domain>,
    /// Sentiment polarity in [-1, 1].
    pub sentiment: f32,
    /// Normalized Flesch Reading Ease in [0, 1].
    pub readability: f32,
    /// Technical terms, deduplicated case-insensitively.
    pub technical_terms: Vec<String>,
}

/// Heuristic analyzer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Analyzer {
    tokenizer: Tokenizer,
}

impl Analyzer {
    /// Create an analyzer.
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
        }
    }

    /// Analyze raw text.
    ///
    /// Total function: empty strings, pure whitespace, control characters,
    /// and oversized input all produce a well-formed `Analysis`. Input
    /// beyond [`MAX_ANALYZED_CHARS`] characters is truncated silently.
    pub fn analyze(&self, raw: &str) -> Analysis {
        let text = sanitize(raw);

        let tokens = self.tokenizer.tokenize(&text);
        let entities = entity::extract(&text);
        let intent = intent::classify(&tokens, &text);
        let technical_terms = metrics::technical_terms(&tokens);

        let lower = text.to_lowercase();
        let domain_hints = ALL_DOMAINS
            .iter()
            .copied()
            .filter(|d| d.hint_keywords().iter().any(|kw| contains_word(&lower, kw)))
            .collect();

        Analysis {
            complexity: metrics::complexity(&text, &tokens, &technical_terms),
            ambiguity: metrics::ambiguity(&tokens),
            has_variables: has_variables(&text),
            language: metrics::detect_language(&tokens),
            domain_hints,
            sentiment: metrics::sentiment(&tokens),
            readability: metrics::readability(&text, &tokens),
            technical_terms,
            tokens,
            entities,
            intent,
        }
    }
}

/// Strip control characters (keeping newline and tab), collapse runs of
/// spaces and tabs, trim, and truncate to [`MAX_ANALYZED_CHARS`].
pub fn sanitize(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len().min(MAX_ANALYZED_CHARS));
    let mut last_was_space = false;
    let mut kept = 0usize;
    for c in raw.chars() {
        let c = match c {
            '\n' => '\n',
            '\t' | ' ' => ' ',
            c if c.is_control() => continue,
            c => c,
        };
        if c == ' ' {
            if last_was_space {
                continue;
            }
            last_was_space = true;
        } else {
            last_was_space = false;
        }
        cleaned.push(c);
        kept += 1;
        if kept >= MAX_ANALYZED_CHARS {
            break;
        }
    }
    cleaned.trim().to_string()
}

/// Check whether any of the six placeholder syntaxes is present.
pub fn has_variables(text: &str) -> bool {
    PLACEHOLDER_RES.iter().any(|re| re.is_match(text))
}

/// Whole-word containment check over a lowercased haystack.
fn contains_word(lower: &str, word: &str) -> bool {
    lower
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .any(|w| w == word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_empty() {
        let analysis = Analyzer::new().analyze("");
        assert!(analysis.tokens.is_empty());
        assert!(analysis.entities.is_empty());
        assert_eq!(analysis.complexity, 0.0);
        assert_eq!(analysis.ambiguity, 1.0);
        assert_eq!(analysis.readability, 0.0);
        assert_eq!(analysis.language, Language::Unknown);
        assert!(!analysis.has_variables);
    }

    #[test]
    fn test_analyze_whitespace_and_control_chars() {
        let analysis = Analyzer::new().analyze("  \u{0000}\u{0007}   \t \n ");
        assert!(analysis.tokens.is_empty());
        assert_eq!(analysis.ambiguity, 1.0);
    }

    #[test]
    fn test_sanitize_collapses_and_strips() {
        assert_eq!(sanitize("  hello\u{0000}   world\t! "), "hello world !");
        // Newlines survive.
        assert_eq!(sanitize("a\nb"), "a\nb");
    }

    #[test]
    fn test_sanitize_truncates_silently() {
        let long = "word ".repeat(5_000);
        let cleaned = sanitize(&long);
        assert!(cleaned.chars().count() <= MAX_ANALYZED_CHARS);
        let analysis = Analyzer::new().analyze(&long);
        assert!(!analysis.tokens.is_empty());
    }

    #[test]
    fn test_variable_syntaxes() {
        for text in [
            "use {{name}}",
            "use $name",
            "use :name please",
            "use %name%",
            "use [name]",
            "use <name>",
        ] {
            assert!(has_variables(text), "{text} should detect variables");
        }
        assert!(!has_variables("no placeholders here"));
    }

    #[test]
    fn test_domain_hints() {
        let analysis = Analyzer::new().analyze("optimize the database query with an index");
        assert!(analysis.domain_hints.contains(&Domain::Sql));
        assert!(!analysis.domain_hints.contains(&Domain::Cine));
    }

    #[test]
    fn test_scores_bounded() {
        for text in [
            "make it fast",
            "Create a PostgreSQL users table with id, name, email columns.",
            "???!!!",
            "\u{1F600} emoji only",
        ] {
            let a = Analyzer::new().analyze(text);
            assert!((0.0..=1.0).contains(&a.complexity), "{text}");
            assert!((0.0..=1.0).contains(&a.ambiguity), "{text}");
            assert!((0.0..=1.0).contains(&a.readability), "{text}");
            assert!((-1.0..=1.0).contains(&a.sentiment), "{text}");
        }
    }

    #[test]
    fn test_full_analysis_sql_prompt() {
        let a = Analyzer::new().analyze("optimize the slow query on the users table");
        assert_eq!(a.intent.category, IntentCategory::Optimize);
        assert_eq!(a.language, Language::En);
        assert!(a.technical_terms.iter().any(|t| t == "query"));
        assert!(a.domain_hints.contains(&Domain::Sql));
    }
}
