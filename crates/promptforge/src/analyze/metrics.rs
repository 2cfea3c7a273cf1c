// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Heuristic linguistic metrics
//!
//! All signals here are rule- and pattern-based approximations, not learned
//! models. Every bounded score is clamped to its stated range.

use super::entity::{AUTH_TECHS, DATABASES, TECHNOLOGIES};
use super::tokenize::{Token, CONJUNCTIONS, MODAL_VERBS, PREPOSITIONS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Vague terms that lower clarity.
pub const VAGUE_TERMS: &[&str] = &[
    "nice", "good", "better", "fast", "slow", "some", "stuff", "thing", "things", "somehow",
    "maybe", "etc", "cool", "simple", "easy", "clean", "pretty", "big", "small", "lots",
];

/// Indefinite pronouns.
const INDEFINITE_PRONOUNS: &[&str] = &[
    "it", "this", "that", "something", "anything", "everything", "nothing", "someone", "anyone",
    "everyone", "somewhere", "anywhere",
];

/// Hedge words.
const HEDGE_WORDS: &[&str] = &[
    "maybe", "perhaps", "possibly", "probably", "somewhat", "roughly", "around", "approximately",
    "likely", "fairly", "kind", "sort",
];

/// Core programming-concept nouns counted as technical terms.
const PROGRAMMING_CONCEPTS: &[&str] = &[
    "api", "function", "class", "method", "variable", "loop", "array", "struct", "trait",
    "database", "query", "index", "cache", "thread", "async", "server", "client", "endpoint",
    "schema", "migration", "queue", "transaction", "mutex", "pointer", "compiler", "parser",
];

/// Spanish function words for language detection.
const SPANISH_FUNCTION_WORDS: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "de", "del", "que", "y", "en", "es", "por", "para",
    "con", "como", "pero", "más", "este", "esta", "hacer", "crear",
];

/// English function words for language detection.
const ENGLISH_FUNCTION_WORDS: &[&str] = &[
    "the", "a", "an", "of", "that", "and", "in", "is", "by", "for", "with", "as", "but", "more",
    "this", "make", "create", "to", "it", "on",
];

/// Detected language of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    En,
    /// Spanish.
    Es,
    /// Not enough evidence either way.
    Unknown,
}

/// Complexity weights. Sum to 1.0.
const W_LENGTH: f32 = 0.20;
const W_SENTENCE_LEN: f32 = 0.20;
const W_RICHNESS: f32 = 0.20;
const W_TECH_DENSITY: f32 = 0.25;
const W_CONNECTIVES: f32 = 0.15;

/// Ambiguity weights. Sum to 1.0.
const W_VAGUE: f32 = 0.4;
const W_INDEFINITE: f32 = 0.3;
const W_MODAL: f32 = 0.2;
const W_HEDGE: f32 = 0.1;

/// Clamp to [0, 1].
#[inline]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Weighted structural complexity in [0, 1]. Empty input scores 0.
pub fn complexity(text: &str, tokens: &[Token], technical_terms: &[String]) -> f32 {
    if tokens.is_empty() {
        return 0.0;
    }
    let n = tokens.len() as f32;

    let length_factor = clamp01(text.len() as f32 / 400.0);
    let avg_sentence = clamp01(n / (sentence_count(text).max(1) as f32) / 25.0);
    let unique: HashSet<&str> = tokens.iter().map(|t| t.lemma.as_str()).collect();
    let richness = unique.len() as f32 / n;
    let tech_density = clamp01(technical_terms.len() as f32 * 3.0 / n);
    let connectives = tokens
        .iter()
        .filter(|t| {
            let l = t.lemma.as_str();
            PREPOSITIONS.contains(&l) || CONJUNCTIONS.contains(&l)
        })
        .count() as f32;
    let connective_density = clamp01(connectives * 2.0 / n);

    clamp01(
        W_LENGTH * length_factor
            + W_SENTENCE_LEN * avg_sentence
            + W_RICHNESS * richness
            + W_TECH_DENSITY * tech_density
            + W_CONNECTIVES * connective_density,
    )
}

/// Weighted ambiguity in [0, 1]. Empty input scores 1 (no evidence to
/// reduce maximal uncertainty).
pub fn ambiguity(tokens: &[Token]) -> f32 {
    if tokens.is_empty() {
        return 1.0;
    }
    let n = tokens.len() as f32;
    let density = |words: &[&str]| {
        let hits = tokens
            .iter()
            .filter(|t| words.contains(&t.lemma.as_str()) || words.contains(&t.text.to_lowercase().as_str()))
            .count() as f32;
        clamp01(hits * 3.0 / n)
    };

    clamp01(
        W_VAGUE * density(VAGUE_TERMS)
            + W_INDEFINITE * density(INDEFINITE_PRONOUNS)
            + W_MODAL * density(MODAL_VERBS)
            + W_HEDGE * density(HEDGE_WORDS),
    )
}

/// Lexicon-based sentiment polarity in [-1, 1].
pub fn sentiment(tokens: &[Token]) -> f32 {
    let positive = tokens.iter().filter(|t| t.sentiment > 0.0).count() as f32;
    let negative = tokens.iter().filter(|t| t.sentiment < 0.0).count() as f32;
    if positive + negative == 0.0 {
        return 0.0;
    }
    ((positive - negative) / (positive + negative)).clamp(-1.0, 1.0)
}

/// Simplified Flesch Reading Ease, normalized to [0, 1]. Scores 0 when the
/// text has no words or sentences.
pub fn readability(text: &str, tokens: &[Token]) -> f32 {
    let sentences = sentence_count(text);
    if tokens.is_empty() || sentences == 0 {
        return 0.0;
    }
    let words = tokens.len() as f32;
    let syllables: usize = tokens.iter().map(|t| syllable_count(&t.text)).sum();

    let flesch =
        206.835 - 1.015 * (words / sentences as f32) - 84.6 * (syllables as f32 / words);
    clamp01(flesch / 100.0)
}

/// Count syllables by vowel-group heuristic; a silent trailing 'e' is
/// decremented. Every word counts at least one.
pub fn syllable_count(word: &str) -> usize {
    let lower = word.to_lowercase();
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut groups = 0;
    let mut in_group = false;
    for c in lower.chars() {
        if is_vowel(c) {
            if !in_group {
                groups += 1;
            }
            in_group = true;
        } else {
            in_group = false;
        }
    }
    if groups > 1 && lower.ends_with('e') && !lower.ends_with("le") {
        groups -= 1;
    }
    groups.max(1)
}

/// Count sentence terminators; a trailing fragment counts as one.
pub fn sentence_count(text: &str) -> usize {
    let terminated = text
        .chars()
        .filter(|c| matches!(c, '.' | '!' | '?'))
        .count();
    let trailing_fragment = text
        .trim_end()
        .chars()
        .last()
        .map(|c| !matches!(c, '.' | '!' | '?'))
        .unwrap_or(false);
    terminated + usize::from(trailing_fragment)
}

/// Majority vote over fixed Spanish vs. English function-word lists.
pub fn detect_language(tokens: &[Token]) -> Language {
    let mut es = 0usize;
    let mut en = 0usize;
    for token in tokens {
        let lower = token.text.to_lowercase();
        if SPANISH_FUNCTION_WORDS.contains(&lower.as_str()) {
            es += 1;
        }
        if ENGLISH_FUNCTION_WORDS.contains(&lower.as_str()) {
            en += 1;
        }
    }
    match en.cmp(&es) {
        std::cmp::Ordering::Greater => Language::En,
        std::cmp::Ordering::Less => Language::Es,
        std::cmp::Ordering::Equal => Language::Unknown,
    }
}

/// Union of tokens matching the technical batteries, deduplicated
/// case-insensitively while preserving first-seen casing.
pub fn technical_terms(tokens: &[Token]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut terms = Vec::new();
    for token in tokens {
        let text = token.text.as_str();
        let lower = text.to_lowercase();
        let is_acronym =
            text.len() >= 2 && text.len() <= 6 && text.chars().all(|c| c.is_ascii_uppercase());
        let is_file = lower.rsplit_once('.').is_some_and(|(_, ext)| {
            matches!(ext, "rs" | "py" | "js" | "ts" | "json" | "yaml" | "toml" | "sql" | "md")
        });
        let technical = is_acronym
            || is_file
            || TECHNOLOGIES.contains(&lower.as_str())
            || DATABASES.contains(&lower.as_str())
            || AUTH_TECHS.contains(&lower.as_str())
            || PROGRAMMING_CONCEPTS.contains(&lower.as_str());
        if technical && seen.insert(lower) {
            terms.push(text.to_string());
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::tokenize::Tokenizer;

    fn toks(text: &str) -> Vec<Token> {
        Tokenizer::new().tokenize(text)
    }

    #[test]
    fn test_complexity_empty_is_zero() {
        assert_eq!(complexity("", &[], &[]), 0.0);
    }

    #[test]
    fn test_complexity_bounded_and_ordered() {
        let simple = "make it fast";
        let technical = "Design a PostgreSQL schema with a users table, a composite index on \
                         (tenant_id, created_at), and a migration script that backfills the \
                         denormalized cache while the API stays online.";
        let c1 = complexity(simple, &toks(simple), &technical_terms(&toks(simple)));
        let c2 = complexity(technical, &toks(technical), &technical_terms(&toks(technical)));
        assert!((0.0..=1.0).contains(&c1));
        assert!((0.0..=1.0).contains(&c2));
        assert!(c2 > c1);
    }

    #[test]
    fn test_ambiguity_empty_is_one() {
        assert_eq!(ambiguity(&[]), 1.0);
    }

    #[test]
    fn test_ambiguity_vague_text_high() {
        let vague = ambiguity(&toks("make it nice and fast somehow"));
        let precise = ambiguity(&toks(
            "Create a PostgreSQL users table with id, name, email columns",
        ));
        assert!(vague > 0.5, "vague text scored {vague}");
        assert!(precise < 0.3, "precise text scored {precise}");
    }

    #[test]
    fn test_sentiment_polarity() {
        assert!(sentiment(&toks("this is great and elegant")) > 0.0);
        assert!(sentiment(&toks("this is broken and slow")) < 0.0);
        assert_eq!(sentiment(&toks("create a table")), 0.0);
    }

    #[test]
    fn test_syllables() {
        assert_eq!(syllable_count("cat"), 1);
        assert_eq!(syllable_count("table"), 2);
        assert_eq!(syllable_count("create"), 1); // silent trailing e decremented
        assert_eq!(syllable_count("database"), 3);
        assert_eq!(syllable_count("x"), 1); // floor of one
    }

    #[test]
    fn test_readability_zero_without_words() {
        assert_eq!(readability("", &[]), 0.0);
    }

    #[test]
    fn test_readability_short_beats_dense() {
        let short = "The cat sat. The dog ran.";
        let dense = "Notwithstanding considerable organizational heterogeneity, interdepartmental \
                     collaboration necessitates comprehensive documentation infrastructure.";
        let r1 = readability(short, &toks(short));
        let r2 = readability(dense, &toks(dense));
        assert!(r1 > r2);
        assert!((0.0..=1.0).contains(&r1));
        assert!((0.0..=1.0).contains(&r2));
    }

    #[test]
    fn test_language_detection() {
        assert_eq!(detect_language(&toks("create a table for the users")), Language::En);
        assert_eq!(detect_language(&toks("crear una tabla para los usuarios")), Language::Es);
        assert_eq!(detect_language(&toks("zzz qqq")), Language::Unknown);
    }

    #[test]
    fn test_technical_terms_dedup_preserves_casing() {
        let terms = technical_terms(&toks("Use Postgres with postgres and JWT plus an API"));
        assert_eq!(
            terms,
            vec!["Postgres".to_string(), "JWT".to_string(), "API".to_string()]
        );
    }

    #[test]
    fn test_sentence_count_fragment() {
        assert_eq!(sentence_count("One. Two."), 2);
        assert_eq!(sentence_count("One. Two"), 2);
        assert_eq!(sentence_count("fragment"), 1);
        assert_eq!(sentence_count(""), 0);
    }
}
