// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Tokenization with heuristic part-of-speech tagging
//!
//! The tagger is rule-based: closed-class word tables plus suffix
//! heuristics. When it cannot handle the input it errors and the tokenizer
//! falls back to plain whitespace tokenization with stemming, so
//! tokenization as a whole never fails.

use serde::{Deserialize, Serialize};

/// Stop words for English text (common words carrying little content).
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "shall", "can", "need",
    "it", "its", "this", "that", "these", "those", "i", "you", "he", "she", "we", "they", "me",
    "him", "her", "us", "them", "my", "your", "his", "our", "their", "what", "which", "who",
    "whom", "when", "where", "why", "how", "all", "each", "every", "both", "few", "more", "most",
    "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "just", "also", "now", "here", "there", "then",
];

/// Positive sentiment lexicon.
const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "awesome", "best", "better", "love", "like", "nice",
    "clean", "clear", "fast", "easy", "simple", "robust", "reliable", "elegant", "efficient",
    "improve", "improved", "perfect", "helpful", "useful", "smooth",
];

/// Negative sentiment lexicon.
const NEGATIVE_WORDS: &[&str] = &[
    "bad", "worst", "worse", "terrible", "awful", "hate", "broken", "slow", "ugly", "confusing",
    "messy", "wrong", "error", "fail", "failed", "failing", "bug", "buggy", "crash", "crashes",
    "horrible", "annoying", "painful", "unreliable", "useless",
];

/// Determiners (closed class).
const DETERMINERS: &[&str] = &["a", "an", "the", "this", "that", "these", "those", "each", "every", "some", "any", "no"];

/// Prepositions (closed class).
pub const PREPOSITIONS: &[&str] = &[
    "in", "on", "at", "to", "for", "of", "with", "by", "from", "into", "onto", "over", "under",
    "about", "between", "through", "during", "against", "without", "within",
];

/// Coordinating and subordinating conjunctions (closed class).
pub const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "yet", "so", "because", "although", "while", "whereas", "if",
    "unless", "until", "since",
];

/// Pronouns (closed class).
const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "mine",
    "yours", "hers", "ours", "theirs", "who", "whom", "which", "what", "something", "anything",
    "everything", "nothing", "someone", "anyone", "everyone",
];

/// Modal verbs (closed class).
pub const MODAL_VERBS: &[&str] = &[
    "can", "could", "may", "might", "must", "shall", "should", "will", "would",
];

/// Common irregular/auxiliary verbs not covered by suffix heuristics.
const COMMON_VERBS: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
    "make", "made", "get", "got", "use", "used", "add", "create", "build", "write", "fix",
    "run", "show", "give", "take", "put", "set", "find", "want", "need",
];

/// Part of speech assigned by the heuristic tagger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    /// Noun (default for open-class words).
    Noun,
    /// Verb.
    Verb,
    /// Adjective.
    Adjective,
    /// Adverb.
    Adverb,
    /// Pronoun.
    Pronoun,
    /// Determiner.
    Determiner,
    /// Preposition.
    Preposition,
    /// Conjunction.
    Conjunction,
    /// Numeric literal.
    Number,
    /// Anything the tagger cannot classify (fallback mode tags everything
    /// with this).
    Other,
}

/// One analyzed unit of input. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Original text with surrounding punctuation trimmed.
    pub text: String,
    /// Heuristic part of speech.
    pub pos: PartOfSpeech,
    /// Stemmed lowercase form.
    pub lemma: String,
    /// Whether this is a stop word.
    pub is_stop_word: bool,
    /// Lexicon polarity in [-1, 1].
    pub sentiment: f32,
}

/// Words longer than this make the tagger bail out to basic tokenization.
const MAX_TAGGED_WORD_LEN: usize = 64;

/// Rule-based tokenizer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a tokenizer.
    pub fn new() -> Self {
        Self
    }

    /// Tokenize text. Never fails: tagger errors degrade to basic
    /// whitespace tokenization with stemming.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        match self.tagged(text) {
            Ok(tokens) => tokens,
            Err(_) => self.basic(text),
        }
    }

    /// Tokenize with full POS tagging. Errors on irregular input
    /// (pathologically long words) instead of guessing.
    fn tagged(&self, text: &str) -> Result<Vec<Token>, TaggerError> {
        let mut tokens = Vec::new();
        for word in split_words(text) {
            if word.chars().count() > MAX_TAGGED_WORD_LEN {
                return Err(TaggerError);
            }
            let lower = word.to_lowercase();
            tokens.push(Token {
                pos: tag(&lower),
                lemma: stem(&lower),
                is_stop_word: STOP_WORDS.contains(&lower.as_str()),
                sentiment: word_sentiment(&lower),
                text: word.to_string(),
            });
        }
        Ok(tokens)
    }

    /// Fallback: whitespace tokenization + stemming, no POS tags.
    fn basic(&self, text: &str) -> Vec<Token> {
        split_words(text)
            .map(|word| {
                let lower = word.to_lowercase();
                Token {
                    pos: PartOfSpeech::Other,
                    lemma: stem(&lower),
                    is_stop_word: STOP_WORDS.contains(&lower.as_str()),
                    sentiment: word_sentiment(&lower),
                    text: word.to_string(),
                }
            })
            .collect()
    }
}

/// Split into word candidates, trimming punctuation but keeping internal
/// hyphens/underscores ("kebab-case", "snake_case" stay whole).
fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '_'))
        .filter(|w| !w.is_empty())
}

/// Tag a lowercase word with its part of speech.
fn tag(word: &str) -> PartOfSpeech {
    if word.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return PartOfSpeech::Number;
    }
    if DETERMINERS.contains(&word) {
        return PartOfSpeech::Determiner;
    }
    if PREPOSITIONS.contains(&word) {
        return PartOfSpeech::Preposition;
    }
    if CONJUNCTIONS.contains(&word) {
        return PartOfSpeech::Conjunction;
    }
    if PRONOUNS.contains(&word) {
        return PartOfSpeech::Pronoun;
    }
    if MODAL_VERBS.contains(&word) || COMMON_VERBS.contains(&word) {
        return PartOfSpeech::Verb;
    }
    // Open classes by suffix.
    if word.len() > 3 && word.ends_with("ly") {
        return PartOfSpeech::Adverb;
    }
    if word.len() > 4 && (word.ends_with("ing") || word.ends_with("ize") || word.ends_with("ise"))
    {
        return PartOfSpeech::Verb;
    }
    if word.len() > 3 && word.ends_with("ed") {
        return PartOfSpeech::Verb;
    }
    if word.len() > 4
        && (word.ends_with("ous")
            || word.ends_with("ful")
            || word.ends_with("ive")
            || word.ends_with("able")
            || word.ends_with("ible")
            || word.ends_with("al"))
    {
        return PartOfSpeech::Adjective;
    }
    PartOfSpeech::Noun
}

/// Simple suffix-stripping stemmer. Not Porter; just enough to merge
/// inflected forms for lemma counting.
pub fn stem(word: &str) -> String {
    let w = word.to_lowercase();
    for (suffix, min_len) in [
        ("ingly", 7),
        ("edly", 6),
        ("ing", 5),
        ("ies", 5),
        ("ied", 5),
        ("ed", 4),
        ("es", 4),
        ("ly", 4),
        ("s", 4),
    ] {
        if w.len() >= min_len && w.ends_with(suffix) {
            let stemmed = &w[..w.len() - suffix.len()];
            // "ies"/"ied" -> "y" (queries -> query)
            if suffix == "ies" || suffix == "ied" {
                return format!("{stemmed}y");
            }
            return stemmed.to_string();
        }
    }
    w
}

/// Lexicon polarity for a single lowercase word.
fn word_sentiment(word: &str) -> f32 {
    if POSITIVE_WORDS.contains(&word) {
        1.0
    } else if NEGATIVE_WORDS.contains(&word) {
        -1.0
    } else {
        0.0
    }
}

/// Error from the tagger; callers fall back to basic tokenization.
#[derive(Debug)]
struct TaggerError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_empty() {
        let tokens = Tokenizer::new().tokenize("");
        assert!(tokens.is_empty());
        let tokens = Tokenizer::new().tokenize("   \t\n  ");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_tokenize_basic_sentence() {
        let tokens = Tokenizer::new().tokenize("Create a fast database query.");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Create", "a", "fast", "database", "query"]);
    }

    #[test]
    fn test_pos_tags() {
        let tokens = Tokenizer::new().tokenize("the quickly running system");
        assert_eq!(tokens[0].pos, PartOfSpeech::Determiner);
        assert_eq!(tokens[1].pos, PartOfSpeech::Adverb);
        assert_eq!(tokens[2].pos, PartOfSpeech::Verb);
        assert_eq!(tokens[3].pos, PartOfSpeech::Noun);
    }

    #[test]
    fn test_stop_word_flag() {
        let tokens = Tokenizer::new().tokenize("the database");
        assert!(tokens[0].is_stop_word);
        assert!(!tokens[1].is_stop_word);
    }

    #[test]
    fn test_sentiment_lexicon() {
        let tokens = Tokenizer::new().tokenize("great but broken");
        assert_eq!(tokens[0].sentiment, 1.0);
        assert_eq!(tokens[1].sentiment, 0.0);
        assert_eq!(tokens[2].sentiment, -1.0);
    }

    #[test]
    fn test_stemming() {
        assert_eq!(stem("queries"), "query");
        assert_eq!(stem("running"), "runn");
        assert_eq!(stem("tables"), "tabl");
        assert_eq!(stem("fast"), "fast");
        assert_eq!(stem("does"), "do");
        // Short words are left alone.
        assert_eq!(stem("is"), "is");
    }

    #[test]
    fn test_tagger_fallback_on_long_word() {
        let long = "x".repeat(100);
        let text = format!("normal {long} words");
        let tokens = Tokenizer::new().tokenize(&text);
        assert_eq!(tokens.len(), 3);
        // Fallback mode tags everything Other.
        assert!(tokens.iter().all(|t| t.pos == PartOfSpeech::Other));
        // But lemmas and stop flags still work.
        assert_eq!(tokens[0].lemma, "normal");
    }

    #[test]
    fn test_punctuation_trimmed_identifiers_kept() {
        let tokens = Tokenizer::new().tokenize("(user_id), snake_case!");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["user_id", "snake_case"]);
    }

    #[test]
    fn test_number_tag() {
        let tokens = Tokenizer::new().tokenize("port 8080");
        assert_eq!(tokens[1].pos, PartOfSpeech::Number);
    }
}
