// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Structural validation
//!
//! `validate` is a deterministic, pure function of its inputs. Errors make
//! the report invalid; warnings and suggestions never affect validity.

use crate::analyze::metrics::{clamp01, Language};
use crate::analyze::Analysis;
use crate::domain::Domain;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ambiguity above this is a clarity error.
const AMBIGUITY_ERROR: f32 = 0.75;
/// Ambiguity above this is a clarity warning.
const AMBIGUITY_WARNING: f32 = 0.5;
/// Minimum technical-term density before a specificity warning.
const MIN_TECH_DENSITY: f32 = 0.05;
/// Texts longer than this with low readability get a structure warning.
const LONG_TEXT_CHARS: usize = 400;
/// Readability below this counts as low.
const LOW_READABILITY: f32 = 0.4;
/// A non-stop-word lemma repeated more than this is redundant.
const REDUNDANCY_THRESHOLD: usize = 3;

/// Technical-term count at which the coverage half of specificity
/// saturates.
const TERM_SATURATION: f32 = 4.0;
/// Short texts are measured against this token floor for term density, so
/// one technical term in a three-word prompt does not read as maximally
/// specific.
const DENSITY_FLOOR_TOKENS: f32 = 15.0;
/// Labeled-section count at which the structure credit saturates.
const SECTION_SATURATION: f32 = 2.0;

/// Words that indicate a sentence was cut off when they end the text.
const DANGLING_ENDINGS: &[&str] = &[
    "that", "which", "and", "or", "but", "the", "a", "an", "to", "with", "for", "of", "in",
];

/// NoSQL vocabulary that signals a terminology mismatch inside a
/// relational-database request.
const SQL_MISMATCH_TERMS: &[&str] = &["mongodb", "nosql", "document store", "collection"];

/// Finding kind, used for errors and warnings alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Empty or whitespace-only text.
    Empty,
    /// Ambiguous phrasing.
    Clarity,
    /// Too few concrete technical terms.
    Specificity,
    /// Long, hard-to-read text.
    Structure,
    /// Text appears cut off.
    Completeness,
    /// Placeholder syntax present.
    Template,
    /// Repeated words/phrases.
    Redundancy,
    /// Non-English input.
    Language,
    /// Vocabulary mismatching the domain.
    Terminology,
}

/// A single validation finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// What kind of problem this is.
    pub kind: FindingKind,
    /// Human-readable message.
    pub message: String,
}

impl Finding {
    fn new(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Per-dimension quality metrics, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Inverse of ambiguity.
    pub clarity: f32,
    /// Technical-term coverage blended with density.
    pub specificity: f32,
    /// Readability, labeled sections, and visible organization.
    pub structure: f32,
    /// Whether the text looks finished and sufficiently developed.
    pub completeness: f32,
    /// Agreement among clarity/structure/specificity.
    pub consistency: f32,
    /// Concrete technical nouns plus low ambiguity.
    pub actionability: f32,
}

impl QualityMetrics {
    /// All-zero metrics, used for empty input.
    pub fn zeroed() -> Self {
        Self {
            clarity: 0.0,
            specificity: 0.0,
            structure: 0.0,
            completeness: 0.0,
            consistency: 0.0,
            actionability: 0.0,
        }
    }
}

/// Result of validating a text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False whenever any error is present.
    pub is_valid: bool,
    /// Blocking findings.
    pub errors: Vec<Finding>,
    /// Non-blocking findings.
    pub warnings: Vec<Finding>,
    /// Actionable improvement suggestions.
    pub suggestions: Vec<String>,
    /// Derived per-dimension metrics.
    pub metrics: QualityMetrics,
}

/// Validate a (possibly refined) text against its analysis.
pub fn validate(text: &str, analysis: &Analysis, domain: Domain) -> ValidationReport {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ValidationReport {
            is_valid: false,
            errors: vec![Finding::new(FindingKind::Empty, "text is empty")],
            warnings: Vec::new(),
            suggestions: Vec::new(),
            metrics: QualityMetrics::zeroed(),
        };
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut suggestions = Vec::new();

    // Clarity.
    if analysis.ambiguity > AMBIGUITY_ERROR {
        errors.push(Finding::new(
            FindingKind::Clarity,
            format!("ambiguity {:.2} makes the request unanswerable", analysis.ambiguity),
        ));
    } else if analysis.ambiguity > AMBIGUITY_WARNING {
        warnings.push(Finding::new(
            FindingKind::Clarity,
            format!("ambiguity {:.2} is high", analysis.ambiguity),
        ));
    }
    if analysis.ambiguity > AMBIGUITY_WARNING {
        suggestions
            .push("Replace vague terms (nice, fast, thing) with measurable requirements".into());
    }

    // Specificity.
    let token_count = analysis.tokens.len();
    let tech_density = if token_count == 0 {
        0.0
    } else {
        analysis.technical_terms.len() as f32 / token_count as f32
    };
    if token_count >= 5 && tech_density < MIN_TECH_DENSITY {
        warnings.push(Finding::new(
            FindingKind::Specificity,
            "few concrete technical terms for a request of this length",
        ));
    }

    // Structure.
    if trimmed.len() > LONG_TEXT_CHARS && analysis.readability < LOW_READABILITY {
        warnings.push(Finding::new(
            FindingKind::Structure,
            "long text with low readability",
        ));
        suggestions.push("Break the request into short sections or a numbered list".into());
    }

    // Completeness.
    if ends_dangling(trimmed) {
        errors.push(Finding::new(
            FindingKind::Completeness,
            "text appears to end mid-sentence",
        ));
    }

    // Template variables.
    if analysis.has_variables {
        warnings.push(Finding::new(
            FindingKind::Template,
            "placeholder syntax present",
        ));
        suggestions.push("Define each placeholder variable or provide its value".into());
    }

    // Redundancy.
    if let Some(lemma) = most_repeated_lemma(analysis) {
        warnings.push(Finding::new(
            FindingKind::Redundancy,
            format!("'{lemma}' repeats more than {REDUNDANCY_THRESHOLD} times"),
        ));
    }

    // Language.
    if analysis.language == Language::Es {
        warnings.push(Finding::new(
            FindingKind::Language,
            "non-English input detected",
        ));
        suggestions.push("Rewrite the request in English for best results".into());
    }

    // Domain terminology.
    if domain == Domain::Sql {
        let lower = trimmed.to_lowercase();
        if let Some(term) = SQL_MISMATCH_TERMS.iter().find(|t| lower.contains(*t)) {
            warnings.push(Finding::new(
                FindingKind::Terminology,
                format!("'{term}' is NoSQL vocabulary inside a SQL-domain request"),
            ));
        }
    }

    let metrics = derive_metrics(trimmed, analysis, &errors);

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        suggestions,
        metrics,
    }
}

/// True when the text ends with an ellipsis, a comma, or a dangling
/// function word.
fn ends_dangling(trimmed: &str) -> bool {
    if trimmed.ends_with("...") || trimmed.ends_with(',') || trimmed.ends_with("…") {
        return true;
    }
    let last_word = trimmed
        .rsplit(|c: char| !c.is_alphanumeric())
        .find(|w| !w.is_empty())
        .unwrap_or("")
        .to_lowercase();
    // Only flag a dangling function word when the text is not terminated.
    !trimmed.ends_with(['.', '!', '?'])
        && DANGLING_ENDINGS.contains(&last_word.as_str())
        && trimmed.split_whitespace().count() > 1
}

/// The most repeated non-stop-word lemma past the threshold, if any.
fn most_repeated_lemma(analysis: &Analysis) -> Option<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in analysis.tokens.iter().filter(|t| !t.is_stop_word) {
        *counts.entry(token.lemma.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > REDUNDANCY_THRESHOLD)
        .max_by_key(|(_, n)| *n)
        .map(|(lemma, _)| lemma)
}

/// Lines that read as a labeled section or a bullet item.
fn section_line_count(trimmed: &str) -> usize {
    trimmed
        .lines()
        .filter(|line| {
            let line = line.trim_start();
            line.starts_with("- ")
                || line
                    .split_once(": ")
                    .is_some_and(|(label, rest)| {
                        !label.is_empty() && label.len() <= 40 && !rest.trim().is_empty()
                    })
        })
        .count()
}

/// Derive the six quality metrics from the analysis and error findings.
fn derive_metrics(trimmed: &str, analysis: &Analysis, errors: &[Finding]) -> QualityMetrics {
    let token_count = analysis.tokens.len().max(1) as f32;

    let clarity = clamp01(1.0 - analysis.ambiguity);

    // Specificity blends how many concrete terms the text carries with how
    // dense they are. Pure density would penalize a text for spelling out
    // the concrete detail it already names.
    let term_count = analysis.technical_terms.len() as f32;
    let coverage = clamp01(term_count / TERM_SATURATION);
    let density = clamp01(term_count * 3.0 / token_count.max(DENSITY_FLOOR_TOKENS));
    let specificity = clamp01(0.6 * coverage + 0.4 * density);

    let organized = trimmed.contains('\n')
        || trimmed.contains(": ")
        || trimmed.contains("- ")
        || trimmed.chars().filter(|c| *c == '.').count() > 1;
    // Labeled sections and bullets are structure even when they drag the
    // sentence-length readability signal down.
    let sections = clamp01(section_line_count(trimmed) as f32 / SECTION_SATURATION);
    let structure = clamp01(
        0.6 * analysis.readability + 0.2 * sections + if organized { 0.25 } else { 0.1 },
    );

    let completeness = if errors.iter().any(|e| e.kind == FindingKind::Completeness) {
        0.0
    } else {
        clamp01(token_count / 15.0)
    };

    let spread = [clarity, specificity, structure];
    let max = spread.iter().cloned().fold(0.0f32, f32::max);
    let min = spread.iter().cloned().fold(1.0f32, f32::min);
    let consistency = clamp01(1.0 - (max - min));

    let actionability = clamp01(0.6 * clarity + 0.4 * specificity);

    QualityMetrics {
        clarity,
        specificity,
        structure,
        completeness,
        consistency,
        actionability,
    }
}
