// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Quality scoring
//!
//! Converts validator/analyzer signals into a normalized four-dimension
//! score with a domain-weighted overall value, and compares two scored
//! texts. `score` never panics: an internal failure produces the neutral
//! 0.5 score across all dimensions (documented degraded mode).

use super::validate::ValidationReport;
use crate::analyze::Analysis;
use crate::domain::Domain;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Overall differences below this are a tie.
pub const TIE_THRESHOLD: f32 = 0.05;

/// Neutral fallback value for the degraded mode.
const NEUTRAL: f32 = 0.5;

/// The four quality dimensions plus the weighted overall value, each in
/// [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    /// How unambiguous the text is.
    pub clarity: f32,
    /// How concrete/technical the text is.
    pub specificity: f32,
    /// How readable/organized the text is.
    pub structure: f32,
    /// How finished the text is.
    pub completeness: f32,
    /// Domain-weighted average of the four dimensions.
    pub overall: f32,
}

impl QualityScore {
    /// The neutral degraded-mode score.
    pub fn neutral() -> Self {
        Self {
            clarity: NEUTRAL,
            specificity: NEUTRAL,
            structure: NEUTRAL,
            completeness: NEUTRAL,
            overall: NEUTRAL,
        }
    }

    /// Dimension values paired with their names, in declaration order.
    pub fn dimensions(&self) -> [(&'static str, f32); 4] {
        [
            ("clarity", self.clarity),
            ("specificity", self.specificity),
            ("structure", self.structure),
            ("completeness", self.completeness),
        ]
    }
}

/// Which side a comparison favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// First argument wins.
    A,
    /// Second argument wins.
    B,
    /// Difference below [`TIE_THRESHOLD`].
    Tie,
}

/// Result of comparing two quality scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    /// The favored side.
    pub winner: Winner,
    /// Per-dimension deltas (a minus b).
    pub differences: Vec<(String, f32)>,
    /// Absolute overall delta.
    pub significance: f32,
    /// Text naming the dimension with the largest absolute delta.
    pub summary: String,
}

/// Score a validated text for a domain.
///
/// `overall` is the domain's declared weighted sum of the four dimensions.
/// On internal failure the neutral score is returned and a warning logged;
/// this function never fails outward.
pub fn score(validation: &ValidationReport, analysis: &Analysis, domain: Domain) -> QualityScore {
    match try_score(validation, analysis, domain) {
        Ok(score) => score,
        Err(e) => {
            warn!(domain = %domain, error = %e, "scoring degraded to neutral");
            QualityScore::neutral()
        }
    }
}

/// Fallible scoring path. The pipeline calls this directly so it can record
/// the degradation before falling back to [`QualityScore::neutral`].
pub fn try_score(
    validation: &ValidationReport,
    analysis: &Analysis,
    domain: Domain,
) -> Result<QualityScore> {
    let m = &validation.metrics;
    let dims = [m.clarity, m.specificity, m.structure, m.completeness];
    if dims.iter().any(|v| !v.is_finite()) || !analysis.ambiguity.is_finite() {
        return Err(Error::scoring("non-finite quality metric"));
    }

    let w = domain.weights();
    let overall = w.clarity * m.clarity
        + w.specificity * m.specificity
        + w.structure * m.structure
        + w.completeness * m.completeness;
    if !overall.is_finite() {
        return Err(Error::scoring("non-finite overall score"));
    }

    Ok(QualityScore {
        clarity: m.clarity,
        specificity: m.specificity,
        structure: m.structure,
        completeness: m.completeness,
        overall: overall.clamp(0.0, 1.0),
    })
}

/// Compare two quality scores.
pub fn compare(a: &QualityScore, b: &QualityScore) -> Comparison {
    let overall_diff = a.overall - b.overall;
    let significance = overall_diff.abs();

    let winner = if significance < TIE_THRESHOLD {
        Winner::Tie
    } else if overall_diff > 0.0 {
        Winner::A
    } else {
        Winner::B
    };

    let differences: Vec<(String, f32)> = a
        .dimensions()
        .iter()
        .zip(b.dimensions().iter())
        .map(|((name, av), (_, bv))| (name.to_string(), av - bv))
        .collect();

    let (top_dim, top_delta) = differences
        .iter()
        .max_by(|(_, x), (_, y)| {
            x.abs()
                .partial_cmp(&y.abs())
                .unwrap_or(core::cmp::Ordering::Equal)
        })
        .map(|(name, delta)| (name.clone(), *delta))
        .unwrap_or_else(|| ("overall".to_string(), overall_diff));

    let summary = match winner {
        Winner::Tie => format!(
            "scores are equivalent (overall difference {significance:.3}); \
             largest gap is {top_dim} at {top_delta:+.3}"
        ),
        Winner::A => format!(
            "first prompt wins by {significance:.3} overall, led by {top_dim} ({top_delta:+.3})"
        ),
        Winner::B => format!(
            "second prompt wins by {significance:.3} overall, led by {top_dim} ({top_delta:+.3})"
        ),
    };

    Comparison {
        winner,
        differences,
        significance,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Analyzer;
    use crate::eval::validate::validate;

    fn scored(text: &str, domain: Domain) -> QualityScore {
        let analysis = Analyzer::new().analyze(text);
        let report = validate(text, &analysis, domain);
        score(&report, &analysis, domain)
    }

    #[test]
    fn test_overall_is_weighted_sum() {
        for &domain in crate::domain::ALL_DOMAINS {
            let s = scored(
                "Create a PostgreSQL users table with id, name, email columns.",
                domain,
            );
            let w = domain.weights();
            let expected = w.clarity * s.clarity
                + w.specificity * s.specificity
                + w.structure * s.structure
                + w.completeness * s.completeness;
            assert!(
                (s.overall - expected).abs() < 1e-6,
                "{domain}: {} vs {expected}",
                s.overall
            );
        }
    }

    #[test]
    fn test_specific_prompt_beats_vague() {
        let vague = scored("do thing", Domain::General);
        let specific = scored(
            "Create a PostgreSQL users table with id, name, email columns.",
            Domain::General,
        );
        assert!(specific.overall > vague.overall);
    }

    #[test]
    fn test_compare_picks_higher() {
        let low = QualityScore {
            clarity: 0.2,
            specificity: 0.2,
            structure: 0.2,
            completeness: 0.2,
            overall: 0.2,
        };
        let high = QualityScore {
            clarity: 0.8,
            specificity: 0.9,
            structure: 0.7,
            completeness: 0.8,
            overall: 0.8,
        };
        let c = compare(&high, &low);
        assert_eq!(c.winner, Winner::A);
        assert!((c.significance - 0.6).abs() < 1e-6);
        // Largest delta is specificity (+0.7).
        assert!(c.summary.contains("specificity"));
    }

    #[test]
    fn test_compare_antisymmetric() {
        let a = scored("do thing", Domain::General);
        let b = scored(
            "Create a PostgreSQL users table with id, name, email columns.",
            Domain::General,
        );
        let forward = compare(&a, &b);
        let backward = compare(&b, &a);
        // The same prompt is judged superior both ways.
        assert_eq!(forward.winner, Winner::B);
        assert_eq!(backward.winner, Winner::A);
        assert!((forward.significance - backward.significance).abs() < 1e-6);
    }

    #[test]
    fn test_compare_tie() {
        let a = QualityScore::neutral();
        let mut b = QualityScore::neutral();
        b.overall += 0.02;
        assert_eq!(compare(&a, &b).winner, Winner::Tie);
    }

    #[test]
    fn test_refined_sql_text_outscores_raw() {
        // The canonical refinement output must not score below the vague
        // three-word prompt it came from.
        let raw = scored("make query fast", Domain::Sql);
        let refined = scored(
            "optimize the query to reduce execution time\n\nPerformance requirements: capture \
             the current execution plan (EXPLAIN ANALYZE), identify sequential scans that \
             should use an index, and state the target latency.",
            Domain::Sql,
        );
        assert!(
            refined.overall > raw.overall,
            "refined {} vs raw {}",
            refined.overall,
            raw.overall
        );
    }

    #[test]
    fn test_try_score_surfaces_degradable_error() {
        let analysis = Analyzer::new().analyze("normal text");
        let mut report = validate("normal text", &analysis, Domain::General);
        report.metrics.structure = f32::INFINITY;
        let err = try_score(&report, &analysis, Domain::General).unwrap_err();
        assert_eq!(err.category(), "scoring");
        assert!(err.is_degradable());
    }

    #[test]
    fn test_degraded_neutral_on_nonfinite() {
        let analysis = Analyzer::new().analyze("normal text");
        let mut report = validate("normal text", &analysis, Domain::General);
        report.metrics.clarity = f32::NAN;
        let s = score(&report, &analysis, Domain::General);
        assert_eq!(s, QualityScore::neutral());
    }

    #[test]
    fn test_scores_bounded() {
        for text in ["", "make it fast", "x", "Create a REST API in Rust."] {
            let s = scored(text, Domain::Devops);
            for (_, v) in s.dimensions() {
                assert!((0.0..=1.0).contains(&v));
            }
            assert!((0.0..=1.0).contains(&s.overall));
        }
    }
}
