// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Domain model: subject areas, quality weights, and the rule engine.
//!
//! A domain selects which rule set, scoring weights, and system-prompt
//! template apply to a request.

pub mod engine;
pub mod presets;
pub mod rule;

pub use engine::RuleEngine;
pub use rule::{AppliedRule, DomainRule, Matcher, Refinement, Replacement, RuleCategory, RuleExample};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A named subject area that selects rules, weights, and templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// SQL and relational database work.
    Sql,
    /// Brand strategy and naming.
    Branding,
    /// Film and screenwriting.
    Cine,
    /// SaaS product and feature design.
    Saas,
    /// Infrastructure and deployment.
    Devops,
    /// No specialized rule set.
    General,
}

/// All domains in declaration order.
pub const ALL_DOMAINS: &[Domain] = &[
    Domain::Sql,
    Domain::Branding,
    Domain::Cine,
    Domain::Saas,
    Domain::Devops,
    Domain::General,
];

impl Domain {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Branding => "branding",
            Self::Cine => "cine",
            Self::Saas => "saas",
            Self::Devops => "devops",
            Self::General => "general",
        }
    }

    /// Parse a domain from its canonical name.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sql" => Ok(Self::Sql),
            "branding" => Ok(Self::Branding),
            "cine" | "film" => Ok(Self::Cine),
            "saas" => Ok(Self::Saas),
            "devops" => Ok(Self::Devops),
            "general" => Ok(Self::General),
            other => Err(Error::input(format!("unknown domain: {other}"))),
        }
    }

    /// Quality-dimension weights for this domain.
    pub fn weights(&self) -> QualityWeights {
        match self {
            Self::Sql => QualityWeights::new(0.20, 0.25, 0.35, 0.20),
            Self::Branding => QualityWeights::new(0.25, 0.40, 0.15, 0.20),
            Self::Cine => QualityWeights::new(0.25, 0.35, 0.20, 0.20),
            Self::Saas => QualityWeights::new(0.25, 0.30, 0.25, 0.20),
            Self::Devops => QualityWeights::new(0.20, 0.30, 0.30, 0.20),
            Self::General => QualityWeights::new(0.25, 0.25, 0.25, 0.25),
        }
    }

    /// Keywords whose presence in a text hints at this domain.
    /// Presence-only: any hit adds the domain to the hint list, no scoring.
    pub fn hint_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Sql => &[
                "query", "table", "database", "join", "index", "select", "schema", "postgres",
                "mysql", "sqlite",
            ],
            Self::Branding => &[
                "brand", "logo", "naming", "slogan", "tagline", "identity", "audience",
                "positioning",
            ],
            Self::Cine => &[
                "film", "movie", "scene", "script", "screenplay", "character", "dialogue", "plot",
            ],
            Self::Saas => &[
                "saas", "subscription", "onboarding", "churn", "pricing", "feature", "mvp",
                "dashboard",
            ],
            Self::Devops => &[
                "deploy", "pipeline", "docker", "kubernetes", "terraform", "ci", "cd",
                "infrastructure", "monitoring",
            ],
            Self::General => &[],
        }
    }

    /// Manually-tuned adjacency used by store relevance ranking. Tunable
    /// policy, not an invariant.
    pub fn related(&self) -> &'static [Domain] {
        match self {
            Self::Sql => &[Domain::Devops, Domain::Saas],
            Self::Branding => &[Domain::Saas, Domain::Cine],
            Self::Cine => &[Domain::Branding],
            Self::Saas => &[Domain::Sql, Domain::Branding, Domain::Devops],
            Self::Devops => &[Domain::Sql, Domain::Saas],
            Self::General => &[],
        }
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::General
    }
}

impl core::fmt::Display for Domain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weights combining the four quality dimensions into an overall score.
/// Always normalized to sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityWeights {
    /// Weight for the clarity dimension.
    pub clarity: f32,
    /// Weight for the specificity dimension.
    pub specificity: f32,
    /// Weight for the structure dimension.
    pub structure: f32,
    /// Weight for the completeness dimension.
    pub completeness: f32,
}

impl QualityWeights {
    /// Create weights, normalizing so they sum to 1.0.
    pub fn new(clarity: f32, specificity: f32, structure: f32, completeness: f32) -> Self {
        let total = clarity + specificity + structure + completeness;
        if total <= 0.0 {
            return Self::default();
        }
        Self {
            clarity: clarity / total,
            specificity: specificity / total,
            structure: structure / total,
            completeness: completeness / total,
        }
    }
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            clarity: 0.25,
            specificity: 0.25,
            structure: 0.25,
            completeness: 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for &domain in ALL_DOMAINS {
            assert_eq!(Domain::parse(domain.as_str()).unwrap(), domain);
        }
        assert!(Domain::parse("quantum").is_err());
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Domain::parse("SQL").unwrap(), Domain::Sql);
        assert_eq!(Domain::parse("DevOps").unwrap(), Domain::Devops);
    }

    #[test]
    fn test_weights_sum_to_one() {
        for &domain in ALL_DOMAINS {
            let w = domain.weights();
            let sum = w.clarity + w.specificity + w.structure + w.completeness;
            assert!((sum - 1.0).abs() < 1e-6, "{domain}: weights sum to {sum}");
        }
    }

    #[test]
    fn test_branding_favors_specificity_over_sql_structure_bias() {
        let branding = Domain::Branding.weights();
        let sql = Domain::Sql.weights();
        assert!(branding.specificity > sql.specificity);
        assert!(sql.structure > branding.structure);
    }

    #[test]
    fn test_weights_normalize() {
        let w = QualityWeights::new(1.0, 1.0, 1.0, 1.0);
        assert!((w.clarity - 0.25).abs() < 1e-6);
        let degenerate = QualityWeights::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(degenerate, QualityWeights::default());
    }

    #[test]
    fn test_general_has_no_hints() {
        assert!(Domain::General.hint_keywords().is_empty());
        assert!(!Domain::Sql.hint_keywords().is_empty());
    }
}
