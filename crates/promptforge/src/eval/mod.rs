// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Validation and scoring
//!
//! Pure functions from (text, analysis, domain) to structured findings and
//! weighted quality scores.

pub mod score;
pub mod validate;

pub use score::{compare, score, try_score, Comparison, QualityScore, Winner};
pub use validate::{validate, Finding, FindingKind, QualityMetrics, ValidationReport};
