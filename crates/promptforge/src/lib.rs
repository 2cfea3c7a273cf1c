// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! # Promptforge - Heuristic Prompt Refinement
//!
//! Turns informal, underspecified prompts into structured, domain-aware
//! instructions for a language model, with a multi-dimensional quality
//! score attached. Everything is rule- and pattern-driven; there is no
//! statistical model anywhere in the crate.
//!
//! ## Architecture
//!
//! A request flows through four stages, orchestrated by
//! [`pipeline::Pipeline`]:
//!
//! - **Analysis** ([`analyze`]): tokens, entities, intent, and heuristic
//!   scores (complexity, ambiguity, readability, sentiment).
//! - **Refinement** ([`domain`]): per-domain rewrite rules folded over the
//!   text in priority order, plus a composed system prompt.
//! - **Validation** ([`eval::validate`]): structural findings and quality
//!   metrics for the refined text.
//! - **Scoring** ([`eval::score`]): a domain-weighted [`QualityScore`].
//!
//! Results are cached by request fingerprint; identical concurrent
//! requests are coalesced into a single computation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use promptforge::prelude::*;
//!
//! let pipeline = Pipeline::in_memory();
//! let result = pipeline
//!     .process(ProcessRequest::new("make query fast", Domain::Sql))
//!     .await?;
//!
//! println!("{}", result.refined);
//! println!("overall: {:.2}", result.score.overall);
//! ```

#![warn(missing_docs)]

pub mod analyze;
pub mod domain;
pub mod error;
pub mod eval;
pub mod pipeline;

pub use analyze::{Analysis, Analyzer};
pub use domain::{Domain, DomainRule, Refinement, RuleEngine};
pub use error::{Degraded, Error, Result, Stage};
pub use eval::{Comparison, QualityScore, ValidationReport, Winner};
pub use pipeline::{Pipeline, ProcessRequest, ProcessResult};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for pipeline users.
pub mod prelude {
    pub use crate::analyze::{Analysis, Analyzer};
    pub use crate::domain::{Domain, DomainRule, Matcher, Replacement, RuleCategory, RuleEngine};
    pub use crate::error::{Error, Result};
    pub use crate::eval::{compare, score, validate, Comparison, QualityScore, ValidationReport};
    pub use crate::pipeline::{
        Evaluation, MemoryStore, Pipeline, ProcessRequest, ProcessResult, PromptMetadata,
        SearchParams, Store, Telemetry, VariantComparison,
    };
    pub use promptforge_cache::{Cache, Fingerprint, MemoryCache};
}
