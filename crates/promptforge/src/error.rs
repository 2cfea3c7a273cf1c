// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Error types for promptforge

use thiserror::Error;

/// Result type alias for promptforge operations.
pub type Result<T> = core::result::Result<T, Error>;

/// A pipeline stage that can degrade instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Domain rule application.
    RuleEngine,
    /// Quality scoring.
    Scoring,
}

impl Stage {
    /// Stage name for logging/metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RuleEngine => "rule_engine",
            Self::Scoring => "scoring",
        }
    }
}

/// Details of a degraded stage.
///
/// Degradations are *expected* outcomes, distinct from infrastructure
/// errors: the pipeline absorbs them and returns reduced-quality output
/// instead of failing the request.
#[derive(Debug, Clone)]
pub struct Degraded {
    /// The stage that degraded.
    pub stage: Stage,
    /// Human-readable reason.
    pub reason: String,
}

impl Degraded {
    /// Create a new degradation record.
    pub fn new(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

impl core::fmt::Display for Degraded {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} degraded: {}", self.stage.name(), self.reason)
    }
}

/// Main error type for the promptforge library.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input rejected before pipeline entry.
    #[error("Input error: {0}")]
    Input(String),

    /// Rule engine failure. Absorbed by the pipeline (original text is
    /// returned with a failure note); surfaced only by direct engine use.
    #[error("Rule engine error: {0}")]
    RuleEngine(String),

    /// Scoring failure. Absorbed by the pipeline (neutral score fallback).
    #[error("Scoring error: {0}")]
    Scoring(String),

    /// Store failure. Fatal for save/search/get, non-fatal inside process.
    #[error("Store error: {0}")]
    Store(String),

    /// Cache backend failure. The pipeline treats an unavailable cache as
    /// miss-always; this variant surfaces only from direct backend use.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Pipeline exceeded the request timeout. No partial result is cached.
    #[error("Pipeline timed out after {0} ms")]
    Timeout(u64),

    /// Invalid rule pattern.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// JSON errors (custom rule deserialization, result encoding).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an input error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a rule engine error.
    pub fn rule_engine(msg: impl Into<String>) -> Self {
        Self::RuleEngine(msg.into())
    }

    /// Create a scoring error.
    pub fn scoring(msg: impl Into<String>) -> Self {
        Self::Scoring(msg.into())
    }

    /// Create a store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a cache error.
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Check if this error may be absorbed as a stage degradation rather
    /// than failing the whole request.
    #[inline]
    pub fn is_degradable(&self) -> bool {
        matches!(self, Self::RuleEngine(_) | Self::Scoring(_) | Self::Cache(_))
    }

    /// Get the error category for logging/metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::RuleEngine(_) => "rule_engine",
            Self::Scoring(_) => "scoring",
            Self::Store(_) => "store",
            Self::Cache(_) => "cache",
            Self::Timeout(_) => "timeout",
            Self::InvalidPattern(_) => "pattern",
            Self::Json(_) => "json",
            Self::Other(_) => "other",
        }
    }
}
