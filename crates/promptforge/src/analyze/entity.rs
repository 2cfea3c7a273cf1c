// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Entity extraction
//!
//! A fixed battery of regex detectors plus capitalized-span heuristics for
//! person/place/organization. All detector matches are unioned; spans may
//! overlap and no deduplication happens across detector types.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Label assigned to an extracted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityLabel {
    /// Capitalized multi-word span that looks like a person name.
    Person,
    /// Known place name.
    Place,
    /// Capitalized span with a corporate suffix.
    Organization,
    /// All-caps technical acronym.
    TechAcronym,
    /// Filename with a known extension.
    FileExtension,
    /// HTTP(S) URL.
    Url,
    /// Semantic version string.
    Version,
    /// `$name` style variable.
    Variable,
    /// `{{name}}` style template variable.
    TemplateVariable,
    /// Known database product.
    Database,
    /// Known technology/framework.
    Technology,
    /// Known authentication technology.
    AuthTech,
}

/// An extracted span. Spans may overlap; there is no uniqueness invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Matched text.
    pub text: String,
    /// Detector label.
    pub label: EntityLabel,
    /// Byte offset of the match start.
    pub start: usize,
    /// Byte offset of the match end.
    pub end: usize,
    /// Detector confidence in [0, 1].
    pub confidence: f32,
}

/// Known database products.
pub const DATABASES: &[&str] = &[
    "postgres", "postgresql", "mysql", "mariadb", "sqlite", "mongodb", "redis", "cassandra",
    "dynamodb", "elasticsearch", "clickhouse", "oracle", "duckdb",
];

/// Known technologies and frameworks.
pub const TECHNOLOGIES: &[&str] = &[
    "rust", "python", "javascript", "typescript", "react", "vue", "angular", "svelte", "node",
    "django", "flask", "rails", "spring", "docker", "kubernetes", "terraform", "ansible",
    "graphql", "grpc", "kafka", "rabbitmq", "nginx", "tokio", "axum", "webpack",
];

/// Known authentication technologies.
pub const AUTH_TECHS: &[&str] = &[
    "oauth", "oauth2", "jwt", "saml", "sso", "openid", "ldap", "kerberos", "mfa", "2fa",
];

/// Small gazetteer of place names for the place heuristic.
const PLACES: &[&str] = &[
    "paris", "london", "berlin", "madrid", "tokyo", "seoul", "york", "francisco", "europe",
    "asia", "america",
];

/// Corporate suffixes for the organization heuristic.
const ORG_SUFFIXES: &[&str] = &["inc", "corp", "llc", "ltd", "labs", "gmbh", "co"];

static ACRONYM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][A-Z0-9]{1,5}\b").expect("static regex"));
static FILE_EXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[\w./-]+\.(?:rs|py|js|ts|tsx|json|yaml|yml|toml|sql|md|csv|html|css|sh|go)\b")
        .expect("static regex")
});
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s)>\]]+").expect("static regex"));
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bv?\d+\.\d+(?:\.\d+)?\b").expect("static regex"));
static TEMPLATE_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z_][\w.]*)\s*\}\}").expect("static regex"));
static DOLLAR_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z_]\w*)").expect("static regex"));
static CAP_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").expect("static regex")
});
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[\w.]+\b").expect("static regex"));

/// Extract all entities from raw text.
pub fn extract(text: &str) -> Vec<Entity> {
    let mut entities = Vec::new();

    run_regex(&ACRONYM_RE, text, EntityLabel::TechAcronym, 0.7, &mut entities);
    run_regex(&FILE_EXT_RE, text, EntityLabel::FileExtension, 0.9, &mut entities);
    run_regex(&URL_RE, text, EntityLabel::Url, 0.95, &mut entities);
    run_regex(&VERSION_RE, text, EntityLabel::Version, 0.8, &mut entities);
    run_regex(&TEMPLATE_VAR_RE, text, EntityLabel::TemplateVariable, 0.95, &mut entities);
    run_regex(&DOLLAR_VAR_RE, text, EntityLabel::Variable, 0.85, &mut entities);

    // Vocabulary detectors: case-insensitive whole-word lookup.
    for m in WORD_RE.find_iter(text) {
        let lower = m.as_str().to_lowercase();
        let lower = lower.trim_end_matches('.');
        if DATABASES.contains(&lower) {
            entities.push(entity(m, EntityLabel::Database, 0.9));
        }
        if TECHNOLOGIES.contains(&lower) {
            entities.push(entity(m, EntityLabel::Technology, 0.9));
        }
        if AUTH_TECHS.contains(&lower) {
            entities.push(entity(m, EntityLabel::AuthTech, 0.9));
        }
        if PLACES.contains(&lower) {
            entities.push(entity(m, EntityLabel::Place, 0.6));
        }
    }

    // Capitalized spans: organization when the last word carries a
    // corporate suffix, person otherwise.
    for m in CAP_SPAN_RE.find_iter(text) {
        let last = m.as_str().split_whitespace().last().unwrap_or("");
        if ORG_SUFFIXES.contains(&last.to_lowercase().trim_end_matches('.')) {
            entities.push(entity(m, EntityLabel::Organization, 0.8));
        } else {
            entities.push(entity(m, EntityLabel::Person, 0.5));
        }
    }

    entities
}

fn run_regex(re: &Regex, text: &str, label: EntityLabel, confidence: f32, out: &mut Vec<Entity>) {
    for m in re.find_iter(text) {
        out.push(entity(m, label, confidence));
    }
}

fn entity(m: regex::Match<'_>, label: EntityLabel, confidence: f32) -> Entity {
    Entity {
        text: m.as_str().to_string(),
        label,
        start: m.start(),
        end: m.end(),
        confidence,
    }
}
