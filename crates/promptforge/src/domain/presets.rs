// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Built-in rule sets, system prompts, and examples per domain
//!
//! All rule data is declarative. Enhancement blocks always contain their own
//! guard keyword so a second application is suppressed by the guard.

use super::rule::{DomainRule, Matcher, Replacement, RuleCategory};
use super::{Domain, RuleExample};

fn regex(pattern: &str) -> Matcher {
    Matcher::regex_ci(pattern).expect("builtin pattern")
}

fn vague(id: &str, domain: Domain, desc: &str, pattern: &str, replacement: &str) -> DomainRule {
    DomainRule::new(
        id,
        domain,
        desc,
        regex(pattern),
        Replacement::Literal(replacement.into()),
        RuleCategory::VagueTerms,
    )
}

fn structure(id: &str, domain: Domain, desc: &str, pattern: &str, template: &str) -> DomainRule {
    DomainRule::new(
        id,
        domain,
        desc,
        regex(pattern),
        Replacement::Template(template.into()),
        RuleCategory::Structure,
    )
}

fn enhancement(
    id: &str,
    domain: Domain,
    desc: &str,
    trigger: &str,
    guard: &str,
    block: &str,
) -> DomainRule {
    DomainRule::new(
        id,
        domain,
        desc,
        regex(trigger),
        Replacement::Append(block.into()),
        RuleCategory::Enhancement,
    )
    .with_guard(regex(guard))
}

/// All built-in rules, grouped by domain, in declaration order.
pub fn builtin_rules() -> Vec<DomainRule> {
    let mut rules = Vec::new();
    rules.extend(sql_rules());
    rules.extend(branding_rules());
    rules.extend(cine_rules());
    rules.extend(saas_rules());
    rules.extend(devops_rules());
    rules
}

fn sql_rules() -> Vec<DomainRule> {
    vec![
        vague(
            "sql.vague.query_fast",
            Domain::Sql,
            "replace 'make query fast' with a measurable optimization goal",
            r"make\s+(?:the\s+)?query\s+fast(?:er)?",
            "optimize the query to reduce execution time",
        )
        .with_priority(20)
        .with_example(
            "make query fast",
            "optimize the query to reduce execution time",
            "states a measurable goal instead of an adjective",
        ),
        vague(
            "sql.vague.slow",
            Domain::Sql,
            "name the symptom instead of 'slow'",
            r"\bis\s+(?:really\s+|very\s+)?slow\b",
            "exceeds the acceptable execution time",
        )
        .with_priority(15),
        vague(
            "sql.vague.big_table",
            Domain::Sql,
            "quantify table size",
            r"\b(?:huge|big|giant)\s+table\b",
            "high-row-count table (state the approximate row count)",
        )
        .with_priority(10),
        structure(
            "sql.structure.fix_opener",
            Domain::Sql,
            "turn a bare 'fix' into a diagnosis request",
            r"^fix\s+(.+)$",
            "Diagnose and resolve $1",
        )
        .with_priority(10),
        enhancement(
            "sql.enhance.performance",
            Domain::Sql,
            "require execution-plan evidence for optimization work",
            r"\b(?:optimi[sz]e|performance|execution time|latency|slow|fast)\b",
            r"execution plan",
            "Performance requirements: capture the current execution plan (EXPLAIN ANALYZE), \
             identify sequential scans that should use an index, and state the target latency.",
        )
        .with_priority(20),
        enhancement(
            "sql.enhance.schema",
            Domain::Sql,
            "pin down dialect and schema context",
            r"\b(?:table|schema|column|migration|join)\b",
            r"SQL dialect",
            "Schema context: name the SQL dialect and version, the relevant tables with their \
             key columns, and any constraints the change must preserve.",
        )
        .with_priority(10),
        DomainRule::new(
            "sql.terminology.nosql",
            Domain::Sql,
            "flag NoSQL vocabulary in a relational request",
            regex(r"\b(?:collection|document store)\b"),
            Replacement::Literal("table".into()),
            RuleCategory::Terminology,
        ),
    ]
}

fn branding_rules() -> Vec<DomainRule> {
    vec![
        vague(
            "branding.vague.cool_name",
            Domain::Branding,
            "replace 'cool name' with positioning language",
            r"\b(?:cool|catchy|nice)\s+name\b",
            "memorable name aligned with the brand positioning",
        )
        .with_priority(20)
        .with_example(
            "a cool name for my app",
            "a memorable name aligned with the brand positioning for my app",
            "positions the name against strategy, not taste",
        ),
        vague(
            "branding.vague.pop",
            Domain::Branding,
            "replace 'make it pop' with concrete attributes",
            r"make\s+it\s+pop",
            "increase visual distinctiveness and recall",
        )
        .with_priority(15),
        enhancement(
            "branding.enhance.audience",
            Domain::Branding,
            "demand an audience definition",
            r"\b(?:brand|name|naming|logo|slogan|tagline|startup)\b",
            r"target audience",
            "Target audience: define the target audience (demographics, context of use, and the \
             feeling the brand should evoke) before proposing directions.",
        )
        .with_priority(20),
        enhancement(
            "branding.enhance.competitors",
            Domain::Branding,
            "require competitive differentiation",
            r"\b(?:brand|name|naming|positioning)\b",
            r"competitor",
            "Differentiation: list 2-3 competitor names and state how the proposal must differ \
             from them in tone and register.",
        )
        .with_priority(10),
    ]
}

fn cine_rules() -> Vec<DomainRule> {
    vec![
        vague(
            "cine.vague.good_story",
            Domain::Cine,
            "replace 'good story' with craft terms",
            r"\b(?:good|great|nice)\s+(?:story|script)\b",
            "story with a clear dramatic arc and defined stakes",
        )
        .with_priority(20),
        structure(
            "cine.structure.write_opener",
            Domain::Cine,
            "frame 'write me' as a commissioned brief",
            r"^write\s+me\s+(.+)$",
            "Draft $1, specifying format and length",
        )
        .with_priority(10),
        enhancement(
            "cine.enhance.genre",
            Domain::Cine,
            "require genre and tone specification",
            r"\b(?:film|movie|scene|script|screenplay|story)\b",
            r"genre",
            "Genre specification: name the genre, the tonal references (2-3 comparable works), \
             and the intended audience rating.",
        )
        .with_priority(20),
        enhancement(
            "cine.enhance.character",
            Domain::Cine,
            "require character goals and obstacles",
            r"\b(?:character|protagonist|dialogue)\b",
            r"motivation",
            "Character framework: state each principal character's motivation, their obstacle, \
             and what changes for them by the end.",
        )
        .with_priority(10),
    ]
}

fn saas_rules() -> Vec<DomainRule> {
    vec![
        vague(
            "saas.vague.feature",
            Domain::Saas,
            "replace 'some features' with a scoped list",
            r"\bsome\s+features?\b",
            "a prioritized feature list with acceptance criteria",
        )
        .with_priority(20),
        vague(
            "saas.vague.user_friendly",
            Domain::Saas,
            "replace 'user friendly' with measurable UX goals",
            r"\buser[- ]friendly\b",
            "meeting defined usability goals (task completion time, error rate)",
        )
        .with_priority(15),
        enhancement(
            "saas.enhance.metrics",
            Domain::Saas,
            "tie product asks to metrics",
            r"\b(?:feature|onboarding|churn|pricing|dashboard|mvp)\b",
            r"success metric",
            "Success metrics: name the success metric each change should move (activation, \
             retention, churn, conversion) and its current baseline.",
        )
        .with_priority(20),
        enhancement(
            "saas.enhance.persona",
            Domain::Saas,
            "anchor requests to a persona",
            r"\b(?:user|customer|subscriber)s?\b",
            r"persona",
            "Persona: describe the primary persona (role, workflow, pain point) this serves.",
        )
        .with_priority(10),
    ]
}

fn devops_rules() -> Vec<DomainRule> {
    vec![
        vague(
            "devops.vague.deploy_easy",
            Domain::Devops,
            "replace 'easy deploys' with pipeline requirements",
            r"\b(?:easy|simple|painless)\s+deploy(?:ment)?s?\b",
            "a repeatable, rollback-capable deployment pipeline",
        )
        .with_priority(20),
        vague(
            "devops.vague.reliable",
            Domain::Devops,
            "replace 'reliable' with an availability target",
            r"\bmake\s+it\s+reliable\b",
            "meet an explicit availability target (state the SLO)",
        )
        .with_priority(15),
        enhancement(
            "devops.enhance.environment",
            Domain::Devops,
            "pin down the runtime environment",
            r"\b(?:deploy|pipeline|docker|kubernetes|terraform|infrastructure)\b",
            r"environment matrix",
            "Environment matrix: list the target environments (dev/staging/prod), their \
             platform versions, and the promotion path between them.",
        )
        .with_priority(20),
        enhancement(
            "devops.enhance.observability",
            Domain::Devops,
            "require rollout observability",
            r"\b(?:deploy|rollout|release|monitor)\b",
            r"rollback criteria",
            "Rollout safety: define the health signals to watch during rollout and the \
             rollback criteria that abort it.",
        )
        .with_priority(10),
    ]
}

/// Static system prompt per domain.
pub fn base_system_prompt(domain: Domain) -> &'static str {
    match domain {
        Domain::Sql => {
            "You are a senior database engineer. Answer with precise, dialect-aware SQL and \
             explain the execution characteristics of what you propose."
        }
        Domain::Branding => {
            "You are a brand strategist. Ground every proposal in audience, positioning, and \
             differentiation, and explain the reasoning behind naming choices."
        }
        Domain::Cine => {
            "You are a professional screenwriter. Work in standard screenplay conventions and \
             make dramatic structure explicit."
        }
        Domain::Saas => {
            "You are a SaaS product lead. Tie every recommendation to a metric and a persona, \
             and state the smallest testable version first."
        }
        Domain::Devops => {
            "You are a site reliability engineer. Prefer declarative, reviewable \
             infrastructure changes and always state the blast radius."
        }
        Domain::General => {
            "You are a careful assistant. Restate the task precisely before answering and \
             surface any assumption you have to make."
        }
    }
}

/// Stable identifier of the system-prompt template each domain resolves
/// to, reported in result metadata.
pub fn system_template_id(domain: Domain) -> &'static str {
    match domain {
        Domain::Sql => "sql.base",
        Domain::Branding => "branding.base",
        Domain::Cine => "cine.base",
        Domain::Saas => "saas.base",
        Domain::Devops => "devops.base",
        Domain::General => "general.base",
    }
}

/// Optional clause appended when the analysis carries a domain-relevant
/// technical hint.
pub fn hint_clause(domain: Domain) -> Option<&'static str> {
    match domain {
        Domain::Sql => Some(
            "Technical context detected: reference the specific tables, indexes, and dialect \
             features the request names.",
        ),
        Domain::Devops => Some(
            "Technical context detected: pin versions for every tool you reference.",
        ),
        Domain::Saas | Domain::Branding | Domain::Cine => Some(
            "Domain context detected: reuse the requester's own terminology in the answer.",
        ),
        Domain::General => None,
    }
}

/// Curated before/after examples per domain.
pub fn domain_examples(domain: Domain) -> Vec<RuleExample> {
    let pairs: &[(&str, &str, &str)] = match domain {
        Domain::Sql => &[(
            "make query fast",
            "Optimize the query to reduce execution time; capture the execution plan and \
             identify missing indexes.",
            "vague speed request becomes a measurable optimization task",
        )],
        Domain::Branding => &[(
            "need a cool name",
            "Propose memorable names aligned with the brand positioning for a defined target \
             audience.",
            "taste-based ask becomes a strategy-based brief",
        )],
        Domain::Cine => &[(
            "write me a scene",
            "Draft a scene in a named genre with stated character motivations and stakes.",
            "open-ended ask gains genre and dramatic structure",
        )],
        Domain::Saas => &[(
            "add some features",
            "Propose a prioritized feature list with acceptance criteria tied to a success \
             metric.",
            "unscoped ask becomes a prioritized, measurable plan",
        )],
        Domain::Devops => &[(
            "make deploys easy",
            "Design a repeatable, rollback-capable deployment pipeline with defined health \
             signals.",
            "comfort adjective becomes pipeline requirements",
        )],
        Domain::General => &[],
    };
    pairs
        .iter()
        .map(|(before, after, explanation)| RuleExample {
            before: before.to_string(),
            after: after.to_string(),
            explanation: explanation.to_string(),
        })
        .collect()
}
