// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Rule engine
//!
//! Applies a domain's rules as an explicit fold over an ordered rule list:
//! categories run in [`CATEGORY_ORDER`], rules within a category run in
//! descending priority (declaration order on ties), and every firing rule
//! sees the output of the previous one. Enhancement blocks are additive and
//! guard-gated, so applying the engine twice never duplicates a block.

use super::presets;
use super::rule::{
    AppliedRule, DomainRule, Improvement, Refinement, RuleExample, CATEGORY_ORDER,
};
use super::Domain;
use crate::analyze::Analysis;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Upper bound on refined text size; cumulative appends beyond this are a
/// rule-set defect and surface as a rule engine error.
const MAX_REFINED_LEN: usize = 50_000;

/// Per-domain rule engine.
pub struct RuleEngine {
    rules: HashMap<Domain, Vec<DomainRule>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    /// Create an engine loaded with the built-in rule sets.
    pub fn new() -> Self {
        let mut rules: HashMap<Domain, Vec<DomainRule>> = HashMap::new();
        for rule in presets::builtin_rules() {
            rules.entry(rule.domain).or_default().push(rule);
        }
        Self { rules }
    }

    /// Create an engine with no rules (custom-only).
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Register a custom rule. Inactive rules are stored but never fire.
    pub fn register(&mut self, rule: DomainRule) {
        self.rules.entry(rule.domain).or_default().push(rule);
    }

    /// Register a custom rule from its JSON representation.
    pub fn register_json(&mut self, json: &str) -> Result<()> {
        let rule: DomainRule = serde_json::from_str(json)?;
        self.register(rule);
        Ok(())
    }

    /// Rules owned by a domain, in declaration order.
    pub fn rules(&self, domain: Domain) -> &[DomainRule] {
        self.rules.get(&domain).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Apply the domain's rules to the text.
    ///
    /// Errors only on rule-set defects (runaway append growth); the
    /// pipeline absorbs those by falling back to the original text.
    pub fn apply_rules(
        &self,
        text: &str,
        domain: Domain,
        _analysis: &Analysis,
    ) -> Result<Refinement> {
        let mut refined = text.to_string();
        let mut rules_applied = Vec::new();
        let mut improvements = Vec::new();

        for &category in CATEGORY_ORDER {
            let mut batch: Vec<&DomainRule> = self
                .rules(domain)
                .iter()
                .filter(|r| r.category == category)
                .collect();
            // Stable sort keeps declaration order for equal priorities.
            batch.sort_by_key(|r| core::cmp::Reverse(r.priority));

            for rule in batch {
                if !rule.fires(&refined) {
                    continue;
                }
                let before = refined.clone();
                refined = rule.apply(&refined);
                if refined.len() > MAX_REFINED_LEN {
                    return Err(Error::rule_engine(format!(
                        "rule {} grew refined text past {MAX_REFINED_LEN} bytes",
                        rule.id
                    )));
                }
                if refined == before {
                    continue;
                }
                rules_applied.push(AppliedRule {
                    rule_id: rule.id.clone(),
                    description: rule.description.clone(),
                    category: rule.category,
                    impact: rule.category.as_str().to_string(),
                });
                improvements.push(Improvement {
                    kind: rule.category.as_str().to_string(),
                    before,
                    after: refined.clone(),
                    reason: rule.description.clone(),
                });
            }
        }

        Ok(Refinement {
            refined,
            rules_applied,
            improvements,
        })
    }

    /// Build the system prompt for a domain: static domain text with
    /// optional appended clauses for high complexity and domain-relevant
    /// technical hints, plus caller context.
    pub fn system_prompt(
        &self,
        domain: Domain,
        analysis: &Analysis,
        context: Option<&str>,
    ) -> String {
        let mut prompt = presets::base_system_prompt(domain).to_string();

        if analysis.complexity > 0.7 {
            prompt.push_str(
                "\nThe request is complex: decompose it into explicit, ordered steps before answering.",
            );
        }

        let domain_relevant = analysis.domain_hints.contains(&domain)
            || analysis.technical_terms.iter().any(|t| {
                domain
                    .hint_keywords()
                    .contains(&t.to_lowercase().as_str())
            });
        if domain_relevant {
            if let Some(clause) = presets::hint_clause(domain) {
                prompt.push('\n');
                prompt.push_str(clause);
            }
        }

        if let Some(ctx) = context.filter(|c| !c.trim().is_empty()) {
            prompt.push_str("\nAdditional context: ");
            prompt.push_str(ctx.trim());
        }

        prompt
    }

    /// Identifier of the system-prompt template a domain resolves to.
    pub fn template_id(&self, domain: Domain) -> &'static str {
        presets::system_template_id(domain)
    }

    /// Illustrative before/after examples for a domain.
    pub fn examples(&self, domain: Domain) -> Vec<RuleExample> {
        let mut examples: Vec<RuleExample> = presets::domain_examples(domain);
        for rule in self.rules(domain) {
            examples.extend(rule.examples.iter().cloned());
        }
        examples
    }
}
