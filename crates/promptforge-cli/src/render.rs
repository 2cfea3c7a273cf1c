// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Styled terminal output

use console::style;
use promptforge::pipeline::{Evaluation, ProcessResult, VariantComparison};
use promptforge::QualityScore;

fn header(title: &str) {
    println!("{}", style(title).bold().cyan());
}

/// One score row: label, bar, numeric value.
fn score_row(label: &str, value: f32) {
    let filled = (value.clamp(0.0, 1.0) * 20.0).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled));
    let colored = if value >= 0.7 {
        style(bar).green()
    } else if value >= 0.4 {
        style(bar).yellow()
    } else {
        style(bar).red()
    };
    println!("  {label:<14} {colored} {value:.2}");
}

/// Render a quality score as a bar table.
pub fn score_table(score: &QualityScore) {
    score_row("clarity", score.clarity);
    score_row("specificity", score.specificity);
    score_row("structure", score.structure);
    score_row("completeness", score.completeness);
    score_row("overall", score.overall);
}

/// Render a full refinement result.
pub fn refinement(result: &ProcessResult) {
    header("Refined prompt");
    println!("{}\n", result.refined);

    header("System prompt");
    println!("{}\n", result.system);

    if !result.rules_applied.is_empty() {
        header("Applied rules");
        for rule in &result.rules_applied {
            println!(
                "  {} {} — {}",
                style("•").dim(),
                style(&rule.rule_id).yellow(),
                rule.description
            );
        }
        println!();
    }

    header("Quality");
    score_table(&result.score);

    if !result.suggestions.is_empty() {
        println!();
        header("Suggestions");
        for s in &result.suggestions {
            println!("  {} {}", style("→").dim(), s);
        }
    }

    if !result.metadata.degraded.is_empty() {
        println!();
        for note in &result.metadata.degraded {
            println!("{} {}", style("degraded:").red().bold(), note);
        }
    }

    println!(
        "\n{} {} ms{}",
        style("processed in").dim(),
        result.metadata.processing_ms,
        if result.metadata.cache_hit {
            " (cached)"
        } else {
            ""
        }
    );
}

/// Render an analysis/validation summary without refinement.
pub fn evaluation(eval: &Evaluation) {
    header("Analysis");
    println!(
        "  intent: {:?} ({:.2})",
        eval.analysis.intent.category, eval.analysis.intent.confidence
    );
    println!(
        "  complexity {:.2}  ambiguity {:.2}  readability {:.2}  sentiment {:+.2}",
        eval.analysis.complexity,
        eval.analysis.ambiguity,
        eval.analysis.readability,
        eval.analysis.sentiment
    );
    if !eval.analysis.technical_terms.is_empty() {
        println!("  terms: {}", eval.analysis.technical_terms.join(", "));
    }
    if !eval.analysis.domain_hints.is_empty() {
        let hints: Vec<&str> = eval.analysis.domain_hints.iter().map(|d| d.as_str()).collect();
        println!("  domain hints: {}", hints.join(", "));
    }

    println!();
    header("Validation");
    for finding in eval.validation.errors.iter().chain(&eval.validation.warnings) {
        println!("  {} {}", style("!").red(), finding.message);
    }
    if eval.validation.errors.is_empty() && eval.validation.warnings.is_empty() {
        println!("  {}", style("no findings").green());
    }

    println!();
    header("Quality");
    score_table(&eval.score);
}

/// Render a variant comparison.
pub fn comparison(cmp: &VariantComparison, variants: &[String]) {
    for (i, (text, score)) in variants.iter().zip(&cmp.scores).enumerate() {
        let marker = if i == cmp.best {
            style("▶").green().bold()
        } else {
            style(" ").dim()
        };
        println!("{marker} [{i}] {:.2}  {}", score.overall, truncate(text, 60));
    }
    println!("\n{}", cmp.against_runner_up.summary);
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    }
}
