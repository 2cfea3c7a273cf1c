// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Promptforge CLI tool

mod render;

use clap::{Parser, Subcommand};
use promptforge::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "promptforge")]
#[command(about = "Heuristic prompt refinement and scoring", long_about = None)]
struct Cli {
    /// Emit raw JSON instead of styled output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refine a prompt for a domain
    Refine {
        /// The prompt text
        text: String,

        /// Target domain (sql, branding, cine, saas, devops, general)
        #[arg(short, long, default_value = "general")]
        domain: String,

        /// Tone directive
        #[arg(long)]
        tone: Option<String>,

        /// Extra context appended to the system prompt
        #[arg(long)]
        context: Option<String>,
    },

    /// Analyze a prompt without refining it
    Analyze {
        /// The prompt text
        text: String,

        /// Target domain
        #[arg(short, long, default_value = "general")]
        domain: String,
    },

    /// Score a prompt on the four quality dimensions
    Score {
        /// The prompt text
        text: String,

        /// Target domain
        #[arg(short, long, default_value = "general")]
        domain: String,
    },

    /// Compare two or more prompt variants
    Compare {
        /// The variants, best one wins
        #[arg(required = true, num_args = 2..)]
        variants: Vec<String>,

        /// Target domain
        #[arg(short, long, default_value = "general")]
        domain: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let pipeline = Pipeline::in_memory();

    match cli.command {
        Commands::Refine {
            text,
            domain,
            tone,
            context,
        } => {
            let domain = Domain::parse(&domain)?;
            let mut request = ProcessRequest::new(text, domain);
            if let Some(tone) = tone {
                request = request.with_tone(tone);
            }
            if let Some(context) = context {
                request = request.with_context(context);
            }
            let result = pipeline.process(request).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                render::refinement(&result);
            }
        }
        Commands::Analyze { text, domain } => {
            let domain = Domain::parse(&domain)?;
            let eval = pipeline.evaluate(&text, domain)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&eval)?);
            } else {
                render::evaluation(&eval);
            }
        }
        Commands::Score { text, domain } => {
            let domain = Domain::parse(&domain)?;
            let eval = pipeline.evaluate(&text, domain)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&eval.score)?);
            } else {
                render::score_table(&eval.score);
            }
        }
        Commands::Compare { variants, domain } => {
            let domain = Domain::parse(&domain)?;
            let cmp = pipeline.compare(&variants, domain)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&cmp)?);
            } else {
                render::comparison(&cmp, &variants);
            }
        }
    }

    Ok(())
}
