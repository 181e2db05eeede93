//! Command-line consultation.
//!
//! Usage:
//!   echo '{"company":"Acme","industry":"SaaS"}' | cargo run --bin epic_cli
//!   cargo run --bin epic_cli -- --input context.json --pretty
//!   cargo run --bin epic_cli -- --company Acme --stage seed --challenge "need onboarding" --html

use anyhow::{Context, Result};
use clap::Parser;
use epic_consult::engine::{self, RawBusinessContext};
use epic_consult::report::render_html;
use std::io::Read;

#[derive(Parser, Debug)]
#[command(name = "epic_cli")]
#[command(about = "Generate an EPIC consultation from a business context", long_about = None)]
struct Cli {
    /// JSON business context file; `-` reads stdin
    #[arg(long)]
    input: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    industry: Option<String>,
    #[arg(long)]
    stage: Option<String>,
    #[arg(long)]
    challenge: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    team_size: Option<u32>,
    /// Monthly budget, e.g. 5000 or "$5,000"
    #[arg(long)]
    budget: Option<String>,
    /// Emit the HTML report instead of JSON
    #[arg(long)]
    html: bool,
    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn has_context_flags(&self) -> bool {
        self.company.is_some()
            || self.industry.is_some()
            || self.stage.is_some()
            || self.challenge.is_some()
            || self.description.is_some()
            || self.team_size.is_some()
            || self.budget.is_some()
    }

    /// Flags override whatever the JSON input supplied.
    fn apply_flags(&self, raw: &mut RawBusinessContext) {
        if let Some(v) = &self.company {
            raw.company_name = Some(v.clone());
        }
        if let Some(v) = &self.industry {
            raw.industry = Some(v.clone());
        }
        if let Some(v) = &self.stage {
            raw.business_stage = Some(v.clone());
        }
        if let Some(v) = &self.challenge {
            raw.challenge_text = Some(v.clone());
        }
        if let Some(v) = &self.description {
            raw.company_description = Some(v.clone());
        }
        if let Some(v) = self.team_size {
            raw.team_size = Some(v);
        }
        if let Some(v) = &self.budget {
            raw.monthly_budget = epic_consult::deserializers::parse_currency(v);
        }
    }
}

fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("failed to read {}", source))
    }
}

fn parse_context(text: &str) -> Result<RawBusinessContext> {
    if text.trim().is_empty() {
        return Ok(RawBusinessContext::default());
    }
    serde_json::from_str(text).context("malformed JSON business context")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let source = match (&cli.input, cli.has_context_flags()) {
        (Some(path), _) => Some(path.as_str()),
        (None, false) => Some("-"),
        (None, true) => None,
    };
    let mut raw = match source {
        Some(src) => parse_context(&read_input(src)?)?,
        None => RawBusinessContext::default(),
    };
    cli.apply_flags(&mut raw);

    let ctx = engine::normalize(&raw);
    let consultation = engine::consult(&ctx);

    if cli.html {
        println!("{}", render_html(&ctx, &consultation));
    } else if cli.pretty {
        println!("{}", serde_json::to_string_pretty(&consultation)?);
    } else {
        println!("{}", serde_json::to_string(&consultation)?);
    }
    Ok(())
}
