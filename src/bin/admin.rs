//! CLI administration tool for redirect-rotator.
//!
//! Works directly on a rules file, so rules can be checked and their
//! rotation previewed before the service loads them.
//!
//! # Usage
//!
//! ```bash
//! # Preview how a rule splits traffic
//! cargo run --bin admin -- simulate --rules rules.json --rule spring-sale --iterations 100000
//!
//! # Reproducible preview
//! cargo run --bin admin -- simulate --rules rules.json --rule spring-sale --seed 42
//!
//! # Report configuration issues
//! cargo run --bin admin -- check --rules rules.json
//!
//! # Mint slugs that do not collide with existing rule ids
//! cargo run --bin admin -- slug --rules rules.json --count 5 --prefix sale-
//! ```

use redirect_rotator::application::services::{RedirectService, SlugService};
use redirect_rotator::domain::entities::{RoutingRule, SimulationRow, SlugNamespace};
use redirect_rotator::infrastructure::persistence::{
    InMemoryRuleRepository, InMemorySlugRegistry,
};
use redirect_rotator::utils::random::RngSource;
use redirect_rotator::utils::slug_generator::DEFAULT_SLUG_LENGTH;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// CLI tool for managing redirect-rotator rules.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Replay a rule's rotation and compare observed and configured shares
    Simulate {
        /// Rules file (JSON array)
        #[arg(short, long, env = "RULES_FILE")]
        rules: PathBuf,

        /// Rule id to simulate
        #[arg(long)]
        rule: String,

        /// Number of draws
        #[arg(short, long, default_value_t = 10_000)]
        iterations: u64,

        /// Seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Report configuration issues in a rules file
    Check {
        /// Rules file (JSON array)
        #[arg(short, long, env = "RULES_FILE")]
        rules: PathBuf,
    },

    /// Generate unique slugs
    Slug {
        /// Namespace: link or project
        #[arg(short, long, default_value = "link")]
        namespace: SlugNamespace,

        /// Fixed prefix prepended to every slug
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// Number of random symbols after the prefix
        #[arg(short, long, default_value_t = DEFAULT_SLUG_LENGTH)]
        length: usize,

        /// How many slugs to generate
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Rules file whose ids are already taken in the link namespace
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            rules,
            rule,
            iterations,
            seed,
        } => handle_simulate(&rules, &rule, iterations, seed).await?,
        Commands::Check { rules } => handle_check(&rules)?,
        Commands::Slug {
            namespace,
            prefix,
            length,
            count,
            rules,
        } => handle_slug(namespace, &prefix, length, count, rules.as_deref()).await?,
    }

    Ok(())
}

/// Reads a JSON array of rules.
fn read_rules(path: &Path) -> Result<Vec<RoutingRule>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file {}", path.display()))?;

    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse rules file {}", path.display()))
}

/// Runs a simulation and prints one row per destination.
async fn handle_simulate(
    rules_path: &Path,
    rule_id: &str,
    iterations: u64,
    seed: Option<u64>,
) -> Result<()> {
    println!("{}", "🎲 Rotation Simulation".bright_blue().bold());
    println!();

    let repository = InMemoryRuleRepository::from_rules(read_rules(rules_path)?);
    let service = RedirectService::new(Arc::new(repository));

    let rows = match seed {
        Some(seed) => {
            service
                .simulate_with(rule_id, iterations, RngSource::seeded(seed))
                .await
        }
        None => service.simulate(rule_id, iterations).await,
    }
    .map_err(|e| anyhow::anyhow!("Simulation failed: {}", e))?;

    println!("  Rule:       {}", rule_id.cyan());
    println!("  Iterations: {}", iterations.to_string().bright_white());
    if let Some(seed) = seed {
        println!("  Seed:       {}", seed.to_string().bright_black());
    }
    println!();

    if rows.is_empty() {
        println!("{}", "  Nothing to report for zero iterations".yellow());
        return Ok(());
    }

    print_simulation_table(&rows);

    Ok(())
}

fn print_simulation_table(rows: &[SimulationRow]) {
    println!(
        "  {:<14} {:<40} {:>10} {:>10} {:>10}",
        "Label".bright_white().bold(),
        "Destination".bright_white().bold(),
        "Config %".bright_white().bold(),
        "Actual %".bright_white().bold(),
        "Hits".bright_white().bold()
    );
    println!("  {}", "─".repeat(88).bright_black());

    for row in rows {
        let label = if row.is_primary {
            row.label.green()
        } else {
            row.label.normal()
        };

        let drift = (row.actual_percentage - row.configured_percentage).abs();
        let actual = format!("{:.2}", row.actual_percentage);
        let actual = if drift > 1.0 { actual.yellow() } else { actual.normal() };

        println!(
            "  {:<14} {:<40} {:>10.2} {:>10} {:>10}",
            label,
            truncate(&row.url, 40).cyan(),
            row.configured_percentage,
            actual,
            row.actual_hits.to_string().bright_black()
        );
    }

    println!();
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }

    let mut shortened: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}

/// Prints every rule's configuration issues.
///
/// Returns an error when any rule has issues so the command can gate CI.
fn handle_check(rules_path: &Path) -> Result<()> {
    println!("{}", "🔍 Checking rules".bright_blue().bold());
    println!();

    let rules = read_rules(rules_path)?;
    let mut issue_count = 0;

    for rule in &rules {
        let issues = rule.validate();

        if issues.is_empty() {
            println!("  {} {}", "✅".green(), rule.id.cyan());
            continue;
        }

        issue_count += issues.len();
        println!("  {} {}", "⚠️ ".yellow(), rule.id.cyan().bold());
        for issue in issues {
            println!("      - {}", issue.to_string().yellow());
        }
    }

    println!();
    println!(
        "  Rules: {}  Issues: {}",
        rules.len().to_string().bright_white().bold(),
        issue_count.to_string().bright_white().bold()
    );
    println!();

    if issue_count > 0 {
        anyhow::bail!("{} configuration issue(s) found", issue_count);
    }

    Ok(())
}

/// Generates `count` slugs, each unique against the previous ones and the
/// rule ids in `rules_path`.
async fn handle_slug(
    namespace: SlugNamespace,
    prefix: &str,
    length: usize,
    count: usize,
    rules_path: Option<&Path>,
) -> Result<()> {
    let mut registry = InMemorySlugRegistry::new();

    if let Some(path) = rules_path {
        let ids = read_rules(path)?.into_iter().map(|rule| rule.id);
        registry = registry.with_names(SlugNamespace::Link, ids);
    }

    let service = SlugService::new(Arc::new(registry));

    for _ in 0..count {
        let slug = service
            .generate(namespace, prefix, length)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to generate slug: {}", e))?;

        println!("{}", slug);
    }

    Ok(())
}
