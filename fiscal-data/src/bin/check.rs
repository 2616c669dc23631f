use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fiscal_core::ReferenceDataSource;
use fiscal_data::{TomlFileSource, load_rules};
use tracing_subscriber::EnvFilter;

/// Load and validate a reference dataset, then print a summary of it.
///
/// The dataset is a TOML file with state, savings and regional bracket
/// tables, contribution tiers, corporate rates and optional parameters.
/// A CSV file with columns `table,upper_bound,rate` may replace some of
/// the bracket tables.
#[derive(Parser, Debug)]
#[command(name = "fiscal-data-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the TOML reference dataset
    #[arg(short, long, default_value = "data/tax_data.toml")]
    data: PathBuf,

    /// CSV file whose tables replace those of the dataset
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Keyword rules file for expense classification
    #[arg(short, long)]
    rules: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut source = TomlFileSource::new(&args.data);
    if let Some(csv) = &args.brackets {
        source = source.with_bracket_csv(csv);
    }

    let data = source
        .load()
        .await
        .with_context(|| format!("Failed to load reference data: {}", source.describe()))?;
    let tables = &data.tables;

    println!("Reference data from {} is valid.", source.describe());
    println!("  state scale:      {} brackets", tables.state.len());
    println!("  savings scale:    {} brackets", tables.savings.len());
    for (name, table) in &tables.regions {
        println!("  region {name}: {} brackets", table.len());
    }
    println!(
        "  fallback region:  {} ({} brackets)",
        tables.fallback_region_name,
        tables.fallback_region.len()
    );
    println!(
        "  contribution:     {} tiers, fallback quota {}",
        tables.contribution.tiers().len(),
        tables.contribution.fallback_quota()
    );
    println!(
        "  corporate rates:  general {}, new entity {}",
        tables.corporate_rates.general, tables.corporate_rates.new_entity
    );
    println!("  parameters:       {:?}", data.parameters);

    if let Some(path) = &args.rules {
        let rules = load_rules(path)
            .await
            .with_context(|| format!("Failed to load rules: {}", path.display()))?;
        println!(
            "Rules: {} full, {} partial, {} conflictive keywords.",
            rules.full.len(),
            rules.partial.len(),
            rules.conflictive.len()
        );
    }

    Ok(())
}
