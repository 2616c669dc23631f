use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use fiscal_cli::app::{self, SimulationRequest};
use fiscal_cli::csv_loader;
use fiscal_cli::report::Report;
use fiscal_core::expenses::{ExpenseLedger, KeywordClassifier};
use rust_decimal::Decimal;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Compare net income as a salaried employee, a self-employed freelancer,
/// and the owner of a limited company under Spanish taxation.
///
/// Loads the reference tables, classifies the business expenses, and prints
/// the three regimes side by side.
#[derive(Debug, Parser)]
#[command(name = "fiscal-navigator", version)]
struct Cli {
    /// Reference dataset (TOML).
    #[arg(long, default_value = "data/tax_data.toml")]
    data: PathBuf,

    /// Dataset used when `--data` cannot be loaded.
    #[arg(long)]
    fallback_data: Option<PathBuf>,

    /// CSV file whose bracket tables replace those of the dataset.
    #[arg(long)]
    brackets: Option<PathBuf>,

    /// Keyword rules for expense classification. Built-in lists are used
    /// when the file does not exist.
    #[arg(long, default_value = "data/rules.toml")]
    rules: PathBuf,

    /// Annual gross salary as an employee.
    #[arg(long)]
    gross: Decimal,

    /// Employee social contribution (default: gross × employee rate).
    #[arg(long)]
    employee_contribution: Option<Decimal>,

    /// Employer social contribution (default: gross × company rate).
    #[arg(long)]
    company_contribution: Option<Decimal>,

    /// Expenses an employee pays without deducting them (default: expenses
    /// flagged `also_employee` in the CSV).
    #[arg(long)]
    personal_expenses: Option<Decimal>,

    /// Annual revenue as a freelancer or company (default: the gross salary).
    #[arg(long)]
    revenue: Option<Decimal>,

    /// Business expenses CSV (`description,amount[,also_employee]`).
    #[arg(long)]
    expenses: Option<PathBuf>,

    /// Economic activity code of the business.
    #[arg(long, default_value = "6201")]
    activity_code: String,

    /// Region whose income tax scale applies.
    #[arg(long, default_value = "Madrid")]
    region: String,

    /// Apply the reduced corporate rate for newly created companies.
    #[arg(long)]
    new_company: bool,

    /// Salary the company pays its administrator.
    #[arg(long, default_value = "0")]
    admin_salary: Decimal,

    /// Print the outcome as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let source = app::build_source(cli.data, cli.fallback_data, cli.brackets);
    debug!("loading reference data from {}", source.describe());
    let data = Arc::new(
        source
            .load()
            .await
            .with_context(|| format!("failed to load reference data from {}", source.describe()))?,
    );

    let rules = fiscal_data::load_rules(&cli.rules)
        .await
        .context("failed to load classification rules")?;
    let classifier = KeywordClassifier::new(rules);

    let expenses = match &cli.expenses {
        Some(path) => csv_loader::load_from_file(path)
            .with_context(|| format!("failed to load expenses from {}", path.display()))?,
        None => ExpenseLedger::new(),
    };
    info!(count = expenses.len(), total = %expenses.total_amount(), "loaded expenses");

    let request = SimulationRequest {
        gross_salary: cli.gross,
        employee_contribution: cli.employee_contribution,
        company_contribution: cli.company_contribution,
        personal_expenses: cli.personal_expenses,
        freelancer_revenue: cli.revenue,
        expenses,
        activity_code: cli.activity_code,
        region: cli.region,
        is_new_company: cli.new_company,
        administrator_salary: cli.admin_salary,
    };

    let outcome = app::run(&request, &data, &classifier).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", Report::new(&outcome));
    }

    Ok(())
}
