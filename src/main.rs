//! Succession Engine CLI
//!
//! Computes the successions of a family scenario: the deaths it already
//! contains, or what-if deaths of its living adults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use succession_engine::scenario::{ScenarioOutcome, WhatIfOutcome};
use succession_engine::succession::{CashAndTaxes, Succession};
use succession_engine::{FiscalModel, Scenario, ScenarioRunner, SuccessionConfig};

#[derive(Parser)]
#[command(name = "succession_engine")]
#[command(about = "Compute legal and life-insurance successions of a family scenario")]
struct Cli {
    /// Scenario file (family and patrimony, JSON)
    #[arg(long, default_value = "data/scenarios/michaud.json")]
    scenario: PathBuf,

    /// Directory of fiscal CSV tables; built-in French tables otherwise
    #[arg(long)]
    fiscal_dir: Option<PathBuf>,

    /// Year of death, overriding the scenario year
    #[arg(long)]
    year: Option<i32>,

    /// Successions if this adult died during the year
    #[arg(long, conflicts_with = "what_if")]
    decedent: Option<String>,

    /// Successions if each living adult died during the year
    #[arg(long)]
    what_if: bool,

    /// Multiplier on the capital children miss to pay their taxes
    #[arg(long)]
    correction_factor: Option<f64>,

    /// Never rewrite optional clauses
    #[arg(long)]
    no_rebalance: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut scenario = Scenario::from_json_path(&cli.scenario)
        .with_context(|| format!("loading scenario {}", cli.scenario.display()))?;
    if let Some(year) = cli.year {
        scenario.year = year;
    }

    let fiscal = match &cli.fiscal_dir {
        Some(dir) => FiscalModel::from_csv_path(dir)
            .with_context(|| format!("loading fiscal tables from {}", dir.display()))?,
        None => FiscalModel::default_france(),
    };
    let mut config = SuccessionConfig::default();
    if let Some(factor) = cli.correction_factor {
        config.clause_correction_factor = factor;
    }
    config.rebalance_optional_clauses = !cli.no_rebalance;
    let runner = ScenarioRunner::with_fiscal_model(fiscal).with_config(config);

    if let Some(decedent) = &cli.decedent {
        let outcome = runner
            .what_if(&scenario, decedent, 1)
            .with_context(|| format!("what-if succession of {}", decedent))?;
        return report_what_ifs(&[outcome], cli.json);
    }
    if cli.what_if {
        let outcomes = runner.what_if_successions(&scenario).context("what-if successions")?;
        return report_what_ifs(&outcomes, cli.json);
    }

    let outcome = runner.run(&scenario).context("running scenario")?;
    report_outcome(&scenario, &outcome, cli.json)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_outcome(scenario: &Scenario, outcome: &ScenarioOutcome, json: bool) -> Result<()> {
    if json {
        return print_json(outcome);
    }

    println!("Succession Engine v0.1.0");
    println!("========================\n");

    if outcome.successions.is_empty() {
        println!("Nobody dies in {}", scenario.year);
        return Ok(());
    }
    for succession in outcome.successions.legal.iter().chain(&outcome.successions.life_insurance) {
        print_succession(succession);
    }
    print_cash_and_taxes(&outcome.cash_and_taxes);
    Ok(())
}

fn report_what_ifs(outcomes: &[WhatIfOutcome], json: bool) -> Result<()> {
    if json {
        return print_json(&outcomes);
    }

    for outcome in outcomes {
        println!("What if {} died", outcome.decedent);
        println!("{}", "=".repeat(60));
        print_succession(&outcome.successions.legal);
        print_succession(&outcome.successions.life_insurance);
        if outcome.successions.clauses_modified {
            println!("Optional clauses rewritten so that children can pay their taxes\n");
        }
        print_cash_and_taxes(&outcome.cash_and_taxes);
    }
    Ok(())
}

fn print_succession(succession: &Succession) {
    println!(
        "{:?} succession of {} ({}): taxable {:.2}",
        succession.kind, succession.decedent_name, succession.year_of_death, succession.taxable_value
    );
    println!(
        "{:<28} {:>8} {:>14} {:>6} {:>14} {:>12} {:>14}",
        "Heir", "Share%", "Brut", "Abat", "Net fiscal", "Tax", "Received net"
    );
    println!("{}", "-".repeat(102));
    for inheritance in &succession.inheritances {
        println!(
            "{:<28} {:>8.2} {:>14.2} {:>6.2} {:>14.2} {:>12.2} {:>14.2}",
            inheritance.person_name,
            inheritance.percent_fiscal,
            inheritance.brut_fiscal,
            inheritance.abat_frac,
            inheritance.net_fiscal,
            inheritance.tax,
            inheritance.received_net,
        );
    }
    println!("Total tax: {:.2}\n", succession.tax());
}

fn print_cash_and_taxes(cash: &CashAndTaxes) {
    println!("Taxes and life-insurance cash per heir:");
    println!("{:<28} {:>14} {:>14} {:>14}", "Heir", "Legal tax", "LI tax", "LI net cash");
    for heir in cash.taxes_adults.iter().chain(&cash.taxes_children) {
        println!(
            "{:<28} {:>14.2} {:>14.2} {:>14.2}",
            heir.name, heir.legal_tax, heir.life_insurance_tax, heir.life_insurance_net_cash
        );
    }
    println!("Total: {:.2}\n", cash.total_tax());
}
