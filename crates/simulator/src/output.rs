//! Console output for the simulator

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use sim_lib::scenario::{CostScenario, CostTotals};
use std::io::{self, Write};
use tabled::{settings::Style, Table, Tabled};

/// Output format for tabular results
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

pub fn print_banner(out: &mut impl Write) -> io::Result<()> {
    let rule = "=".repeat(50);
    writeln!(out, "{}", rule.cyan())?;
    writeln!(out, "{}", "FINOPS CLOUD - FREE TIER LOAD SIMULATOR".bold())?;
    writeln!(out, "Cost: {} - runs entirely on simulated data", "$0.00".green())?;
    writeln!(out, "Simulating realistic load for a demo dashboard")?;
    writeln!(out, "{}", rule.cyan())?;
    writeln!(out)
}

pub fn print_section(
    out: &mut impl Write,
    title: &str,
    limit: &str,
    target: &str,
) -> io::Result<()> {
    writeln!(out, "{}", title.bold())?;
    writeln!(out, "   Free tier limit: {}", limit)?;
    writeln!(out, "   Target: {}", target)?;
    writeln!(out)
}

/// Print a success message
pub fn print_success(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "✓".green().bold(), message)
}

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "⚠".yellow().bold(), message)
}

/// Print an info message
pub fn print_info(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "ℹ".blue().bold(), message)
}

/// Format currency
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

#[derive(Tabled)]
struct CostRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Optimized")]
    optimized: String,
    #[tabled(rename = "Saving")]
    saving: String,
}

#[derive(Serialize)]
struct CostReport<'a> {
    scenarios: &'a [CostScenario],
    totals: CostTotals,
}

/// Print the cost-savings comparison
pub fn print_cost_table(
    out: &mut impl Write,
    scenarios: &[CostScenario],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let totals = CostTotals::from_scenarios(scenarios);

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&CostReport { scenarios, totals })?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Table => {
            writeln!(out, "{}", "COST SAVINGS SIMULATION".bold())?;
            writeln!(out, "{}", "=".repeat(50))?;

            let rows: Vec<CostRow> = scenarios
                .iter()
                .map(|s| CostRow {
                    service: s.service.clone(),
                    current: format_currency(s.current),
                    optimized: format_currency(s.optimized),
                    saving: format!("{}%", s.saving_percent),
                })
                .collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            writeln!(out, "{}", table)?;
            writeln!(out)?;

            writeln!(out, "{}", "MONTHLY TOTAL".bold())?;
            writeln!(
                out,
                "   Current: {} -> Optimized: {}",
                format_currency(totals.current),
                format_currency(totals.optimized).green()
            )?;
            writeln!(
                out,
                "   {} {:.1}% ({}/month)",
                "POTENTIAL SAVING:".bold(),
                totals.saving_percent,
                format_currency(totals.monthly_saving)
            )?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}
