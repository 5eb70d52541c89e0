use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use colored::Colorize;
use std::io::Write;

use freight_core::{ContractTerms, FeeResult, QuoteSheet, RouteCatalog};

const LABEL_WIDTH: usize = 26;

pub fn write_route_list(w: &mut dyn Write, catalog: &RouteCatalog) -> Result<()> {
    let default_route = catalog.default_route();
    writeln!(w, "Available routes:")?;
    for key in catalog.route_keys() {
        if Some(key) == default_route {
            writeln!(w, "  {key} {}", "(default)".dimmed())?;
        } else {
            writeln!(w, "  {key}")?;
        }
    }
    Ok(())
}

pub fn generate_console_report(
    w: &mut dyn Write,
    fee: &FeeResult,
    terms: &ContractTerms,
    issued: DateTime<Utc>,
) -> Result<()> {
    writeln!(w, "{}", "📦 Northern Freight Quote".bright_cyan().bold())?;
    writeln!(w, "{}", "=========================".cyan())?;

    let sheet = QuoteSheet::from_fee(fee, terms);
    for (label, value) in &sheet.lines {
        let value = if label == "Reward" {
            value.green().bold().to_string()
        } else {
            value.clone()
        };
        writeln!(w, "{:width$}{value}", label.bold(), width = LABEL_WIDTH)?;
    }

    let accept_by = issued + Duration::days(i64::from(terms.accept_days));
    writeln!(
        w,
        "{:width$}{}",
        "Accept By".bold(),
        accept_by.format("%Y-%m-%d %H:%M UTC"),
        width = LABEL_WIDTH
    )?;
    Ok(())
}

pub fn generate_json_report(w: &mut dyn Write, fee: &FeeResult) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, fee)?;
    writeln!(w)?;
    Ok(())
}
