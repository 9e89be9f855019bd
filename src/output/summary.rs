//! Per-resource tables for import and teardown results.

use crate::importer::{ImportReport, ImportStatus};
use crate::teardown::{TeardownOutcome, TeardownReport};
use colored::Colorize;

/// Left-align `value` in a column of `width`, never truncating.
fn format_field<T: ToString>(value: T, width: usize) -> String {
    format!("{:<width$}", value.to_string())
}

fn import_row(name: &str, address: Option<&str>, status: &ImportStatus) -> String {
    let status = match status {
        ImportStatus::Imported => "imported".green().to_string(),
        ImportStatus::Skipped => "skipped".dimmed().to_string(),
        ImportStatus::Failed(_) => "failed".red().to_string(),
    };
    format!(
        "{} {} {}",
        format_field(name, 32),
        format_field(address.unwrap_or("-"), 48),
        status
    )
}

pub fn print_imports(report: &ImportReport) {
    println!("\nImports:");
    for o in &report.outcomes {
        println!("  {}", import_row(&o.name, o.address.as_deref(), &o.status));
    }
}

pub fn print_teardown(report: &TeardownReport) {
    println!("\nTeardown:");
    for pass in &report.passes {
        let failures = pass.failures();
        println!(
            "  pass {}{}: {} deleted, {} failed",
            pass.attempt,
            if pass.force { " (--force)" } else { "" },
            pass.outcomes.len() - failures.len(),
            failures.len()
        );
        for f in failures {
            println!("    {} {}", "✗".red(), f);
        }
    }
    let outcome = match &report.outcome {
        TeardownOutcome::AllDeleted => "all resources deleted".green(),
        TeardownOutcome::ResourceGroupDeleted => "resource group deleted".green(),
        TeardownOutcome::TerraformDestroyed => "destroyed via terraform".green(),
        TeardownOutcome::Failed { .. } => "manual cleanup may be required".red(),
    };
    println!("  outcome: {outcome}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_field_pads() {
        assert_eq!(format_field("nic", 6), "nic   ");
        assert_eq!(format_field("long_value", 4), "long_value");
    }

    #[test]
    fn test_import_row() {
        colored::control::set_override(false);
        let row = import_row(
            "alice-biteswipe-nic",
            Some("azurerm_network_interface.nic"),
            &ImportStatus::Imported,
        );
        assert!(row.starts_with("alice-biteswipe-nic "));
        assert!(row.ends_with("imported"));
        let row = import_row("alice-disk", None, &ImportStatus::Skipped);
        assert!(row.contains(" - "));
    }
}
