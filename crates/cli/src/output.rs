//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print rows as a rounded table
pub fn print_table<T: Tabled>(rows: Vec<T>, empty_message: &str) {
    if rows.is_empty() {
        println!("{}", empty_message.yellow());
        return;
    }
    println!("{}", Table::new(rows).with(Style::rounded()));
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a usage percentage
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Format currency
pub fn format_currency(amount: f64, currency: &str) -> String {
    match currency {
        "INR" => format!("₹{:.2}", amount),
        "USD" => format!("${:.2}", amount),
        "EUR" => format!("€{:.2}", amount),
        _ => format!("{:.2} {}", amount, currency),
    }
}

/// Color a container state
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "running" | "ok" => status.green().to_string(),
        "paused" | "restarting" | "created" => status.yellow().to_string(),
        "exited" | "dead" | "removing" => status.red().to_string(),
        _ => status.to_string(),
    }
}

/// Color a suggestion priority
pub fn color_priority(priority: &str) -> String {
    match priority {
        "high" => priority.red().bold().to_string(),
        "medium" => priority.yellow().to_string(),
        "low" => priority.blue().to_string(),
        _ => priority.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(2664.0, "INR"), "₹2664.00");
        assert_eq!(format_currency(3.891, "USD"), "$3.89");
        assert_eq!(format_currency(1.5, "JPY"), "1.50 JPY");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(4.0), "4.00%");
        assert_eq!(format_percent(33.333), "33.33%");
    }

    #[test]
    fn test_color_keeps_text() {
        assert!(color_status("running").contains("running"));
        assert!(color_priority("medium").contains("medium"));
        assert_eq!(color_status("unknown"), "unknown");
    }
}
