//! Optimization suggestions and server health

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use super::containers::format_timestamp;
use crate::client::ApiClient;
use crate::output::{
    color_priority, color_status, format_currency, format_percent, print_info, print_json,
    print_table, OutputFormat,
};

/// Row for the suggestions table
#[derive(Tabled)]
struct SuggestionRow {
    #[tabled(rename = "Container")]
    container: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Hourly")]
    hourly: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
}

/// Show stop suggestions with estimated savings
pub async fn show_suggestions(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let report = client.suggestions().await?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            println!("{}", "Optimization Suggestions".bold());
            println!("{}", "=".repeat(50));

            let rows: Vec<SuggestionRow> = report
                .suggestions
                .iter()
                .map(|s| SuggestionRow {
                    container: s.container_name.clone(),
                    priority: color_priority(&s.priority),
                    cpu: format_percent(s.current_usage.cpu),
                    memory: format_percent(s.current_usage.memory),
                    hourly: format_currency(s.estimated_savings.hourly, &report.currency),
                    monthly: format_currency(s.estimated_savings.monthly, &report.currency),
                })
                .collect();
            print_table(rows, "No containers to stop");
            println!();

            let total = &report.total_estimated_savings;
            println!(
                "{} {} / day, {} / month",
                "Potential Savings:".bold(),
                format_currency(total.daily, &report.currency),
                format_currency(total.monthly, &report.currency)
                    .green()
                    .bold()
            );
            println!(
                "Last updated: {}",
                format_timestamp(&report.last_updated).dimmed()
            );
        }
    }

    Ok(())
}

/// Check that the server is up
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health = client.health().await?;

    match format {
        OutputFormat::Json => print_json(&health)?,
        OutputFormat::Table => print_info(&format!(
            "Server status {} at {}",
            color_status(&health.status),
            format_timestamp(&health.timestamp)
        )),
    }

    Ok(())
}
