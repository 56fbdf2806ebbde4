//! Container listing and lifecycle commands

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, Container};
use crate::output::{
    color_priority, color_status, format_percent, print_json, print_success, print_table,
    OutputFormat,
};

/// Row for the containers table
#[derive(Tabled)]
struct ContainerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Image")]
    image: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Created")]
    created: String,
}

/// Row for the idle containers table
#[derive(Tabled)]
struct IdleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

fn short_id(id: &str) -> String {
    id.chars().take(12).collect()
}

fn container_row(c: &Container) -> ContainerRow {
    ContainerRow {
        id: short_id(&c.id),
        name: c.name.clone(),
        image: c.image.clone(),
        status: color_status(&c.status),
        cpu: format_percent(c.cpu),
        memory: format_percent(c.memory),
        created: format_timestamp(&c.created),
    }
}

/// List all containers with their current usage
pub async fn list_containers(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let containers = client.containers().await?;

    match format {
        OutputFormat::Json => print_json(&containers)?,
        OutputFormat::Table => {
            let rows: Vec<ContainerRow> = containers.iter().map(container_row).collect();
            print_table(rows, "No containers found");
        }
    }

    Ok(())
}

/// List running containers flagged as idle or low-usage
pub async fn list_idle(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let idle = client.idle_containers().await?;

    match format {
        OutputFormat::Json => print_json(&idle)?,
        OutputFormat::Table => {
            let rows: Vec<IdleRow> = idle
                .iter()
                .map(|i| IdleRow {
                    id: short_id(&i.container.id),
                    name: i.container.name.clone(),
                    cpu: format_percent(i.container.cpu),
                    memory: format_percent(i.container.memory),
                    action: i.action.clone(),
                    priority: color_priority(&i.priority),
                    reason: i.reason.clone(),
                })
                .collect();
            print_table(rows, "No idle containers");
        }
    }

    Ok(())
}

pub async fn start_container(client: &ApiClient, id: &str, format: OutputFormat) -> Result<()> {
    let response = client.start_container(id).await?;
    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => print_success(&format!("{}: {}", id, response.message)),
    }
    Ok(())
}

pub async fn stop_container(client: &ApiClient, id: &str, format: OutputFormat) -> Result<()> {
    let response = client.stop_container(id).await?;
    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => print_success(&format!("{}: {}", id, response.message)),
    }
    Ok(())
}

/// Format timestamp for display
pub fn format_timestamp(ts: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(ts) {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        ts.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2023-11-14T22:13:20.000Z"),
            "2023-11-14 22:13:20"
        );
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
