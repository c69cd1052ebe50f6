//! Status command - API version, no authentication needed.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde::Serialize;

use super::Context;

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {}

/// Status response for JSON output.
#[derive(Debug, Serialize)]
struct StatusOutput {
    reachable: bool,
    endpoint: String,
    version: Option<String>,
    date: Option<serde_json::Value>,
}

/// Run the status command.
pub fn run(_args: StatusArgs, ctx: &Context) -> Result<()> {
    let client = ctx.anonymous_client()?;
    let endpoint = client.endpoint().to_string();
    let dim = Style::new().dim();

    match client.status() {
        Ok(status) => {
            if ctx.json_output {
                return ctx.print_json(&StatusOutput {
                    reachable: true,
                    endpoint,
                    version: Some(status.version),
                    date: Some(status.date),
                });
            }

            println!();
            println!("{}", style("Lingo24 API Status").bold());
            println!("{}", dim.apply_to("─".repeat(40)));
            println!();
            println!(
                "  {} {}",
                dim.apply_to("Status:"),
                Style::new().green().apply_to("● reachable")
            );
            println!("  {} {}", dim.apply_to("Version:"), status.version);
            println!("  {} {}", dim.apply_to("Date:"), display_value(&status.date));
            println!("  {} {}", dim.apply_to("Endpoint:"), endpoint);
            println!();
        }
        Err(e) => {
            if ctx.json_output {
                ctx.print_json(&StatusOutput {
                    reachable: false,
                    endpoint,
                    version: None,
                    date: None,
                })?;
                return Err(e.into());
            }

            println!();
            println!("{}", style("Lingo24 API Status").bold());
            println!("{}", dim.apply_to("─".repeat(40)));
            println!();
            println!(
                "  {} {}",
                dim.apply_to("Status:"),
                Style::new().red().apply_to("● unreachable")
            );
            println!("  {} {}", dim.apply_to("Endpoint:"), endpoint);
            if ctx.verbose {
                println!();
                println!("  {} {}", dim.apply_to("Error:"), e);
            }
            println!();
            return Err(e.into());
        }
    }

    Ok(())
}

// The date field is a string on the live API but not guaranteed.
fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
