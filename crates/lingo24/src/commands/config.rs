//! Config command - inspect the effective configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};

use lingo24_config::Lingo24Config;

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the merged configuration and where it was loaded from
    Show,

    /// Print the user config file path
    Path,
}

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(ctx),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let redacted = redacted(&ctx.loaded.config);

    if ctx.json_output {
        return ctx.print_json(&serde_json::json!({
            "config": redacted,
            "loaded_from": ctx.loaded.loaded_from(),
            "endpoint": ctx.endpoint()?.to_string(),
            "token_file": ctx.token_file(),
            "warnings": ctx.loaded.warnings,
        }));
    }

    let dim = Style::new().dim();
    println!();
    println!("{}", style("Configuration").bold());
    println!("{}", dim.apply_to("─".repeat(40)));

    let loaded_from = ctx.loaded.loaded_from();
    if loaded_from.is_empty() {
        println!("  {} (defaults only)", dim.apply_to("Sources:"));
    } else {
        for path in loaded_from {
            println!("  {} {}", dim.apply_to("Source:"), path.display());
        }
    }
    println!("  {} {}", dim.apply_to("Endpoint:"), ctx.endpoint()?);
    if let Some(path) = ctx.token_file() {
        println!("  {} {}", dim.apply_to("Token file:"), path.display());
    }
    for warning in &ctx.loaded.warnings {
        println!("  {} {}", Style::new().yellow().apply_to("Warning:"), warning);
    }
    println!();
    print!("{}", redacted.to_toml()?);
    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    let path = ctx
        .loaded
        .user_config_path()
        .ok_or(lingo24_config::ConfigError::NoConfigDir)?;
    println!("{}", path.display());
    Ok(())
}

fn redacted(config: &Lingo24Config) -> Lingo24Config {
    let mut config = config.clone();
    if let Some(oauth) = config.oauth.as_mut()
        && oauth.client_secret.is_some()
    {
        oauth.client_secret = Some("********".to_string());
    }
    config
}
