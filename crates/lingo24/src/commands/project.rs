//! Project command - inspect projects and drive the quote workflow.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};

use lingo24_client::{Job, Project};

use super::Context;
use super::list::print_table;

/// Arguments for the project command.
#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Show one project
    Show {
        /// Project ID
        id: u64,
    },

    /// Ask Lingo24 to quote a newly created project
    Quote {
        /// Project ID
        id: u64,
    },

    /// Accept the quote and start translation
    Accept {
        /// Project ID
        id: u64,
    },

    /// Cancel the project
    Cancel {
        /// Project ID
        id: u64,
    },

    /// List the project's jobs
    Jobs {
        /// Project ID
        id: u64,
    },

    /// Show the quoted price
    Price {
        /// Project ID
        id: u64,
    },
}

/// Run the project command.
pub fn run(args: ProjectArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let projects = client.projects();

    match args.command {
        ProjectCommand::Show { id } => cmd_show(ctx, projects.get(id)?),
        ProjectCommand::Quote { id } => {
            transition(ctx, projects.get(id)?, "Quote requested", Project::request_quote)
        }
        ProjectCommand::Accept { id } => {
            transition(ctx, projects.get(id)?, "Quote accepted", Project::accept_quote)
        }
        ProjectCommand::Cancel { id } => {
            transition(ctx, projects.get(id)?, "Project cancelled", Project::cancel)
        }
        ProjectCommand::Jobs { id } => cmd_jobs(ctx, projects.get(id)?),
        ProjectCommand::Price { id } => cmd_price(ctx, projects.get(id)?),
    }
}

fn cmd_show(ctx: &Context, project: Project) -> Result<()> {
    if ctx.json_output {
        return ctx.print_json(&project);
    }

    let dim = Style::new().dim();
    let domain = match project.domain()? {
        Some(domain) => format!("{} ({})", domain.name, domain.id),
        None => "-".to_string(),
    };

    println!();
    println!("{}", style(&project.name).bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!("  {} {}", dim.apply_to("ID:"), project.id);
    println!("  {} {}", dim.apply_to("Status:"), project.status);
    println!("  {} {}", dim.apply_to("Domain:"), domain);
    println!("  {} {}", dim.apply_to("Created:"), project.created.to_rfc3339());
    if let Some(callback) = &project.callback_url {
        println!("  {} {}", dim.apply_to("Callback:"), callback);
    }
    println!();
    Ok(())
}

fn transition(
    ctx: &Context,
    mut project: Project,
    done: &str,
    apply: fn(&mut Project) -> lingo24_client::Result<()>,
) -> Result<()> {
    let before = project.status.clone();
    apply(&mut project)?;
    tracing::info!(project = project.id, from = %before, to = %project.status, "status changed");

    if ctx.json_output {
        return ctx.print_json(&project);
    }

    println!(
        "{} {} → {}",
        Style::new().green().apply_to(done),
        before,
        project.status
    );
    Ok(())
}

fn cmd_jobs(ctx: &Context, project: Project) -> Result<()> {
    let jobs = project
        .jobs()
        .iter()
        .collect::<lingo24_client::Result<Vec<Job>>>()?;

    if ctx.json_output {
        return ctx.print_json(&jobs);
    }

    if jobs.is_empty() {
        println!("Project {} has no jobs.", project.id);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = jobs
        .iter()
        .map(|job| {
            vec![
                job.id.to_string(),
                job.status.clone(),
                job.service_id.to_string(),
                job.source_locale_id.to_string(),
                job.target_locale_id.to_string(),
                job.source_file_id.to_string(),
                job.target_file_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    print_table(
        &["ID", "STATUS", "SERVICE", "SOURCE", "TARGET", "SOURCE FILE", "TARGET FILE"],
        &rows,
    );
    Ok(())
}

fn cmd_price(ctx: &Context, project: Project) -> Result<()> {
    let price = project.price()?;

    if ctx.json_output {
        return ctx.print_json(&price);
    }

    match price {
        Some(price) => println!("{}", price),
        None => println!("Project {} has not been priced yet.", project.id),
    }
    Ok(())
}
