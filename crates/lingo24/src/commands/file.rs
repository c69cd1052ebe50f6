//! File command - download stored documents.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};

use super::Context;

/// Arguments for the file command.
#[derive(Args, Debug)]
pub struct FileArgs {
    #[command(subcommand)]
    pub command: FileCommand,
}

#[derive(Subcommand, Debug)]
pub enum FileCommand {
    /// Download a file's content
    Download {
        /// File ID
        id: u64,

        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the file command.
pub fn run(args: FileArgs, ctx: &Context) -> Result<()> {
    match args.command {
        FileCommand::Download { id, output } => cmd_download(ctx, id, output),
    }
}

fn cmd_download(ctx: &Context, id: u64, output: Option<PathBuf>) -> Result<()> {
    let client = ctx.client()?;
    let file = client.files().get(id)?;

    let Some(content) = file.content()? else {
        bail!("file {} ({}) has no content yet", file.id, file.name);
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(file = file.id, bytes = content.len(), path = %path.display(), "downloaded");
            if ctx.json_output {
                ctx.print_json(&serde_json::json!({
                    "id": file.id,
                    "name": file.name,
                    "bytes": content.len(),
                    "path": path.display().to_string(),
                }))?;
            } else {
                eprintln!("Wrote {} bytes to {}", content.len(), path.display());
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&content)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
