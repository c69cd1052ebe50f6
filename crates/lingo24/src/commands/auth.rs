//! Auth command - OAuth2 authorization and token management.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use console::{Style, style};
use serde::Serialize;

use lingo24_client::{TokenSet, TokenStore};

use super::Context;

/// Arguments for the auth command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Print the URL where a user grants this client access
    Url,

    /// Exchange an authorization code for tokens
    Login {
        /// The `code` query parameter from the redirect
        code: String,
    },

    /// Force a token refresh
    Refresh,

    /// Show whether a token is stored and when it expires
    Status,

    /// Remove stored tokens
    Logout,
}

/// Token state for JSON output. Never includes the tokens themselves.
#[derive(Debug, Serialize)]
struct TokenStatus {
    token_file: Option<String>,
    authenticated: bool,
    refreshable: bool,
    expires_at: Option<DateTime<Utc>>,
    expired: bool,
}

impl TokenStatus {
    fn new(ctx: &Context, tokens: &TokenSet) -> Self {
        let expires_at = tokens
            .expires_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));
        Self {
            token_file: ctx.token_file().map(|p| p.display().to_string()),
            authenticated: tokens.access_token.is_some(),
            refreshable: tokens.refresh_token.is_some(),
            expires_at,
            expired: tokens.is_expired_at(Utc::now().timestamp()),
        }
    }
}

/// Run the auth command.
pub fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AuthCommand::Url => cmd_url(ctx),
        AuthCommand::Login { code } => cmd_login(ctx, &code),
        AuthCommand::Refresh => cmd_refresh(ctx),
        AuthCommand::Status => cmd_status(ctx),
        AuthCommand::Logout => cmd_logout(ctx),
    }
}

fn cmd_url(ctx: &Context) -> Result<()> {
    let url = ctx.consent_authenticator()?.authorization_url()?;

    if ctx.json_output {
        return ctx.print_json(&serde_json::json!({ "url": url.as_str() }));
    }

    println!("Open this URL in your browser and grant access:");
    println!();
    println!("  {}", url);
    println!();
    println!(
        "Then run {} with the code from the redirect.",
        style("lingo24 auth login <CODE>").bold()
    );
    Ok(())
}

fn cmd_login(ctx: &Context, code: &str) -> Result<()> {
    let authenticator = ctx.authenticator()?;
    let tokens = authenticator.request_access_token(code)?;
    tracing::info!("authorization code exchanged");

    report_tokens(ctx, &tokens, "Authentication successful!")
}

fn cmd_refresh(ctx: &Context) -> Result<()> {
    let authenticator = ctx.authenticator()?;
    let tokens = authenticator.refresh_access_token()?;

    report_tokens(ctx, &tokens, "Token refreshed.")
}

fn report_tokens(ctx: &Context, tokens: &TokenSet, headline: &str) -> Result<()> {
    let status = TokenStatus::new(ctx, tokens);
    if ctx.json_output {
        return ctx.print_json(&status);
    }

    println!("{}", Style::new().green().apply_to(headline));
    if let Some(expires_at) = status.expires_at {
        println!("Token expires: {}", expires_at.to_rfc3339());
    }
    if let Some(path) = &status.token_file {
        println!("Saved to: {}", path);
    }
    Ok(())
}

fn cmd_status(ctx: &Context) -> Result<()> {
    let authenticator = ctx.authenticator()?;
    let status = TokenStatus::new(ctx, &authenticator.token_set());

    if ctx.json_output {
        return ctx.print_json(&status);
    }

    let dim = Style::new().dim();
    println!();
    println!("{}", style("Authentication Status").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    println!("  {} {}", dim.apply_to("Endpoint:"), authenticator.endpoint());

    if status.authenticated {
        let state = if status.expired {
            Style::new().yellow().apply_to("● expired")
        } else {
            Style::new().green().apply_to("● authenticated")
        };
        println!("  {} {}", dim.apply_to("Status:"), state);
        match status.expires_at {
            Some(expires_at) => println!("  {} {}", dim.apply_to("Expires:"), expires_at.to_rfc3339()),
            None => println!("  {} unknown", dim.apply_to("Expires:")),
        }
        if !status.refreshable {
            println!("  {} no refresh token stored", dim.apply_to("Note:"));
        }
    } else {
        println!(
            "  {} {}",
            dim.apply_to("Status:"),
            Style::new().red().apply_to("● not authenticated")
        );
        println!();
        println!("  {}", dim.apply_to("Start with: lingo24 auth url"));
    }

    if let Some(path) = &status.token_file {
        println!("  {} {}", dim.apply_to("Token file:"), path);
    }
    println!();
    Ok(())
}

fn cmd_logout(ctx: &Context) -> Result<()> {
    let authenticator = ctx.authenticator()?;
    let store: &dyn TokenStore = authenticator.store();

    if store.get().is_empty() {
        println!("No tokens stored.");
    } else {
        store.clear()?;
        println!("Tokens removed.");
    }
    Ok(())
}
