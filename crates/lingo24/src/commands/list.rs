//! List command - reference data and projects.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use lingo24_client::PagedCollection;
use lingo24_client::collection::Resource;

use super::Context;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Listing {
    Domains,
    Locales,
    Services,
    Projects,
}

/// Arguments for the list command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// What to list
    #[arg(value_enum)]
    pub what: Listing,

    /// Server-side sort key (e.g. `name`)
    #[arg(long)]
    pub sort: Option<String>,

    /// Stop after this many items
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Run the list command.
pub fn run(args: ListArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    match args.what {
        Listing::Domains => show(ctx, &args, client.domains(), &["ID", "NAME"], |d| {
            vec![d.id.to_string(), d.name.clone()]
        }),
        Listing::Locales => show(
            ctx,
            &args,
            client.locales(),
            &["ID", "NAME", "LANGUAGE", "COUNTRY"],
            |l| {
                vec![
                    l.id.to_string(),
                    l.name.clone(),
                    l.language.clone(),
                    l.country.clone(),
                ]
            },
        ),
        Listing::Services => show(ctx, &args, client.services(), &["ID", "NAME"], |s| {
            vec![s.id.to_string(), s.name.clone()]
        }),
        Listing::Projects => show(
            ctx,
            &args,
            client.projects(),
            &["ID", "NAME", "STATUS", "CREATED"],
            |p| {
                vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.status.to_string(),
                    p.created.format("%Y-%m-%d %H:%M").to_string(),
                ]
            },
        ),
    }
}

fn show<T, F>(
    ctx: &Context,
    args: &ListArgs,
    collection: PagedCollection<T>,
    header: &[&str],
    row: F,
) -> Result<()>
where
    T: Resource + Serialize,
    F: Fn(&T) -> Vec<String>,
{
    let items = fetch(collection, args)?;

    if ctx.json_output {
        return ctx.print_json(&items);
    }

    if items.is_empty() {
        println!("No {} found.", format!("{:?}", args.what).to_lowercase());
        return Ok(());
    }

    let rows: Vec<Vec<String>> = items.iter().map(row).collect();
    print_table(header, &rows);
    Ok(())
}

fn fetch<T: Resource>(collection: PagedCollection<T>, args: &ListArgs) -> Result<Vec<T>> {
    let collection = match &args.sort {
        Some(key) => collection.sort(key.as_str())?,
        None => collection,
    };

    let items = match args.limit {
        Some(limit) => collection
            .slice(..limit)?
            .collect::<lingo24_client::Result<Vec<_>>>()?,
        None => collection
            .iter()
            .collect::<lingo24_client::Result<Vec<_>>>()?,
    };
    tracing::debug!(count = items.len(), path = collection.url_path(), "listed");
    Ok(items)
}

/// Print left-aligned columns sized to their widest cell.
pub(crate) fn print_table(header: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let dim = console::Style::new().dim();
    let header_line = format_row(header.iter().copied(), &widths);
    println!("{}", dim.apply_to(header_line));
    for row in rows {
        println!("{}", format_row(row.iter().map(String::as_str), &widths));
    }
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
