//! Snippet commands
//!
//! Usage: snipcat snippet list [--search <Q>] | snipcat snippet show <ID> [--json]

use std::path::Path;

use clap::{Args, Subcommand};
use snipcat_core::model::Snippet;
use snipcat_core::ops::catalog;

use super::{open_store, CommandResult};

#[derive(Debug, Args)]
pub struct SnippetArgs {
    #[command(subcommand)]
    pub command: SnippetCommand,
}

#[derive(Debug, Subcommand)]
pub enum SnippetCommand {
    /// List snippets, optionally filtered by a search query
    List {
        /// Case-insensitive match on title or description
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one snippet (counts as a view)
    Show {
        id: i64,

        /// Print the full record as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute snippet command
pub fn execute(db: &Path, args: SnippetArgs) -> CommandResult {
    let mut store = open_store(db)?;

    match args.command {
        SnippetCommand::List { search } => {
            for snippet in catalog::list_or_search(&store, search.as_deref())? {
                println!(
                    "{}\t{}\t{} views",
                    snippet.id, snippet.title, snippet.view_count
                );
            }
        }
        SnippetCommand::Show { id, json } => {
            let snippet = catalog::view_snippet(&mut store, id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snippet)?);
            } else {
                print_snippet(&snippet);
            }
        }
    }

    Ok(())
}

fn print_snippet(snippet: &Snippet) {
    println!("{} (#{})", snippet.title, snippet.id);
    println!("{}", snippet.description);
    println!();
    println!("Compatibility: {}", snippet.compatibility);
    if !snippet.tags.is_empty() {
        println!("Tags: {}", snippet.tags.join(", "));
    }
    println!(
        "Updated: {}  Views: {}",
        snippet.updated_at.format("%Y-%m-%d"),
        snippet.view_count
    );

    for (label, section) in [
        ("HTML", &snippet.html),
        ("CSS", &snippet.css),
        ("JavaScript", &snippet.javascript),
    ] {
        if let Some(code) = section.as_deref().filter(|c| !c.is_empty()) {
            println!();
            println!("--- {} ---", label);
            println!("{}", code);
        }
    }
}
