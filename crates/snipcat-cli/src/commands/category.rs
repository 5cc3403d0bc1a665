//! Category commands
//!
//! Usage: snipcat category list | snipcat category show <SLUG>

use std::path::Path;

use clap::{Args, Subcommand};
use snipcat_core::ops::catalog;

use super::{open_store, CommandResult};

#[derive(Debug, Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// List all categories
    List,
    /// Show a category and its snippets
    Show {
        /// Category slug
        slug: String,
    },
}

/// Execute category command
pub fn execute(db: &Path, args: CategoryArgs) -> CommandResult {
    let store = open_store(db)?;

    match args.command {
        CategoryCommand::List => {
            for category in catalog::list_categories(&store)? {
                println!("{}\t{}\t{}", category.id, category.slug, category.name);
            }
        }
        CategoryCommand::Show { slug } => {
            let listing = catalog::category_with_snippets(&store, &slug)?;
            println!("{} ({})", listing.category.name, listing.category.slug);
            if listing.snippets.is_empty() {
                println!("  (no snippets)");
            }
            for snippet in listing.snippets {
                println!("  {}\t{}", snippet.id, snippet.title);
            }
        }
    }

    Ok(())
}
