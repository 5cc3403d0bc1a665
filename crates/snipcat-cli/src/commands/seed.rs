//! Seed import command
//!
//! Usage: snipcat seed import [PATH] [--force]

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use snipcat_store::seed::{import_default_seed, import_seed_file, ImportOutcome};

use super::{open_store, CommandResult};

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub command: SeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Import a seed file into the catalog
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to a seed YAML file (default: the bundled starter catalog)
    pub path: Option<PathBuf>,

    /// Import even when the catalog already has categories; entries that
    /// already exist are left untouched
    #[arg(long)]
    pub force: bool,
}

/// Execute seed command
pub fn execute(db: &Path, args: SeedArgs) -> CommandResult {
    match args.command {
        SeedCommand::Import(import_args) => execute_import(db, import_args),
    }
}

fn execute_import(db: &Path, args: ImportArgs) -> CommandResult {
    let mut store = open_store(db)?;

    let outcome = match &args.path {
        Some(path) => {
            println!("Importing {}...", path.display());
            import_seed_file(path, store.connection_mut(), args.force)?
        }
        None => {
            println!("Importing bundled catalog...");
            import_default_seed(store.connection_mut(), args.force)?
        }
    };

    report(&outcome);
    Ok(())
}

fn report(outcome: &ImportOutcome) {
    if outcome.skipped {
        println!("Catalog already has categories; skipped (use --force to import anyway)");
        return;
    }
    println!(
        "✓ Imported {} categories, {} snippets (digest: {})",
        outcome.categories_created, outcome.snippets_created, outcome.digest
    );
}
