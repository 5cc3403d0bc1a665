//! SnipCat CLI
//!
//! Command-line interface for the snippet catalog

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use snipcat_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "snipcat")]
#[command(about = "SnipCat - snippet catalog with sandboxed live preview", long_about = None)]
struct Cli {
    /// Catalog database path
    #[arg(long, global = true, default_value = commands::DEFAULT_DB)]
    db: PathBuf,

    /// Log operations to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Seed import operations
    Seed(commands::seed::SeedArgs),
    /// Browse categories
    Category(commands::category::CategoryArgs),
    /// Browse and search snippets
    Snippet(commands::snippet::SnippetArgs),
    /// Render or live-watch a sandboxed preview
    Preview(commands::preview::PreviewArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        logging_facility::init(Profile::Development);
    }

    let result = match cli.command {
        Commands::Seed(args) => commands::seed::execute(&cli.db, args),
        Commands::Category(args) => commands::category::execute(&cli.db, args),
        Commands::Snippet(args) => commands::snippet::execute(&cli.db, args),
        Commands::Preview(args) => commands::preview::execute(&cli.db, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
