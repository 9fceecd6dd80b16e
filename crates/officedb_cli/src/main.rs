//! officedb CLI
//!
//! Command-line tools for inspecting and administering an officedb data
//! root.
//!
//! # Commands
//!
//! - `companies` - List companies below the root
//! - `add-company` / `switch` - Create a company, make it current
//! - `articles`, `customers`, `documents` - List records of the current company
//! - `next-id` - Show the next free id of a collection
//! - `inspect` - Display collection files and entry counts

mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use commands::{Format, IdTarget};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// officedb command-line tools.
#[derive(Parser)]
#[command(name = "officedb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the data root
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Output format
    #[arg(global = true, short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all companies
    Companies,

    /// Create a company without making it current
    AddCompany {
        /// Company id (directory name)
        id: String,

        /// Display name
        name: String,

        /// Extra descriptor entries as KEY=VALUE
        #[arg(short, long = "meta")]
        metadata: Vec<String>,
    },

    /// Make a company current
    Switch {
        /// Company id
        id: String,
    },

    /// List articles of the current company
    Articles,

    /// List customers of the current company
    Customers,

    /// List documents of the current company
    Documents {
        /// Only documents of this type
        #[arg(short = 't', long = "type")]
        document_type: Option<String>,

        /// First day of the interval (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day of the interval (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Show the next free id
    NextId {
        /// Collection to allocate in
        #[arg(value_enum)]
        target: IdTarget,

        /// Document type, required for documents
        #[arg(short = 't', long = "type")]
        document_type: Option<String>,
    },

    /// Display collection files of the current company
    Inspect,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let format = cli.format;
    let path = || cli.path.clone().ok_or(commands::CliError::MissingPath);

    match cli.command {
        Commands::Companies => commands::companies::list(&path()?, format)?,
        Commands::AddCompany { id, name, metadata } => {
            commands::companies::add(&path()?, &id, &name, &metadata)?;
        }
        Commands::Switch { id } => commands::companies::switch(&path()?, &id)?,
        Commands::Articles => commands::records::articles(&path()?, format)?,
        Commands::Customers => commands::records::customers(&path()?, format)?,
        Commands::Documents {
            document_type,
            from,
            to,
        } => {
            commands::records::documents(&path()?, document_type.as_deref(), from, to, format)?;
        }
        Commands::NextId {
            target,
            document_type,
        } => {
            commands::records::next_id(&path()?, target, document_type.as_deref(), format)?;
        }
        Commands::Inspect => commands::inspect::run(&path()?, format)?,
        Commands::Version => {
            println!("officedb CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
