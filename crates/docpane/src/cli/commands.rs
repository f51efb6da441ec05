//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// docpane - browse and edit partitioned document containers
#[derive(Parser, Debug)]
#[command(name = "docpane")]
#[command(about = "Browse and edit partitioned document containers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file layered over the bundled defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List documents of a fixture container
    Browse {
        /// Path to the fixture JSON file
        fixture: PathBuf,

        /// Query filter (a WHERE/ORDER BY clause or a JSON filter object)
        #[arg(long)]
        filter: Option<String>,

        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: usize,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Create a document
    Create {
        /// Path to the fixture JSON file
        fixture: PathBuf,

        /// Document JSON, or @path to read it from a file
        content: String,

        /// Write the result back to the fixture
        #[arg(long)]
        save: bool,
    },

    /// Delete a document by its public id
    Delete {
        /// Path to the fixture JSON file
        fixture: PathBuf,

        /// Public id of the document
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,

        /// Write the result back to the fixture
        #[arg(long)]
        save: bool,
    },

    /// Show how the container's partition key applies to a document
    Check {
        /// Path to the fixture JSON file
        fixture: PathBuf,

        /// Document JSON, or @path to read it from a file
        content: String,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
