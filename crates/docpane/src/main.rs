//! docpane CLI binary.
//!
//! This binary drives a browsing tab against a JSON fixture:
//! - List documents page by page, with a filter
//! - Create and delete documents, optionally writing the result back
//! - Inspect how a container's partition key applies to a document

use clap::Parser;
use docpane::{DocpaneConfig, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, browse, check, create, delete};

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DocpaneConfig::from_file(path)?,
        None => DocpaneConfig::load()?,
    };

    // Initialize tracing
    let logging = if cli.verbose {
        config.logging().clone().with_level("debug")
    } else {
        config.logging().clone()
    };
    init_logging(&logging)?;

    // Execute the requested command
    match cli.command {
        Commands::Browse {
            fixture,
            filter,
            pages,
            format,
        } => {
            browse(&fixture, filter.as_deref(), pages, format, &config).await?;
        }

        Commands::Create {
            fixture,
            content,
            save,
        } => {
            create(&fixture, &content, save, &config).await?;
        }

        Commands::Delete {
            fixture,
            id,
            yes,
            save,
        } => {
            delete(&fixture, &id, yes, save, &config).await?;
        }

        Commands::Check { fixture, content } => {
            check(&fixture, &content)?;
        }
    }

    Ok(())
}
