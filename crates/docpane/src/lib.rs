//! docpane: one browsing and editing controller for partitioned document containers.
//!
//! A [`BrowsingTab`] shows a container as a paged list of document identities
//! and edits one document at a time. The same controller serves both backend
//! dialects:
//!
//! - **relational**: SQL-like predicates (`WHERE c.id = "1"`) and lightweight
//!   projections carrying the partition key value.
//! - **document-proxy**: JSON filter objects (`{"category": "books"}`) over
//!   whole documents keyed by `_id`.
//!
//! # Architecture
//!
//! - `docpane_error` - Error types
//! - `docpane_core` - Dialects, containers, partition keys, documents, identities
//! - `docpane_interface` - Backend, instrumentation, confirmation and notification traits
//! - `docpane_explorer` - Pagination engine, editor state machine, CRUD orchestration
//!
//! This crate re-exports everything and adds configuration loading, logging
//! setup and JSON fixtures for the `docpane` binary.
//!
//! # Quick Start
//!
//! ```no_run
//! use docpane::{Fixture, init_logging, DocpaneConfig};
//!
//! # async fn run() -> docpane::DocpaneResult<()> {
//! let config = DocpaneConfig::load()?;
//! init_logging(config.logging())?;
//!
//! let fixture = Fixture::from_file("products.json")?;
//! let backend = fixture.backend(*config.explorer().page_size());
//! # let _ = backend;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod fixture;
mod observability;

pub use config::{DocpaneConfig, ExplorerConfig, LoggingConfig};
pub use fixture::Fixture;
pub use observability::init_logging;

pub use docpane_core::*;
pub use docpane_error::*;
pub use docpane_explorer::*;
pub use docpane_interface::*;
