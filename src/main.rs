//! docmark - Command-line tool for rendering Markdown API documentation.
//!
//! This binary reads object inventories (JSON or YAML listings of a package's
//! classes and functions with their docstrings), parses the reStructuredText
//! docstrings, and renders one Markdown page per module or per output group.
//!
//! # Usage
//!
//! ```bash
//! docmark [OPTIONS] <INVENTORY>
//! ```
//!
//! # Examples
//!
//! Render a package to a single file:
//! ```bash
//! docmark mypkg.json --outfile docs/api.md
//! ```
//!
//! Render output groups into a folder:
//! ```bash
//! docmark mypkg.yaml --output-groups models=Widget,Gadget --output-groups funcs=build --outfolder docs
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! docmark ./inventories -v
//! ```

use anyhow::Result;
use clap::Parser;
use docmark::cli;
use log::info;

fn main() -> Result<()> {
    // Parse once for the verbose flag so the logger is up before validation
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("docmark starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;
    cli::run(args)?;

    info!("Documentation generation completed successfully");

    Ok(())
}
