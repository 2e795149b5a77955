use crate::docparse::{get_parser, RST_KEY};
use crate::doctags::TagKind;
use crate::inventory::{InventoryParser, ParsedInventory};
use crate::markdown::{MarkdownBuilder, ModuleDocs, PageOptions};
use crate::scanner::InventoryScanner;
use crate::selection::{parse_groups, Retention};
use crate::tag_renderer::{parse_tag_kinds, MdTagRenderer};
use crate::writer::{emit, OutputTarget};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// docmark - Render Markdown API documentation from docstring inventories
#[derive(Parser, Debug)]
#[command(name = "docmark")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Inventory file, or a directory scanned for inventory files
    #[arg(value_name = "INVENTORY")]
    pub inventory_path: PathBuf,

    /// Docstring style to parse
    #[arg(short = 'P', long = "parse", value_enum, default_value = "rst")]
    pub parse_style: ParseStyle,

    /// Omit module-level docstrings
    #[arg(long = "skip-module-docstring")]
    pub skip_module_docstring: bool,

    /// Also document methods inherited from base classes
    #[arg(long = "inherited")]
    pub inherited: bool,

    /// Names of the only objects to document
    #[arg(long = "whitelist", value_delimiter = ',', value_name = "NAMES")]
    pub whitelist: Vec<String>,

    /// Names of objects to leave undocumented
    #[arg(long = "blacklist", value_delimiter = ',', value_name = "NAMES")]
    pub blacklist: Vec<String>,

    /// Group of objects documented on one page, as GROUP=NAME,NAME (repeatable)
    #[arg(long = "output-groups", value_name = "GROUP=NAMES")]
    pub output_groups: Vec<String>,

    /// Output Markdown file (if not specified, outputs to stdout)
    #[arg(short = 'O', long = "outfile", value_name = "FILE")]
    pub outfile: Option<PathBuf>,

    /// Folder receiving one page per output group
    #[arg(long = "outfolder", value_name = "DIR")]
    pub outfolder: Option<PathBuf>,

    /// Tag kinds to leave out of the pages, e.g. raise,return
    #[arg(long = "hide-tags", value_name = "KINDS")]
    pub hide_tags: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Supported docstring styles
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ParseStyle {
    /// reStructuredText field lists
    Rst,
}

impl ParseStyle {
    pub fn key(&self) -> &'static str {
        match self {
            ParseStyle::Rst => RST_KEY,
        }
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.inventory_path.exists() {
        anyhow::bail!(
            "Inventory path does not exist: {}",
            args.inventory_path.display()
        );
    }

    if args.outfile.is_some() && args.outfolder.is_some() {
        anyhow::bail!("--outfile and --outfolder are mutually exclusive");
    }

    info!("Inventory path: {}", args.inventory_path.display());
    info!("Docstring style: {}", args.parse_style.key());
    match (&args.outfile, &args.outfolder) {
        (Some(file), _) => info!("Output file: {}", file.display()),
        (None, Some(folder)) => info!("Output folder: {}", folder.display()),
        (None, None) => info!("Output: stdout"),
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting documentation generation...");

    // Step 1: Resolve selection, output and page options up front
    let groups = parse_groups(&args.output_groups)?;
    let retention = Retention::from_options(&args.whitelist, &args.blacklist, groups)?;
    let target = OutputTarget::from_options(
        args.outfile.as_deref(),
        args.outfolder.as_deref(),
        retention.groups().is_some(),
    )?;
    let hidden_tags: Vec<TagKind> = match &args.hide_tags {
        Some(spec) => parse_tag_kinds(spec)?,
        None => Vec::new(),
    };
    if !hidden_tags.is_empty() {
        let names: Vec<&str> = hidden_tags.iter().map(TagKind::name).collect();
        info!("Hidden tags: {}", names.join(", "));
    }
    let options = PageOptions {
        skip_module_docstring: args.skip_module_docstring,
        include_inherited: args.inherited,
        hidden_tags,
    };

    // Step 2: Locate inventories
    info!("Scanning for inventories...");
    let scan_result = InventoryScanner::new(args.inventory_path.clone())
        .scan()
        .with_context(|| format!("Failed to scan {}", args.inventory_path.display()))?;
    info!("Found {} inventory file(s)", scan_result.inventory_files.len());
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }
    if scan_result.inventory_files.is_empty() {
        anyhow::bail!("No inventory files found at {}", args.inventory_path.display());
    }

    // Step 3: Load them
    let parse_results = InventoryParser::parse_files(&scan_result.inventory_files);
    let inventories: Vec<ParsedInventory> = parse_results
        .into_iter()
        .filter_map(|r| match r {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("Skipping inventory due to parse error: {}", e);
                None
            }
        })
        .collect();
    if inventories.is_empty() {
        anyhow::bail!("No inventory could be loaded successfully");
    }

    // Step 4: Render each module
    let parser = get_parser(args.parse_style.key())?;
    let mut builder = MarkdownBuilder::new(parser, Box::new(MdTagRenderer)).with_options(options);
    let mut docs: Vec<ModuleDocs> = Vec::with_capacity(inventories.len());
    for inventory in &inventories {
        info!("Documenting module {}", inventory.module.name);
        let module_docs = builder
            .document_module(&inventory.module, &retention)
            .with_context(|| format!("Failed to document {}", inventory.path.display()))?;
        docs.push(module_docs);
    }

    // Step 5: Output
    let written = emit(&docs, &target).context("Failed to write documentation")?;

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Inventories found: {}", scan_result.inventory_files.len());
    info!("  - Modules documented: {}", docs.len());
    info!("  - Files written: {}", written.len());

    Ok(())
}
