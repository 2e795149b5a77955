//! docmark - Markdown API documentation from reStructuredText docstrings.
//!
//! This library parses docstrings written with reStructuredText field lists
//! (`:param`, `:return(s)`, `:raise(s)` and `:Example:` sections) and renders
//! them as Markdown pages. The objects to document come from an inventory: a
//! JSON or YAML listing of a package's classes, functions, methods and
//! properties, produced by an external introspection step.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Locates inventory files under a path
//! 2. [`inventory`] - Loads inventories and resolves a module's targets
//! 3. [`selection`] - Applies whitelist, blacklist or output groups
//! 4. [`docparse`] - Parses docstrings into description, tags and examples
//! 5. [`doctags`] - The tag model and tag-line grammar
//! 6. [`code_blocks`] - Extracts fenced code blocks from example sections
//! 7. [`tag_renderer`] - Renders single tags as Markdown lines
//! 8. [`markdown`] - Assembles module, class and function pages
//! 9. [`writer`] - Writes pages to stdout, a file or a folder
//!
//! # Example Usage
//!
//! ```no_run
//! use docmark::{
//!     docparse::RstDocstringParser,
//!     inventory::InventoryParser,
//!     markdown::{MarkdownBuilder, ModuleDocs},
//!     selection::Retention,
//!     tag_renderer::MdTagRenderer,
//! };
//! use std::path::Path;
//!
//! let parsed = InventoryParser::parse_file(Path::new("mypkg.json")).unwrap();
//! let mut builder = MarkdownBuilder::new(
//!     Box::new(RstDocstringParser::new()),
//!     Box::new(MdTagRenderer),
//! );
//! let docs = builder.document_module(&parsed.module, &Retention::All).unwrap();
//! if let ModuleDocs::Single(page) = docs {
//!     println!("{}", page);
//! }
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod code_blocks;
pub mod docparse;
pub mod doctags;
pub mod error;
pub mod inventory;
pub mod markdown;
pub mod scanner;
pub mod selection;
pub mod tag_renderer;
pub mod writer;
