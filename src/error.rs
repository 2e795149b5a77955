use std::path::PathBuf;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, DocError>;

/// Base documentation error.
///
/// Every failure raised while parsing docstrings or assembling documentation
/// surfaces as one of these variants, so callers can catch-and-report without
/// knowing grammar details.
#[derive(Debug)]
pub enum DocError {
    /// A tag block was detected but held no lines
    EmptyTagChunk,
    /// A tag-start line matched none of the known keyword prefixes
    UnrecognizedTagKeyword(String),
    /// More than one return tag in a single docstring
    MultipleReturnTags { count: usize, tags: Vec<String> },
    /// An example section carried more than one code-type directive
    MalformedExampleSection(String),
    /// A tag kind name outside the closed set of tag variants
    UnrecognizedTagType(String),
    /// A class docstring declared a return value
    ClassReturnTag { class: String, tag: String },
    /// Declared exports with no matching inventory member
    MissingExports(Vec<String>),
    /// Several selected targets share a name
    RepeatedTargets(Vec<String>),
    /// More than one of whitelist, blacklist and groups was given
    ConflictingSelection,
    /// Incompatible output destinations were requested
    ConflictingOutput(String),
    InvalidGroupSpec(String),
    DuplicateGroup(String),
    InvalidExtension { path: PathBuf, extension: String },
    UnknownParser(String),
    IoError(std::io::Error),
    InventoryError { file: PathBuf, message: String },
}

impl std::fmt::Display for DocError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DocError::EmptyTagChunk => write!(f, "Empty tag chunk"),
            DocError::UnrecognizedTagKeyword(line) => {
                write!(f, "Invalid tag declaration start: {}", line)
            }
            DocError::MultipleReturnTags { count, tags } => {
                write!(f, "Multiple ({}) returns tags: [{}]", count, tags.join(", "))
            }
            DocError::MalformedExampleSection(msg) => {
                write!(f, "Malformed example section: {}", msg)
            }
            DocError::UnrecognizedTagType(name) => {
                write!(f, "Unrecognized doc tag type: {}; choose one: param, return, raise", name)
            }
            DocError::ClassReturnTag { class, tag } => {
                write!(f, "Class docstring has a return value ({}): {}", class, tag)
            }
            DocError::MissingExports(names) => {
                write!(f, "Module is missing declared export(s): {}", names.join(", "))
            }
            DocError::RepeatedTargets(names) => {
                write!(f, "Repeat target names: {}", names.join(", "))
            }
            DocError::ConflictingSelection => {
                write!(f, "Only one retention strategy may be specified")
            }
            DocError::ConflictingOutput(msg) => write!(f, "Conflicting output options: {}", msg),
            DocError::InvalidGroupSpec(spec) => {
                write!(f, "Illegal output groups specification: {}", spec)
            }
            DocError::DuplicateGroup(name) => write!(f, "Duplicated group name: {}", name),
            DocError::InvalidExtension { path, extension } => write!(
                f,
                "Invalid extension: {} (from {}); valid extensions: .md",
                extension,
                path.display()
            ),
            DocError::UnknownParser(name) => write!(f, "{}; choose one: rst", name),
            DocError::IoError(e) => write!(f, "IO error: {}", e),
            DocError::InventoryError { file, message } => {
                write!(f, "Inventory error {}: {}", file.display(), message)
            }
        }
    }
}

impl std::error::Error for DocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DocError {
    fn from(err: std::io::Error) -> Self {
        DocError::IoError(err)
    }
}

impl From<serde_json::Error> for DocError {
    fn from(err: serde_json::Error) -> Self {
        DocError::InventoryError {
            file: PathBuf::from("<unknown>"),
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<serde_yaml::Error> for DocError {
    fn from(err: serde_yaml::Error) -> Self {
        DocError::InventoryError {
            file: PathBuf::from("<unknown>"),
            message: format!("YAML error: {}", err),
        }
    }
}
