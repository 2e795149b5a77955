use crate::error::Result;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions recognized as inventory documents.
pub const INVENTORY_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Scanner for locating inventory documents.
///
/// The `InventoryScanner` recursively walks a directory to find all inventory
/// files, skipping hidden directories (those starting with `.`). A root that
/// is itself a file is returned as the only inventory.
///
/// # Example
///
/// ```no_run
/// use docmark::scanner::InventoryScanner;
/// use std::path::PathBuf;
///
/// let scanner = InventoryScanner::new(PathBuf::from("./inventories"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} inventories", result.inventory_files.len());
/// ```
pub struct InventoryScanner {
    root_path: PathBuf,
}

/// Result of a scan.
pub struct ScanResult {
    /// Paths to all discovered inventory files, sorted
    pub inventory_files: Vec<PathBuf>,
    /// Warning messages for entries that could not be accessed
    pub warnings: Vec<String>,
}

pub fn is_inventory_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| INVENTORY_EXTENSIONS.contains(&ext))
}

impl InventoryScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all inventory files.
    ///
    /// Inaccessible entries are logged and recorded as warnings; scanning
    /// continues past them.
    ///
    /// # Errors
    ///
    /// Returns an error if the root path does not exist.
    pub fn scan(&self) -> Result<ScanResult> {
        if self.root_path.is_file() {
            return Ok(ScanResult {
                inventory_files: vec![self.root_path.clone()],
                warnings: Vec::new(),
            });
        }
        // Surface a missing root as an IO error rather than a walk warning.
        std::fs::metadata(&self.root_path)?;

        let mut inventory_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| {
                e.path() == self.root_path || !e.file_name().to_string_lossy().starts_with('.')
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && is_inventory_file(path) {
                        inventory_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        inventory_files.sort();
        Ok(ScanResult {
            inventory_files,
            warnings,
        })
    }
}
