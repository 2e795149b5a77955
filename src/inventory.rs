//! Object inventories: the documentable objects of one package.
//!
//! Runtime introspection of a package happens outside this crate. Its output
//! is an inventory document listing each module member with its name, kind,
//! optional docstring and call signature, serialized as JSON or YAML:
//!
//! ```yaml
//! name: mypkg
//! docstring: Package-level docs.
//! exports: [Widget, build]
//! members:
//!   - name: Widget
//!     kind: class
//!     docstring: A widget.
//!     members:
//!       - name: resize
//!         kind: method
//!         signature: (self, width, height)
//!   - name: build
//!     kind: function
//!     signature: (spec, strict=False)
//! ```

use crate::error::{DocError, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Kind of a documentable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Class,
    Function,
    Method,
    Property,
}

/// One documentable object and, for classes, its members.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocObject {
    pub name: String,
    pub kind: ObjectKind,
    /// Absent when the object carries no docstring
    #[serde(default)]
    pub docstring: Option<String>,
    /// Parameter list as written after the name, e.g. `(self, x=1)`
    #[serde(default)]
    pub signature: Option<String>,
    /// Whether a method comes from a base class rather than the class itself
    #[serde(default)]
    pub inherited: bool,
    #[serde(default)]
    pub members: Vec<DocObject>,
}

/// Introspected contents of one module.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModuleInventory {
    pub name: String,
    #[serde(default)]
    pub docstring: Option<String>,
    /// Declared export list; when present it decides the documentation targets
    #[serde(default)]
    pub exports: Option<Vec<String>>,
    #[serde(default)]
    pub members: Vec<DocObject>,
}

impl ModuleInventory {
    /// Determine the module's documentation targets, in order.
    ///
    /// With a declared export list, the targets are the exported names in
    /// declared order; otherwise every member in inventory order.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::MissingExports`] if a declared export has no
    /// matching member.
    pub fn targets(&self) -> Result<Vec<&DocObject>> {
        let exports = match &self.exports {
            Some(exports) => exports,
            None => return Ok(self.members.iter().collect()),
        };

        let mut targets = Vec::with_capacity(exports.len());
        let mut missing = Vec::new();
        for name in exports {
            match self.members.iter().find(|m| &m.name == name) {
                Some(member) => targets.push(member),
                None => missing.push(name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(DocError::MissingExports(missing));
        }
        Ok(targets)
    }
}

/// Loader for inventory files.
pub struct InventoryParser;

/// A successfully loaded inventory with its source path.
#[derive(Debug)]
pub struct ParsedInventory {
    pub path: PathBuf,
    pub module: ModuleInventory,
}

impl InventoryParser {
    /// Parses a single inventory file; the format follows the extension
    /// (`.yaml`/`.yml` for YAML, anything else as JSON).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a
    /// module inventory.
    pub fn parse_file(path: &Path) -> Result<ParsedInventory> {
        debug!("Parsing inventory: {}", path.display());
        let content = fs::read_to_string(path)?;
        let module = Self::parse_str(&content, path).map_err(|e| match e {
            DocError::InventoryError { message, .. } => DocError::InventoryError {
                file: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        debug!(
            "Loaded module {} with {} member(s)",
            module.name,
            module.members.len()
        );
        Ok(ParsedInventory {
            path: path.to_path_buf(),
            module,
        })
    }

    /// Parses inventory text, choosing the format from `path`'s extension.
    pub fn parse_str(content: &str, path: &Path) -> Result<ModuleInventory> {
        let module = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(content)?,
            _ => serde_json::from_str(content)?,
        };
        Ok(module)
    }

    /// Parses multiple inventory files, continuing even if some fail.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedInventory>> {
        debug!("Parsing {} inventory file(s)", paths.len());

        let results: Vec<Result<ParsedInventory>> = paths
            .iter()
            .map(|path| {
                Self::parse_file(path).inspect_err(|e| {
                    warn!("Failed to parse {}: {}", path.display(), e);
                })
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const JSON_INVENTORY: &str = r#"{
        "name": "mypkg",
        "docstring": "Package docs.",
        "members": [
            {"name": "Widget", "kind": "class", "docstring": "A widget.",
             "members": [{"name": "resize", "kind": "method", "signature": "(self, w)"}]},
            {"name": "build", "kind": "function", "signature": "(spec)"}
        ]
    }"#;

    const YAML_INVENTORY: &str = "\
name: mypkg
exports: [build]
members:
  - name: Widget
    kind: class
  - name: build
    kind: function
    docstring: |
      Build a thing.

      :param str spec: what to build
";

    #[test]
    fn test_parse_json_inventory() {
        let module = InventoryParser::parse_str(JSON_INVENTORY, Path::new("inv.json")).unwrap();
        assert_eq!(module.name, "mypkg");
        assert_eq!(module.docstring.as_deref(), Some("Package docs."));
        assert_eq!(module.members.len(), 2);
        assert_eq!(module.members[0].kind, ObjectKind::Class);
        assert_eq!(module.members[0].members[0].signature.as_deref(), Some("(self, w)"));
        assert!(!module.members[0].members[0].inherited);
        assert!(module.members[1].docstring.is_none());
    }

    #[test]
    fn test_parse_yaml_inventory() {
        let module = InventoryParser::parse_str(YAML_INVENTORY, Path::new("inv.yaml")).unwrap();
        assert_eq!(module.exports, Some(vec!["build".to_string()]));
        let build = &module.members[1];
        assert_eq!(build.kind, ObjectKind::Function);
        assert!(build.docstring.as_deref().unwrap().contains(":param str spec:"));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let text = r#"{"name": "m", "members": [{"name": "x", "kind": "variable"}]}"#;
        let err = InventoryParser::parse_str(text, Path::new("inv.json")).unwrap_err();
        assert!(matches!(err, DocError::InventoryError { .. }));
    }

    #[test]
    fn test_targets_follow_exports() {
        let module = InventoryParser::parse_str(YAML_INVENTORY, Path::new("inv.yml")).unwrap();
        let names: Vec<&str> = module
            .targets()
            .unwrap()
            .into_iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["build"]);
    }

    #[test]
    fn test_targets_without_exports_are_all_members() {
        let module = InventoryParser::parse_str(JSON_INVENTORY, Path::new("inv.json")).unwrap();
        assert_eq!(module.targets().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_export_is_an_error() {
        let mut module = InventoryParser::parse_str(JSON_INVENTORY, Path::new("inv.json")).unwrap();
        module.exports = Some(vec!["build".to_string(), "Gadget".to_string()]);
        match module.targets().unwrap_err() {
            DocError::MissingExports(names) => assert_eq!(names, vec!["Gadget".to_string()]),
            other => panic!("Unexpected error: {}", other),
        }
    }

    #[test]
    fn test_parse_files_continues_after_failure() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.json");
        let bad = temp_dir.path().join("bad.json");
        fs::write(&good, JSON_INVENTORY).unwrap();
        fs::write(&bad, "{ not json").unwrap();

        let results = InventoryParser::parse_files(&[bad.clone(), good.clone()]);
        assert_eq!(results.len(), 2);
        match &results[0] {
            Err(DocError::InventoryError { file, .. }) => assert_eq!(file, &bad),
            other => panic!("Expected inventory error, got {:?}", other.as_ref().map(|p| &p.path)),
        }
        assert_eq!(results[1].as_ref().unwrap().path, good);
    }

    #[test]
    fn test_parse_missing_file() {
        let result = InventoryParser::parse_file(Path::new("/nonexistent/inventory.json"));
        assert!(matches!(result, Err(DocError::IoError(_))));
    }
}
