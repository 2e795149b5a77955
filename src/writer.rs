//! Output of rendered documentation pages.
//!
//! Pages go to stdout, to a single Markdown file, or (for output groups) to
//! one `{group}.md` file per group inside an output folder.

use crate::error::{DocError, Result};
use crate::markdown::{GroupPage, ModuleDocs};
use log::{debug, info, warn};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// The only extension accepted for output files.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Where rendered pages are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
    Folder(PathBuf),
}

impl OutputTarget {
    /// Validate the requested output destinations.
    ///
    /// Output groups with no destination go to the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::ConflictingOutput`] when both a file and a folder
    /// are given, when a file is combined with output groups, or when a
    /// folder is given without output groups. Returns
    /// [`DocError::InvalidExtension`] for a non-Markdown output file.
    pub fn from_options(
        outfile: Option<&Path>,
        outfolder: Option<&Path>,
        grouped: bool,
    ) -> Result<Self> {
        match (outfile, outfolder) {
            (Some(_), Some(_)) => Err(DocError::ConflictingOutput(
                "specify an output file or an output folder, not both".to_string(),
            )),
            (Some(_), None) if grouped => Err(DocError::ConflictingOutput(
                "output groups require an output folder, not a file".to_string(),
            )),
            (Some(file), None) => Ok(OutputTarget::File(finalize_output_path(file)?)),
            (None, Some(_)) if !grouped => Err(DocError::ConflictingOutput(
                "an output folder is only used with output groups".to_string(),
            )),
            (None, Some(folder)) => Ok(OutputTarget::Folder(folder.to_path_buf())),
            (None, None) if grouped => Ok(OutputTarget::Folder(env::current_dir()?)),
            (None, None) => Ok(OutputTarget::Stdout),
        }
    }
}

/// Give `path` the Markdown extension when it has none.
///
/// # Errors
///
/// Returns [`DocError::InvalidExtension`] if `path` has another extension.
pub fn finalize_output_path(path: &Path) -> Result<PathBuf> {
    match path.extension().map(|e| e.to_string_lossy()) {
        None => Ok(path.with_extension(MARKDOWN_EXTENSION)),
        Some(ext) if ext == MARKDOWN_EXTENSION => Ok(path.to_path_buf()),
        Some(ext) => Err(DocError::InvalidExtension {
            path: path.to_path_buf(),
            extension: format!(".{}", ext),
        }),
    }
}

/// Writes string content to a file, creating parent directories as needed.
/// An existing file is overwritten.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Write one `{group}.md` page per group into `folder`.
///
/// Pages of the same group coming from several modules are appended to one
/// another. A group whose name carries a non-Markdown extension is skipped.
///
/// Returns the paths written.
pub fn write_group_pages(pages: &[GroupPage], folder: &Path) -> Result<Vec<PathBuf>> {
    let mut merged: Vec<(String, String)> = Vec::new();
    for page in pages {
        match merged.iter_mut().find(|(group, _)| group == &page.group) {
            Some((_, text)) => {
                text.push('\n');
                text.push_str(&page.text);
            }
            None => merged.push((page.group.clone(), page.text.clone())),
        }
    }

    let mut written = Vec::with_capacity(merged.len());
    for (group, text) in merged {
        let path = match finalize_output_path(&folder.join(&group)) {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping group {}: {}", group, e);
                continue;
            }
        };
        write_to_file(&text, &path)?;
        written.push(path);
    }
    info!("Wrote {} group page(s) to {}", written.len(), folder.display());
    Ok(written)
}

/// Emit every module's documentation to `target`.
///
/// Returns the files written; empty for stdout.
pub fn emit(docs: &[ModuleDocs], target: &OutputTarget) -> Result<Vec<PathBuf>> {
    match target {
        OutputTarget::Stdout => {
            print!("{}", concatenate_pages(docs));
            Ok(Vec::new())
        }
        OutputTarget::File(path) => {
            write_to_file(&concatenate_pages(docs), path)?;
            info!("Wrote documentation to {}", path.display());
            Ok(vec![path.clone()])
        }
        OutputTarget::Folder(folder) => {
            let pages: Vec<GroupPage> = docs
                .iter()
                .flat_map(|d| match d {
                    ModuleDocs::Grouped(pages) => pages.clone(),
                    ModuleDocs::Single(_) => Vec::new(),
                })
                .collect();
            write_group_pages(&pages, folder)
        }
    }
}

/// All pages in order, separated by a blank line.
fn concatenate_pages(docs: &[ModuleDocs]) -> String {
    let texts: Vec<&str> = docs.iter().flat_map(page_texts).collect();
    texts.join("\n")
}

fn page_texts(docs: &ModuleDocs) -> Vec<&str> {
    match docs {
        ModuleDocs::Single(text) => vec![text.as_str()],
        ModuleDocs::Grouped(pages) => pages.iter().map(|p| p.text.as_str()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn group_page(group: &str, text: &str) -> GroupPage {
        GroupPage {
            group: group.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_finalize_output_path() {
        assert_eq!(
            finalize_output_path(Path::new("docs/api")).unwrap(),
            PathBuf::from("docs/api.md")
        );
        assert_eq!(
            finalize_output_path(Path::new("docs/api.md")).unwrap(),
            PathBuf::from("docs/api.md")
        );
        match finalize_output_path(Path::new("docs/api.txt")).unwrap_err() {
            DocError::InvalidExtension { extension, .. } => assert_eq!(extension, ".txt"),
            other => panic!("Unexpected error: {}", other),
        }
    }

    #[test]
    fn test_output_target_conflicts() {
        let file = Path::new("out.md");
        let folder = Path::new("out");
        assert!(matches!(
            OutputTarget::from_options(Some(file), Some(folder), true),
            Err(DocError::ConflictingOutput(_))
        ));
        assert!(matches!(
            OutputTarget::from_options(Some(file), None, true),
            Err(DocError::ConflictingOutput(_))
        ));
        assert!(matches!(
            OutputTarget::from_options(None, Some(folder), false),
            Err(DocError::ConflictingOutput(_))
        ));
        assert_eq!(
            OutputTarget::from_options(None, None, false).unwrap(),
            OutputTarget::Stdout
        );
        assert_eq!(
            OutputTarget::from_options(Some(Path::new("out")), None, false).unwrap(),
            OutputTarget::File(PathBuf::from("out.md"))
        );
    }

    #[test]
    fn test_groups_without_destination_go_to_current_dir() {
        assert_eq!(
            OutputTarget::from_options(None, None, true).unwrap(),
            OutputTarget::Folder(env::current_dir().unwrap())
        );
        assert_eq!(
            OutputTarget::from_options(None, Some(Path::new("docs")), true).unwrap(),
            OutputTarget::Folder(PathBuf::from("docs"))
        );
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("subdir").join("nested").join("api.md");

        write_to_file("# Docs\n", &file_path).unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "# Docs\n");

        write_to_file("# Replaced\n", &file_path).unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "# Replaced\n");
    }

    #[test]
    fn test_write_group_pages() {
        let temp_dir = TempDir::new().unwrap();
        let pages = vec![
            group_page("models", "# Models\n"),
            group_page("funcs.md", "# Funcs\n"),
            group_page("notes.txt", "# Notes\n"),
        ];

        let written = write_group_pages(&pages, temp_dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("models.md")).unwrap(),
            "# Models\n"
        );
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("funcs.md")).unwrap(),
            "# Funcs\n"
        );
        assert!(!temp_dir.path().join("notes.txt").exists());
        assert!(!temp_dir.path().join("notes.md").exists());
    }

    #[test]
    fn test_same_group_from_several_modules_is_merged() {
        let temp_dir = TempDir::new().unwrap();
        let docs = vec![
            ModuleDocs::Grouped(vec![group_page("api", "# One\n")]),
            ModuleDocs::Grouped(vec![group_page("api", "# Two\n")]),
        ];
        let target = OutputTarget::Folder(temp_dir.path().to_path_buf());

        let written = emit(&docs, &target).unwrap();
        assert_eq!(written, vec![temp_dir.path().join("api.md")]);
        assert_eq!(
            fs::read_to_string(&written[0]).unwrap(),
            "# One\n\n# Two\n"
        );
    }

    #[test]
    fn test_concatenated_pages_are_separated_by_a_blank_line() {
        let docs = vec![
            ModuleDocs::Single("# A\n".to_string()),
            ModuleDocs::Grouped(vec![group_page("g", "# B\n"), group_page("h", "# C\n")]),
        ];
        assert_eq!(concatenate_pages(&docs), "# A\n\n# B\n\n# C\n");
    }

    #[test]
    fn test_emit_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("api.md");
        let docs = vec![
            ModuleDocs::Single("# A\n".to_string()),
            ModuleDocs::Single("# B\n".to_string()),
        ];

        emit(&docs, &OutputTarget::File(path.clone())).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# A\n\n# B\n");
    }
}
