//! Extraction of code examples from the trailing section of a docstring.
//!
//! An examples section starts with the [`EXAMPLE_MARKER`] line. Each marker
//! opens one example; an optional `.. code-block:: <lang>` directive names the
//! fence language, and the lines that follow (up to the next marker) are the
//! example's content:
//!
//! ```text
//! :Example:
//!
//! .. code-block:: python
//!
//!     from a import b
//!     c = 3
//! ```
//!
//! becomes one fenced block tagged `python` holding the two de-indented
//! content lines.

use crate::error::{DocError, Result};
use log::debug;

/// Marker line opening one code example.
pub const EXAMPLE_MARKER: &str = ":Example:";

/// Directive naming the language of an example's code.
pub const CODE_BLOCK_DIRECTIVE: &str = ".. code-block::";

/// Fence delimiter wrapping each example.
pub const FENCE: &str = "```";

/// Fence language used when an example carries no directive.
pub const DEFAULT_LANGUAGE: &str = "console";

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

pub fn is_example_marker(line: &str) -> bool {
    line.trim_start().starts_with(EXAMPLE_MARKER)
}

fn directive_language(line: &str) -> Option<&str> {
    line.trim_start()
        .strip_prefix(CODE_BLOCK_DIRECTIVE)
        .map(str::trim)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekingMarker,
    InDirective,
    InContent,
}

/// Example block currently being accumulated.
#[derive(Default)]
struct PendingBlock<'a> {
    language: Option<&'a str>,
    content: Vec<&'a str>,
}

impl<'a> PendingBlock<'a> {
    fn finish(self) -> Option<String> {
        let mut content = self.content;
        while content.last().is_some_and(|l| is_blank(l)) {
            content.pop();
        }
        if content.is_empty() {
            return None;
        }

        let language = match self.language {
            Some(lang) if !lang.is_empty() => lang,
            _ => DEFAULT_LANGUAGE,
        };
        let mut lines = Vec::with_capacity(content.len() + 2);
        lines.push(format!("{}{}", FENCE, language));
        lines.extend(dedent(&content));
        lines.push(FENCE.to_string());
        Some(lines.join("\n"))
    }
}

/// Remove the indentation shared by every non-blank line.
fn dedent(lines: &[&str]) -> Vec<String> {
    let indent = lines
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            if is_blank(l) {
                String::new()
            } else {
                l.get(indent..)
                    .unwrap_or_else(|| l.trim_start())
                    .trim_end()
                    .to_string()
            }
        })
        .collect()
}

/// Extract fenced example blocks from the lines following the tag region.
///
/// Returns `Ok(None)` when the section does not open with an example marker.
/// Each marker yields at most one block; a marker without content yields none.
///
/// # Errors
///
/// Returns [`DocError::MalformedExampleSection`] if an example carries more
/// than one code-type directive.
pub fn extract_examples(lines: &[&str]) -> Result<Option<Vec<String>>> {
    let opens_with_marker = lines
        .iter()
        .find(|l| !is_blank(l))
        .is_some_and(|l| is_example_marker(l));
    if !opens_with_marker {
        return Ok(None);
    }

    let mut blocks = Vec::new();
    let mut state = State::SeekingMarker;
    let mut pending = PendingBlock::default();

    for &line in lines {
        state = match state {
            State::SeekingMarker => {
                if is_example_marker(line) {
                    State::InDirective
                } else {
                    State::SeekingMarker
                }
            }
            State::InDirective => {
                if is_blank(line) {
                    State::InDirective
                } else if is_example_marker(line) {
                    debug!("Example marker without content");
                    pending = PendingBlock::default();
                    State::InDirective
                } else if let Some(language) = directive_language(line) {
                    if let Some(previous) = pending.language {
                        return Err(DocError::MalformedExampleSection(format!(
                            "multiple code-type directives ({} then {})",
                            previous, language
                        )));
                    }
                    pending.language = Some(language);
                    State::InDirective
                } else {
                    pending.content.push(line);
                    State::InContent
                }
            }
            State::InContent => {
                if is_example_marker(line) {
                    blocks.extend(std::mem::take(&mut pending).finish());
                    State::InDirective
                } else if let Some(language) = directive_language(line) {
                    return Err(DocError::MalformedExampleSection(format!(
                        "code-type directive ({}) inside example content",
                        language
                    )));
                } else {
                    pending.content.push(line);
                    State::InContent
                }
            }
        };
    }

    if state == State::InContent {
        blocks.extend(pending.finish());
    }

    debug!("Extracted {} example block(s)", blocks.len());
    Ok(Some(blocks))
}
