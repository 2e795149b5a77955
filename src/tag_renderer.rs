//! Rendering of individual docstring tags.
//!
//! A [`TagRenderer`] turns one [`DocTag`] into a single display line. The
//! match over the tag variants is exhaustive, so a new variant cannot be
//! added without deciding how it renders.

use crate::doctags::{DocTag, ErrorTag, ParamTag, ReturnTag, TagKind};
use crate::error::Result;

/// Strategy for rendering a tag.
pub trait TagRenderer {
    /// Render the given tag as one line.
    fn render(&self, tag: &DocTag) -> String;

    fn render_param(&self, tag: &ParamTag) -> String {
        self.render(&DocTag::Param(tag.clone()))
    }

    fn render_return(&self, tag: &ReturnTag) -> String {
        self.render(&DocTag::Return(tag.clone()))
    }

    fn render_error(&self, tag: &ErrorTag) -> String {
        self.render(&DocTag::Error(tag.clone()))
    }
}

/// Render tags as Markdown list entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct MdTagRenderer;

impl TagRenderer for MdTagRenderer {
    fn render(&self, tag: &DocTag) -> String {
        match tag {
            DocTag::Param(t) => format!("- `{}` -- `{}`: {}", t.name, t.typename, t.description),
            DocTag::Return(t) => format!("`{}`: {}", t.typename, t.description),
            DocTag::Error(t) => format!("- `{}`: {}", t.typename, t.description),
        }
    }
}

/// Parse a comma-separated list of tag kind names, e.g. `param,raises`.
///
/// # Errors
///
/// Returns [`crate::error::DocError::UnrecognizedTagType`] for a name outside
/// the known tag kinds.
pub fn parse_tag_kinds(spec: &str) -> Result<Vec<TagKind>> {
    spec.split(',')
        .filter(|name| !name.trim().is_empty())
        .map(str::parse)
        .collect()
}
