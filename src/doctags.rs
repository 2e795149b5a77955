//! Tag model for parsed docstrings.
//!
//! A tag is a structured annotation introduced by a line beginning with `:`,
//! describing a parameter, the return value, or a possible error. The set of
//! tag variants is closed: [`DocTag`] is a sum type and every consumer matches
//! on it exhaustively.
//!
//! This module also holds the grammar of a single tag declaration:
//!
//! ```text
//! :keyword [typename] [name]: description-start
//!     continuation lines...
//! ```

use crate::error::{DocError, Result};
use std::fmt;
use std::str::FromStr;

/// Tag documenting one formal parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamTag {
    /// The formal parameter identifier
    pub name: String,
    /// Free-text type description, possibly a union written as `A | B`
    pub typename: String,
    /// De-indented, joined description text
    pub description: String,
}

/// Tag documenting the return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTag {
    pub typename: String,
    pub description: String,
}

/// Tag documenting one possible raised-error condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTag {
    pub typename: String,
    pub description: String,
}

/// A single decoded docstring tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTag {
    Param(ParamTag),
    Return(ReturnTag),
    Error(ErrorTag),
}

impl DocTag {
    /// Text of either a single type name or a union of several.
    pub fn typename(&self) -> &str {
        match self {
            DocTag::Param(t) => &t.typename,
            DocTag::Return(t) => &t.typename,
            DocTag::Error(t) => &t.typename,
        }
    }

    /// Description of the value to which this tag pertains.
    pub fn description(&self) -> &str {
        match self {
            DocTag::Param(t) => &t.description,
            DocTag::Return(t) => &t.description,
            DocTag::Error(t) => &t.description,
        }
    }

    fn description_mut(&mut self) -> &mut String {
        match self {
            DocTag::Param(t) => &mut t.description,
            DocTag::Return(t) => &mut t.description,
            DocTag::Error(t) => &mut t.description,
        }
    }
}

impl fmt::Display for DocTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DocTag::Param(t) => {
                write!(f, "ParamTag({} {}: {})", t.typename, t.name, t.description)
            }
            DocTag::Return(t) => write!(f, "ReturnTag({}: {})", t.typename, t.description),
            DocTag::Error(t) => write!(f, "ErrorTag({}: {})", t.typename, t.description),
        }
    }
}

/// The kind of a tag, independent of its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Param,
    Return,
    Raise,
}

/// Keyword prefixes, matched against the literal start of a declaration line.
/// `:return` also covers `:returns`, `:raise` also covers `:raises`.
const KEYWORD_PREFIXES: [(&str, TagKind); 3] = [
    (":param", TagKind::Param),
    (":return", TagKind::Return),
    (":raise", TagKind::Raise),
];

impl TagKind {
    /// Determine the tag kind a declaration line starts, if any.
    pub fn from_declaration(line: &str) -> Option<TagKind> {
        KEYWORD_PREFIXES
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix))
            .map(|(_, kind)| *kind)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TagKind::Param => "param",
            TagKind::Return => "return",
            TagKind::Raise => "raise",
        }
    }
}

impl FromStr for TagKind {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "param" | "params" => Ok(TagKind::Param),
            "return" | "returns" => Ok(TagKind::Return),
            "raise" | "raises" => Ok(TagKind::Raise),
            other => Err(DocError::UnrecognizedTagType(other.to_string())),
        }
    }
}

/// Create the tag associated with a chunk of docstring lines.
///
/// The first line is the declaration; every following line is a continuation
/// whose leading whitespace is stripped before it is appended to the
/// description.
pub fn decode_tag(chunk: &[&str]) -> Result<DocTag> {
    let (decl_line, continuation) = chunk.split_first().ok_or(DocError::EmptyTagChunk)?;
    let mut tag = parse_declaration(decl_line)?;
    if !continuation.is_empty() {
        let rest: Vec<&str> = continuation.iter().map(|l| l.trim_start()).collect();
        tag.description_mut().push_str(&rest.join(" "));
    }
    let trimmed = tag.description().trim().to_string();
    *tag.description_mut() = trimmed;
    Ok(tag)
}

/// Parse the declaration line of a tag.
///
/// Split on colons, the first segment after the leading colon holds the
/// keyword, the typename and (for parameters) the name, and the last segment
/// is where the description starts. Segments in between are dropped. A
/// parameter's name is the last token of the head, so a head made of the
/// keyword alone names the parameter after the keyword.
fn parse_declaration(line: &str) -> Result<DocTag> {
    let line = line.trim();
    let kind = TagKind::from_declaration(line)
        .ok_or_else(|| DocError::UnrecognizedTagKeyword(line.to_string()))?;

    let segments: Vec<&str> = line.split(':').collect();
    let head = segments.get(1).copied().unwrap_or_default();
    let description = match segments.len() {
        0..=2 => String::new(),
        n => segments[n - 1].to_string(),
    };

    let tokens: Vec<&str> = head.split_whitespace().collect();
    // The first token is the keyword itself, never part of the typename.
    let typename = |end: usize| tokens.get(1..end).unwrap_or_default().join(" ");

    let tag = match kind {
        TagKind::Param => DocTag::Param(ParamTag {
            name: tokens.last().copied().unwrap_or_default().to_string(),
            typename: typename(tokens.len().saturating_sub(1)),
            description,
        }),
        TagKind::Return => DocTag::Return(ReturnTag {
            typename: typename(tokens.len()),
            description,
        }),
        TagKind::Raise => DocTag::Error(ErrorTag {
            typename: typename(tokens.len()),
            description,
        }),
    };
    Ok(tag)
}
