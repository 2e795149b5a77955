//! Docstring parsing.
//!
//! A docstring is split into three regions:
//!
//! 1. the description: a headline (lines up to the first blank line or line
//!    opening with a colon) plus optional detail lines;
//! 2. the tag region: `:param`, `:return(s)` and `:raise(s)` declarations with
//!    their continuation lines, ended by a blank line;
//! 3. the examples region, handled by [`crate::code_blocks`].
//!
//! # Example
//!
//! ```
//! use docmark::docparse::{DocstringParser, RstDocstringParser};
//!
//! let mut parser = RstDocstringParser::new();
//! let parsed = parser
//!     .parse("Computes a value.\n\n:param int x: the input\n:return int: doubled value\n")
//!     .unwrap();
//! assert_eq!(parsed.description, "Computes a value.");
//! assert_eq!(parsed.params[0].name, "x");
//! assert_eq!(parsed.returns.as_ref().unwrap().typename, "int");
//! ```

use crate::code_blocks::{extract_examples, is_blank, EXAMPLE_MARKER};
use crate::doctags::{decode_tag, DocTag, ErrorTag, ParamTag, ReturnTag};
use crate::error::{DocError, Result};
use log::debug;

/// Key of the reStructuredText parsing strategy.
pub const RST_KEY: &str = "rst";

/// Complete result of parsing one docstring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocstring {
    /// The raw docstring text this result was parsed from
    pub doc: String,
    /// Headline, optionally followed by a blank line and the detail lines
    pub description: String,
    /// Parameter tags in order of appearance
    pub params: Vec<ParamTag>,
    pub returns: Option<ReturnTag>,
    pub raises: Vec<ErrorTag>,
    /// Fenced example blocks, or `None` if there is no examples section
    pub examples: Option<Vec<String>>,
}

/// Entity responsible for parsing docstrings.
///
/// Implementations only need [`DocstringParser::parse`]; the per-field
/// accessors project from the full result, so repeated calls on the same
/// text stay consistent with one underlying parse.
pub trait DocstringParser {
    /// Fully parse the given docstring.
    fn parse(&mut self, ds: &str) -> Result<&ParsedDocstring>;

    /// Parse a docstring that may be absent; absence means nothing to parse.
    fn parse_optional(&mut self, ds: Option<&str>) -> Result<Option<&ParsedDocstring>> {
        match ds {
            Some(ds) => self.parse(ds).map(Some),
            None => Ok(None),
        }
    }

    fn description(&mut self, ds: &str) -> Result<&str> {
        Ok(&self.parse(ds)?.description)
    }

    fn params(&mut self, ds: &str) -> Result<&[ParamTag]> {
        Ok(&self.parse(ds)?.params)
    }

    fn returns(&mut self, ds: &str) -> Result<Option<&ReturnTag>> {
        Ok(self.parse(ds)?.returns.as_ref())
    }

    fn raises(&mut self, ds: &str) -> Result<&[ErrorTag]> {
        Ok(&self.parse(ds)?.raises)
    }

    fn examples(&mut self, ds: &str) -> Result<Option<&[String]>> {
        Ok(self.parse(ds)?.examples.as_deref())
    }
}

/// Parser for reStructuredText docstrings.
///
/// Retains the most recently produced result and hands it back as long as the
/// next docstring is textually identical. Not meant to be shared between
/// threads without external serialization.
#[derive(Debug, Default)]
pub struct RstDocstringParser {
    last_seen: Option<ParsedDocstring>,
}

impl RstDocstringParser {
    pub fn new() -> Self {
        Self { last_seen: None }
    }
}

impl DocstringParser for RstDocstringParser {
    fn parse(&mut self, ds: &str) -> Result<&ParsedDocstring> {
        let parsed = match self.last_seen.take() {
            Some(cached) if cached.doc == ds => {
                debug!("Reusing cached docstring parse");
                cached
            }
            _ => parse_docstring(ds)?,
        };
        let parsed: &ParsedDocstring = self.last_seen.insert(parsed);
        Ok(parsed)
    }
}

/// Get a docstring parsing strategy by its key.
///
/// # Errors
///
/// Returns [`DocError::UnknownParser`] for any key other than [`RST_KEY`].
pub fn get_parser(name: &str) -> Result<Box<dyn DocstringParser>> {
    match name {
        RST_KEY => Ok(Box::new(RstDocstringParser::new())),
        other => Err(DocError::UnknownParser(other.to_string())),
    }
}

/// Determine whether a line seems to start a tag declaration.
pub fn is_tag_start(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with(':') && !line.starts_with(EXAMPLE_MARKER)
}

/// Determine whether a line looks to be past the docstring description.
fn is_past_description(line: &str) -> bool {
    line.trim_start().starts_with(':')
}

/// Parse the description, tags and examples of a docstring, without caching.
pub fn parse_docstring(ds: &str) -> Result<ParsedDocstring> {
    let lines: Vec<&str> = ds.lines().collect();

    // The example marker also ends the head, so a docstring may open with it.
    let head_end = lines
        .iter()
        .position(|l| is_blank(l) || is_past_description(l))
        .unwrap_or(lines.len());
    let headline = lines[..head_end]
        .iter()
        .map(|l| l.trim())
        .collect::<Vec<_>>()
        .join(" ");

    let rest = &lines[head_end..];
    let desc_end = rest
        .iter()
        .position(|l| is_past_description(l))
        .unwrap_or(rest.len());
    let detail: Vec<&str> = rest[..desc_end]
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| l.trim_end())
        .collect();

    let description = match (headline.is_empty(), detail.is_empty()) {
        (_, true) => headline,
        (true, false) => detail.join("\n"),
        (false, false) => format!("{}\n\n{}", headline, detail.join("\n")),
    };

    let (chunks, example_lines) = split_tag_region(&rest[desc_end..]);
    let tags = chunks
        .iter()
        .map(|chunk| decode_tag(chunk))
        .collect::<Result<Vec<_>>>()?;

    let mut params = Vec::new();
    let mut returns = Vec::new();
    let mut raises = Vec::new();
    for tag in tags {
        match tag {
            DocTag::Param(t) => params.push(t),
            DocTag::Return(t) => returns.push(t),
            DocTag::Error(t) => raises.push(t),
        }
    }
    if returns.len() > 1 {
        return Err(DocError::MultipleReturnTags {
            count: returns.len(),
            tags: returns
                .into_iter()
                .map(|t| DocTag::Return(t).to_string())
                .collect(),
        });
    }

    let examples = extract_examples(example_lines)?;

    debug!(
        "Parsed docstring: {} param(s), {} return, {} raise(s), {} example(s)",
        params.len(),
        returns.len(),
        raises.len(),
        examples.as_ref().map_or(0, Vec::len)
    );

    Ok(ParsedDocstring {
        doc: ds.to_string(),
        description,
        params,
        returns: returns.pop(),
        raises,
        examples,
    })
}

/// Chunk the tag region into one block of lines per tag.
///
/// Returns the chunks and the lines left for the examples region. The tag
/// region ends at the first blank line; if it runs to the end of the
/// docstring, no lines remain for examples. When the region does not open
/// with a tag-start line, there are no tags and every line goes on to the
/// examples region.
fn split_tag_region<'a, 'b>(lines: &'b [&'a str]) -> (Vec<Vec<&'a str>>, &'b [&'a str]) {
    match lines.first() {
        Some(first) if is_tag_start(first) => {}
        _ => return (Vec::new(), lines),
    }

    let mut chunks: Vec<Vec<&'a str>> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if is_blank(line) {
            return (chunks, &lines[i + 1..]);
        }
        let line = line.trim();
        if is_tag_start(line) {
            chunks.push(vec![line]);
        } else if let Some(current) = chunks.last_mut() {
            current.push(line);
        }
    }
    (chunks, &[])
}
