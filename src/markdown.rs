//! Markdown page building.
//!
//! Each documented object becomes a sequence of Markdown blocks (headings,
//! paragraphs, fenced code, tag lists). A page is its blocks separated by
//! blank lines.

use crate::docparse::{DocstringParser, ParsedDocstring};
use crate::doctags::{DocTag, TagKind};
use crate::error::{DocError, Result};
use crate::inventory::{DocObject, ModuleInventory, ObjectKind};
use crate::selection::{is_protected, select_targets, Retention};
use crate::tag_renderer::TagRenderer;
use log::{debug, info};

/// Page layout switches.
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    /// Omit the module-level docstring from the page
    pub skip_module_docstring: bool,
    /// Document methods inherited from base classes
    pub include_inherited: bool,
    /// Tag kinds left out of the rendered pages
    pub hidden_tags: Vec<TagKind>,
}

/// Documentation of one module: a single page, or one page per output group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleDocs {
    Single(String),
    Grouped(Vec<GroupPage>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPage {
    pub group: String,
    pub text: String,
}

/// Builder for Markdown API documentation.
pub struct MarkdownBuilder {
    parser: Box<dyn DocstringParser>,
    renderer: Box<dyn TagRenderer>,
    options: PageOptions,
}

impl MarkdownBuilder {
    pub fn new(parser: Box<dyn DocstringParser>, renderer: Box<dyn TagRenderer>) -> Self {
        Self {
            parser,
            renderer,
            options: PageOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PageOptions) -> Self {
        self.options = options;
        self
    }

    /// Document a module's selected targets.
    ///
    /// Without output groups, classes come first and then functions. With
    /// groups, each page holds the group's members in declared order.
    ///
    /// # Errors
    ///
    /// Propagates target selection failures and docstring parse failures.
    pub fn document_module(
        &mut self,
        module: &ModuleInventory,
        retention: &Retention,
    ) -> Result<ModuleDocs> {
        let targets = select_targets(module.targets()?, retention)?;

        let mut header = vec![format!("# Package {} Documentation", module.name)];
        if !self.options.skip_module_docstring {
            if let Some(doc) = module.docstring.as_deref().filter(|d| !d.trim().is_empty()) {
                header.push(doc.trim_end().to_string());
            }
        }

        match retention.groups() {
            None => {
                let (classes, others): (Vec<&DocObject>, Vec<&DocObject>) = targets
                    .into_iter()
                    .partition(|t| t.kind == ObjectKind::Class);
                let mut blocks = header;
                for target in classes.into_iter().chain(others) {
                    blocks.extend(self.document_target(target)?);
                }
                Ok(ModuleDocs::Single(page(&blocks)))
            }
            Some(groups) => {
                let mut pages = Vec::with_capacity(groups.len());
                for group in groups {
                    debug!("Documenting group {}", group.name);
                    let mut blocks = header.clone();
                    for name in &group.members {
                        if let Some(target) = targets.iter().find(|t| &t.name == name) {
                            blocks.extend(self.document_target(target)?);
                        }
                    }
                    pages.push(GroupPage {
                        group: group.name.clone(),
                        text: page(&blocks),
                    });
                }
                Ok(ModuleDocs::Grouped(pages))
            }
        }
    }

    fn document_target(&mut self, target: &DocObject) -> Result<Vec<String>> {
        if target.kind == ObjectKind::Class {
            self.document_class(target)
        } else {
            self.document_callable(target)
        }
    }

    /// Blocks documenting one class: its docstring, then its callables, then
    /// nested classes.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::ClassReturnTag`] if the class docstring declares a
    /// return value.
    pub fn document_class(&mut self, cls: &DocObject) -> Result<Vec<String>> {
        info!("Processing class: {}", cls.name);

        let mut blocks = vec![format!("## Class {}", cls.name)];
        if let Some(parsed) = self.parser.parse_optional(cls.docstring.as_deref())? {
            if let Some(ret) = &parsed.returns {
                return Err(DocError::ClassReturnTag {
                    class: cls.name.clone(),
                    tag: DocTag::Return(ret.clone()).to_string(),
                });
            }
            if !parsed.description.is_empty() {
                blocks.push(parsed.description.clone());
            }
            blocks.extend(tag_sections(
                self.renderer.as_ref(),
                &self.options.hidden_tags,
                parsed,
            ));
        }

        let include_inherited = self.options.include_inherited;
        let members = cls.members.iter().filter(|m| !is_protected(&m.name));
        let (nested, callables): (Vec<&DocObject>, Vec<&DocObject>) =
            members.partition(|m| m.kind == ObjectKind::Class);

        for member in callables {
            let documented = match member.kind {
                ObjectKind::Property => true,
                _ => include_inherited || !member.inherited,
            };
            if documented {
                blocks.extend(self.document_callable(member)?);
            } else {
                debug!("Skipping inherited member {}.{}", cls.name, member.name);
            }
        }
        for class in nested {
            blocks.extend(self.document_class(class)?);
        }
        Ok(blocks)
    }

    /// Blocks documenting one function, method or property.
    pub fn document_callable(&mut self, f: &DocObject) -> Result<Vec<String>> {
        debug!("Processing function: {}", f.name);

        let params = match f.kind {
            ObjectKind::Property => "(self)",
            _ => f.signature.as_deref().unwrap_or("()"),
        };
        let signature = format!("```python\ndef {}{}\n```", f.name, params);

        let mut blocks = vec![format!("### {}", f.name.replace('_', "\\_"))];
        match self.parser.parse_optional(f.docstring.as_deref())? {
            Some(parsed) => {
                if !parsed.description.is_empty() {
                    blocks.push(parsed.description.clone());
                }
                blocks.push(signature);
                blocks.extend(tag_sections(
                    self.renderer.as_ref(),
                    &self.options.hidden_tags,
                    parsed,
                ));
            }
            None => blocks.push(signature),
        }
        Ok(blocks)
    }
}

/// Parameters, return, raises and examples sections for a parsed docstring.
fn tag_sections(
    renderer: &dyn TagRenderer,
    hidden: &[TagKind],
    parsed: &ParsedDocstring,
) -> Vec<String> {
    let shown = |kind: TagKind| !hidden.contains(&kind);
    let mut sections = Vec::new();

    if shown(TagKind::Param) && !parsed.params.is_empty() {
        let lines: Vec<String> = parsed.params.iter().map(|t| renderer.render_param(t)).collect();
        sections.push(section("Parameters", &lines));
    }
    if let Some(ret) = parsed.returns.as_ref().filter(|_| shown(TagKind::Return)) {
        sections.push(section("Returns", &[renderer.render_return(ret)]));
    }
    if shown(TagKind::Raise) && !parsed.raises.is_empty() {
        let lines: Vec<String> = parsed.raises.iter().map(|t| renderer.render_error(t)).collect();
        sections.push(section("Raises", &lines));
    }
    if let Some(examples) = parsed.examples.as_ref().filter(|e| !e.is_empty()) {
        sections.push(format!("**Example(s):**\n\n{}", examples.join("\n\n")));
    }
    sections
}

fn section(title: &str, lines: &[String]) -> String {
    format!("**{}:**\n\n{}", title, lines.join("\n"))
}

fn page(blocks: &[String]) -> String {
    let mut text = blocks.join("\n\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docparse::RstDocstringParser;
    use crate::selection::parse_groups;
    use crate::tag_renderer::MdTagRenderer;
    use pretty_assertions::assert_eq;

    fn builder() -> MarkdownBuilder {
        MarkdownBuilder::new(Box::new(RstDocstringParser::new()), Box::new(MdTagRenderer))
    }

    fn object(name: &str, kind: ObjectKind, docstring: Option<&str>) -> DocObject {
        DocObject {
            name: name.to_string(),
            kind,
            docstring: docstring.map(String::from),
            signature: None,
            inherited: false,
            members: Vec::new(),
        }
    }

    fn sample_module() -> ModuleInventory {
        let mut double = object(
            "double_it",
            ObjectKind::Function,
            Some("Computes a value.\n\n:param int x: the input\n:return int: doubled value\n"),
        );
        double.signature = Some("(x)".to_string());

        let mut widget = object(
            "Widget",
            ObjectKind::Class,
            Some("A widget.\n\n:param int size: edge length"),
        );
        let mut resize = object("resize", ObjectKind::Method, Some("Resize the widget."));
        resize.signature = Some("(self, size)".to_string());
        let mut inherited = object("describe", ObjectKind::Method, Some("Inherited."));
        inherited.inherited = true;
        let area = object("area", ObjectKind::Property, Some("Area of the widget."));
        let hidden = object("_cache", ObjectKind::Method, None);
        widget.members = vec![resize, inherited, area, hidden];

        ModuleInventory {
            name: "mypkg".to_string(),
            docstring: Some("Package docs.".to_string()),
            exports: None,
            members: vec![double, widget],
        }
    }

    #[test]
    fn test_document_callable() {
        let module = sample_module();
        let blocks = builder().document_callable(&module.members[0]).unwrap();
        assert_eq!(
            page(&blocks),
            "### double\\_it\n\n\
             Computes a value.\n\n\
             ```python\ndef double_it(x)\n```\n\n\
             **Parameters:**\n\n- `x` -- `int`: the input\n\n\
             **Returns:**\n\n`int`: doubled value\n"
        );
    }

    #[test]
    fn test_callable_without_docstring() {
        let f = object("noop", ObjectKind::Function, None);
        let blocks = builder().document_callable(&f).unwrap();
        assert_eq!(blocks, vec!["### noop".to_string(), "```python\ndef noop()\n```".to_string()]);
    }

    #[test]
    fn test_document_class_members() {
        let module = sample_module();
        let text = page(&builder().document_class(&module.members[1]).unwrap());
        assert!(text.starts_with(
            "## Class Widget\n\nA widget.\n\n**Parameters:**\n\n- `size` -- `int`: edge length"
        ));
        assert!(text.contains("### resize"));
        assert!(text.contains("def resize(self, size)"));
        assert!(text.contains("### area"));
        assert!(text.contains("def area(self)"));
        assert!(!text.contains("describe"));
        assert!(!text.contains("cache"));
    }

    #[test]
    fn test_inherited_members_when_requested() {
        let module = sample_module();
        let mut builder = builder().with_options(PageOptions {
            include_inherited: true,
            ..PageOptions::default()
        });
        let text = page(&builder.document_class(&module.members[1]).unwrap());
        assert!(text.contains("### describe"));
    }

    #[test]
    fn test_class_with_return_tag_is_rejected() {
        let cls = object("Bad", ObjectKind::Class, Some("Bad class.\n\n:return int: nothing"));
        let err = builder().document_class(&cls).unwrap_err();
        assert!(matches!(err, DocError::ClassReturnTag { class, .. } if class == "Bad"));
    }

    #[test]
    fn test_module_page_orders_classes_first() {
        let docs = builder().document_module(&sample_module(), &Retention::All).unwrap();
        let text = match docs {
            ModuleDocs::Single(text) => text,
            other => panic!("Expected a single page, got {:?}", other),
        };
        assert!(text.starts_with(
            "# Package mypkg Documentation\n\nPackage docs.\n\n## Class Widget"
        ));
        let class_at = text.find("## Class Widget").unwrap();
        let func_at = text.find("### double\\_it").unwrap();
        assert!(class_at < func_at);
    }

    #[test]
    fn test_skip_module_docstring() {
        let mut builder = builder().with_options(PageOptions {
            skip_module_docstring: true,
            ..PageOptions::default()
        });
        match builder.document_module(&sample_module(), &Retention::All).unwrap() {
            ModuleDocs::Single(text) => assert!(!text.contains("Package docs.")),
            other => panic!("Expected a single page, got {:?}", other),
        }
    }

    #[test]
    fn test_grouped_pages() {
        let specs = ["funcs=double_it".to_string(), "types=Widget".to_string()];
        let groups = parse_groups(&specs).unwrap();
        let retention = Retention::from_options(&[], &[], groups).unwrap();
        let docs = builder().document_module(&sample_module(), &retention).unwrap();
        let pages = match docs {
            ModuleDocs::Grouped(pages) => pages,
            other => panic!("Expected grouped pages, got {:?}", other),
        };
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].group, "funcs");
        assert!(pages[0].text.contains("### double\\_it"));
        assert!(!pages[0].text.contains("## Class Widget"));
        assert_eq!(pages[1].group, "types");
        assert!(pages[1].text.starts_with("# Package mypkg Documentation"));
        assert!(pages[1].text.contains("## Class Widget"));
    }

    #[test]
    fn test_hidden_tags_are_omitted() {
        let module = sample_module();
        let mut builder = builder().with_options(PageOptions {
            hidden_tags: vec![TagKind::Param],
            ..PageOptions::default()
        });
        let text = page(&builder.document_callable(&module.members[0]).unwrap());
        assert!(!text.contains("**Parameters:**"));
        assert!(text.contains("**Returns:**"));
    }

    #[test]
    fn test_examples_section() {
        let f = object(
            "run",
            ObjectKind::Function,
            Some(concat!(
                "Run it.\n\n:param str cmd: command\n\n",
                ":Example:\n\n.. code-block:: python\n\n    run('ls')\n"
            )),
        );
        let text = page(&builder().document_callable(&f).unwrap());
        assert!(text.ends_with("**Example(s):**\n\n```python\nrun('ls')\n```\n"));
    }

    #[test]
    fn test_parse_error_propagates() {
        let f = object("bad", ObjectKind::Function, Some("Bad.\n\n:return int: a\n:return int: b"));
        let err = builder().document_callable(&f).unwrap_err();
        assert!(matches!(err, DocError::MultipleReturnTags { .. }));
    }
}
