//! Embedded block extraction from component markup.
//!
//! Component files are parsed with tree-sitter's HTML grammar, which recovers
//! from the malformed markup that is common in templates. Every element that
//! matches a [`BlockSelector`] yields an [`EmbeddedBlock`] carrying the exact
//! source text between its start and end tags together with the number of
//! newlines that precede that text. Offsets come from the parser's own source
//! positions, so identical blocks in one file each get their own offset.

use std::ops::Range;
use thiserror::Error;
use tree_sitter::{Node, Parser};

/// Selects which elements of a document are style blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSelector {
    /// Element name, compared case-insensitively.
    pub element: String,
    /// Attribute the element must carry.
    pub attribute: String,
    /// Required attribute value. `None` only requires the attribute to be present.
    pub value: Option<String>,
}

impl BlockSelector {
    pub fn new(element: impl Into<String>, attribute: impl Into<String>, value: Option<String>) -> Self {
        Self {
            element: element.into(),
            attribute: attribute.into(),
            value,
        }
    }

    fn matches_tag(&self, tag_name: &str) -> bool {
        tag_name.eq_ignore_ascii_case(&self.element)
    }

    fn matches_attributes(&self, attributes: &[(String, String)]) -> bool {
        attributes.iter().any(|(name, value)| {
            name.eq_ignore_ascii_case(&self.attribute) && self.value.as_deref().is_none_or(|expected| value == expected)
        })
    }
}

impl Default for BlockSelector {
    /// `<style lang="scss">`
    fn default() -> Self {
        Self::new("style", "lang", Some("scss".to_string()))
    }
}

/// A style fragment found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedBlock {
    /// Raw text between the start and end tag, untrimmed.
    pub content: String,
    /// Number of `\n` characters in the document before the first character of `content`.
    pub line_offset: usize,
    /// Byte range of `content` in the document.
    pub byte_range: Range<usize>,
    /// Attributes of the start tag in source order. Valueless attributes map to "".
    pub attributes: Vec<(String, String)>,
}

impl EmbeddedBlock {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Reasons a document yields no blocks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(String),
    #[error("markup parser failed: {0}")]
    Parser(String),
    #[error("<{element}> element on line {line} has no closing tag")]
    UnclosedElement { element: String, line: usize },
}

/// Extract blocks from raw file bytes.
pub fn extract_blocks_from_bytes(bytes: &[u8], selector: &BlockSelector) -> Result<Vec<EmbeddedBlock>, ExtractError> {
    let content = std::str::from_utf8(bytes).map_err(|e| ExtractError::InvalidUtf8(e.to_string()))?;
    extract_blocks(content, selector)
}

/// Extract every block matching `selector`, in document order.
pub fn extract_blocks(content: &str, selector: &BlockSelector) -> Result<Vec<EmbeddedBlock>, ExtractError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_html::LANGUAGE.into())
        .map_err(|e| ExtractError::Parser(e.to_string()))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| ExtractError::Parser("no syntax tree produced".to_string()))?;

    let root = tree.root_node();
    if root.has_error() {
        log::debug!("Recovered from markup syntax errors while looking for <{}> blocks", selector.element);
    }

    let mut extractor = BlockExtractor {
        source: content,
        selector,
        blocks: Vec::new(),
    };
    extractor.visit_node(root)?;
    Ok(extractor.blocks)
}

struct BlockExtractor<'a> {
    source: &'a str,
    selector: &'a BlockSelector,
    blocks: Vec<EmbeddedBlock>,
}

impl<'a> BlockExtractor<'a> {
    fn visit_node(&mut self, node: Node) -> Result<(), ExtractError> {
        // Start tags inside an ERROR node keep their unaliased kind.
        if matches!(node.kind(), "start_tag" | "style_start_tag" | "script_start_tag") {
            self.visit_start_tag(node)?;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit_node(child)?;
        }
        Ok(())
    }

    fn visit_start_tag(&mut self, start_tag: Node) -> Result<(), ExtractError> {
        let Some(tag_name) = self.tag_name(start_tag) else {
            return Ok(());
        };
        if !self.selector.matches_tag(tag_name) {
            return Ok(());
        }

        let attributes = self.attributes(start_tag);
        if !self.selector.matches_attributes(&attributes) {
            return Ok(());
        }

        let unclosed = || ExtractError::UnclosedElement {
            element: tag_name.to_string(),
            line: start_tag.start_position().row + 1,
        };

        // The content extent is only known when the element ends with a real end tag.
        let element = start_tag.parent().filter(|p| !p.is_error()).ok_or_else(unclosed)?;
        let end_tag = last_child_of_kind(element, "end_tag")
            .filter(|end| !end.is_missing() && !end.has_error())
            .ok_or_else(unclosed)?;

        let byte_range = start_tag.end_byte()..end_tag.start_byte();
        let content = &self.source[byte_range.clone()];
        if content.trim().is_empty() {
            log::debug!("Skipping empty <{tag_name}> block on line {}", start_tag.start_position().row + 1);
            return Ok(());
        }

        self.blocks.push(EmbeddedBlock {
            content: content.to_string(),
            line_offset: start_tag.end_position().row,
            byte_range,
            attributes,
        });
        Ok(())
    }

    fn text(&self, node: Node) -> &'a str {
        &self.source[node.byte_range()]
    }

    fn tag_name(&self, start_tag: Node) -> Option<&'a str> {
        let mut cursor = start_tag.walk();
        let name = start_tag
            .named_children(&mut cursor)
            .find(|child| child.kind() == "tag_name")
            .map(|child| self.text(child));
        name
    }

    fn attributes(&self, start_tag: Node) -> Vec<(String, String)> {
        let mut attributes = Vec::new();
        let mut cursor = start_tag.walk();
        for attribute in start_tag.named_children(&mut cursor) {
            if attribute.kind() != "attribute" {
                continue;
            }

            let mut name = None;
            let mut value = String::new();
            let mut attr_cursor = attribute.walk();
            for child in attribute.named_children(&mut attr_cursor) {
                match child.kind() {
                    "attribute_name" => name = Some(self.text(child).to_string()),
                    "attribute_value" => value = self.text(child).to_string(),
                    "quoted_attribute_value" => {
                        value = self
                            .text(child)
                            .trim_matches(|c| c == '"' || c == '\'')
                            .to_string();
                    }
                    _ => {}
                }
            }

            if let Some(name) = name {
                attributes.push((name, value));
            }
        }
        attributes
    }
}

fn last_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).filter(|child| child.kind() == kind).last();
    found
}
