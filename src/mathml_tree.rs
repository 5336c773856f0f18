//! MathML tree node definitions
//!
//! The generator builds a small element tree and then serializes it in one
//! pass. Character data and attribute values go through
//! [`crate::encoding`] on the way out, so the tree itself always holds plain
//! Unicode text.

use crate::ParseError;
use crate::encoding::encode_into;
use crate::types::EncodingOptions;
use crate::units::make_em;
use alloc::string::String;
use alloc::vec::Vec;
use bon::bon;
use strum::AsRefStr;

/// MathML element names
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum MathNodeType {
    /// `<math>` element
    Math,
    /// `<mtext>` element
    Mtext,
    /// `<mn>` element
    Mn,
    /// `<mo>` element
    Mo,
    /// `<mi>` element
    Mi,
    /// `<mspace>` element
    Mspace,
    /// `<mover>` element
    Mover,
    /// `<munder>` element
    Munder,
    /// `<munderover>` element
    Munderover,
    /// `<msup>` element
    Msup,
    /// `<msub>` element
    Msub,
    /// `<msubsup>` element
    Msubsup,
    /// `<mfrac>` element
    Mfrac,
    /// `<mroot>` element
    Mroot,
    /// `<msqrt>` element
    Msqrt,
    /// `<mtable>` element
    Mtable,
    /// `<mtr>` element
    Mtr,
    /// `<mtd>` element
    Mtd,
    /// `<mrow>` element
    Mrow,
    /// `<mstyle>` element
    Mstyle,
}

impl MathNodeType {
    /// Token elements hold character data and are never broken across lines.
    #[must_use]
    pub const fn is_token(self) -> bool {
        matches!(
            self,
            Self::Mi | Self::Mn | Self::Mo | Self::Mtext | Self::Mspace
        )
    }
}

/// Serialization into MathML markup.
pub trait VirtualNode {
    /// Appends the markup of this node to `out`.
    ///
    /// With `indent` set to the current depth, non-token elements put each
    /// child on its own line, indented by two spaces per level.
    fn write_markup(
        &self,
        out: &mut String,
        encoding: &EncodingOptions,
        indent: Option<usize>,
    ) -> Result<(), ParseError>;
}

/// MathML DOM node
#[derive(Debug, Clone, PartialEq)]
pub enum MathDomNode {
    /// MathML element node
    Math(MathNode),
    /// Text content node
    Text(TextNode),
    /// Space node
    Space(SpaceNode),
}

impl MathDomNode {
    /// The element of this node, if it is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&MathNode> {
        match self {
            Self::Math(node) => Some(node),
            _ => None,
        }
    }
}

impl From<MathNode> for MathDomNode {
    fn from(node: MathNode) -> Self {
        Self::Math(node)
    }
}

impl VirtualNode for MathDomNode {
    fn write_markup(
        &self,
        out: &mut String,
        encoding: &EncodingOptions,
        indent: Option<usize>,
    ) -> Result<(), ParseError> {
        match self {
            Self::Math(node) => node.write_markup(out, encoding, indent),
            Self::Text(node) => node.write_markup(out, encoding, indent),
            Self::Space(node) => node.write_markup(out, encoding, indent),
        }
    }
}

/// General purpose MathML element
#[derive(Debug, Clone, PartialEq)]
pub struct MathNode {
    /// The type of MathML node
    pub node_type: MathNodeType,
    /// Attributes in insertion order
    pub attributes: Vec<(&'static str, String)>,
    /// Child nodes of the MathML node
    pub children: Vec<MathDomNode>,
}

#[bon]
impl MathNode {
    /// Create a new MathNode with the given type
    #[builder]
    pub fn new(
        /// Node type
        node_type: MathNodeType,
        /// Node attributes
        attributes: Option<Vec<(&'static str, String)>>,
        /// Child nodes
        children: Option<Vec<MathDomNode>>,
    ) -> Self {
        Self {
            node_type,
            attributes: attributes.unwrap_or_default(),
            children: children.unwrap_or_default(),
        }
    }

    /// Create a new MathNode with the given type and children
    #[must_use]
    pub const fn with_children(node_type: MathNodeType, children: Vec<MathDomNode>) -> Self {
        Self {
            node_type,
            attributes: Vec::new(),
            children,
        }
    }

    /// Create a token element holding `text`.
    #[must_use]
    pub fn with_text<S: Into<String>>(node_type: MathNodeType, text: S) -> Self {
        Self::with_children(
            node_type,
            vec![MathDomNode::Text(TextNode { text: text.into() })],
        )
    }

    /// Add a child to this node
    pub fn add_child(&mut self, child: MathDomNode) {
        self.children.push(child);
    }

    /// Set an attribute on this node, replacing any previous value.
    pub fn set_attribute<V: Into<String>>(&mut self, key: &'static str, value: V) {
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.attributes.push((key, value));
        }
    }

    /// Builder-style [`MathNode::set_attribute`].
    #[must_use]
    pub fn attr<V: Into<String>>(mut self, key: &'static str, value: V) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Value of attribute `key`, if set.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated character data of this element's text children.
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                MathDomNode::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

impl VirtualNode for MathNode {
    fn write_markup(
        &self,
        out: &mut String,
        encoding: &EncodingOptions,
        indent: Option<usize>,
    ) -> Result<(), ParseError> {
        if let Some(depth) = indent {
            push_indent(out, depth);
        }
        out.push('<');
        out.push_str(self.node_type.as_ref());
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            encode_into(out, value, encoding)?;
            out.push('"');
        }
        out.push('>');

        let break_lines = indent.filter(|_| !self.node_type.is_token() && !self.children.is_empty());
        for child in &self.children {
            if let Some(depth) = break_lines {
                out.push('\n');
                child.write_markup(out, encoding, Some(depth + 1))?;
            } else {
                child.write_markup(out, encoding, None)?;
            }
        }
        if let Some(depth) = break_lines {
            out.push('\n');
            push_indent(out, depth);
        }

        out.push_str("</");
        out.push_str(self.node_type.as_ref());
        out.push('>');
        Ok(())
    }
}

/// Text node for MathML content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    /// The text content of the node
    pub text: String,
}

impl VirtualNode for TextNode {
    fn write_markup(
        &self,
        out: &mut String,
        encoding: &EncodingOptions,
        indent: Option<usize>,
    ) -> Result<(), ParseError> {
        if let Some(depth) = indent {
            push_indent(out, depth);
        }
        encode_into(out, &self.text, encoding)
    }
}

/// Explicit horizontal space, rendered as `<mspace>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceNode {
    /// The width of the space in em units
    pub width: f64,
}

impl SpaceNode {
    /// Create a new SpaceNode with the given width
    #[must_use]
    pub const fn new(width: f64) -> Self {
        Self { width }
    }
}

impl VirtualNode for SpaceNode {
    fn write_markup(
        &self,
        out: &mut String,
        _encoding: &EncodingOptions,
        indent: Option<usize>,
    ) -> Result<(), ParseError> {
        if let Some(depth) = indent {
            push_indent(out, depth);
        }
        out.push_str("<mspace width=\"");
        out.push_str(&make_em(self.width));
        out.push_str("\"/>");
        Ok(())
    }
}
