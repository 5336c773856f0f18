//! MathML generation
//!
//! This module turns a [`ParseTree`] into a [`MathDomNode`] tree and
//! serializes it. Every parse node maps onto a small, fixed MathML pattern;
//! the only context threaded through the walk is the current [`MathStyle`],
//! which decides the implicit spacing table and the `scriptlevel` of styled
//! subtrees.
//!
//! Rows are built in two passes. The first pass turns each parse node into an
//! element and records its atom class (merging digit runs into a single
//! `<mn>` on the way). The second pass applies TeX's bin-to-ord rule to the
//! recorded classes and inserts `<mspace>` elements according to
//! [`SpacingControl`].

use crate::mathml_tree::{MathDomNode, MathNode, MathNodeType, SpaceNode, VirtualNode as _};
use crate::parser::{
    ColumnAlign, Environment, ParseNode, ParseNodeAccent, ParseNodeArray,
    ParseNodeCharacter, ParseNodeFraction, ParseNodeLeftRight, ParseNodeStack, ParseNodeSupSub,
    ParseNodeText, ParseTree,
};
use crate::spacing_data::{THINSPACE, resolve_classes, spacing_between};
use crate::symbols::{AtomClass, MathStyle, MathVariant, StackKind};
use crate::types::{
    EncodingOptions, MathmlOptions, ParseError, ParseErrorKind, SpacingControl, code_point_label,
};
use crate::units::make_em;
use crate::wide_character::{is_plane1, styled_char};
use alloc::string::String;
use alloc::vec::Vec;
use phf::phf_set;
use tracing::trace;

/// The MathML namespace written on the `<math>` element.
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Ordinary symbols that are written as `<mo>` rather than `<mi>`.
///
/// ASCII punctuation is always `<mo>`; this set covers the non-ASCII ones.
static ORD_OPERATORS: phf::Set<char> = phf_set! {
    '\u{2200}', // forall
    '\u{2203}', // exists
    '\u{2204}', // nexists
    '\u{AC}',   // neg
    '\u{2032}', // prime
    '\u{2035}', // backprime
    '\u{2026}', // ldots
    '\u{22EF}', // cdots
    '\u{22EE}', // vdots
    '\u{22F1}', // ddots
    '\u{221A}', // surd
    '\u{2201}', // complement
    '\u{2016}', // Vert
};

/// Wraps `body` in an `<mrow>` unless it is a single node.
#[must_use]
pub fn make_row(mut body: Vec<MathDomNode>) -> MathDomNode {
    if body.len() == 1
        && let Some(node) = body.pop()
    {
        node
    } else {
        MathNode::with_children(MathNodeType::Mrow, body).into()
    }
}

/// Builds the MathML element tree for `tree`.
///
/// The result is the content of the `<math>` element: a single element, or an
/// `<mrow>` when the input has several top-level atoms or none.
pub fn build_mathml_tree(
    tree: &ParseTree,
    options: &MathmlOptions,
) -> Result<MathDomNode, ParseError> {
    let builder = MathmlBuilder { options };
    let style = if tree.display_style {
        MathStyle::Display
    } else {
        MathStyle::Text
    };
    Ok(make_row(builder.build_row(&tree.root.body, style)?))
}

/// Builds and serializes the MathML for `tree`.
///
/// With `indented` set, non-token elements put each child on its own line.
///
/// # Examples
///
/// ```
/// use blahtex::build_mathml::build_mathml;
/// use blahtex::lexer::tokenize;
/// use blahtex::parser::parse;
/// use blahtex::{EncodingOptions, MathmlOptions};
///
/// let tree = parse(tokenize(r"\frac{1}{2}"), false).unwrap();
/// let mathml = build_mathml(
///     &tree,
///     &MathmlOptions::default(),
///     &EncodingOptions::default(),
///     false,
/// )
/// .unwrap();
/// assert_eq!(mathml, "<mfrac><mn>1</mn><mn>2</mn></mfrac>");
/// ```
pub fn build_mathml(
    tree: &ParseTree,
    options: &MathmlOptions,
    encoding: &EncodingOptions,
    indented: bool,
) -> Result<String, ParseError> {
    let root = build_mathml_tree(tree, options)?;
    let mut out = String::new();
    root.write_markup(&mut out, encoding, indented.then_some(0))?;
    Ok(out)
}

/// Wraps serialized MathML content in a `<math>` element.
#[must_use]
pub fn mathml_document(inner: &str, display: bool) -> String {
    let display = if display { "block" } else { "inline" };
    format!("<math xmlns=\"{MATHML_NAMESPACE}\" display=\"{display}\">{inner}</math>")
}

/// An element of a row together with its atom class. Glue has no class.
struct Atom {
    class: Option<AtomClass>,
    node: MathDomNode,
}

struct MathmlBuilder<'a> {
    options: &'a MathmlOptions,
}

impl MathmlBuilder<'_> {
    fn build_row(&self, nodes: &[ParseNode], style: MathStyle) -> Result<Vec<MathDomNode>, ParseError> {
        let mut atoms = Vec::with_capacity(nodes.len());
        self.collect_atoms(nodes, style, &mut atoms)?;
        Ok(self.insert_spacing(atoms, style))
    }

    fn collect_atoms(
        &self,
        nodes: &[ParseNode],
        style: MathStyle,
        atoms: &mut Vec<Atom>,
    ) -> Result<(), ParseError> {
        let mut i = 0;
        while i < nodes.len() {
            match &nodes[i] {
                // A switch covers the rest of its row; its characters already
                // carry the variant, so the body joins the enclosing row.
                ParseNode::Font(font) if font.is_switch => {
                    self.collect_atoms(&font.body.body, style, atoms)?;
                }
                ParseNode::Character(ch) if ch.ch.is_ascii_digit() && ch.negation_of.is_none() => {
                    let (number, consumed) = number_run(&nodes[i..]);
                    atoms.push(Atom {
                        class: Some(AtomClass::Ord),
                        node: self.token(MathNodeType::Mn, &number, ch.variant).into(),
                    });
                    i += consumed;
                    continue;
                }
                node @ ParseNode::Space(_) => atoms.push(Atom {
                    class: None,
                    node: self.build_node(node, style)?,
                }),
                node => atoms.push(Atom {
                    class: Some(node.atom_class()),
                    node: self.build_node(node, style)?,
                }),
            }
            i += 1;
        }
        Ok(())
    }

    fn insert_spacing(&self, atoms: Vec<Atom>, style: MathStyle) -> Vec<MathDomNode> {
        let mut classes: Vec<AtomClass> = atoms.iter().filter_map(|atom| atom.class).collect();
        resolve_classes(&mut classes);

        let mut out = Vec::with_capacity(atoms.len());
        let mut resolved = classes.into_iter();
        let mut previous = None;
        for atom in atoms {
            if atom.class.is_some()
                && let Some(class) = resolved.next()
            {
                if let Some(left) = previous
                    && let Some(width) = self.implicit_space(left, class, style)
                {
                    out.push(MathDomNode::Space(SpaceNode::new(width)));
                }
                previous = Some(class);
            }
            out.push(atom.node);
        }
        out
    }

    fn implicit_space(&self, left: AtomClass, right: AtomClass, style: MathStyle) -> Option<f64> {
        let space = spacing_between(left, right, style)?;
        match self.options.spacing_control {
            SpacingControl::Strict => Some(space.to_em()),
            SpacingControl::Moderate => {
                let loose = |class: AtomClass| matches!(class, AtomClass::Op | AtomClass::Punct | AtomClass::Inner);
                (space == THINSPACE && (loose(left) || loose(right))).then(|| space.to_em())
            }
            SpacingControl::Relaxed => None,
        }
    }

    /// The children of an element with an inferred `<mrow>` (`msqrt`,
    /// `mstyle`, `mtd`).
    fn build_inferred(&self, node: &ParseNode, style: MathStyle) -> Result<Vec<MathDomNode>, ParseError> {
        match node {
            ParseNode::Row(row) => self.build_row(&row.body, style),
            node => Ok(vec![self.build_node(node, style)?]),
        }
    }

    fn build_node(&self, node: &ParseNode, style: MathStyle) -> Result<MathDomNode, ParseError> {
        Ok(match node {
            ParseNode::Character(ch) => self.build_character(ch)?.into(),
            ParseNode::Operator(op) => MathNode::with_text(MathNodeType::Mi, op.name.as_str()).into(),
            ParseNode::Text(text) => self.build_text(text)?.into(),
            ParseNode::Row(row) => make_row(self.build_row(&row.body, style)?),
            ParseNode::Fraction(frac) => self.build_fraction(frac, style)?,
            ParseNode::Sqrt(sqrt) => match &sqrt.index {
                Some(index) => MathNode::with_children(
                    MathNodeType::Mroot,
                    vec![
                        self.build_node(&sqrt.body, style)?,
                        self.build_node(index, MathStyle::ScriptScript)?,
                    ],
                )
                .into(),
                None => MathNode::with_children(
                    MathNodeType::Msqrt,
                    self.build_inferred(&sqrt.body, style)?,
                )
                .into(),
            },
            ParseNode::SupSub(supsub) => self.build_supsub(supsub, style)?.into(),
            ParseNode::Accent(accent) => self.build_accent(accent, style)?.into(),
            ParseNode::Space(space) => MathDomNode::Space(SpaceNode::new(space.width.em())),
            ParseNode::Font(font) => make_row(self.build_row(&font.body.body, style)?),
            ParseNode::Styling(styling) => MathNode::with_children(
                MathNodeType::Mstyle,
                self.build_row(&styling.body.body, styling.style)?,
            )
            .attr("displaystyle", bool_attr(styling.style == MathStyle::Display))
            .attr("scriptlevel", styling.style.script_level().to_string())
            .into(),
            ParseNode::LeftRight(left_right) => self.build_left_right(left_right, style)?.into(),
            ParseNode::BigDelimiter(big) => match big.delimiter.ch {
                Some(ch) => {
                    let size = make_em(big.size.em());
                    self.token(MathNodeType::Mo, &String::from(ch), None)
                        .attr("minsize", size.clone())
                        .attr("maxsize", size)
                        .into()
                }
                None => make_row(Vec::new()),
            },
            ParseNode::Class(class) => self.build_node(&class.body, style)?,
            ParseNode::Stack(stack) => self.build_stack(stack, style)?.into(),
            ParseNode::Array(array) => self.build_array(array)?,
        })
    }

    fn build_character(&self, node: &ParseNodeCharacter) -> Result<MathNode, ParseError> {
        if is_plane1(node.ch) && !self.options.allow_plane1 {
            return Err(ParseError::with_token(
                ParseErrorKind::DisallowedPlane1 {
                    code: code_point_label(node.ch),
                },
                node,
            ));
        }
        let element = element_for(node);
        let ch = match (element, node.ch) {
            (MathNodeType::Mo, '-') => '\u{2212}',
            (MathNodeType::Mo, '*') => '\u{2217}',
            (_, ch) => ch,
        };
        // Upright capital Greek, as TeX sets it.
        let variant = node.variant.or_else(|| {
            (element == MathNodeType::Mi && ('\u{391}'..='\u{3A9}').contains(&ch))
                .then_some(MathVariant::Normal)
        });
        let mut mathml = self.token(element, &String::from(ch), variant);
        if element == MathNodeType::Mo && matches!(node.class, AtomClass::Open | AtomClass::Close) {
            mathml.set_attribute("stretchy", "false");
        }
        Ok(mathml)
    }

    fn build_text(&self, node: &ParseNodeText) -> Result<MathNode, ParseError> {
        if !self.options.allow_plane1
            && let Some(ch) = node.text.chars().find(|ch| is_plane1(*ch))
        {
            return Err(ParseError::with_token(
                ParseErrorKind::DisallowedPlane1 {
                    code: code_point_label(ch),
                },
                node,
            ));
        }
        Ok(self.token(MathNodeType::Mtext, &node.text, node.variant))
    }

    /// A token element holding `text` in `variant`.
    fn token(&self, element: MathNodeType, text: &str, variant: Option<MathVariant>) -> MathNode {
        let (text, variant) = self.substitute_plane1(text, variant);
        let mut node = MathNode::with_text(element, text.as_str());
        if element == MathNodeType::Mo && self.options.spacing_control == SpacingControl::Strict {
            node.set_attribute("lspace", "0");
            node.set_attribute("rspace", "0");
        }
        if let Some(variant) = variant {
            for (key, value) in self.font_attributes(element, variant, &text) {
                node.set_attribute(key, value);
            }
        }
        node
    }

    /// Replaces double-struck, script and fraktur text by the plane-1
    /// characters when allowed and every character has one.
    fn substitute_plane1(&self, text: &str, variant: Option<MathVariant>) -> (String, Option<MathVariant>) {
        if self.options.allow_plane1
            && let Some(variant) = variant
            && matches!(
                variant,
                MathVariant::DoubleStruck | MathVariant::Script | MathVariant::Fraktur
            )
            && let Some(styled) = text.chars().map(|ch| styled_char(ch, variant)).collect::<Option<String>>()
        {
            trace!(text, ?variant, "substituting plane-1 characters");
            return (styled, None);
        }
        (String::from(text), variant)
    }

    fn font_attributes(
        &self,
        element: MathNodeType,
        variant: MathVariant,
        text: &str,
    ) -> Vec<(&'static str, &'static str)> {
        let single_identifier = element == MathNodeType::Mi && text.chars().count() == 1;
        let default = if single_identifier {
            MathVariant::Italic
        } else {
            MathVariant::Normal
        };
        if variant == default {
            return Vec::new();
        }
        if !self.options.use_version1_font_attributes {
            return vec![("mathvariant", variant.into())];
        }
        let (weight, shape, family) = match variant {
            MathVariant::Normal => (None, "normal", None),
            MathVariant::Bold => (Some("bold"), "normal", None),
            MathVariant::Italic => (None, "italic", None),
            MathVariant::BoldItalic => (Some("bold"), "italic", None),
            MathVariant::SansSerif => (None, "normal", Some("sans-serif")),
            MathVariant::Monospace => (None, "normal", Some("monospace")),
            other => return vec![("mathvariant", other.into())],
        };
        let default_shape = if single_identifier { "italic" } else { "normal" };
        let mut attributes = Vec::new();
        if let Some(weight) = weight {
            attributes.push(("fontweight", weight));
        }
        if shape != default_shape {
            attributes.push(("fontstyle", shape));
        }
        if let Some(family) = family {
            attributes.push(("fontfamily", family));
        }
        attributes
    }

    fn build_fraction(&self, frac: &ParseNodeFraction, style: MathStyle) -> Result<MathDomNode, ParseError> {
        let style = frac.kind.forced_style().unwrap_or(style);
        let inner = style.fraction();
        let mut mfrac = MathNode::with_children(
            MathNodeType::Mfrac,
            vec![self.build_node(&frac.numer, inner)?, self.build_node(&frac.denom, inner)?],
        );
        if !frac.kind.has_bar() {
            mfrac.set_attribute("linethickness", "0");
        }
        let mut result: MathDomNode = if frac.kind.is_binomial() {
            MathNode::with_children(
                MathNodeType::Mrow,
                vec![
                    self.token(MathNodeType::Mo, "(", None).into(),
                    mfrac.into(),
                    self.token(MathNodeType::Mo, ")", None).into(),
                ],
            )
            .into()
        } else {
            mfrac.into()
        };
        if let Some(forced) = frac.kind.forced_style() {
            result = MathNode::with_children(MathNodeType::Mstyle, vec![result])
                .attr("displaystyle", bool_attr(forced == MathStyle::Display))
                .attr("scriptlevel", "0")
                .into();
        }
        Ok(result)
    }

    fn build_supsub(&self, supsub: &ParseNodeSupSub, style: MathStyle) -> Result<MathNode, ParseError> {
        let mut base = self.build_node(&supsub.base, style)?;
        let script = style.script();
        let sub = supsub.sub.as_ref().map(|sub| self.build_node(sub, script)).transpose()?;
        let sup = supsub.sup.as_ref().map(|sup| self.build_node(sup, script)).transpose()?;

        if supsub.limits
            && supsub.explicit_limits == Some(true)
            && let MathDomNode::Math(operator) = &mut base
            && operator.node_type == MathNodeType::Mo
        {
            operator.set_attribute("movablelimits", "false");
        }

        let (node_type, children) = match (sub, sup, supsub.limits) {
            (Some(sub), Some(sup), true) => (MathNodeType::Munderover, vec![base, sub, sup]),
            (Some(sub), Some(sup), false) => (MathNodeType::Msubsup, vec![base, sub, sup]),
            (Some(sub), None, true) => (MathNodeType::Munder, vec![base, sub]),
            (Some(sub), None, false) => (MathNodeType::Msub, vec![base, sub]),
            (None, Some(sup), true) => (MathNodeType::Mover, vec![base, sup]),
            (None, Some(sup), false) => (MathNodeType::Msup, vec![base, sup]),
            (None, None, _) => (MathNodeType::Mrow, vec![base]),
        };
        Ok(MathNode::with_children(node_type, children))
    }

    fn build_accent(&self, accent: &ParseNodeAccent, style: MathStyle) -> Result<MathNode, ParseError> {
        let base = self.build_node(&accent.base, style)?;
        let mark = self
            .token(MathNodeType::Mo, &String::from(accent.kind.mark()), None)
            .attr("stretchy", bool_attr(accent.kind.is_stretchy()));
        Ok(if accent.kind.is_under() {
            MathNode::with_children(MathNodeType::Munder, vec![base, mark.into()])
                .attr("accentunder", "true")
        } else {
            MathNode::with_children(MathNodeType::Mover, vec![base, mark.into()]).attr("accent", "true")
        })
    }

    fn build_stack(&self, stack: &ParseNodeStack, style: MathStyle) -> Result<MathNode, ParseError> {
        let base = self.build_node(&stack.base, style)?;
        let annotation = self.build_node(&stack.annotation, style.script())?;
        let node_type = match stack.kind {
            StackKind::Overset | StackKind::Stackrel => MathNodeType::Mover,
            StackKind::Underset => MathNodeType::Munder,
        };
        Ok(MathNode::with_children(node_type, vec![base, annotation]))
    }

    fn fence(&self, delimiter: char) -> MathDomNode {
        self.token(MathNodeType::Mo, &String::from(delimiter), None)
            .attr("fence", "true")
            .attr("stretchy", "true")
            .into()
    }

    fn build_left_right(&self, node: &ParseNodeLeftRight, style: MathStyle) -> Result<MathNode, ParseError> {
        let mut children = Vec::with_capacity(node.body.body.len() + 2);
        children.extend(node.left.ch.map(|ch| self.fence(ch)));
        children.extend(self.build_row(&node.body.body, style)?);
        children.extend(node.right.ch.map(|ch| self.fence(ch)));
        Ok(MathNode::with_children(MathNodeType::Mrow, children))
    }

    fn build_array(&self, array: &ParseNodeArray) -> Result<MathDomNode, ParseError> {
        let cell_style = array.environment.cell_style();
        let mut rows = Vec::with_capacity(array.rows.len());
        for row in &array.rows {
            let mut cells = Vec::with_capacity(row.len());
            for cell in row {
                cells.push(
                    MathNode::with_children(MathNodeType::Mtd, self.build_row(&cell.body, cell_style)?)
                        .into(),
                );
            }
            rows.push(MathNode::with_children(MathNodeType::Mtr, cells).into());
        }

        let mut table = MathNode::with_children(MathNodeType::Mtable, rows);
        if array.columns.iter().any(|align| *align != ColumnAlign::Center) {
            let aligns: Vec<&str> = array.columns.iter().map(|align| align.as_ref()).collect();
            table.set_attribute("columnalign", aligns.join(" "));
        }
        if let Some(lines) = array.column_spec.as_deref().and_then(column_lines) {
            table.set_attribute("columnlines", lines);
        }

        let mut table: MathDomNode = table.into();
        if array.environment == Environment::SmallMatrix {
            table = MathNode::with_children(MathNodeType::Mstyle, vec![table])
                .attr("scriptlevel", "1")
                .into();
        }
        Ok(match array.environment.fences() {
            (None, None) => table,
            (left, right) => {
                let mut children = Vec::with_capacity(3);
                children.extend(left.map(|ch| self.fence(ch)));
                children.push(table);
                children.extend(right.map(|ch| self.fence(ch)));
                MathNode::with_children(MathNodeType::Mrow, children).into()
            }
        })
    }
}

/// Element used for a single character.
fn element_for(node: &ParseNodeCharacter) -> MathNodeType {
    if node.negation_of.is_some() {
        return MathNodeType::Mo;
    }
    let ch = node.ch;
    match node.class {
        AtomClass::Ord if ch.is_ascii_digit() => MathNodeType::Mn,
        AtomClass::Ord if ch.is_alphabetic() => MathNodeType::Mi,
        AtomClass::Ord if ch.is_ascii() || ORD_OPERATORS.contains(&ch) => MathNodeType::Mo,
        AtomClass::Ord => MathNodeType::Mi,
        _ => MathNodeType::Mo,
    }
}

/// Collects a number starting at `nodes[0]`: digits in one variant, with a
/// decimal point allowed between two digits.
///
/// Returns the number and how many nodes it spans.
fn number_run(nodes: &[ParseNode]) -> (String, usize) {
    let digit = |node: Option<&ParseNode>| match node {
        Some(ParseNode::Character(ch)) if ch.negation_of.is_none() => Some((ch.ch, ch.variant)),
        _ => None,
    };
    let Some((first, variant)) = digit(nodes.first()) else {
        return (String::new(), 0);
    };
    let mut number = String::from(first);
    let mut i = 1;
    loop {
        match digit(nodes.get(i)) {
            Some((ch, v)) if ch.is_ascii_digit() && v == variant => {
                number.push(ch);
                i += 1;
            }
            Some(('.', v)) if v == variant => match digit(nodes.get(i + 1)) {
                Some((next, v)) if next.is_ascii_digit() && v == variant => {
                    number.push('.');
                    i += 1;
                }
                _ => break,
            },
            _ => break,
        }
    }
    (number, i)
}

/// `columnlines` value for an `array` column specification, if it draws any.
fn column_lines(spec: &str) -> Option<String> {
    let mut lines = Vec::new();
    let mut seen_column = false;
    let mut rule = false;
    for ch in spec.chars() {
        if ch == '|' {
            rule = seen_column;
        } else {
            if seen_column {
                lines.push(if rule { "solid" } else { "none" });
            }
            seen_column = true;
            rule = false;
        }
    }
    lines.contains(&"solid").then(|| lines.join(" "))
}

const fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn mathml_with(input: &str, options: &MathmlOptions) -> Result<String, ParseError> {
        let tree = parse(tokenize(input), false)?;
        build_mathml(&tree, options, &EncodingOptions::default(), false)
    }

    fn mathml(input: &str) -> String {
        mathml_with(input, &MathmlOptions::default()).unwrap()
    }

    #[test]
    fn test_single_atoms() {
        assert_eq!(mathml("x"), "<mi>x</mi>");
        assert_eq!(mathml(""), "<mrow></mrow>");
        assert_eq!(mathml("3.14"), "<mn>3.14</mn>");
        assert_eq!(mathml("\\Gamma"), "<mi mathvariant=\"normal\">\u{393}</mi>");
    }

    #[test]
    fn test_numbers_merge_across_digits_only() {
        assert_eq!(
            mathml("12x"),
            "<mrow><mn>12</mn><mi>x</mi></mrow>"
        );
        assert_eq!(mathml("1."), "<mrow><mn>1</mn><mo>.</mo></mrow>");
    }

    #[test]
    fn test_scripts() {
        assert_eq!(mathml("x^2_i"), "<msubsup><mi>x</mi><mi>i</mi><mn>2</mn></msubsup>");
        let tree = parse(tokenize("\\sum_{i=1}^n"), true).unwrap();
        let out = build_mathml(&tree, &MathmlOptions::default(), &EncodingOptions::default(), false)
            .unwrap();
        assert_eq!(
            out,
            "<munderover><mo>\u{2211}</mo><mrow><mi>i</mi><mo>=</mo><mn>1</mn></mrow><mi>n</mi></munderover>"
        );
        assert_eq!(
            mathml("\\sum_{i}"),
            "<msub><mo>\u{2211}</mo><mi>i</mi></msub>"
        );
    }

    #[test]
    fn test_fractions() {
        assert_eq!(mathml("\\frac{1}{2}"), "<mfrac><mn>1</mn><mn>2</mn></mfrac>");
        assert_eq!(
            mathml("\\binom{n}{k}"),
            "<mrow><mo>(</mo><mfrac linethickness=\"0\"><mi>n</mi><mi>k</mi></mfrac><mo>)</mo></mrow>"
        );
        assert_eq!(
            mathml("\\dfrac{a}{b}"),
            "<mstyle displaystyle=\"true\" scriptlevel=\"0\"><mfrac><mi>a</mi><mi>b</mi></mfrac></mstyle>"
        );
    }

    #[test]
    fn test_operators_and_delimiters() {
        assert_eq!(
            mathml("a-b"),
            "<mrow><mi>a</mi><mo>\u{2212}</mo><mi>b</mi></mrow>"
        );
        assert_eq!(
            mathml("(x)"),
            "<mrow><mo stretchy=\"false\">(</mo><mi>x</mi><mo stretchy=\"false\">)</mo></mrow>"
        );
        assert_eq!(
            mathml("\\left(x\\right."),
            "<mrow><mo fence=\"true\" stretchy=\"true\">(</mo><mi>x</mi></mrow>"
        );
        assert_eq!(mathml("\\sin x"), "<mrow><mi>sin</mi><mi>x</mi></mrow>");
    }

    #[test]
    fn test_spacing_control() {
        let strict = MathmlOptions::builder().spacing_control(SpacingControl::Strict).build();
        assert_eq!(
            mathml_with("a+b", &strict).unwrap(),
            "<mrow><mi>a</mi><mspace width=\"0.2222em\"/><mo lspace=\"0\" rspace=\"0\">+</mo>\
             <mspace width=\"0.2222em\"/><mi>b</mi></mrow>"
        );
        // A leading sign is ordinary, so no space follows it.
        assert_eq!(
            mathml_with("-b", &strict).unwrap(),
            "<mrow><mo lspace=\"0\" rspace=\"0\">\u{2212}</mo><mi>b</mi></mrow>"
        );

        let moderate = MathmlOptions::builder().spacing_control(SpacingControl::Moderate).build();
        assert_eq!(
            mathml_with("a,b", &moderate).unwrap(),
            "<mrow><mi>a</mi><mo>,</mo><mspace width=\"0.1667em\"/><mi>b</mi></mrow>"
        );
        assert_eq!(
            mathml_with("a+b", &moderate).unwrap(),
            "<mrow><mi>a</mi><mo>+</mo><mi>b</mi></mrow>"
        );
        assert_eq!(mathml("a,b"), "<mrow><mi>a</mi><mo>,</mo><mi>b</mi></mrow>");
    }

    #[test]
    fn test_fonts_and_plane1() {
        assert_eq!(mathml("\\mathbb{R}"), "<mi>\u{211D}</mi>");
        assert_eq!(mathml("\\mathbf{x}"), "<mi mathvariant=\"bold\">x</mi>");
        let bmp_only = MathmlOptions::builder().allow_plane1(false).build();
        assert_eq!(
            mathml_with("\\mathbb{R}", &bmp_only).unwrap(),
            "<mi mathvariant=\"double-struck\">R</mi>"
        );
        let err = mathml_with("\u{1F600}", &bmp_only).unwrap_err();
        assert_eq!(err.code(), "DisallowedPlane1");
        assert_eq!(err.args(), vec!["U+1F600".to_owned()]);

        let version1 = MathmlOptions::builder().use_version1_font_attributes(true).build();
        assert_eq!(
            mathml_with("\\mathbf{x}", &version1).unwrap(),
            "<mi fontweight=\"bold\" fontstyle=\"normal\">x</mi>"
        );
        assert_eq!(
            mathml_with("\\mathrm{d}", &version1).unwrap(),
            "<mi fontstyle=\"normal\">d</mi>"
        );
    }

    #[test]
    fn test_font_switch_joins_row() {
        assert_eq!(
            mathml("a{\\bf b c}"),
            "<mrow><mi>a</mi><mrow><mi mathvariant=\"bold\">b</mi><mi mathvariant=\"bold\">c</mi></mrow></mrow>"
        );
    }

    #[test]
    fn test_matrices() {
        assert_eq!(
            mathml("\\begin{pmatrix}a&b\\end{pmatrix}"),
            "<mrow><mo fence=\"true\" stretchy=\"true\">(</mo><mtable><mtr><mtd><mi>a</mi></mtd>\
             <mtd><mi>b</mi></mtd></mtr></mtable><mo fence=\"true\" stretchy=\"true\">)</mo></mrow>"
        );
        assert_eq!(
            mathml("\\begin{array}{l|r}a&b\\end{array}"),
            "<mtable columnalign=\"left right\" columnlines=\"solid\"><mtr><mtd><mi>a</mi></mtd>\
             <mtd><mi>b</mi></mtd></mtr></mtable>"
        );
    }

    #[test]
    fn test_accents_and_roots() {
        assert_eq!(
            mathml("\\hat x"),
            "<mover accent=\"true\"><mi>x</mi><mo stretchy=\"false\">^</mo></mover>"
        );
        assert_eq!(mathml("\\sqrt{x}"), "<msqrt><mi>x</mi></msqrt>");
        assert_eq!(
            mathml("\\sqrt[3]{x}"),
            "<mroot><mi>x</mi><mn>3</mn></mroot>"
        );
    }

    #[test]
    fn test_indented_and_document() {
        let tree = parse(tokenize("x+1"), false).unwrap();
        let out = build_mathml(&tree, &MathmlOptions::default(), &EncodingOptions::default(), true)
            .unwrap();
        assert_eq!(out, "<mrow>\n  <mi>x</mi>\n  <mo>+</mo>\n  <mn>1</mn>\n</mrow>");
        assert_eq!(
            mathml_document("<mi>x</mi>", true),
            "<math xmlns=\"http://www.w3.org/1998/Math/MathML\" display=\"block\"><mi>x</mi></math>"
        );
    }

    #[test]
    fn test_column_lines() {
        assert_eq!(column_lines("|c|c|"), Some("solid".to_owned()));
        assert_eq!(column_lines("ccc"), None);
        assert_eq!(column_lines("c|cc"), Some("solid none".to_owned()));
    }
}
