//! Parse node type definitions
//!
//! The parser produces a [`ParseTree`], a tree of [`ParseNode`]s in which
//! every node owns its children. Both output generators walk the same tree,
//! so every piece of information either of them needs (the command a symbol
//! was spelled with, the resolved font, the resolved limits placement) is
//! recorded here at parse time.

use crate::symbols::{
    AccentKind, AtomClass, DelimSize, FractionKind, MathStyle, MathVariant, SpaceWidth, StackKind,
};
use crate::types::{ErrorLocationProvider, SourceLocation};
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use strum::{AsRefStr, Display, EnumDiscriminants, EnumString};

/// The result of a successful parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree {
    /// Top-level row of the expression.
    pub root: ParseNodeRow,
    /// Whether the expression was parsed in display style.
    pub display_style: bool,
}

/// A node of the abstract syntax tree.
#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(vis(pub))]
#[strum_discriminants(doc = "Discriminant type for runtime type checking of parse nodes")]
#[strum_discriminants(derive(Display, Hash, AsRefStr), strum(serialize_all = "lowercase"))]
#[strum_discriminants(name(NodeType))]
pub enum ParseNode {
    /// A single symbol: letter, digit, punctuation or table symbol
    Character(ParseNodeCharacter),
    /// Named operator such as `\sin` or `\operatorname{sgn}`
    Operator(ParseNodeOperator),
    /// `\text`-family content
    Text(ParseNodeText),
    /// Braced group
    Row(ParseNodeRow),
    /// Generalized fraction
    Fraction(Box<ParseNodeFraction>),
    /// Square root or n-th root
    Sqrt(Box<ParseNodeSqrt>),
    /// Base with superscript and/or subscript
    SupSub(Box<ParseNodeSupSub>),
    /// Accented base
    Accent(Box<ParseNodeAccent>),
    /// Explicit space
    Space(ParseNodeSpace),
    /// Font change
    Font(ParseNodeFont),
    /// Math style change
    Styling(ParseNodeStyling),
    /// `\left ... \right` pair
    LeftRight(ParseNodeLeftRight),
    /// `\big`-family delimiter
    BigDelimiter(ParseNodeBigDelimiter),
    /// `\mathrel{..}` and friends
    Class(Box<ParseNodeClass>),
    /// `\overset`, `\underset`, `\stackrel`
    Stack(Box<ParseNodeStack>),
    /// Matrix or array environment
    Array(ParseNodeArray),
}

impl ParseNode {
    /// Discriminant of this node.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.into()
    }

    /// Spacing class of the atom this node forms inside a row.
    #[must_use]
    pub fn atom_class(&self) -> AtomClass {
        match self {
            Self::Character(node) => node.class,
            Self::Operator(_) => AtomClass::Op,
            Self::Fraction(node) if node.kind.is_binomial() => AtomClass::Inner,
            Self::SupSub(node) => node.base.atom_class(),
            Self::Accent(node) if node.kind.takes_limits() => AtomClass::Op,
            Self::LeftRight(_) => AtomClass::Inner,
            Self::BigDelimiter(node) => node.class,
            Self::Class(node) => node.class,
            Self::Stack(node) if node.kind == StackKind::Stackrel => AtomClass::Rel,
            _ => AtomClass::Ord,
        }
    }

    /// Whether this node is explicit glue rather than an atom.
    #[must_use]
    pub const fn is_space(&self) -> bool {
        matches!(self, Self::Space(_))
    }

    /// Whether a following `\limits` or `\nolimits` may apply to this node.
    #[must_use]
    pub fn is_operator(&self) -> bool {
        match self {
            Self::Operator(_) => true,
            Self::Character(node) => node.class == AtomClass::Op,
            Self::Class(node) => node.class == AtomClass::Op,
            Self::Accent(node) => node.kind.takes_limits(),
            _ => false,
        }
    }

    /// Whether scripts on this node go above and below in display style.
    #[must_use]
    pub fn display_limits(&self) -> bool {
        match self {
            Self::Operator(node) => node.limits,
            Self::Character(node) => {
                node.class == AtomClass::Op && crate::symbols::symbol_takes_limits(node.ch)
            }
            Self::Class(node) => node.class == AtomClass::Op,
            Self::Accent(node) => node.kind.takes_limits(),
            _ => false,
        }
    }
}

/// A single symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeCharacter {
    /// The Unicode character shown.
    pub ch: char,
    /// Spacing class.
    pub class: AtomClass,
    /// Font variant in effect, or `None` for the renderer's default.
    pub variant: Option<MathVariant>,
    /// Table command the symbol was spelled with, e.g. `\leq`.
    pub command: Option<&'static str>,
    /// Whether `variant` came from a styled plane-1 character typed directly
    /// rather than from an enclosing font command.
    pub styled_input: bool,
    /// For `\not` negations, the relation that was negated.
    pub negation_of: Option<Box<ParseNodeCharacter>>,
    /// Source span.
    pub loc: Option<SourceLocation>,
}

impl ParseNodeCharacter {
    /// A plain symbol with no font and no table command.
    #[must_use]
    pub const fn new(ch: char, class: AtomClass, loc: Option<SourceLocation>) -> Self {
        Self {
            ch,
            class,
            variant: None,
            command: None,
            styled_input: false,
            negation_of: None,
            loc,
        }
    }
}

impl ErrorLocationProvider for ParseNodeCharacter {
    fn loc(&self) -> Option<&SourceLocation> {
        self.loc.as_ref()
    }
}

/// A named operator.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeOperator {
    /// Text of the operator name, e.g. `lim sup`.
    pub name: String,
    /// Table command, or `None` for `\operatorname{..}`.
    pub command: Option<&'static str>,
    /// Whether scripts go above and below in display style.
    pub limits: bool,
    /// `\operatorname*`
    pub starred: bool,
    /// Source span.
    pub loc: Option<SourceLocation>,
}

impl ErrorLocationProvider for ParseNodeOperator {
    fn loc(&self) -> Option<&SourceLocation> {
        self.loc.as_ref()
    }
}

/// `\text`-family content.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeText {
    /// The text, with `~` already turned into a no-break space.
    pub text: String,
    /// Font of the text, `None` for upright roman.
    pub variant: Option<MathVariant>,
    /// The command used, e.g. `\mbox`.
    pub command: &'static str,
    /// Source span.
    pub loc: Option<SourceLocation>,
}

impl ErrorLocationProvider for ParseNodeText {
    fn loc(&self) -> Option<&SourceLocation> {
        self.loc.as_ref()
    }
}

/// Ordered list of nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseNodeRow {
    /// Child nodes.
    pub body: Vec<ParseNode>,
}

impl ParseNodeRow {
    /// A row holding `body`.
    #[must_use]
    pub const fn new(body: Vec<ParseNode>) -> Self {
        Self { body }
    }

    /// Whether the row has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Generalized fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeFraction {
    /// Fraction flavour.
    pub kind: FractionKind,
    /// Command used, e.g. `\over`.
    pub command: &'static str,
    /// Numerator.
    pub numer: ParseNode,
    /// Denominator.
    pub denom: ParseNode,
}

/// Square root or n-th root.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeSqrt {
    /// Radicand.
    pub body: ParseNode,
    /// Root index from the optional argument.
    pub index: Option<ParseNode>,
}

/// Base with scripts.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeSupSub {
    /// Nucleus; an empty row when the scripts had nothing to attach to.
    pub base: ParseNode,
    /// Superscript, including any primes.
    pub sup: Option<ParseNode>,
    /// Subscript.
    pub sub: Option<ParseNode>,
    /// Whether the scripts are placed above and below.
    pub limits: bool,
    /// `Some(true)` for `\limits`, `Some(false)` for `\nolimits`.
    pub explicit_limits: Option<bool>,
}

/// Accent or over/under decoration.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeAccent {
    /// Accent flavour.
    pub kind: AccentKind,
    /// Command used, e.g. `\widehat`.
    pub command: &'static str,
    /// Accented base.
    pub base: ParseNode,
}

/// Explicit space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseNodeSpace {
    /// Width of the space.
    pub width: SpaceWidth,
    /// How the space was written: a command such as `\,` or `~`.
    pub command: &'static str,
}

/// Font change.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeFont {
    /// The font selected.
    pub variant: MathVariant,
    /// Command used, e.g. `\mathbf` or `\bf`.
    pub command: &'static str,
    /// Whether this is an old-style switch lasting to the end of the group.
    pub is_switch: bool,
    /// Content set in the font.
    pub body: ParseNodeRow,
}

/// Math style change such as `\displaystyle`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeStyling {
    /// The style selected.
    pub style: MathStyle,
    /// Content set in the style.
    pub body: ParseNodeRow,
}

/// A delimiter after `\left`, `\right` or a `\big` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter {
    /// Character drawn, `None` for the empty delimiter `.`.
    pub ch: Option<char>,
    /// Spelling in the delimiter table, e.g. `\langle` or `(`.
    pub name: &'static str,
}

/// `\left ... \right` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeLeftRight {
    /// Opening delimiter.
    pub left: Delimiter,
    /// Closing delimiter.
    pub right: Delimiter,
    /// Enclosed content.
    pub body: ParseNodeRow,
}

/// `\big`-family sized delimiter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseNodeBigDelimiter {
    /// Size of the delimiter.
    pub size: DelimSize,
    /// Spacing class, from the `l`/`r`/`m` suffix.
    pub class: AtomClass,
    /// Command used, e.g. `\bigl`.
    pub command: &'static str,
    /// The delimiter.
    pub delimiter: Delimiter,
}

/// Content with an explicit spacing class.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeClass {
    /// Spacing class forced on the content.
    pub class: AtomClass,
    /// Command used, e.g. `\mathrel`.
    pub command: &'static str,
    /// Content.
    pub body: ParseNode,
}

/// Stacked construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeStack {
    /// Stack flavour.
    pub kind: StackKind,
    /// Command used.
    pub command: &'static str,
    /// The small annotation set above or below.
    pub annotation: ParseNode,
    /// The base.
    pub base: ParseNode,
}

/// Supported environments, named as written in `\begin{..}`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
pub enum Environment {
    #[strum(serialize = "matrix")]
    Matrix,
    #[strum(serialize = "pmatrix")]
    PMatrix,
    #[strum(serialize = "bmatrix")]
    BMatrix,
    #[strum(serialize = "Bmatrix")]
    BraceMatrix,
    #[strum(serialize = "vmatrix")]
    VMatrix,
    #[strum(serialize = "Vmatrix")]
    DoubleVMatrix,
    #[strum(serialize = "smallmatrix")]
    SmallMatrix,
    #[strum(serialize = "cases")]
    Cases,
    #[strum(serialize = "array")]
    Array,
}

impl Environment {
    /// Fences drawn around the table.
    #[must_use]
    pub const fn fences(self) -> (Option<char>, Option<char>) {
        match self {
            Self::PMatrix => (Some('('), Some(')')),
            Self::BMatrix => (Some('['), Some(']')),
            Self::BraceMatrix => (Some('{'), Some('}')),
            Self::VMatrix => (Some('|'), Some('|')),
            Self::DoubleVMatrix => (Some('\u{2016}'), Some('\u{2016}')),
            Self::Cases => (Some('{'), None),
            Self::Matrix | Self::SmallMatrix | Self::Array => (None, None),
        }
    }

    /// Style of the cells.
    #[must_use]
    pub const fn cell_style(self) -> MathStyle {
        match self {
            Self::SmallMatrix => MathStyle::Script,
            _ => MathStyle::Text,
        }
    }
}

/// Horizontal alignment of a table column.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ColumnAlign {
    Left,
    Center,
    Right,
}

/// Matrix or array environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeArray {
    /// Environment name.
    pub environment: Environment,
    /// Column alignments, one per column.
    pub columns: Vec<ColumnAlign>,
    /// Column specification as written, for `array` only.
    pub column_spec: Option<String>,
    /// Cells, row by row.
    pub rows: Vec<Vec<ParseNodeRow>>,
}
