//! Recursive-descent parser
//!
//! The parser walks the token list produced by [`crate::lexer`] with a
//! single token of lookahead and builds a [`ParseTree`]. It stops at the
//! first error; there is no recovery.
//!
//! # Structure
//!
//! - A *row* is a maximal run of atoms, ended by `}`, `&`, `\\`, `\end`,
//!   `\right`, end of input, or `]` inside an optional argument. The caller
//!   that opened the row decides whether the token that ended it is legal.
//! - An *atom* is a nucleus followed by any number of `^`, `_`, primes and
//!   `\limits`/`\nolimits`.
//! - A *nucleus* is a character, a braced group, or a command together with
//!   its arguments.
//!
//! Legacy texvc shorthands such as `\R` are spliced into the token list as
//! their expansion the first time the parser looks at them.

use crate::lexer::tokenize;
use crate::symbols::{
    AtomClass, COMMANDS, CommandKind, DELIMITERS, FractionKind, MathStyle, MathVariant, NEGATIONS,
    StackKind, TEXVC_ALIASES, char_class, lookup_command, lookup_command_entry,
};
use crate::types::{ParseError, ParseErrorKind, SourceLocation, Token, TokenKind};
use crate::wide_character::split_styled_char;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::mem;
use core::str::FromStr as _;

pub mod parse_node;
pub use parse_node::{
    ColumnAlign, Delimiter, Environment, NodeType, ParseNode, ParseNodeAccent, ParseNodeArray,
    ParseNodeBigDelimiter, ParseNodeCharacter, ParseNodeClass, ParseNodeFont, ParseNodeFraction,
    ParseNodeLeftRight, ParseNodeOperator, ParseNodeRow, ParseNodeSpace, ParseNodeSqrt,
    ParseNodeStack, ParseNodeStyling, ParseNodeSupSub, ParseNodeText, ParseTree,
};

/// Deepest nesting of groups, arguments and environments accepted.
pub const MAX_NESTING: usize = 64;

/// What the current row is nested in, which decides the tokens that may end it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowEnd {
    /// The whole expression
    Top,
    /// A braced group
    Group,
    /// A bracketed optional argument
    Optional,
    /// An environment cell
    Cell,
    /// A `\left ... \right` body
    LeftRight,
}

fn is_row_terminator(token: &Token) -> bool {
    token.is_command_named("\\\\") || token.is_command_named("\\cr")
}

fn is_row_end(token: &Token, end: RowEnd) -> bool {
    match token.kind {
        TokenKind::EndOfInput | TokenKind::EndGroup | TokenKind::Alignment => true,
        TokenKind::ControlWord | TokenKind::ControlSymbol => {
            is_row_terminator(token)
                || token.is_command_named("\\end")
                || token.is_command_named("\\right")
        }
        TokenKind::Character => end == RowEnd::Optional && token.is_char(']'),
        TokenKind::BeginGroup | TokenKind::Superscript | TokenKind::Subscript => false,
    }
}

/// Wraps a node as a row unless it already is one.
fn into_row(node: ParseNode) -> ParseNodeRow {
    match node {
        ParseNode::Row(row) => row,
        other => ParseNodeRow::new(vec![other]),
    }
}

/// Collapses a list of script items into a single node.
fn script_node(mut items: Vec<ParseNode>) -> ParseNode {
    if items.len() == 1
        && let Some(item) = items.pop()
    {
        return item;
    }
    ParseNode::Row(ParseNodeRow::new(items))
}

fn prime(loc: Option<SourceLocation>) -> ParseNode {
    let mut node = ParseNodeCharacter::new('\u{2032}', AtomClass::Ord, loc);
    node.command = Some("\\prime");
    ParseNode::Character(node)
}

/// Parses a token list into a [`ParseTree`].
///
/// The token list should come from [`crate::lexer::tokenize`] and end with
/// [`TokenKind::EndOfInput`].
///
/// # Errors
///
/// Returns the first syntax error found.
///
/// # Examples
///
/// ```
/// use blahtex::lexer::tokenize;
/// use blahtex::parser::{ParseNode, parse};
///
/// let tree = parse(tokenize(r"\frac{1}{2}"), false).unwrap();
/// assert!(matches!(tree.root.body[0], ParseNode::Fraction(_)));
///
/// let err = parse(tokenize(r"\unknown{1}"), false).unwrap_err();
/// assert_eq!(err.code(), "UnrecognisedCommand");
/// assert_eq!(err.args(), [r"\unknown"]);
/// ```
pub fn parse(tokens: Vec<Token>, display_style: bool) -> Result<ParseTree, ParseError> {
    Parser::new(tokens, display_style).parse()
}

/// The parser state.
///
/// Besides the token cursor, the parser tracks the font and math style in
/// effect, since characters record their resolved font and operators record
/// where their limits go.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    display_style: bool,
    /// Math style in effect
    style: MathStyle,
    /// Font in effect, `None` for the default
    variant: Option<MathVariant>,
    depth: usize,
}

impl Parser {
    /// Creates a parser over `tokens`.
    #[must_use]
    pub fn new(mut tokens: Vec<Token>, display_style: bool) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::EndOfInput) {
            let end = tokens.last().map_or_else(
                || SourceLocation::new(Arc::from(""), 0, 0),
                |t| SourceLocation::new(Arc::clone(&t.loc.input), t.loc.end, t.loc.end),
            );
            tokens.push(Token::new(TokenKind::EndOfInput, String::new(), end));
        }
        Self {
            tokens,
            pos: 0,
            display_style,
            style: if display_style {
                MathStyle::Display
            } else {
                MathStyle::Text
            },
            variant: None,
            depth: 0,
        }
    }

    /// Returns the lookahead token.
    ///
    /// texvc shorthands are expanded in place before they are returned, and
    /// a control symbol made of a backslash and any whitespace character is
    /// normalized to `\ `.
    pub fn fetch(&mut self) -> &Token {
        self.expand_lookahead();
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    /// Advances past the lookahead token. `EndOfInput` is never consumed.
    pub fn consume(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn expand_lookahead(&mut self) {
        let Some(token) = self.tokens.get_mut(self.pos) else {
            return;
        };
        match token.kind {
            TokenKind::ControlSymbol
                if token.text != "\\ " && token.text[1..].starts_with(char::is_whitespace) =>
            {
                "\\ ".clone_into(&mut token.text);
            }
            TokenKind::ControlWord if !COMMANDS.contains_key(token.text.as_str()) => {
                let Some(expansion) = TEXVC_ALIASES.get(token.text.as_str()) else {
                    return;
                };
                let alias = token.clone();
                let mut replacement = tokenize(expansion);
                replacement.pop();
                for (i, spliced) in replacement.iter_mut().enumerate() {
                    spliced.loc = alias.loc.clone();
                    spliced.space_before = i == 0 && alias.space_before;
                }
                self.tokens.splice(self.pos..=self.pos, replacement);
            }
            _ => {}
        }
    }

    fn enter(&mut self, token: &Token) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ParseError::with_token(
                ParseErrorKind::NestingTooDeep { limit: MAX_NESTING },
                token,
            ));
        }
        Ok(())
    }

    const fn leave(&mut self) {
        self.depth -= 1;
    }

    fn with_style<T, F>(&mut self, style: MathStyle, f: F) -> Result<T, ParseError>
    where
        F: FnOnce(&mut Self) -> Result<T, ParseError>,
    {
        let saved = mem::replace(&mut self.style, style);
        let result = f(self);
        self.style = saved;
        result
    }

    fn with_variant<T, F>(&mut self, variant: MathVariant, f: F) -> Result<T, ParseError>
    where
        F: FnOnce(&mut Self) -> Result<T, ParseError>,
    {
        let saved = self.variant.replace(variant);
        let result = f(self);
        self.variant = saved;
        result
    }

    /// Parses the whole token list.
    ///
    /// # Errors
    ///
    /// Returns the first syntax error found.
    pub fn parse(&mut self) -> Result<ParseTree, ParseError> {
        let root = self.parse_row(RowEnd::Top)?;
        let stop = self.fetch().clone();
        if stop.kind != TokenKind::EndOfInput {
            return Err(self.row_end_error(&stop, RowEnd::Top, &stop));
        }
        Ok(ParseTree {
            root,
            display_style: self.display_style,
        })
    }

    /// Error for a row of kind `end`, opened by `open`, that stopped at
    /// `stop` instead of its proper closing token.
    fn row_end_error(&mut self, stop: &Token, end: RowEnd, open: &Token) -> ParseError {
        let kind = match stop.kind {
            TokenKind::EndOfInput => {
                let kind = match end {
                    RowEnd::LeftRight => ParseErrorKind::UnmatchedLeft,
                    RowEnd::Optional => ParseErrorKind::MissingArgument {
                        command: open.text.clone(),
                    },
                    RowEnd::Top | RowEnd::Group | RowEnd::Cell => {
                        ParseErrorKind::UnmatchedOpenBrace
                    }
                };
                return ParseError::with_token(kind, open);
            }
            _ if end == RowEnd::LeftRight => {
                return ParseError::with_token(ParseErrorKind::UnmatchedLeft, open);
            }
            TokenKind::EndGroup => ParseErrorKind::UnmatchedCloseBrace,
            TokenKind::Alignment => ParseErrorKind::MisplacedAlignment,
            _ if stop.is_command_named("\\right") => ParseErrorKind::UnmatchedRight,
            _ if stop.is_command_named("\\end") => {
                if end == RowEnd::Group {
                    return ParseError::with_token(ParseErrorKind::UnmatchedOpenBrace, open);
                }
                self.consume();
                ParseErrorKind::UnmatchedEnd {
                    name: self.parse_environment_name("\\end").unwrap_or_default(),
                }
            }
            _ => ParseErrorKind::MisplacedRowTerminator {
                command: stop.text.clone(),
            },
        };
        ParseError::with_token(kind, stop)
    }

    /// Parses atoms up to the next token that ends a row of kind `end`.
    ///
    /// Font and style switches take the rest of the row as their body. An
    /// infix command turns the row into a single fraction.
    fn parse_row(&mut self, end: RowEnd) -> Result<ParseNodeRow, ParseError> {
        let mut body = Vec::new();
        let mut infix = None;
        loop {
            let token = self.fetch().clone();
            if is_row_end(&token, end) {
                break;
            }
            if token.is_command()
                && let Some((command, spec)) = lookup_command_entry(&token.text)
            {
                match spec.kind {
                    CommandKind::Infix(kind) => {
                        if infix.is_some() {
                            return Err(ParseError::with_token(
                                ParseErrorKind::AmbiguousInfix {
                                    command: token.text.clone(),
                                },
                                &token,
                            ));
                        }
                        self.consume();
                        infix = Some((kind, command, body.len()));
                        continue;
                    }
                    CommandKind::FontSwitch(variant) => {
                        self.consume();
                        self.enter(&token)?;
                        let rest = self.with_variant(variant, |p| p.parse_row(end));
                        self.leave();
                        body.push(ParseNode::Font(ParseNodeFont {
                            variant,
                            command,
                            is_switch: true,
                            body: rest?,
                        }));
                        break;
                    }
                    CommandKind::Style(style) => {
                        self.consume();
                        self.enter(&token)?;
                        let rest = self.with_style(style, |p| p.parse_row(end));
                        self.leave();
                        body.push(ParseNode::Styling(ParseNodeStyling { style, body: rest? }));
                        break;
                    }
                    _ => {}
                }
            }
            body.push(self.parse_atom()?);
        }

        if let Some((kind, command, split)) = infix {
            let denom = body.split_off(split);
            body = vec![ParseNode::Fraction(Box::new(ParseNodeFraction {
                kind,
                command,
                numer: ParseNode::Row(ParseNodeRow::new(body)),
                denom: ParseNode::Row(ParseNodeRow::new(denom)),
            }))];
        }
        Ok(ParseNodeRow::new(body))
    }

    /// Parses a nucleus and the scripts attached to it.
    fn parse_atom(&mut self) -> Result<ParseNode, ParseError> {
        let first = self.fetch().clone();
        let base = if matches!(first.kind, TokenKind::Superscript | TokenKind::Subscript)
            || first.is_char('\'')
        {
            None
        } else {
            Some(self.parse_nucleus()?)
        };

        let mut sup: Option<Vec<ParseNode>> = None;
        let mut caret_seen = false;
        let mut sub = None;
        let mut explicit_limits = None;
        loop {
            let token = self.fetch().clone();
            if let Some(CommandKind::Limits(limits)) =
                lookup_command(&token.text).filter(|_| token.is_command()).map(|s| s.kind)
            {
                if !base.as_ref().is_some_and(ParseNode::is_operator) {
                    return Err(ParseError::with_token(
                        ParseErrorKind::MisplacedLimits {
                            command: token.text.clone(),
                        },
                        &token,
                    ));
                }
                self.consume();
                explicit_limits = Some(limits);
                continue;
            }
            match token.kind {
                TokenKind::Superscript => {
                    if caret_seen {
                        return Err(ParseError::with_token(
                            ParseErrorKind::DoubleSuperscript,
                            &token,
                        ));
                    }
                    self.consume();
                    let script = self.parse_script(&token)?;
                    sup.get_or_insert_with(Vec::new).push(script);
                    caret_seen = true;
                }
                TokenKind::Subscript => {
                    if sub.is_some() {
                        return Err(ParseError::with_token(
                            ParseErrorKind::DoubleSubscript,
                            &token,
                        ));
                    }
                    self.consume();
                    sub = Some(self.parse_script(&token)?);
                }
                TokenKind::Character if token.is_char('\'') => {
                    if sup.is_some() {
                        return Err(ParseError::with_token(
                            ParseErrorKind::DoubleSuperscript,
                            &token,
                        ));
                    }
                    let mut primes = Vec::new();
                    while self.fetch().is_char('\'') {
                        let loc = self.fetch().loc.clone();
                        self.consume();
                        primes.push(prime(Some(loc)));
                    }
                    sup = Some(primes);
                }
                _ => break,
            }
        }

        let Some(base) = base else {
            return Ok(self.attach_scripts(
                ParseNode::Row(ParseNodeRow::default()),
                sup,
                sub,
                explicit_limits,
            ));
        };
        if sup.is_none() && sub.is_none() {
            return Ok(base);
        }
        Ok(self.attach_scripts(base, sup, sub, explicit_limits))
    }

    fn attach_scripts(
        &self,
        base: ParseNode,
        sup: Option<Vec<ParseNode>>,
        sub: Option<ParseNode>,
        explicit_limits: Option<bool>,
    ) -> ParseNode {
        let always = matches!(&base, ParseNode::Accent(accent) if accent.kind.takes_limits());
        let limits = explicit_limits
            .unwrap_or_else(|| always || (self.style == MathStyle::Display && base.display_limits()));
        ParseNode::SupSub(Box::new(ParseNodeSupSub {
            base,
            sup: sup.map(script_node),
            sub,
            limits,
            explicit_limits,
        }))
    }

    fn parse_script(&mut self, marker: &Token) -> Result<ParseNode, ParseError> {
        let style = self.style.script();
        self.with_style(style, |p| p.parse_argument(&marker.text))
    }

    /// Parses a required argument: a braced group or a single token.
    fn parse_argument(&mut self, command: &str) -> Result<ParseNode, ParseError> {
        let token = self.fetch().clone();
        let missing = match token.kind {
            TokenKind::EndOfInput
            | TokenKind::EndGroup
            | TokenKind::Alignment
            | TokenKind::Superscript
            | TokenKind::Subscript => true,
            TokenKind::ControlWord | TokenKind::ControlSymbol => {
                is_row_end(&token, RowEnd::Group)
            }
            TokenKind::Character | TokenKind::BeginGroup => false,
        };
        if missing {
            return Err(ParseError::with_token(
                ParseErrorKind::MissingArgument {
                    command: command.to_owned(),
                },
                &token,
            ));
        }
        self.parse_nucleus()
    }

    fn parse_nucleus(&mut self) -> Result<ParseNode, ParseError> {
        let token = self.fetch().clone();
        self.enter(&token)?;
        let result = match token.kind {
            TokenKind::BeginGroup => self.parse_group(),
            TokenKind::Character => {
                self.consume();
                self.parse_character(&token)
            }
            TokenKind::ControlWord | TokenKind::ControlSymbol => {
                self.consume();
                self.parse_command(&token)
            }
            TokenKind::EndGroup => Err(ParseError::with_token(
                ParseErrorKind::UnmatchedCloseBrace,
                &token,
            )),
            TokenKind::Alignment => Err(ParseError::with_token(
                ParseErrorKind::MisplacedAlignment,
                &token,
            )),
            TokenKind::EndOfInput | TokenKind::Superscript | TokenKind::Subscript => {
                Err(ParseError::with_token(
                    ParseErrorKind::MissingArgument {
                        command: token.text.clone(),
                    },
                    &token,
                ))
            }
        };
        self.leave();
        result
    }

    fn parse_group(&mut self) -> Result<ParseNode, ParseError> {
        let open = self.fetch().clone();
        self.consume();
        let body = self.parse_row(RowEnd::Group)?;
        let close = self.fetch().clone();
        if close.kind != TokenKind::EndGroup {
            return Err(self.row_end_error(&close, RowEnd::Group, &open));
        }
        self.consume();
        Ok(ParseNode::Row(body))
    }

    fn parse_character(&self, token: &Token) -> Result<ParseNode, ParseError> {
        let loc = Some(token.loc.clone());
        let Some(ch) = token.as_char() else {
            return Err(ParseError::with_token(
                ParseErrorKind::MissingArgument {
                    command: token.text.clone(),
                },
                token,
            ));
        };
        match ch {
            '~' => {
                return Ok(ParseNode::Space(ParseNodeSpace {
                    width: crate::symbols::SpaceWidth::Interword,
                    command: "~",
                }));
            }
            '\'' => return Ok(prime(loc)),
            _ => {}
        }
        if let Some((letter, variant)) = split_styled_char(ch) {
            let mut node = ParseNodeCharacter::new(letter, AtomClass::Ord, loc);
            node.variant = Some(variant);
            node.styled_input = true;
            return Ok(ParseNode::Character(node));
        }
        let class = char_class(ch).filter(|_| !ch.is_control()).ok_or_else(|| {
            ParseError::with_token(ParseErrorKind::IllegalCharacter { character: ch }, token)
        })?;
        let mut node = ParseNodeCharacter::new(ch, class, loc);
        node.variant = self.variant;
        Ok(ParseNode::Character(node))
    }

    /// Parses a command whose token has just been consumed.
    #[allow(clippy::too_many_lines)]
    fn parse_command(&mut self, token: &Token) -> Result<ParseNode, ParseError> {
        if token.text == "\\" {
            return Err(ParseError::with_token(
                ParseErrorKind::IllegalFinalBackslash,
                token,
            ));
        }
        let Some((command, spec)) = lookup_command_entry(&token.text) else {
            return Err(ParseError::with_token(
                ParseErrorKind::UnrecognisedCommand {
                    command: token.text.clone(),
                },
                token,
            ));
        };
        let loc = Some(token.loc.clone());

        let node = match spec.kind {
            CommandKind::Symbol(ch) => {
                let mut node = ParseNodeCharacter::new(ch, spec.class, loc);
                node.variant = self.variant;
                node.command = Some(command);
                ParseNode::Character(node)
            }
            CommandKind::Operator { name, limits } => ParseNode::Operator(ParseNodeOperator {
                name: name.to_owned(),
                command: Some(command),
                limits,
                starred: false,
                loc,
            }),
            CommandKind::Fraction(kind) => self.parse_fraction(kind, command)?,
            CommandKind::Sqrt => self.parse_sqrt(token, command)?,
            CommandKind::Accent(kind) => ParseNode::Accent(Box::new(ParseNodeAccent {
                kind,
                command,
                base: self.parse_argument(command)?,
            })),
            CommandKind::Space(width) => ParseNode::Space(ParseNodeSpace { width, command }),
            CommandKind::FontArg(variant) => {
                let body = self.with_variant(variant, |p| p.parse_argument(command))?;
                ParseNode::Font(ParseNodeFont {
                    variant,
                    command,
                    is_switch: false,
                    body: into_row(body),
                })
            }
            // A switch in argument position has nothing left to apply to.
            CommandKind::FontSwitch(variant) => ParseNode::Font(ParseNodeFont {
                variant,
                command,
                is_switch: true,
                body: ParseNodeRow::default(),
            }),
            CommandKind::Style(style) => ParseNode::Styling(ParseNodeStyling {
                style,
                body: ParseNodeRow::default(),
            }),
            CommandKind::Text(variant) => ParseNode::Text(ParseNodeText {
                text: self.parse_text_argument(command, true)?,
                variant,
                command,
                loc,
            }),
            CommandKind::OperatorName => {
                let starred = self.fetch().is_char('*');
                if starred {
                    self.consume();
                }
                ParseNode::Operator(ParseNodeOperator {
                    name: self.parse_text_argument(command, false)?,
                    command: None,
                    limits: starred,
                    starred,
                    loc,
                })
            }
            CommandKind::Class(class) => ParseNode::Class(Box::new(ParseNodeClass {
                class,
                command,
                body: self.parse_argument(command)?,
            })),
            CommandKind::Infix(_) => {
                return Err(ParseError::with_token(
                    ParseErrorKind::AmbiguousInfix {
                        command: token.text.clone(),
                    },
                    token,
                ));
            }
            CommandKind::Stack(kind) => self.parse_stack(kind, command)?,
            CommandKind::BigDelimiter(size) => ParseNode::BigDelimiter(ParseNodeBigDelimiter {
                size,
                class: spec.class,
                command,
                delimiter: self.parse_delimiter(command)?,
            }),
            CommandKind::Left => self.parse_left_right(token, command)?,
            CommandKind::Right => {
                return Err(ParseError::with_token(ParseErrorKind::UnmatchedRight, token));
            }
            CommandKind::Begin => self.parse_environment(token)?,
            CommandKind::End => {
                let name = self.parse_environment_name(command).unwrap_or_default();
                return Err(ParseError::with_token(
                    ParseErrorKind::UnmatchedEnd { name },
                    token,
                ));
            }
            CommandKind::Limits(_) => {
                return Err(ParseError::with_token(
                    ParseErrorKind::MisplacedLimits {
                        command: token.text.clone(),
                    },
                    token,
                ));
            }
            CommandKind::RowTerminator => {
                return Err(ParseError::with_token(
                    ParseErrorKind::MisplacedRowTerminator {
                        command: token.text.clone(),
                    },
                    token,
                ));
            }
            CommandKind::Not => self.parse_negation(token)?,
        };
        Ok(node)
    }

    fn parse_fraction(
        &mut self,
        kind: FractionKind,
        command: &'static str,
    ) -> Result<ParseNode, ParseError> {
        let style = kind.forced_style().unwrap_or(self.style).fraction();
        let numer = self.with_style(style, |p| p.parse_argument(command))?;
        let denom = self.with_style(style, |p| p.parse_argument(command))?;
        Ok(ParseNode::Fraction(Box::new(ParseNodeFraction {
            kind,
            command,
            numer,
            denom,
        })))
    }

    /// `\sqrt`, with an optional bracketed index set in scriptscript style.
    fn parse_sqrt(&mut self, token: &Token, command: &'static str) -> Result<ParseNode, ParseError> {
        let index = if self.fetch().is_char('[') {
            self.consume();
            let row = self.with_style(MathStyle::ScriptScript, |p| p.parse_row(RowEnd::Optional))?;
            let close = self.fetch().clone();
            if !close.is_char(']') {
                return Err(self.row_end_error(&close, RowEnd::Optional, token));
            }
            self.consume();
            Some(ParseNode::Row(row))
        } else {
            None
        };
        let body = self.parse_argument(command)?;
        Ok(ParseNode::Sqrt(Box::new(ParseNodeSqrt { body, index })))
    }

    fn parse_stack(&mut self, kind: StackKind, command: &'static str) -> Result<ParseNode, ParseError> {
        let style = self.style.script();
        let annotation = self.with_style(style, |p| p.parse_argument(command))?;
        let base = self.parse_argument(command)?;
        Ok(ParseNode::Stack(Box::new(ParseNodeStack {
            kind,
            command,
            annotation,
            base,
        })))
    }

    fn parse_left_right(&mut self, token: &Token, command: &'static str) -> Result<ParseNode, ParseError> {
        let left = self.parse_delimiter(command)?;
        let body = self.parse_row(RowEnd::LeftRight)?;
        let stop = self.fetch().clone();
        if !stop.is_command_named("\\right") {
            return Err(self.row_end_error(&stop, RowEnd::LeftRight, token));
        }
        self.consume();
        let right = self.parse_delimiter("\\right")?;
        Ok(ParseNode::LeftRight(ParseNodeLeftRight { left, right, body }))
    }

    /// `\not` followed by a relation with a precomposed negated form.
    fn parse_negation(&mut self, not: &Token) -> Result<ParseNode, ParseError> {
        let target = self.fetch().clone();
        let base = match target.kind {
            TokenKind::Character => target
                .as_char()
                .and_then(|ch| Some(ParseNodeCharacter::new(ch, char_class(ch)?, None))),
            TokenKind::ControlWord | TokenKind::ControlSymbol => lookup_command_entry(&target.text)
                .and_then(|(command, spec)| match spec.kind {
                    CommandKind::Symbol(ch) => {
                        let mut node = ParseNodeCharacter::new(ch, spec.class, None);
                        node.command = Some(command);
                        Some(node)
                    }
                    _ => None,
                }),
            _ => None,
        };
        let Some((mut base, negated)) = base.and_then(|base| {
            let ch = base.ch;
            NEGATIONS.get(&ch).map(move |negated| (base, *negated))
        }) else {
            let kind = if target.kind == TokenKind::EndOfInput {
                ParseErrorKind::MissingArgument {
                    command: not.text.clone(),
                }
            } else {
                ParseErrorKind::IllegalNegation {
                    target: target.text.clone(),
                }
            };
            return Err(ParseError::with_token(kind, &target));
        };
        self.consume();
        base.loc = Some(target.loc.clone());
        let mut node = ParseNodeCharacter::new(
            negated,
            AtomClass::Rel,
            SourceLocation::range(Some(&not.loc), Some(&target.loc)),
        );
        node.negation_of = Some(Box::new(base));
        Ok(ParseNode::Character(node))
    }

    fn parse_delimiter(&mut self, command: &str) -> Result<Delimiter, ParseError> {
        let token = self.fetch().clone();
        if matches!(token.kind, TokenKind::EndOfInput | TokenKind::EndGroup) {
            return Err(ParseError::with_token(
                ParseErrorKind::MissingDelimiter {
                    command: command.to_owned(),
                },
                &token,
            ));
        }
        let Some((name, ch)) = DELIMITERS.get_entry(token.text.as_str()) else {
            return Err(ParseError::with_token(
                ParseErrorKind::IllegalDelimiter {
                    command: command.to_owned(),
                    delimiter: token.text.clone(),
                },
                &token,
            ));
        };
        self.consume();
        Ok(Delimiter { ch: *ch, name: *name })
    }

    /// Reads the raw text of a braced argument made of characters only, as
    /// used by `\begin`, `\end` and array column specifications.
    fn parse_raw_group(&mut self, command: &str) -> Result<String, ParseError> {
        let open = self.fetch().clone();
        if open.kind != TokenKind::BeginGroup {
            return Err(ParseError::with_token(
                ParseErrorKind::MissingArgument {
                    command: command.to_owned(),
                },
                &open,
            ));
        }
        self.consume();
        let mut text = String::new();
        loop {
            let token = self.fetch().clone();
            match token.kind {
                TokenKind::EndGroup => {
                    self.consume();
                    return Ok(text);
                }
                TokenKind::EndOfInput => {
                    return Err(ParseError::with_token(
                        ParseErrorKind::UnmatchedOpenBrace,
                        &open,
                    ));
                }
                _ => {
                    text.push_str(&token.text);
                    self.consume();
                }
            }
        }
    }

    fn parse_environment_name(&mut self, command: &str) -> Result<String, ParseError> {
        self.parse_raw_group(command)
    }

    fn parse_environment(&mut self, begin: &Token) -> Result<ParseNode, ParseError> {
        let name = self.parse_environment_name("\\begin")?;
        let environment = Environment::from_str(&name).map_err(|_| {
            ParseError::with_token(
                ParseErrorKind::UnrecognisedEnvironment { name: name.clone() },
                begin,
            )
        })?;

        let mut column_spec = None;
        let mut columns = Vec::new();
        if environment == Environment::Array {
            let spec = self.parse_raw_group("\\begin")?;
            for ch in spec.chars() {
                match ch {
                    'l' => columns.push(ColumnAlign::Left),
                    'c' => columns.push(ColumnAlign::Center),
                    'r' => columns.push(ColumnAlign::Right),
                    '|' => {}
                    _ => {
                        columns.clear();
                        break;
                    }
                }
            }
            if columns.is_empty() {
                return Err(ParseError::with_token(
                    ParseErrorKind::InvalidColumnSpec { spec },
                    begin,
                ));
            }
            column_spec = Some(spec);
        }

        let mut rows = Vec::new();
        let mut row = Vec::new();
        loop {
            let cell = self.with_style(environment.cell_style(), |p| p.parse_row(RowEnd::Cell))?;
            row.push(cell);
            let stop = self.fetch().clone();
            match stop.kind {
                TokenKind::Alignment => self.consume(),
                _ if is_row_terminator(&stop) => {
                    self.consume();
                    rows.push(mem::take(&mut row));
                }
                _ if stop.is_command_named("\\end") => {
                    rows.push(mem::take(&mut row));
                    break;
                }
                TokenKind::EndOfInput => {
                    return Err(ParseError::with_token(
                        ParseErrorKind::UnmatchedBegin { name },
                        begin,
                    ));
                }
                TokenKind::EndGroup => {
                    return Err(ParseError::with_token(
                        ParseErrorKind::UnmatchedCloseBrace,
                        &stop,
                    ));
                }
                _ => {
                    return Err(ParseError::with_token(ParseErrorKind::UnmatchedRight, &stop));
                }
            }
        }

        let end = self.fetch().clone();
        self.consume();
        let end_name = self.parse_environment_name("\\end")?;
        if end_name != name {
            return Err(ParseError::with_token(
                ParseErrorKind::MismatchedBeginAndEnd {
                    begin: name,
                    end: end_name,
                },
                &end,
            ));
        }

        // A row terminator just before \end does not start a new row.
        if rows.len() > 1
            && rows
                .last()
                .is_some_and(|last: &Vec<ParseNodeRow>| last.len() == 1 && last[0].is_empty())
        {
            rows.pop();
        }

        let expected = if environment == Environment::Array {
            columns.len()
        } else {
            rows.first().map_or(0, Vec::len)
        };
        if let Some(bad) = rows.iter().find(|row| row.len() != expected) {
            return Err(ParseError::with_token(
                ParseErrorKind::InconsistentColumnCount {
                    expected,
                    found: bad.len(),
                },
                begin,
            ));
        }
        if environment != Environment::Array {
            let align = if environment == Environment::Cases {
                ColumnAlign::Left
            } else {
                ColumnAlign::Center
            };
            columns = vec![align; expected];
        }

        Ok(ParseNode::Array(ParseNodeArray {
            environment,
            columns,
            column_spec,
            rows,
        }))
    }

    /// Reads a `\text`-style argument as plain text.
    ///
    /// Dropped whitespace between tokens comes back as a single space when
    /// `keep_spaces` is set.
    fn parse_text_argument(&mut self, command: &str, keep_spaces: bool) -> Result<String, ParseError> {
        let open = self.fetch().clone();
        let mut text = String::new();
        match open.kind {
            TokenKind::BeginGroup => self.consume(),
            TokenKind::Character | TokenKind::ControlSymbol => {
                self.consume();
                push_text_token(&mut text, &open)?;
                return Ok(text);
            }
            _ => {
                return Err(ParseError::with_token(
                    ParseErrorKind::MissingArgument {
                        command: command.to_owned(),
                    },
                    &open,
                ));
            }
        }

        let mut depth = 0_usize;
        loop {
            let token = self.fetch().clone();
            if keep_spaces && token.space_before && !text.ends_with(' ') {
                text.push(' ');
            }
            match token.kind {
                TokenKind::EndOfInput => {
                    return Err(ParseError::with_token(
                        ParseErrorKind::UnmatchedOpenBrace,
                        &open,
                    ));
                }
                TokenKind::BeginGroup => {
                    self.enter(&token)?;
                    depth += 1;
                    self.consume();
                }
                TokenKind::EndGroup => {
                    self.consume();
                    if depth == 0 {
                        return Ok(text);
                    }
                    self.leave();
                    depth -= 1;
                }
                _ => {
                    self.consume();
                    push_text_token(&mut text, &token)?;
                }
            }
        }
    }
}

/// Appends the text a token stands for inside `\text{..}`.
fn push_text_token(text: &mut String, token: &Token) -> Result<(), ParseError> {
    let kind = match token.kind {
        TokenKind::Superscript | TokenKind::Subscript => {
            text.push_str(&token.text);
            return Ok(());
        }
        TokenKind::Alignment => ParseErrorKind::MisplacedAlignment,
        TokenKind::Character => match token.as_char() {
            Some('~') => {
                text.push('\u{A0}');
                return Ok(());
            }
            Some(ch @ ('$' | '#')) => ParseErrorKind::IllegalCharacter { character: ch },
            Some(ch) if ch.is_control() => ParseErrorKind::IllegalCharacter { character: ch },
            Some(ch) => {
                text.push(ch);
                return Ok(());
            }
            None => return Ok(()),
        },
        TokenKind::ControlSymbol => match token.text.as_str() {
            "\\ " => {
                text.push(' ');
                return Ok(());
            }
            "\\{" | "\\}" | "\\$" | "\\%" | "\\&" | "\\_" | "\\#" => {
                text.push_str(&token.text[1..]);
                return Ok(());
            }
            "\\" => ParseErrorKind::IllegalFinalBackslash,
            "\\\\" => ParseErrorKind::MisplacedRowTerminator {
                command: token.text.clone(),
            },
            _ => ParseErrorKind::UnrecognisedCommand {
                command: token.text.clone(),
            },
        },
        TokenKind::ControlWord => ParseErrorKind::UnrecognisedCommand {
            command: token.text.clone(),
        },
        TokenKind::BeginGroup | TokenKind::EndGroup | TokenKind::EndOfInput => return Ok(()),
    };
    Err(ParseError::with_token(kind, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SpaceWidth;

    fn parse_str(input: &str) -> Result<ParseTree, ParseError> {
        parse(tokenize(input), false)
    }

    fn body(input: &str) -> Vec<ParseNode> {
        parse_str(input).unwrap().root.body
    }

    fn error_code(input: &str) -> &'static str {
        parse_str(input).unwrap_err().code()
    }

    #[test]
    fn test_empty_input() {
        assert!(body("").is_empty());
        assert!(body("  % just a comment").is_empty());
    }

    #[test]
    fn test_scripts_in_either_order() {
        let a = body("x^2_i");
        let b = body("x_i^2");
        assert_eq!(a, b);
        let ParseNode::SupSub(node) = &a[0] else {
            panic!("expected scripts, got {a:?}");
        };
        assert!(node.sup.is_some() && node.sub.is_some());
        assert!(!node.limits);
    }

    #[test]
    fn test_primes_join_superscript() {
        let nodes = body("f'^2");
        let ParseNode::SupSub(node) = &nodes[0] else {
            panic!("expected scripts");
        };
        let Some(ParseNode::Row(sup)) = &node.sup else {
            panic!("expected a row superscript");
        };
        assert_eq!(sup.body.len(), 2);
        assert!(matches!(&sup.body[0], ParseNode::Character(c) if c.ch == '\u{2032}'));
        assert_eq!(error_code("f^2'"), "DoubleSuperscript");
        assert_eq!(error_code("x^1^2"), "DoubleSuperscript");
        assert_eq!(error_code("x_1_2"), "DoubleSubscript");
    }

    #[test]
    fn test_script_without_base() {
        let nodes = body("^2");
        let ParseNode::SupSub(node) = &nodes[0] else {
            panic!("expected scripts");
        };
        assert_eq!(node.base, ParseNode::Row(ParseNodeRow::default()));
    }

    #[test]
    fn test_limits_follow_display_style() {
        let tree = parse(tokenize(r"\sum_{i=1}^n"), true).unwrap();
        let ParseNode::SupSub(node) = &tree.root.body[0] else {
            panic!("expected scripts");
        };
        assert!(node.limits);

        let nodes = body(r"\sum_{i=1}^n");
        assert!(matches!(&nodes[0], ParseNode::SupSub(node) if !node.limits));
        let nodes = body(r"\sum\limits_{i=1}");
        assert!(matches!(&nodes[0], ParseNode::SupSub(node) if node.limits));

        let tree = parse(tokenize(r"\int_0^1"), true).unwrap();
        assert!(matches!(&tree.root.body[0], ParseNode::SupSub(node) if !node.limits));

        assert_eq!(error_code(r"x\limits_2"), "MisplacedLimits");
        assert_eq!(error_code(r"\nolimits"), "MisplacedLimits");
    }

    #[test]
    fn test_braces() {
        assert_eq!(error_code("{x"), "UnmatchedOpenBrace");
        assert_eq!(error_code("x}"), "UnmatchedCloseBrace");
        let err = parse_str("a{b").unwrap_err();
        assert_eq!(err.position, Some(1));
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_str(r"\unknown{1}").unwrap_err();
        assert_eq!(err.code(), "UnrecognisedCommand");
        assert_eq!(err.args(), [r"\unknown"]);
        assert_eq!(error_code("x\\"), "IllegalFinalBackslash");
        assert_eq!(error_code("$x$"), "IllegalCharacter");
    }

    #[test]
    fn test_missing_argument() {
        let err = parse_str(r"\frac{1}").unwrap_err();
        assert_eq!(err.code(), "MissingArgument");
        assert_eq!(err.args(), [r"\frac"]);
        assert_eq!(error_code("x^"), "MissingArgument");
        assert_eq!(error_code(r"\sqrt[3"), "MissingArgument");
    }

    #[test]
    fn test_infix() {
        let nodes = body(r"a+b \over c");
        let ParseNode::Fraction(frac) = &nodes[0] else {
            panic!("expected a fraction");
        };
        assert_eq!(frac.kind, FractionKind::Over);
        assert!(matches!(&frac.numer, ParseNode::Row(row) if row.body.len() == 3));
        assert_eq!(error_code(r"a \over b \over c"), "AmbiguousInfix");
        assert_eq!(error_code(r"a \over b \choose c"), "AmbiguousInfix");
        assert_eq!(nodes.len(), 1);
        assert_eq!(body(r"{a \over b} \over c").len(), 1);
    }

    #[test]
    fn test_left_right() {
        let nodes = body(r"\left( x \right.");
        let ParseNode::LeftRight(node) = &nodes[0] else {
            panic!("expected left/right");
        };
        assert_eq!(node.left.ch, Some('('));
        assert_eq!(node.right.ch, None);
        assert_eq!(error_code(r"\left( x"), "UnmatchedLeft");
        assert_eq!(error_code(r"x \right)"), "UnmatchedRight");
        assert_eq!(error_code(r"\left x \right)"), "IllegalDelimiter");
        assert_eq!(error_code(r"\left"), "MissingDelimiter");
        assert_eq!(error_code(r"\bigl\alpha"), "IllegalDelimiter");
        assert_eq!(error_code(r"{\left( x} \right)"), "UnmatchedLeft");
    }

    #[test]
    fn test_negation() {
        let nodes = body(r"a \not= b");
        let ParseNode::Character(node) = &nodes[1] else {
            panic!("expected a character");
        };
        assert_eq!(node.ch, '\u{2260}');
        assert_eq!(node.negation_of.as_ref().map(|c| c.ch), Some('='));
        assert!(matches!(&body(r"\not\in")[0], ParseNode::Character(c) if c.ch == '\u{2209}'));
        assert_eq!(error_code(r"\not x"), "IllegalNegation");
        assert_eq!(error_code(r"\not"), "MissingArgument");
    }

    #[test]
    fn test_environments() {
        let nodes = body(r"\begin{pmatrix} a & b \\ c & d \\ \end{pmatrix}");
        let ParseNode::Array(array) = &nodes[0] else {
            panic!("expected an array");
        };
        assert_eq!(array.environment, Environment::PMatrix);
        assert_eq!(array.rows.len(), 2);
        assert_eq!(array.columns, [ColumnAlign::Center, ColumnAlign::Center]);

        let nodes = body(r"\begin{array}{l|r} 1 & 2 \end{array}");
        let ParseNode::Array(array) = &nodes[0] else {
            panic!("expected an array");
        };
        assert_eq!(array.columns, [ColumnAlign::Left, ColumnAlign::Right]);
        assert_eq!(array.column_spec.as_deref(), Some("l|r"));

        let err = parse_str(r"\begin{matrix} a & b \\ c \end{matrix}").unwrap_err();
        assert_eq!(err.code(), "InconsistentColumnCount");
        assert_eq!(err.args(), ["2", "1"]);
        assert_eq!(error_code(r"\begin{align} x \end{align}"), "UnrecognisedEnvironment");
        assert_eq!(error_code(r"\begin{matrix} x"), "UnmatchedBegin");
        assert_eq!(error_code(r"x \end{matrix}"), "UnmatchedEnd");
        assert_eq!(
            error_code(r"\begin{matrix} x \end{pmatrix}"),
            "MismatchedBeginAndEnd"
        );
        assert_eq!(error_code(r"\begin{array}{lx} x \end{array}"), "InvalidColumnSpec");
        assert_eq!(error_code("a & b"), "MisplacedAlignment");
        assert_eq!(error_code(r"a \\ b"), "MisplacedRowTerminator");
    }

    #[test]
    fn test_font_switch_scopes_to_group() {
        let nodes = body(r"{\bf x} y");
        let ParseNode::Row(group) = &nodes[0] else {
            panic!("expected a group");
        };
        let ParseNode::Font(font) = &group.body[0] else {
            panic!("expected a font switch");
        };
        assert!(font.is_switch);
        assert!(matches!(
            &font.body.body[0],
            ParseNode::Character(c) if c.variant == Some(MathVariant::Bold)
        ));
        assert!(matches!(&nodes[1], ParseNode::Character(c) if c.variant.is_none()));
    }

    #[test]
    fn test_texvc_aliases() {
        let nodes = body(r"\R");
        let ParseNode::Font(font) = &nodes[0] else {
            panic!("expected a font, got {nodes:?}");
        };
        assert_eq!(font.variant, MathVariant::DoubleStruck);
        assert!(matches!(&body(r"\alef")[0], ParseNode::Character(c) if c.command == Some("\\aleph")));
        assert!(matches!(&body(r"\sgn x")[0], ParseNode::Operator(op) if op.name == "sgn"));
    }

    #[test]
    fn test_text() {
        let nodes = body(r"\text{ if  x~is\$} y");
        let ParseNode::Text(text) = &nodes[0] else {
            panic!("expected text");
        };
        assert_eq!(text.text, " if x\u{A0}is$");
        assert_eq!(error_code(r"\text{a & b}"), "MisplacedAlignment");
        assert_eq!(error_code(r"\text{\alpha}"), "UnrecognisedCommand");
    }

    #[test]
    fn test_spaces_and_tilde() {
        let nodes = body(r"a~b\,c");
        assert!(matches!(
            &nodes[1],
            ParseNode::Space(ParseNodeSpace { width: SpaceWidth::Interword, command: "~" })
        ));
        assert!(matches!(
            &nodes[3],
            ParseNode::Space(ParseNodeSpace { width: SpaceWidth::Thin, .. })
        ));
    }

    #[test]
    fn test_plane1_input_splits() {
        let nodes = body("\u{1D538}");
        let ParseNode::Character(node) = &nodes[0] else {
            panic!("expected a character");
        };
        assert_eq!(node.ch, 'A');
        assert_eq!(node.variant, Some(MathVariant::DoubleStruck));
        assert!(node.styled_input);
        assert!(matches!(&body("\u{1F600}")[0], ParseNode::Character(c) if c.ch == '\u{1F600}'));
    }

    #[test]
    fn test_nesting_limit() {
        let braces = |n: usize| "{".repeat(n) + "x" + &"}".repeat(n);
        // The innermost nucleus sits one level below the last brace.
        assert!(parse_str(&braces(MAX_NESTING - 1)).is_ok());
        let err = parse_str(&braces(MAX_NESTING)).unwrap_err();
        assert_eq!(err.code(), "NestingTooDeep");
        assert_eq!(err.args(), vec![MAX_NESTING.to_string()]);

        let lefts = |n: usize| "\\left(".repeat(n) + "x" + &"\\right)".repeat(n);
        assert!(parse_str(&lefts(MAX_NESTING - 1)).is_ok());
        assert_eq!(parse_str(&lefts(MAX_NESTING)).unwrap_err().code(), "NestingTooDeep");

        // Each fraction adds a level for itself and one for its braced numerator.
        let fracs = |n: usize| "\\frac{".repeat(n) + "x" + &"}{1}".repeat(n);
        assert!(parse_str(&fracs((MAX_NESTING - 1) / 2)).is_ok());
        assert_eq!(
            parse_str(&fracs(MAX_NESTING / 2)).unwrap_err().code(),
            "NestingTooDeep"
        );
    }
}
