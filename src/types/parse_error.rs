//! Error handling for blahtex
//!
//! Every failure the translator can report is a [`ParseError`]. It carries a
//! stable machine-readable code ([`ParseError::code`]), an ordered list of
//! string arguments ([`ParseError::args`]) and, when the failure can be traced
//! back to the input, the position and length of the offending text.

use crate::types::SourceLocation;
use alloc::boxed::Box;
use alloc::string::{String, ToString as _};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use strum::IntoStaticStr;
use thiserror::Error;

/// Main error type returned by the translator.
///
/// The `Display` implementation renders a human-readable message followed by
/// the surrounding input with the offending span underlined.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("blahtex error: {kind}{context}")]
pub struct ParseError {
    /// Categorised reason for the failure.
    #[source]
    pub kind: Box<ParseErrorKind>,
    /// Byte offset of the offending token, when known.
    pub position: Option<usize>,
    /// Byte length of the offending token, when known.
    pub length: Option<usize>,
    /// Additional context to render alongside the error.
    context: ParseErrorContext,
}

impl ParseError {
    /// Create a new `ParseError` with no location.
    pub fn new<T: Into<ParseErrorKind>>(kind: T) -> Self {
        Self::from_kind(kind.into(), ParseErrorContext::None, None, None)
    }

    /// Create a new `ParseError` located at a token or other span provider.
    pub fn with_token<T: Into<ParseErrorKind>>(kind: T, token: &dyn ErrorLocationProvider) -> Self {
        let mut position = None;
        let mut length = None;
        let context = token.loc().filter(|loc| loc.start() <= loc.end()).map_or(
            ParseErrorContext::None,
            |loc| {
                let start = loc.start();
                let end = loc.end();
                position = Some(start);
                length = Some(end.saturating_sub(start));
                ParseErrorContext::Location(loc.clone())
            },
        );

        Self::from_kind(kind.into(), context, position, length)
    }

    fn from_kind(
        kind: ParseErrorKind,
        context: ParseErrorContext,
        position: Option<usize>,
        length: Option<usize>,
    ) -> Self {
        Self {
            kind: Box::new(kind),
            position,
            length,
            context,
        }
    }

    /// Stable identifier of the failure, e.g. `"UnrecognisedCommand"`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Ordered arguments of the failure, e.g. `["\\unknown"]`.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        self.kind.args()
    }

    /// `code: arg1, arg2` form used by host bindings.
    #[must_use]
    pub fn summary(&self) -> String {
        let args = self.args();
        if args.is_empty() {
            self.code().to_owned()
        } else {
            format!("{}: {}", self.code(), args.join(", "))
        }
    }
}

/// Describes the specific reason for a [`ParseError`].
///
/// The variant name is the stable error code.
#[allow(missing_docs)]
#[derive(Debug, Error, Clone, PartialEq, Eq, IntoStaticStr)]
pub enum ParseErrorKind {
    /// A control word that is not in the command table.
    #[error("Unrecognised command: {command}")]
    UnrecognisedCommand { command: String },
    /// A character that may not appear in math input.
    #[error("Illegal character: '{character}'")]
    IllegalCharacter { character: char },
    /// The input ends with a lone backslash.
    #[error("Input ends with a backslash")]
    IllegalFinalBackslash,
    /// A command was not given all its required arguments.
    #[error("Missing argument for {command}")]
    MissingArgument { command: String },
    /// A `{` without matching `}`.
    #[error("Unmatched open brace")]
    UnmatchedOpenBrace,
    /// A `}` without matching `{`.
    #[error("Unmatched close brace")]
    UnmatchedCloseBrace,
    #[error(r"\left without matching \right")]
    UnmatchedLeft,
    #[error(r"\right without matching \left")]
    UnmatchedRight,
    /// A delimiter command was not followed by a delimiter.
    #[error("Missing delimiter after {command}")]
    MissingDelimiter { command: String },
    /// The token after a delimiter command is not a delimiter.
    #[error("Illegal delimiter '{delimiter}' after {command}")]
    IllegalDelimiter { command: String, delimiter: String },
    #[error("Double superscript")]
    DoubleSuperscript,
    #[error("Double subscript")]
    DoubleSubscript,
    /// Two infix commands (`\over`, `\atop`, `\choose`) in one group.
    #[error("Ambiguous use of {command}")]
    AmbiguousInfix { command: String },
    #[error(r"{command} is allowed only after an operator")]
    MisplacedLimits { command: String },
    /// `\not` followed by something with no negated form.
    #[error(r"Cannot negate '{target}'")]
    IllegalNegation { target: String },
    #[error("Alignment character & outside of an environment")]
    MisplacedAlignment,
    #[error(r"{command} outside of an environment")]
    MisplacedRowTerminator { command: String },
    #[error("Unrecognised environment: {name}")]
    UnrecognisedEnvironment { name: String },
    #[error(r"\begin{{{name}}} without matching \end")]
    UnmatchedBegin { name: String },
    #[error(r"\end{{{name}}} without matching \begin")]
    UnmatchedEnd { name: String },
    #[error(r"\begin{{{begin}}} ended by \end{{{end}}}")]
    MismatchedBeginAndEnd { begin: String, end: String },
    #[error("Invalid column specification: {spec}")]
    InvalidColumnSpec { spec: String },
    #[error("Expected {expected} columns, found {found}")]
    InconsistentColumnCount { expected: usize, found: usize },
    #[error("Groups nested more than {limit} deep")]
    NestingTooDeep { limit: usize },
    /// A plane-1 character that the current options cannot emit.
    #[error("Plane 1 character {code} is not allowed")]
    DisallowedPlane1 { code: String },
    /// A non-ASCII character in purified TeX without `allow_ucs`.
    #[error("Unicode character '{character}' ({code}) needs the ucs package")]
    UcsNotAllowed { character: char, code: String },
    /// A CJK character in purified TeX without `allow_cjk`.
    #[error("CJK character '{character}' ({code}) needs the CJK package")]
    CjkNotAllowed { character: char, code: String },
    #[error("Character '{character}' ({code}) has no purified TeX equivalent")]
    NoPurifiedTexEquivalent { character: char, code: String },
    /// An output was requested before any input was parsed successfully.
    #[error("No successful parse to take output from")]
    NoSuccessfulParse,
}

impl ParseErrorKind {
    /// Stable identifier of the failure.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.into()
    }

    /// Ordered string arguments of the failure.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::UnrecognisedCommand { command }
            | Self::MissingArgument { command }
            | Self::MissingDelimiter { command }
            | Self::AmbiguousInfix { command }
            | Self::MisplacedLimits { command }
            | Self::MisplacedRowTerminator { command } => vec![command.clone()],
            Self::IllegalCharacter { character } => vec![character.to_string()],
            Self::IllegalDelimiter { command, delimiter } => {
                vec![command.clone(), delimiter.clone()]
            }
            Self::IllegalNegation { target } => vec![target.clone()],
            Self::UnrecognisedEnvironment { name }
            | Self::UnmatchedBegin { name }
            | Self::UnmatchedEnd { name } => vec![name.clone()],
            Self::MismatchedBeginAndEnd { begin, end } => vec![begin.clone(), end.clone()],
            Self::InvalidColumnSpec { spec } => vec![spec.clone()],
            Self::InconsistentColumnCount { expected, found } => {
                vec![expected.to_string(), found.to_string()]
            }
            Self::NestingTooDeep { limit } => vec![limit.to_string()],
            Self::DisallowedPlane1 { code } => vec![code.clone()],
            Self::UcsNotAllowed { character, code }
            | Self::CjkNotAllowed { character, code }
            | Self::NoPurifiedTexEquivalent { character, code } => {
                vec![character.to_string(), code.clone()]
            }
            Self::IllegalFinalBackslash
            | Self::UnmatchedOpenBrace
            | Self::UnmatchedCloseBrace
            | Self::UnmatchedLeft
            | Self::UnmatchedRight
            | Self::DoubleSuperscript
            | Self::DoubleSubscript
            | Self::MisplacedAlignment
            | Self::NoSuccessfulParse => Vec::new(),
        }
    }
}

/// Formats a code point the way error arguments spell it, e.g. `U+1F600`.
#[must_use]
pub fn code_point_label(ch: char) -> String {
    format!("U+{:04X}", u32::from(ch))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseErrorContext {
    None,
    Location(SourceLocation),
}

impl fmt::Display for ParseErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Location(SourceLocation { input, start, end }) => {
                let input_len = input.len();
                if *start == input_len {
                    write!(f, " at end of input: ")?;
                } else {
                    write!(f, " at position {}: ", start + 1)?;
                }

                let mut prefix_start = start.saturating_sub(15);
                prefix_start = adjust_char_boundary(input, prefix_start, false);
                if prefix_start > 0 {
                    write!(f, "\u{2026}")?;
                }
                write!(f, "{}", &input[prefix_start..*start])?;
                if end > start {
                    for c in input[*start..*end].chars() {
                        write!(f, "{c}\u{0332}")?;
                    }
                }
                let mut suffix_end = (*end + 15).min(input_len);
                suffix_end = adjust_char_boundary(input, suffix_end, true);
                write!(f, "{}", &input[*end..suffix_end])?;
                if suffix_end < input_len {
                    write!(f, "\u{2026}")?;
                }
                Ok(())
            }
        }
    }
}

const fn adjust_char_boundary(input: &str, mut index: usize, forward: bool) -> usize {
    if forward {
        while index < input.len() && !input.is_char_boundary(index) {
            index += 1;
        }
    } else {
        while index > 0 && !input.is_char_boundary(index) {
            index -= 1;
        }
    }
    index
}

/// Trait for types that can provide error location information for
/// [`ParseError`].
pub trait ErrorLocationProvider {
    /// Get the source location if available
    fn loc(&self) -> Option<&SourceLocation>;
}

impl ErrorLocationProvider for Option<SourceLocation> {
    fn loc(&self) -> Option<&SourceLocation> {
        self.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Token, TokenKind};
    use alloc::sync::Arc;

    #[test]
    fn test_parse_error_creation() {
        let error = ParseError::new(ParseErrorKind::NoSuccessfulParse);
        assert_eq!(error.code(), "NoSuccessfulParse");
        assert!(error.args().is_empty());
        assert!(
            error
                .to_string()
                .contains("blahtex error: No successful parse")
        );
        assert_eq!(error.position, None);
        assert_eq!(error.length, None);
    }

    #[test]
    fn test_parse_error_with_token_context() {
        let input: Arc<str> = Arc::from(r"a+\unknown{1}");
        let loc = SourceLocation::new(Arc::clone(&input), 2, 10);
        let token = Token::new(TokenKind::ControlWord, r"\unknown".to_owned(), loc);

        let error = ParseError::with_token(
            ParseErrorKind::UnrecognisedCommand {
                command: token.text.clone(),
            },
            &token,
        );
        assert_eq!(error.code(), "UnrecognisedCommand");
        assert_eq!(error.args(), vec![r"\unknown".to_owned()]);
        let rendered = error.to_string();
        assert!(rendered.contains("at position 3"));
        assert_eq!(error.position, Some(2));
        assert_eq!(error.length, Some(8));
    }

    #[test]
    fn test_summary_joins_arguments() {
        let error = ParseError::new(ParseErrorKind::InconsistentColumnCount {
            expected: 2,
            found: 3,
        });
        assert_eq!(error.summary(), "InconsistentColumnCount: 2, 3");
        assert_eq!(code_point_label('\u{1F600}'), "U+1F600");
        assert_eq!(code_point_label('é'), "U+00E9");
    }
}
