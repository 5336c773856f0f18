use crate::types::{ErrorLocationProvider, SourceLocation};
use strum::AsRefStr;

/// Lexical category of a [`Token`].
///
/// The lexer assigns these from the first character of the token alone; the
/// parser decides what each kind means in context (for example an
/// [`TokenKind::Alignment`] is only legal inside an environment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum TokenKind {
    /// A backslash followed by one or more ASCII letters, e.g. `\alpha`.
    ControlWord,
    /// A backslash followed by exactly one non-letter, e.g. `\,` or `\\`.
    ControlSymbol,
    /// Any other single character, tagged with its code point.
    Character,
    /// `{`
    BeginGroup,
    /// `}`
    EndGroup,
    /// `^`
    Superscript,
    /// `_`
    Subscript,
    /// `&`
    Alignment,
    /// Synthetic token closing every token list.
    EndOfInput,
}

/// Represents a single token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lexical category of the token.
    pub kind: TokenKind,
    /// The raw text of the token as it appears in the input, without any
    /// trailing whitespace. For commands this includes the backslash (e.g.
    /// `"\\alpha"`). Empty for [`TokenKind::EndOfInput`].
    pub text: String,
    /// Source span of the token, used for error reporting.
    pub loc: SourceLocation,
    /// Whether whitespace or a comment was dropped directly before this token.
    ///
    /// Math mode ignores this; `\text{...}` uses it to restore the spaces
    /// between words.
    pub space_before: bool,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, text: String, loc: SourceLocation) -> Self {
        Self {
            kind,
            text,
            loc,
            space_before: false,
        }
    }

    /// The single character of a [`TokenKind::Character`] token.
    ///
    /// Returns `None` for every other kind.
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        if self.kind == TokenKind::Character {
            self.text.chars().next()
        } else {
            None
        }
    }

    /// Whether this token is the character `ch`.
    #[must_use]
    pub fn is_char(&self, ch: char) -> bool {
        self.as_char() == Some(ch)
    }

    /// Whether this token is a control sequence (word or symbol).
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(self.kind, TokenKind::ControlWord | TokenKind::ControlSymbol)
    }

    /// Whether this token is the control sequence `name` (with backslash).
    #[must_use]
    pub fn is_command_named(&self, name: &str) -> bool {
        self.is_command() && self.text == name
    }
}

impl ErrorLocationProvider for Token {
    fn loc(&self) -> Option<&SourceLocation> {
        Some(&self.loc)
    }
}

impl ErrorLocationProvider for Option<&Token> {
    fn loc(&self) -> Option<&SourceLocation> {
        self.map(|t| &t.loc)
    }
}
