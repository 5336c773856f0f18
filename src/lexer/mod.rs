//! The lexer turns the input string into a flat list of [`Token`]s.
//!
//! Lexing never fails: every character ends up in some token, and decisions
//! about whether a token is legal are left to the parser, which has the
//! context to report a useful error. Whitespace and `%` comments are dropped,
//! but each token remembers whether anything was dropped directly before it.

use crate::types::{SourceLocation, Token, TokenKind};
use alloc::sync::Arc;
use alloc::vec::Vec;

fn match_space(s: &str) -> Option<usize> {
    let len = s
        .chars()
        .take_while(|c| matches!(c, ' ' | '\r' | '\n' | '\t'))
        .map(char::len_utf8)
        .sum();
    (len > 0).then_some(len)
}

/// `%` up to and including the end of the line.
fn match_comment(s: &str) -> Option<usize> {
    let rest = s.strip_prefix('%')?;
    Some(rest.find('\n').map_or(s.len(), |nl| nl + 2))
}

fn match_control_word(s: &str) -> Option<usize> {
    let rest = s.strip_prefix('\\')?;
    let letters = rest.bytes().take_while(u8::is_ascii_alphabetic).count();
    (letters > 0).then_some(1 + letters)
}

fn match_control_symbol(s: &str) -> Option<usize> {
    let rest = s.strip_prefix('\\')?;
    // A lone final backslash is still a control symbol; the parser rejects it.
    Some(1 + rest.chars().next().map_or(0, char::len_utf8))
}

fn classify_char(ch: char) -> TokenKind {
    match ch {
        '{' => TokenKind::BeginGroup,
        '}' => TokenKind::EndGroup,
        '^' => TokenKind::Superscript,
        '_' => TokenKind::Subscript,
        '&' => TokenKind::Alignment,
        _ => TokenKind::Character,
    }
}

/// Streaming tokenizer over a shared input string.
pub struct Lexer {
    input: Arc<str>,
    last_index: usize,
}

impl Lexer {
    /// Creates a new `Lexer` positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: Arc<str>) -> Self {
        Self {
            input,
            last_index: 0,
        }
    }

    /// Skips whitespace and comments, reporting whether anything was skipped.
    fn skip_ignored(&mut self) -> bool {
        let mut skipped = false;
        loop {
            let slice = &self.input[self.last_index..];
            let Some(len) = match_space(slice).or_else(|| match_comment(slice)) else {
                return skipped;
            };
            self.last_index += len;
            skipped = true;
        }
    }

    /// Returns the next token, or `EndOfInput` once the input is exhausted.
    ///
    /// Calling `lex` again after `EndOfInput` keeps returning `EndOfInput`.
    pub fn lex(&mut self) -> Token {
        let space_before = self.skip_ignored();
        let start = self.last_index;
        let slice = &self.input[start..];

        let (kind, len) = if let Some(len) = match_control_word(slice) {
            (TokenKind::ControlWord, len)
        } else if let Some(len) = match_control_symbol(slice) {
            (TokenKind::ControlSymbol, len)
        } else if let Some(ch) = slice.chars().next() {
            (classify_char(ch), ch.len_utf8())
        } else {
            (TokenKind::EndOfInput, 0)
        };

        self.last_index += len;
        let mut token = Token::new(
            kind,
            slice[..len].to_owned(),
            SourceLocation::new(Arc::clone(&self.input), start, self.last_index),
        );
        token.space_before = space_before;

        // Whitespace after a control word only terminates it.
        if kind == TokenKind::ControlWord
            && let Some(space) = match_space(&self.input[self.last_index..])
        {
            self.last_index += space;
        }
        token
    }

    /// Returns the current byte position in the input string where the lexer
    /// will next read.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.last_index
    }
}

/// Splits `input` into tokens, always ending with a single `EndOfInput`.
///
/// # Examples
///
/// ```
/// use blahtex::lexer::tokenize;
/// use blahtex::types::TokenKind;
///
/// let tokens = tokenize(r"\alpha_1");
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::ControlWord,
///         TokenKind::Subscript,
///         TokenKind::Character,
///         TokenKind::EndOfInput,
///     ]
/// );
/// ```
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    tokenize_shared(Arc::from(input))
}

/// Same as [`tokenize`], reusing an already shared input string.
#[must_use]
pub fn tokenize_shared(input: Arc<str>) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.lex();
        let done = token.kind == TokenKind::EndOfInput;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_control_words_swallow_trailing_space() {
        let tokens = tokenize(r"\alpha  x");
        assert_eq!(tokens[0].text, r"\alpha");
        assert_eq!(tokens[0].kind, TokenKind::ControlWord);
        assert_eq!(tokens[1].text, "x");
        assert!(!tokens[1].space_before);
    }

    #[test]
    fn test_control_symbols() {
        assert_eq!(texts(r"\,\\\{\ "), [r"\,", r"\\", r"\{", r"\ ", ""]);
        let tokens = tokenize(r"a\");
        assert_eq!(tokens[1].kind, TokenKind::ControlSymbol);
        assert_eq!(tokens[1].text, "\\");
    }

    #[test]
    fn test_structural_characters() {
        let kinds: Vec<_> = tokenize("{^_&}").into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [
                TokenKind::BeginGroup,
                TokenKind::Superscript,
                TokenKind::Subscript,
                TokenKind::Alignment,
                TokenKind::EndGroup,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_whitespace_and_comments_are_dropped() {
        let tokens = tokenize("a b % comment\nc%tail");
        assert_eq!(
            tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            ["a", "b", "c", ""]
        );
        assert!(!tokens[0].space_before);
        assert!(tokens[1].space_before);
        assert!(tokens[2].space_before);
    }

    #[test]
    fn test_locations() {
        let tokens = tokenize("x + \u{1D400}");
        assert_eq!((tokens[1].loc.start, tokens[1].loc.end), (2, 3));
        assert_eq!((tokens[2].loc.start, tokens[2].loc.end), (4, 8));
        let end = tokens.last().unwrap();
        assert_eq!(end.kind, TokenKind::EndOfInput);
        assert_eq!(end.loc.start, 8);
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::EndOfInput);
    }
}
