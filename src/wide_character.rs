//! Mathematical Alphanumeric Symbols (U+1D400 to U+1D7FF) support
//!
//! Plane 1 holds styled copies of the Latin letters and digits, one row of 52
//! letters (or 10 digits) per style. A few of the letters were encoded in the
//! BMP's Letterlike Symbols block before plane 1 existed (ℝ, ℂ, ℋ, ...); their
//! plane-1 slots are reserved holes and the BMP characters stand in for them.
//!
//! This module converts in both directions between a plain letter plus a
//! [`MathVariant`] and the styled character.

use crate::symbols::MathVariant;
use phf::phf_map;

/// Letter styles in plane-1 order, 52 code points each starting at U+1D400.
const WIDE_LATIN_LETTER_DATA: [MathVariant; 13] = [
    MathVariant::Bold,
    MathVariant::Italic,
    MathVariant::BoldItalic,
    MathVariant::Script,
    MathVariant::BoldScript,
    MathVariant::Fraktur,
    MathVariant::DoubleStruck,
    MathVariant::BoldFraktur,
    MathVariant::SansSerif,
    MathVariant::BoldSansSerif,
    MathVariant::SansSerifItalic,
    MathVariant::SansSerifBoldItalic,
    MathVariant::Monospace,
];

/// Digit styles in plane-1 order, 10 code points each starting at U+1D7CE.
const WIDE_NUMERAL_DATA: [MathVariant; 5] = [
    MathVariant::Bold,
    MathVariant::DoubleStruck,
    MathVariant::SansSerif,
    MathVariant::BoldSansSerif,
    MathVariant::Monospace,
];

const LETTER_BASE: u32 = 0x1D400;
const LETTER_END: u32 = 0x1D6A4;
const DIGIT_BASE: u32 = 0x1D7CE;
const DIGIT_END: u32 = 0x1D800;
const DOTLESS_I: u32 = 0x1D6A4;
const DOTLESS_J: u32 = 0x1D6A5;

/// Reserved plane-1 slots and the Letterlike Symbols character used instead.
static LETTERLIKE_HOLES: phf::Map<char, char> = phf_map! {
    '\u{1D455}' => '\u{210E}', // italic h
    '\u{1D49D}' => '\u{212C}', // script B
    '\u{1D4A0}' => '\u{2130}', // script E
    '\u{1D4A1}' => '\u{2131}', // script F
    '\u{1D4A3}' => '\u{210B}', // script H
    '\u{1D4A4}' => '\u{2110}', // script I
    '\u{1D4A7}' => '\u{2112}', // script L
    '\u{1D4A8}' => '\u{2133}', // script M
    '\u{1D4AD}' => '\u{211B}', // script R
    '\u{1D4BA}' => '\u{212F}', // script e
    '\u{1D4BC}' => '\u{210A}', // script g
    '\u{1D4C4}' => '\u{2134}', // script o
    '\u{1D506}' => '\u{212D}', // fraktur C
    '\u{1D50B}' => '\u{210C}', // fraktur H
    '\u{1D50C}' => '\u{2111}', // fraktur I
    '\u{1D515}' => '\u{211C}', // fraktur R
    '\u{1D51D}' => '\u{2128}', // fraktur Z
    '\u{1D53A}' => '\u{2102}', // double-struck C
    '\u{1D53F}' => '\u{210D}', // double-struck H
    '\u{1D545}' => '\u{2115}', // double-struck N
    '\u{1D547}' => '\u{2119}', // double-struck P
    '\u{1D548}' => '\u{211A}', // double-struck Q
    '\u{1D549}' => '\u{211D}', // double-struck R
    '\u{1D551}' => '\u{2124}', // double-struck Z
};

/// Whether `ch` lies outside the Basic Multilingual Plane.
#[must_use]
pub const fn is_plane1(ch: char) -> bool {
    ch as u32 > 0xFFFF
}

/// Styled character for an ASCII letter or digit in `variant`.
///
/// Returns `None` when Unicode has no such character (for example
/// double-struck italic, or any [`MathVariant::Normal`] character). Letters
/// whose plane-1 slot is a hole map to their Letterlike Symbols stand-in, so
/// the result is not always in plane 1.
///
/// # Examples
///
/// ```
/// use blahtex::symbols::MathVariant;
/// use blahtex::wide_character::styled_char;
///
/// assert_eq!(styled_char('A', MathVariant::DoubleStruck), Some('\u{1D538}'));
/// assert_eq!(styled_char('R', MathVariant::DoubleStruck), Some('\u{211D}'));
/// assert_eq!(styled_char('x', MathVariant::Normal), None);
/// ```
#[must_use]
pub fn styled_char(ch: char, variant: MathVariant) -> Option<char> {
    let code_point = if ch.is_ascii_alphabetic() {
        let row = WIDE_LATIN_LETTER_DATA.iter().position(|v| *v == variant)?;
        let offset = if ch.is_ascii_uppercase() {
            u32::from(ch) - u32::from('A')
        } else {
            26 + u32::from(ch) - u32::from('a')
        };
        LETTER_BASE + 52 * row as u32 + offset
    } else if ch.is_ascii_digit() {
        let row = WIDE_NUMERAL_DATA.iter().position(|v| *v == variant)?;
        DIGIT_BASE + 10 * row as u32 + (u32::from(ch) - u32::from('0'))
    } else {
        return None;
    };
    let styled = char::from_u32(code_point)?;
    Some(LETTERLIKE_HOLES.get(&styled).copied().unwrap_or(styled))
}

/// Splits a styled character back into its plain letter or digit and variant.
///
/// Accepts both plane-1 math alphanumerics and the Letterlike Symbols
/// stand-ins for the holes. Returns `None` for any other character, including
/// the reserved holes themselves.
///
/// # Examples
///
/// ```
/// use blahtex::symbols::MathVariant;
/// use blahtex::wide_character::split_styled_char;
///
/// assert_eq!(
///     split_styled_char('\u{1D400}'),
///     Some(('A', MathVariant::Bold))
/// );
/// assert_eq!(
///     split_styled_char('\u{2124}'),
///     Some(('Z', MathVariant::DoubleStruck))
/// );
/// assert_eq!(split_styled_char('\u{1F600}'), None);
/// ```
#[must_use]
pub fn split_styled_char(ch: char) -> Option<(char, MathVariant)> {
    if let Some((hole, _)) = LETTERLIKE_HOLES.entries().find(|(_, bmp)| **bmp == ch) {
        return split_plane1(*hole);
    }
    if LETTERLIKE_HOLES.contains_key(&ch) {
        return None;
    }
    split_plane1(ch)
}

fn split_plane1(ch: char) -> Option<(char, MathVariant)> {
    let code_point = u32::from(ch);
    if (LETTER_BASE..LETTER_END).contains(&code_point) {
        let index = code_point - LETTER_BASE;
        let variant = WIDE_LATIN_LETTER_DATA[(index / 52) as usize];
        let offset = index % 52;
        let letter = if offset < 26 {
            u32::from('A') + offset
        } else {
            u32::from('a') + offset - 26
        };
        Some((char::from_u32(letter)?, variant))
    } else if code_point == DOTLESS_I {
        Some(('\u{131}', MathVariant::Italic))
    } else if code_point == DOTLESS_J {
        Some(('\u{237}', MathVariant::Italic))
    } else if (DIGIT_BASE..DIGIT_END).contains(&code_point) {
        let index = code_point - DIGIT_BASE;
        let variant = WIDE_NUMERAL_DATA[(index / 10) as usize];
        Some((char::from_u32(u32::from('0') + index % 10)?, variant))
    } else {
        None
    }
}
