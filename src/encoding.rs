//! Character data encoding for the MathML output.
//!
//! MathML is XML, so `&`, `<`, `>` and `"` are always escaped. How the
//! remaining non-ASCII characters are written is chosen by
//! [`MathmlEncoding`]: raw UTF-8, numeric character references, or named
//! entities with a raw or numeric fallback.

use crate::types::{EncodingOptions, MathmlEncoding, ParseError, ParseErrorKind, code_point_label};
use crate::wide_character::is_plane1;
use alloc::string::String;
use phf::phf_map;
use tracing::trace;

/// Named entities as `(short, long)` pairs.
///
/// The short name is the HTML/ISO name; the long name is the descriptive
/// MathML name where one exists, otherwise the short name again.
pub static ENTITIES: phf::Map<char, (&'static str, &'static str)> = phf_map! {
    '\u{A0}' => ("nbsp", "NonBreakingSpace"),
    '\u{AC}' => ("not", "not"),
    '\u{AF}' => ("macr", "OverBar"),
    '\u{B1}' => ("pm", "PlusMinus"),
    '\u{B7}' => ("middot", "CenterDot"),
    '\u{D7}' => ("times", "times"),
    '\u{F7}' => ("div", "divide"),
    '\u{393}' => ("Gamma", "Gamma"),
    '\u{394}' => ("Delta", "Delta"),
    '\u{398}' => ("Theta", "Theta"),
    '\u{39B}' => ("Lambda", "Lambda"),
    '\u{39E}' => ("Xi", "Xi"),
    '\u{3A0}' => ("Pi", "Pi"),
    '\u{3A3}' => ("Sigma", "Sigma"),
    '\u{3A5}' => ("Upsilon", "Upsilon"),
    '\u{3A6}' => ("Phi", "Phi"),
    '\u{3A8}' => ("Psi", "Psi"),
    '\u{3A9}' => ("Omega", "Omega"),
    '\u{3B1}' => ("alpha", "alpha"),
    '\u{3B2}' => ("beta", "beta"),
    '\u{3B3}' => ("gamma", "gamma"),
    '\u{3B4}' => ("delta", "delta"),
    '\u{3B5}' => ("epsiv", "varepsilon"),
    '\u{3B6}' => ("zeta", "zeta"),
    '\u{3B7}' => ("eta", "eta"),
    '\u{3B8}' => ("theta", "theta"),
    '\u{3B9}' => ("iota", "iota"),
    '\u{3BA}' => ("kappa", "kappa"),
    '\u{3BB}' => ("lambda", "lambda"),
    '\u{3BC}' => ("mu", "mu"),
    '\u{3BD}' => ("nu", "nu"),
    '\u{3BE}' => ("xi", "xi"),
    '\u{3C0}' => ("pi", "pi"),
    '\u{3C1}' => ("rho", "rho"),
    '\u{3C2}' => ("sigmav", "varsigma"),
    '\u{3C3}' => ("sigma", "sigma"),
    '\u{3C4}' => ("tau", "tau"),
    '\u{3C5}' => ("upsi", "upsilon"),
    '\u{3C6}' => ("phiv", "varphi"),
    '\u{3C7}' => ("chi", "chi"),
    '\u{3C8}' => ("psi", "psi"),
    '\u{3C9}' => ("omega", "omega"),
    '\u{3D5}' => ("phi", "straightphi"),
    '\u{3F5}' => ("epsi", "straightepsilon"),
    '\u{2016}' => ("Verbar", "Vert"),
    '\u{2026}' => ("hellip", "mldr"),
    '\u{2032}' => ("prime", "prime"),
    '\u{210F}' => ("planck", "hbar"),
    '\u{2111}' => ("image", "Im"),
    '\u{2113}' => ("ell", "ell"),
    '\u{2118}' => ("weierp", "wp"),
    '\u{211C}' => ("real", "Re"),
    '\u{2135}' => ("aleph", "aleph"),
    '\u{2190}' => ("larr", "LeftArrow"),
    '\u{2191}' => ("uarr", "UpArrow"),
    '\u{2192}' => ("rarr", "RightArrow"),
    '\u{2193}' => ("darr", "DownArrow"),
    '\u{2194}' => ("harr", "LeftRightArrow"),
    '\u{21A6}' => ("map", "RightTeeArrow"),
    '\u{21D0}' => ("lArr", "DoubleLeftArrow"),
    '\u{21D2}' => ("rArr", "DoubleRightArrow"),
    '\u{21D4}' => ("hArr", "DoubleLeftRightArrow"),
    '\u{2200}' => ("forall", "ForAll"),
    '\u{2202}' => ("part", "PartialD"),
    '\u{2203}' => ("exist", "Exists"),
    '\u{2205}' => ("empty", "emptyset"),
    '\u{2207}' => ("nabla", "Del"),
    '\u{2208}' => ("isin", "Element"),
    '\u{2209}' => ("notin", "NotElement"),
    '\u{220B}' => ("ni", "ReverseElement"),
    '\u{220F}' => ("prod", "Product"),
    '\u{2210}' => ("coprod", "Coproduct"),
    '\u{2211}' => ("sum", "Sum"),
    '\u{2212}' => ("minus", "minus"),
    '\u{2213}' => ("mp", "MinusPlus"),
    '\u{2216}' => ("setmn", "Backslash"),
    '\u{2217}' => ("lowast", "lowast"),
    '\u{2218}' => ("compfn", "SmallCircle"),
    '\u{221D}' => ("prop", "Proportional"),
    '\u{221E}' => ("infin", "infin"),
    '\u{2220}' => ("ang", "angle"),
    '\u{2223}' => ("mid", "VerticalBar"),
    '\u{2225}' => ("par", "DoubleVerticalBar"),
    '\u{2227}' => ("and", "wedge"),
    '\u{2228}' => ("or", "vee"),
    '\u{2229}' => ("cap", "cap"),
    '\u{222A}' => ("cup", "Union"),
    '\u{222B}' => ("int", "Integral"),
    '\u{222E}' => ("conint", "ContourIntegral"),
    '\u{223C}' => ("sim", "Tilde"),
    '\u{2243}' => ("sime", "TildeEqual"),
    '\u{2245}' => ("cong", "TildeFullEqual"),
    '\u{2248}' => ("ap", "TildeTilde"),
    '\u{2260}' => ("ne", "NotEqual"),
    '\u{2261}' => ("equiv", "Congruent"),
    '\u{2264}' => ("le", "leq"),
    '\u{2265}' => ("ge", "GreaterEqual"),
    '\u{226A}' => ("ll", "NestedLessLess"),
    '\u{226B}' => ("gg", "NestedGreaterGreater"),
    '\u{227A}' => ("pr", "Precedes"),
    '\u{227B}' => ("sc", "Succeeds"),
    '\u{2282}' => ("sub", "subset"),
    '\u{2283}' => ("sup", "Superset"),
    '\u{2286}' => ("sube", "SubsetEqual"),
    '\u{2287}' => ("supe", "SupersetEqual"),
    '\u{2295}' => ("oplus", "CirclePlus"),
    '\u{2296}' => ("ominus", "CircleMinus"),
    '\u{2297}' => ("otimes", "CircleTimes"),
    '\u{2299}' => ("odot", "CircleDot"),
    '\u{22A2}' => ("vdash", "RightTee"),
    '\u{22A4}' => ("top", "DownTee"),
    '\u{22A5}' => ("perp", "UpTee"),
    '\u{22C5}' => ("sdot", "sdot"),
    '\u{22C6}' => ("sstarf", "Star"),
    '\u{22EE}' => ("vellip", "vellip"),
    '\u{22EF}' => ("ctdot", "ctdot"),
    '\u{22F1}' => ("dtdot", "dtdot"),
    '\u{2308}' => ("lceil", "LeftCeiling"),
    '\u{2309}' => ("rceil", "RightCeiling"),
    '\u{230A}' => ("lfloor", "LeftFloor"),
    '\u{230B}' => ("rfloor", "RightFloor"),
    '\u{27E8}' => ("lang", "LeftAngleBracket"),
    '\u{27E9}' => ("rang", "RightAngleBracket"),
    '\u{27F5}' => ("xlarr", "LongLeftArrow"),
    '\u{27F6}' => ("xrarr", "LongRightArrow"),
    '\u{27F7}' => ("xharr", "LongLeftRightArrow"),
    '\u{27F8}' => ("xlArr", "DoubleLongLeftArrow"),
    '\u{27F9}' => ("xrArr", "DoubleLongRightArrow"),
    '\u{27FA}' => ("xhArr", "DoubleLongLeftRightArrow"),
};

/// Appends `text` to `out` as MathML character data.
///
/// Fails with `DisallowedPlane1` when the options forbid plane-1 characters
/// and `text` contains one.
pub fn encode_into(
    out: &mut String,
    text: &str,
    options: &EncodingOptions,
) -> Result<(), ParseError> {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                if !options.allow_plane1 && is_plane1(ch) {
                    trace!(code = %code_point_label(ch), "plane 1 character rejected by encoder");
                    return Err(ParseError::new(ParseErrorKind::DisallowedPlane1 {
                        code: code_point_label(ch),
                    }));
                }
                encode_char(out, ch, options);
            }
        }
    }
    Ok(())
}

/// Encodes `text`, returning a new string.
pub fn encode(text: &str, options: &EncodingOptions) -> Result<String, ParseError> {
    let mut out = String::with_capacity(text.len());
    encode_into(&mut out, text, options)?;
    Ok(out)
}

fn encode_char(out: &mut String, ch: char, options: &EncodingOptions) {
    let entity = match options.mathml_encoding {
        MathmlEncoding::Raw => {
            out.push(ch);
            return;
        }
        MathmlEncoding::Numeric => None,
        MathmlEncoding::Short => ENTITIES.get(&ch).map(|(short, _)| *short),
        MathmlEncoding::Long => ENTITIES.get(&ch).map(|(_, long)| *long),
    };
    match entity {
        Some(name) => {
            out.push('&');
            out.push_str(name);
            out.push(';');
        }
        None if options.other_encoding_raw && options.mathml_encoding != MathmlEncoding::Numeric => {
            out.push(ch);
        }
        None => {
            out.push_str(&format!("&#x{:X};", u32::from(ch)));
        }
    }
}
