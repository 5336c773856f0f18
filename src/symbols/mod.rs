//! Static command and symbol tables
//!
//! Everything the parser knows about control sequences lives here, as
//! compile-time [`phf`] maps keyed by the control sequence including its
//! backslash:
//!
//! - [`COMMANDS`]: every supported command and what it does
//! - [`ASCII_CLASSES`]: the atom class of printable ASCII characters
//! - [`DELIMITERS`]: tokens allowed after `\left`, `\right` and `\big`
//! - [`NEGATIONS`]: precomposed forms used by `\not`
//! - [`TEXVC_ALIASES`]: legacy texvc shorthands and their expansions
//!
//! The tables are immutable and safe to read from any thread.
//!
//! # Examples
//!
//! ```rust
//! use blahtex::symbols::{AtomClass, CommandKind, lookup_command};
//!
//! let spec = lookup_command("\\leq").unwrap();
//! assert_eq!(spec.class, AtomClass::Rel);
//! assert_eq!(spec.kind, CommandKind::Symbol('\u{2264}'));
//! ```

mod types;
use alloc::vec::Vec;
use phf::phf_map;
use rapidhash::RapidHashMap;
use std::sync::LazyLock;
pub use types::{
    AccentKind, Arity, AtomClass, CommandKind, CommandSpec, DelimSize, FractionKind, MathStyle,
    MathVariant, SpaceWidth, StackKind,
};

/// Make it easier to switch between different hash backends.
pub type KeyMap<K, V> = RapidHashMap<K, V>;

const fn sym(class: AtomClass, ch: char) -> CommandSpec {
    CommandSpec {
        class,
        kind: CommandKind::Symbol(ch),
    }
}

const fn ord(ch: char) -> CommandSpec {
    sym(AtomClass::Ord, ch)
}

const fn bin(ch: char) -> CommandSpec {
    sym(AtomClass::Bin, ch)
}

const fn rel(ch: char) -> CommandSpec {
    sym(AtomClass::Rel, ch)
}

const fn op(ch: char) -> CommandSpec {
    sym(AtomClass::Op, ch)
}

const fn open(ch: char) -> CommandSpec {
    sym(AtomClass::Open, ch)
}

const fn close(ch: char) -> CommandSpec {
    sym(AtomClass::Close, ch)
}

const fn named(name: &'static str, limits: bool) -> CommandSpec {
    CommandSpec {
        class: AtomClass::Op,
        kind: CommandKind::Operator { name, limits },
    }
}

const fn cmd(kind: CommandKind) -> CommandSpec {
    CommandSpec {
        class: AtomClass::Ord,
        kind,
    }
}

/// The command table.
pub static COMMANDS: phf::Map<&'static str, CommandSpec> = phf_map! {
    // Lowercase Greek
    "\\alpha" => ord('\u{3B1}'),
    "\\beta" => ord('\u{3B2}'),
    "\\gamma" => ord('\u{3B3}'),
    "\\delta" => ord('\u{3B4}'),
    "\\epsilon" => ord('\u{3F5}'),
    "\\varepsilon" => ord('\u{3B5}'),
    "\\zeta" => ord('\u{3B6}'),
    "\\eta" => ord('\u{3B7}'),
    "\\theta" => ord('\u{3B8}'),
    "\\vartheta" => ord('\u{3D1}'),
    "\\iota" => ord('\u{3B9}'),
    "\\kappa" => ord('\u{3BA}'),
    "\\varkappa" => ord('\u{3F0}'),
    "\\lambda" => ord('\u{3BB}'),
    "\\mu" => ord('\u{3BC}'),
    "\\nu" => ord('\u{3BD}'),
    "\\xi" => ord('\u{3BE}'),
    "\\pi" => ord('\u{3C0}'),
    "\\varpi" => ord('\u{3D6}'),
    "\\rho" => ord('\u{3C1}'),
    "\\varrho" => ord('\u{3F1}'),
    "\\sigma" => ord('\u{3C3}'),
    "\\varsigma" => ord('\u{3C2}'),
    "\\tau" => ord('\u{3C4}'),
    "\\upsilon" => ord('\u{3C5}'),
    "\\phi" => ord('\u{3D5}'),
    "\\varphi" => ord('\u{3C6}'),
    "\\chi" => ord('\u{3C7}'),
    "\\psi" => ord('\u{3C8}'),
    "\\omega" => ord('\u{3C9}'),
    "\\digamma" => ord('\u{3DD}'),
    // Uppercase Greek
    "\\Gamma" => ord('\u{393}'),
    "\\Delta" => ord('\u{394}'),
    "\\Theta" => ord('\u{398}'),
    "\\Lambda" => ord('\u{39B}'),
    "\\Xi" => ord('\u{39E}'),
    "\\Pi" => ord('\u{3A0}'),
    "\\Sigma" => ord('\u{3A3}'),
    "\\Upsilon" => ord('\u{3A5}'),
    "\\Phi" => ord('\u{3A6}'),
    "\\Psi" => ord('\u{3A8}'),
    "\\Omega" => ord('\u{3A9}'),
    // Letterlike and miscellaneous ordinary symbols
    "\\aleph" => ord('\u{2135}'),
    "\\beth" => ord('\u{2136}'),
    "\\gimel" => ord('\u{2137}'),
    "\\daleth" => ord('\u{2138}'),
    "\\hbar" => ord('\u{210F}'),
    "\\hslash" => ord('\u{210F}'),
    "\\ell" => ord('\u{2113}'),
    "\\wp" => ord('\u{2118}'),
    "\\Re" => ord('\u{211C}'),
    "\\Im" => ord('\u{2111}'),
    "\\partial" => ord('\u{2202}'),
    "\\infty" => ord('\u{221E}'),
    "\\nabla" => ord('\u{2207}'),
    "\\emptyset" => ord('\u{2205}'),
    "\\varnothing" => ord('\u{2300}'),
    "\\forall" => ord('\u{2200}'),
    "\\exists" => ord('\u{2203}'),
    "\\nexists" => ord('\u{2204}'),
    "\\neg" => ord('\u{AC}'),
    "\\lnot" => ord('\u{AC}'),
    "\\imath" => ord('\u{131}'),
    "\\jmath" => ord('\u{237}'),
    "\\prime" => ord('\u{2032}'),
    "\\backprime" => ord('\u{2035}'),
    "\\angle" => ord('\u{2220}'),
    "\\measuredangle" => ord('\u{2221}'),
    "\\top" => ord('\u{22A4}'),
    "\\bot" => ord('\u{22A5}'),
    "\\triangle" => ord('\u{25B3}'),
    "\\square" => ord('\u{25A1}'),
    "\\blacksquare" => ord('\u{25A0}'),
    "\\Box" => ord('\u{25A1}'),
    "\\Diamond" => ord('\u{25CA}'),
    "\\clubsuit" => ord('\u{2663}'),
    "\\diamondsuit" => ord('\u{2662}'),
    "\\heartsuit" => ord('\u{2661}'),
    "\\spadesuit" => ord('\u{2660}'),
    "\\flat" => ord('\u{266D}'),
    "\\natural" => ord('\u{266E}'),
    "\\sharp" => ord('\u{266F}'),
    "\\surd" => ord('\u{221A}'),
    "\\complement" => ord('\u{2201}'),
    "\\eth" => ord('\u{F0}'),
    "\\mho" => ord('\u{2127}'),
    "\\Finv" => ord('\u{2132}'),
    "\\Game" => ord('\u{2141}'),
    "\\ldots" => ord('\u{2026}'),
    "\\dots" => ord('\u{2026}'),
    "\\cdots" => ord('\u{22EF}'),
    "\\vdots" => ord('\u{22EE}'),
    "\\ddots" => ord('\u{22F1}'),
    "\\checkmark" => ord('\u{2713}'),
    "\\dagger" => bin('\u{2020}'),
    "\\ddagger" => bin('\u{2021}'),
    "\\S" => ord('\u{A7}'),
    "\\P" => ord('\u{B6}'),
    "\\%" => ord('%'),
    "\\$" => ord('$'),
    "\\#" => ord('#'),
    "\\&" => ord('&'),
    "\\_" => ord('_'),
    "\\vert" => ord('|'),
    "\\|" => ord('\u{2016}'),
    "\\Vert" => ord('\u{2016}'),
    "\\backslash" => ord('\\'),
    "\\colon" => sym(AtomClass::Punct, ':'),
    // Binary operators
    "\\pm" => bin('\u{B1}'),
    "\\mp" => bin('\u{2213}'),
    "\\times" => bin('\u{D7}'),
    "\\div" => bin('\u{F7}'),
    "\\cdot" => bin('\u{22C5}'),
    "\\ast" => bin('\u{2217}'),
    "\\star" => bin('\u{22C6}'),
    "\\circ" => bin('\u{2218}'),
    "\\bullet" => bin('\u{2219}'),
    "\\oplus" => bin('\u{2295}'),
    "\\ominus" => bin('\u{2296}'),
    "\\otimes" => bin('\u{2297}'),
    "\\oslash" => bin('\u{2298}'),
    "\\odot" => bin('\u{2299}'),
    "\\cap" => bin('\u{2229}'),
    "\\cup" => bin('\u{222A}'),
    "\\uplus" => bin('\u{228E}'),
    "\\sqcap" => bin('\u{2293}'),
    "\\sqcup" => bin('\u{2294}'),
    "\\wedge" => bin('\u{2227}'),
    "\\land" => bin('\u{2227}'),
    "\\vee" => bin('\u{2228}'),
    "\\lor" => bin('\u{2228}'),
    "\\setminus" => bin('\u{2216}'),
    "\\smallsetminus" => bin('\u{2216}'),
    "\\wr" => bin('\u{2240}'),
    "\\diamond" => bin('\u{22C4}'),
    "\\bigtriangleup" => bin('\u{25B3}'),
    "\\bigtriangledown" => bin('\u{25BD}'),
    "\\triangleleft" => bin('\u{25C3}'),
    "\\triangleright" => bin('\u{25B9}'),
    "\\amalg" => bin('\u{2A3F}'),
    "\\ltimes" => bin('\u{22C9}'),
    "\\rtimes" => bin('\u{22CA}'),
    // Relations
    "\\leq" => rel('\u{2264}'),
    "\\le" => rel('\u{2264}'),
    "\\geq" => rel('\u{2265}'),
    "\\ge" => rel('\u{2265}'),
    "\\neq" => rel('\u{2260}'),
    "\\ne" => rel('\u{2260}'),
    "\\leqslant" => rel('\u{2A7D}'),
    "\\geqslant" => rel('\u{2A7E}'),
    "\\ll" => rel('\u{226A}'),
    "\\gg" => rel('\u{226B}'),
    "\\prec" => rel('\u{227A}'),
    "\\succ" => rel('\u{227B}'),
    "\\preceq" => rel('\u{2AAF}'),
    "\\succeq" => rel('\u{2AB0}'),
    "\\sim" => rel('\u{223C}'),
    "\\simeq" => rel('\u{2243}'),
    "\\cong" => rel('\u{2245}'),
    "\\approx" => rel('\u{2248}'),
    "\\equiv" => rel('\u{2261}'),
    "\\propto" => rel('\u{221D}'),
    "\\asymp" => rel('\u{224D}'),
    "\\doteq" => rel('\u{2250}'),
    "\\in" => rel('\u{2208}'),
    "\\ni" => rel('\u{220B}'),
    "\\notin" => rel('\u{2209}'),
    "\\subset" => rel('\u{2282}'),
    "\\supset" => rel('\u{2283}'),
    "\\subseteq" => rel('\u{2286}'),
    "\\supseteq" => rel('\u{2287}'),
    "\\subsetneq" => rel('\u{228A}'),
    "\\supsetneq" => rel('\u{228B}'),
    "\\sqsubseteq" => rel('\u{2291}'),
    "\\sqsupseteq" => rel('\u{2292}'),
    "\\mid" => rel('\u{2223}'),
    "\\nmid" => rel('\u{2224}'),
    "\\parallel" => rel('\u{2225}'),
    "\\nparallel" => rel('\u{2226}'),
    "\\perp" => rel('\u{22A5}'),
    "\\vdash" => rel('\u{22A2}'),
    "\\dashv" => rel('\u{22A3}'),
    "\\models" => rel('\u{22A8}'),
    "\\smile" => rel('\u{2323}'),
    "\\frown" => rel('\u{2322}'),
    "\\bowtie" => rel('\u{22C8}'),
    "\\lesssim" => rel('\u{2272}'),
    "\\gtrsim" => rel('\u{2273}'),
    "\\nless" => rel('\u{226E}'),
    "\\ngtr" => rel('\u{226F}'),
    "\\nleq" => rel('\u{2270}'),
    "\\ngeq" => rel('\u{2271}'),
    "\\therefore" => rel('\u{2234}'),
    "\\because" => rel('\u{2235}'),
    // Arrows
    "\\leftarrow" => rel('\u{2190}'),
    "\\gets" => rel('\u{2190}'),
    "\\rightarrow" => rel('\u{2192}'),
    "\\to" => rel('\u{2192}'),
    "\\uparrow" => rel('\u{2191}'),
    "\\downarrow" => rel('\u{2193}'),
    "\\leftrightarrow" => rel('\u{2194}'),
    "\\updownarrow" => rel('\u{2195}'),
    "\\Leftarrow" => rel('\u{21D0}'),
    "\\Rightarrow" => rel('\u{21D2}'),
    "\\Uparrow" => rel('\u{21D1}'),
    "\\Downarrow" => rel('\u{21D3}'),
    "\\Leftrightarrow" => rel('\u{21D4}'),
    "\\Updownarrow" => rel('\u{21D5}'),
    "\\iff" => rel('\u{27FA}'),
    "\\implies" => rel('\u{27F9}'),
    "\\impliedby" => rel('\u{27F8}'),
    "\\longleftarrow" => rel('\u{27F5}'),
    "\\longrightarrow" => rel('\u{27F6}'),
    "\\longleftrightarrow" => rel('\u{27F7}'),
    "\\Longleftarrow" => rel('\u{27F8}'),
    "\\Longrightarrow" => rel('\u{27F9}'),
    "\\Longleftrightarrow" => rel('\u{27FA}'),
    "\\mapsto" => rel('\u{21A6}'),
    "\\longmapsto" => rel('\u{27FC}'),
    "\\hookleftarrow" => rel('\u{21A9}'),
    "\\hookrightarrow" => rel('\u{21AA}'),
    "\\nearrow" => rel('\u{2197}'),
    "\\searrow" => rel('\u{2198}'),
    "\\swarrow" => rel('\u{2199}'),
    "\\nwarrow" => rel('\u{2196}'),
    "\\leftharpoonup" => rel('\u{21BC}'),
    "\\rightharpoonup" => rel('\u{21C0}'),
    "\\rightleftharpoons" => rel('\u{21CC}'),
    "\\nleftarrow" => rel('\u{219A}'),
    "\\nrightarrow" => rel('\u{219B}'),
    "\\nLeftarrow" => rel('\u{21CD}'),
    "\\nRightarrow" => rel('\u{21CF}'),
    // Large operators
    "\\sum" => op('\u{2211}'),
    "\\prod" => op('\u{220F}'),
    "\\coprod" => op('\u{2210}'),
    "\\int" => op('\u{222B}'),
    "\\iint" => op('\u{222C}'),
    "\\iiint" => op('\u{222D}'),
    "\\oint" => op('\u{222E}'),
    "\\bigcap" => op('\u{22C2}'),
    "\\bigcup" => op('\u{22C3}'),
    "\\bigwedge" => op('\u{22C0}'),
    "\\bigvee" => op('\u{22C1}'),
    "\\bigoplus" => op('\u{2A01}'),
    "\\bigotimes" => op('\u{2A02}'),
    "\\bigodot" => op('\u{2A00}'),
    "\\biguplus" => op('\u{2A04}'),
    "\\bigsqcup" => op('\u{2A06}'),
    // Named operators
    "\\arccos" => named("arccos", false),
    "\\arcsin" => named("arcsin", false),
    "\\arctan" => named("arctan", false),
    "\\arg" => named("arg", false),
    "\\cos" => named("cos", false),
    "\\cosh" => named("cosh", false),
    "\\cot" => named("cot", false),
    "\\coth" => named("coth", false),
    "\\csc" => named("csc", false),
    "\\deg" => named("deg", false),
    "\\dim" => named("dim", false),
    "\\exp" => named("exp", false),
    "\\hom" => named("hom", false),
    "\\ker" => named("ker", false),
    "\\lg" => named("lg", false),
    "\\ln" => named("ln", false),
    "\\log" => named("log", false),
    "\\sec" => named("sec", false),
    "\\sin" => named("sin", false),
    "\\sinh" => named("sinh", false),
    "\\tan" => named("tan", false),
    "\\tanh" => named("tanh", false),
    "\\det" => named("det", true),
    "\\gcd" => named("gcd", true),
    "\\inf" => named("inf", true),
    "\\lim" => named("lim", true),
    "\\liminf" => named("lim inf", true),
    "\\limsup" => named("lim sup", true),
    "\\max" => named("max", true),
    "\\min" => named("min", true),
    "\\Pr" => named("Pr", true),
    "\\sup" => named("sup", true),
    // Delimiters usable as plain atoms
    "\\{" => open('{'),
    "\\lbrace" => open('{'),
    "\\}" => close('}'),
    "\\rbrace" => close('}'),
    "\\lbrack" => open('['),
    "\\rbrack" => close(']'),
    "\\langle" => open('\u{27E8}'),
    "\\rangle" => close('\u{27E9}'),
    "\\lfloor" => open('\u{230A}'),
    "\\rfloor" => close('\u{230B}'),
    "\\lceil" => open('\u{2308}'),
    "\\rceil" => close('\u{2309}'),
    "\\lvert" => open('|'),
    "\\rvert" => close('|'),
    "\\lVert" => open('\u{2016}'),
    "\\rVert" => close('\u{2016}'),
    // Fractions
    "\\frac" => cmd(CommandKind::Fraction(FractionKind::Frac)),
    "\\dfrac" => cmd(CommandKind::Fraction(FractionKind::DisplayFrac)),
    "\\tfrac" => cmd(CommandKind::Fraction(FractionKind::TextFrac)),
    "\\binom" => CommandSpec { class: AtomClass::Inner, kind: CommandKind::Fraction(FractionKind::Binom) },
    "\\dbinom" => CommandSpec { class: AtomClass::Inner, kind: CommandKind::Fraction(FractionKind::DisplayBinom) },
    "\\tbinom" => CommandSpec { class: AtomClass::Inner, kind: CommandKind::Fraction(FractionKind::TextBinom) },
    "\\over" => cmd(CommandKind::Infix(FractionKind::Over)),
    "\\atop" => cmd(CommandKind::Infix(FractionKind::Atop)),
    "\\choose" => CommandSpec { class: AtomClass::Inner, kind: CommandKind::Infix(FractionKind::Choose) },
    "\\sqrt" => cmd(CommandKind::Sqrt),
    // Accents
    "\\hat" => cmd(CommandKind::Accent(AccentKind::Hat)),
    "\\widehat" => cmd(CommandKind::Accent(AccentKind::WideHat)),
    "\\tilde" => cmd(CommandKind::Accent(AccentKind::Tilde)),
    "\\widetilde" => cmd(CommandKind::Accent(AccentKind::WideTilde)),
    "\\bar" => cmd(CommandKind::Accent(AccentKind::Bar)),
    "\\vec" => cmd(CommandKind::Accent(AccentKind::Vec)),
    "\\dot" => cmd(CommandKind::Accent(AccentKind::Dot)),
    "\\ddot" => cmd(CommandKind::Accent(AccentKind::Ddot)),
    "\\acute" => cmd(CommandKind::Accent(AccentKind::Acute)),
    "\\grave" => cmd(CommandKind::Accent(AccentKind::Grave)),
    "\\breve" => cmd(CommandKind::Accent(AccentKind::Breve)),
    "\\check" => cmd(CommandKind::Accent(AccentKind::Check)),
    "\\overline" => cmd(CommandKind::Accent(AccentKind::Overline)),
    "\\underline" => cmd(CommandKind::Accent(AccentKind::Underline)),
    "\\overbrace" => CommandSpec { class: AtomClass::Op, kind: CommandKind::Accent(AccentKind::Overbrace) },
    "\\underbrace" => CommandSpec { class: AtomClass::Op, kind: CommandKind::Accent(AccentKind::Underbrace) },
    "\\overrightarrow" => cmd(CommandKind::Accent(AccentKind::OverRightArrow)),
    "\\overleftarrow" => cmd(CommandKind::Accent(AccentKind::OverLeftArrow)),
    // Spaces
    "\\," => cmd(CommandKind::Space(SpaceWidth::Thin)),
    "\\:" => cmd(CommandKind::Space(SpaceWidth::Medium)),
    "\\>" => cmd(CommandKind::Space(SpaceWidth::Medium)),
    "\\;" => cmd(CommandKind::Space(SpaceWidth::Thick)),
    "\\!" => cmd(CommandKind::Space(SpaceWidth::NegativeThin)),
    "\\ " => cmd(CommandKind::Space(SpaceWidth::Interword)),
    "\\quad" => cmd(CommandKind::Space(SpaceWidth::Quad)),
    "\\qquad" => cmd(CommandKind::Space(SpaceWidth::Qquad)),
    // Fonts
    "\\mathrm" => cmd(CommandKind::FontArg(MathVariant::Normal)),
    "\\mathbf" => cmd(CommandKind::FontArg(MathVariant::Bold)),
    "\\mathit" => cmd(CommandKind::FontArg(MathVariant::Italic)),
    "\\boldsymbol" => cmd(CommandKind::FontArg(MathVariant::BoldItalic)),
    "\\mathbb" => cmd(CommandKind::FontArg(MathVariant::DoubleStruck)),
    "\\mathcal" => cmd(CommandKind::FontArg(MathVariant::Script)),
    "\\mathfrak" => cmd(CommandKind::FontArg(MathVariant::Fraktur)),
    "\\mathsf" => cmd(CommandKind::FontArg(MathVariant::SansSerif)),
    "\\mathtt" => cmd(CommandKind::FontArg(MathVariant::Monospace)),
    "\\rm" => cmd(CommandKind::FontSwitch(MathVariant::Normal)),
    "\\bf" => cmd(CommandKind::FontSwitch(MathVariant::Bold)),
    "\\it" => cmd(CommandKind::FontSwitch(MathVariant::Italic)),
    "\\cal" => cmd(CommandKind::FontSwitch(MathVariant::Script)),
    "\\sf" => cmd(CommandKind::FontSwitch(MathVariant::SansSerif)),
    "\\tt" => cmd(CommandKind::FontSwitch(MathVariant::Monospace)),
    "\\displaystyle" => cmd(CommandKind::Style(MathStyle::Display)),
    "\\textstyle" => cmd(CommandKind::Style(MathStyle::Text)),
    "\\scriptstyle" => cmd(CommandKind::Style(MathStyle::Script)),
    "\\scriptscriptstyle" => cmd(CommandKind::Style(MathStyle::ScriptScript)),
    // Text
    "\\text" => cmd(CommandKind::Text(None)),
    "\\mbox" => cmd(CommandKind::Text(None)),
    "\\textrm" => cmd(CommandKind::Text(None)),
    "\\textbf" => cmd(CommandKind::Text(Some(MathVariant::Bold))),
    "\\textit" => cmd(CommandKind::Text(Some(MathVariant::Italic))),
    "\\textsf" => cmd(CommandKind::Text(Some(MathVariant::SansSerif))),
    "\\texttt" => cmd(CommandKind::Text(Some(MathVariant::Monospace))),
    "\\operatorname" => CommandSpec { class: AtomClass::Op, kind: CommandKind::OperatorName },
    // Explicit classes
    "\\mathord" => cmd(CommandKind::Class(AtomClass::Ord)),
    "\\mathop" => CommandSpec { class: AtomClass::Op, kind: CommandKind::Class(AtomClass::Op) },
    "\\mathbin" => CommandSpec { class: AtomClass::Bin, kind: CommandKind::Class(AtomClass::Bin) },
    "\\mathrel" => CommandSpec { class: AtomClass::Rel, kind: CommandKind::Class(AtomClass::Rel) },
    "\\mathopen" => CommandSpec { class: AtomClass::Open, kind: CommandKind::Class(AtomClass::Open) },
    "\\mathclose" => CommandSpec { class: AtomClass::Close, kind: CommandKind::Class(AtomClass::Close) },
    "\\mathpunct" => CommandSpec { class: AtomClass::Punct, kind: CommandKind::Class(AtomClass::Punct) },
    "\\mathinner" => CommandSpec { class: AtomClass::Inner, kind: CommandKind::Class(AtomClass::Inner) },
    // Stacking
    "\\overset" => cmd(CommandKind::Stack(StackKind::Overset)),
    "\\underset" => cmd(CommandKind::Stack(StackKind::Underset)),
    "\\stackrel" => CommandSpec { class: AtomClass::Rel, kind: CommandKind::Stack(StackKind::Stackrel) },
    // Sized delimiters
    "\\big" => cmd(CommandKind::BigDelimiter(DelimSize::Big)),
    "\\Big" => cmd(CommandKind::BigDelimiter(DelimSize::BigCap)),
    "\\bigg" => cmd(CommandKind::BigDelimiter(DelimSize::Bigg)),
    "\\Bigg" => cmd(CommandKind::BigDelimiter(DelimSize::BiggCap)),
    "\\bigl" => CommandSpec { class: AtomClass::Open, kind: CommandKind::BigDelimiter(DelimSize::Big) },
    "\\Bigl" => CommandSpec { class: AtomClass::Open, kind: CommandKind::BigDelimiter(DelimSize::BigCap) },
    "\\biggl" => CommandSpec { class: AtomClass::Open, kind: CommandKind::BigDelimiter(DelimSize::Bigg) },
    "\\Biggl" => CommandSpec { class: AtomClass::Open, kind: CommandKind::BigDelimiter(DelimSize::BiggCap) },
    "\\bigr" => CommandSpec { class: AtomClass::Close, kind: CommandKind::BigDelimiter(DelimSize::Big) },
    "\\Bigr" => CommandSpec { class: AtomClass::Close, kind: CommandKind::BigDelimiter(DelimSize::BigCap) },
    "\\biggr" => CommandSpec { class: AtomClass::Close, kind: CommandKind::BigDelimiter(DelimSize::Bigg) },
    "\\Biggr" => CommandSpec { class: AtomClass::Close, kind: CommandKind::BigDelimiter(DelimSize::BiggCap) },
    "\\bigm" => CommandSpec { class: AtomClass::Rel, kind: CommandKind::BigDelimiter(DelimSize::Big) },
    "\\Bigm" => CommandSpec { class: AtomClass::Rel, kind: CommandKind::BigDelimiter(DelimSize::BigCap) },
    "\\biggm" => CommandSpec { class: AtomClass::Rel, kind: CommandKind::BigDelimiter(DelimSize::Bigg) },
    "\\Biggm" => CommandSpec { class: AtomClass::Rel, kind: CommandKind::BigDelimiter(DelimSize::BiggCap) },
    "\\left" => CommandSpec { class: AtomClass::Inner, kind: CommandKind::Left },
    "\\right" => CommandSpec { class: AtomClass::Inner, kind: CommandKind::Right },
    // Structure
    "\\begin" => cmd(CommandKind::Begin),
    "\\end" => cmd(CommandKind::End),
    "\\limits" => cmd(CommandKind::Limits(true)),
    "\\nolimits" => cmd(CommandKind::Limits(false)),
    "\\\\" => cmd(CommandKind::RowTerminator),
    "\\cr" => cmd(CommandKind::RowTerminator),
    "\\not" => CommandSpec { class: AtomClass::Rel, kind: CommandKind::Not },
};

/// Atom class of printable ASCII characters that may appear in math.
///
/// Letters and digits are [`AtomClass::Ord`] and are not listed. Characters
/// missing from this table and not alphanumeric are illegal in math.
pub static ASCII_CLASSES: phf::Map<char, AtomClass> = phf_map! {
    '+' => AtomClass::Bin,
    '-' => AtomClass::Bin,
    '*' => AtomClass::Bin,
    '=' => AtomClass::Rel,
    '<' => AtomClass::Rel,
    '>' => AtomClass::Rel,
    ':' => AtomClass::Rel,
    ',' => AtomClass::Punct,
    ';' => AtomClass::Punct,
    '(' => AtomClass::Open,
    '[' => AtomClass::Open,
    ')' => AtomClass::Close,
    ']' => AtomClass::Close,
    '!' => AtomClass::Close,
    '?' => AtomClass::Close,
    '/' => AtomClass::Ord,
    '|' => AtomClass::Ord,
    '.' => AtomClass::Ord,
    '@' => AtomClass::Ord,
    '"' => AtomClass::Ord,
    '`' => AtomClass::Ord,
};

/// Delimiters accepted after `\left`, `\right` and the `\big` family, keyed
/// by the token text. `.` is the empty delimiter.
pub static DELIMITERS: phf::Map<&'static str, Option<char>> = phf_map! {
    "." => None,
    "(" => Some('('),
    ")" => Some(')'),
    "[" => Some('['),
    "]" => Some(']'),
    "/" => Some('/'),
    "|" => Some('|'),
    "<" => Some('\u{27E8}'),
    ">" => Some('\u{27E9}'),
    "\\{" => Some('{'),
    "\\}" => Some('}'),
    "\\lbrace" => Some('{'),
    "\\rbrace" => Some('}'),
    "\\lbrack" => Some('['),
    "\\rbrack" => Some(']'),
    "\\|" => Some('\u{2016}'),
    "\\vert" => Some('|'),
    "\\Vert" => Some('\u{2016}'),
    "\\lvert" => Some('|'),
    "\\rvert" => Some('|'),
    "\\lVert" => Some('\u{2016}'),
    "\\rVert" => Some('\u{2016}'),
    "\\langle" => Some('\u{27E8}'),
    "\\rangle" => Some('\u{27E9}'),
    "\\lfloor" => Some('\u{230A}'),
    "\\rfloor" => Some('\u{230B}'),
    "\\lceil" => Some('\u{2308}'),
    "\\rceil" => Some('\u{2309}'),
    "\\backslash" => Some('\\'),
    "\\uparrow" => Some('\u{2191}'),
    "\\downarrow" => Some('\u{2193}'),
    "\\updownarrow" => Some('\u{2195}'),
    "\\Uparrow" => Some('\u{21D1}'),
    "\\Downarrow" => Some('\u{21D3}'),
    "\\Updownarrow" => Some('\u{21D5}'),
};

/// Precomposed negations of relations, used by `\not`.
pub static NEGATIONS: phf::Map<char, char> = phf_map! {
    '=' => '\u{2260}',
    '<' => '\u{226E}',
    '>' => '\u{226F}',
    '\u{2264}' => '\u{2270}',
    '\u{2265}' => '\u{2271}',
    '\u{2208}' => '\u{2209}',
    '\u{220B}' => '\u{220C}',
    '\u{2282}' => '\u{2284}',
    '\u{2283}' => '\u{2285}',
    '\u{2286}' => '\u{2288}',
    '\u{2287}' => '\u{2289}',
    '\u{2261}' => '\u{2262}',
    '\u{223C}' => '\u{2241}',
    '\u{2243}' => '\u{2244}',
    '\u{2245}' => '\u{2247}',
    '\u{2248}' => '\u{2249}',
    '\u{2223}' => '\u{2224}',
    '\u{2225}' => '\u{2226}',
    '\u{227A}' => '\u{2280}',
    '\u{227B}' => '\u{2281}',
    '\u{22A2}' => '\u{22AC}',
    '\u{22A8}' => '\u{22AD}',
    '\u{2190}' => '\u{219A}',
    '\u{2192}' => '\u{219B}',
    '\u{2194}' => '\u{21AE}',
    '\u{21D0}' => '\u{21CD}',
    '\u{21D2}' => '\u{21CF}',
    '\u{21D4}' => '\u{21CE}',
};

/// Legacy texvc shorthands, expanded into standard TeX before parsing.
pub static TEXVC_ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "\\R" => "\\mathbb{R}",
    "\\reals" => "\\mathbb{R}",
    "\\Reals" => "\\mathbb{R}",
    "\\N" => "\\mathbb{N}",
    "\\natnums" => "\\mathbb{N}",
    "\\Z" => "\\mathbb{Z}",
    "\\Q" => "\\mathbb{Q}",
    "\\C" => "\\mathbb{C}",
    "\\Complex" => "\\mathbb{C}",
    "\\cnums" => "\\mathbb{C}",
    "\\H" => "\\mathbb{H}",
    "\\alef" => "\\aleph",
    "\\alefsym" => "\\aleph",
    "\\larr" => "\\leftarrow",
    "\\rarr" => "\\rightarrow",
    "\\lrarr" => "\\leftrightarrow",
    "\\harr" => "\\leftrightarrow",
    "\\Larr" => "\\Leftarrow",
    "\\Rarr" => "\\Rightarrow",
    "\\Lrarr" => "\\Leftrightarrow",
    "\\Harr" => "\\Leftrightarrow",
    "\\lArr" => "\\Leftarrow",
    "\\rArr" => "\\Rightarrow",
    "\\hArr" => "\\Leftrightarrow",
    "\\uarr" => "\\uparrow",
    "\\darr" => "\\downarrow",
    "\\uArr" => "\\Uparrow",
    "\\dArr" => "\\Downarrow",
    "\\Uarr" => "\\Uparrow",
    "\\Darr" => "\\Downarrow",
    "\\empty" => "\\emptyset",
    "\\O" => "\\emptyset",
    "\\exist" => "\\exists",
    "\\isin" => "\\in",
    "\\sub" => "\\subset",
    "\\sube" => "\\subseteq",
    "\\supe" => "\\supseteq",
    "\\and" => "\\land",
    "\\or" => "\\lor",
    "\\bull" => "\\bullet",
    "\\clubs" => "\\clubsuit",
    "\\diamonds" => "\\diamondsuit",
    "\\hearts" => "\\heartsuit",
    "\\spades" => "\\spadesuit",
    "\\image" => "\\Im",
    "\\real" => "\\Re",
    "\\weierp" => "\\wp",
    "\\thetasym" => "\\vartheta",
    "\\plusmn" => "\\pm",
    "\\sdot" => "\\cdot",
    "\\ang" => "\\angle",
    "\\part" => "\\partial",
    "\\infin" => "\\infty",
    "\\lang" => "\\langle",
    "\\rang" => "\\rangle",
    "\\Alpha" => "\\mathrm{A}",
    "\\Beta" => "\\mathrm{B}",
    "\\Epsilon" => "\\mathrm{E}",
    "\\Zeta" => "\\mathrm{Z}",
    "\\Eta" => "\\mathrm{H}",
    "\\Iota" => "\\mathrm{I}",
    "\\Kappa" => "\\mathrm{K}",
    "\\Mu" => "\\mathrm{M}",
    "\\Nu" => "\\mathrm{N}",
    "\\Omicron" => "\\mathrm{O}",
    "\\Rho" => "\\mathrm{P}",
    "\\Tau" => "\\mathrm{T}",
    "\\Chi" => "\\mathrm{X}",
    "\\bold" => "\\mathbf",
    "\\Bbb" => "\\mathbb",
    "\\mathscr" => "\\mathcal",
    "\\hbox" => "\\mbox",
    "\\sgn" => "\\operatorname{sgn}",
    "\\sen" => "\\operatorname{sen}",
};

/// Looks up a control sequence in the command table.
#[must_use]
pub fn lookup_command(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.get(name)
}

/// Looks up a control sequence, returning the table's own `'static` name.
#[must_use]
pub fn lookup_command_entry(name: &str) -> Option<(&'static str, &'static CommandSpec)> {
    COMMANDS.get_entry(name).map(|(key, spec)| (*key, spec))
}

/// Reverse map from a non-ASCII symbol to the command that produces it.
///
/// When several commands produce the same character, the longest name wins
/// (`\leq` over `\le`), ties broken alphabetically.
static SYMBOL_COMMANDS: LazyLock<KeyMap<char, (&'static str, AtomClass)>> = LazyLock::new(|| {
    let mut entries: Vec<(char, &'static str, AtomClass)> = COMMANDS
        .entries()
        .filter_map(|(name, spec)| match spec.kind {
            CommandKind::Symbol(ch) if !ch.is_ascii() => Some((ch, *name, spec.class)),
            _ => None,
        })
        .collect();
    entries.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| b.1.len().cmp(&a.1.len()))
            .then_with(|| a.1.cmp(b.1))
    });
    let mut map = KeyMap::default();
    for (ch, name, class) in entries {
        map.entry(ch).or_insert((name, class));
    }
    map
});

/// Command and class producing the non-ASCII character `ch`, if any.
#[must_use]
pub fn command_for_char(ch: char) -> Option<(&'static str, AtomClass)> {
    SYMBOL_COMMANDS.get(&ch).copied()
}

/// Atom class of a character typed directly into math input.
///
/// Returns `None` for characters that are illegal in math.
#[must_use]
pub fn char_class(ch: char) -> Option<AtomClass> {
    if ch.is_ascii_alphanumeric() {
        return Some(AtomClass::Ord);
    }
    if ch.is_ascii() {
        return ASCII_CLASSES.get(&ch).copied();
    }
    Some(command_for_char(ch).map_or(AtomClass::Ord, |(_, class)| class))
}

/// Whether a large operator symbol takes limits in display style.
///
/// Integrals keep their scripts at the side.
#[must_use]
pub const fn symbol_takes_limits(ch: char) -> bool {
    !matches!(ch, '\u{222B}'..='\u{2233}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_map_prefers_longest_name() {
        assert_eq!(command_for_char('\u{2264}').map(|(n, _)| n), Some("\\leq"));
        assert_eq!(
            command_for_char('\u{2192}').map(|(n, _)| n),
            Some("\\rightarrow")
        );
        assert_eq!(command_for_char('\u{3B1}'), Some(("\\alpha", AtomClass::Ord)));
        assert_eq!(command_for_char('x'), None);
    }

    #[test]
    fn test_char_classes() {
        assert_eq!(char_class('x'), Some(AtomClass::Ord));
        assert_eq!(char_class('7'), Some(AtomClass::Ord));
        assert_eq!(char_class('+'), Some(AtomClass::Bin));
        assert_eq!(char_class('('), Some(AtomClass::Open));
        assert_eq!(char_class('\u{2264}'), Some(AtomClass::Rel));
        assert_eq!(char_class('\u{E9}'), Some(AtomClass::Ord));
        assert_eq!(char_class('$'), None);
        assert_eq!(char_class('#'), None);
        assert_eq!(char_class('\u{7}'), None);
    }

    #[test]
    fn test_arity() {
        let frac = lookup_command("\\frac").unwrap();
        assert_eq!(frac.arity(), Arity { required: 2, optional: false });
        let sqrt = lookup_command("\\sqrt").unwrap();
        assert_eq!(sqrt.arity(), Arity { required: 1, optional: true });
        let alpha = lookup_command("\\alpha").unwrap();
        assert_eq!(alpha.arity().required, 0);
    }

    #[test]
    fn test_aliases_expand_to_known_commands() {
        for (alias, expansion) in TEXVC_ALIASES.entries() {
            assert!(lookup_command(alias).is_none(), "{alias} shadows a command");
            let head = expansion.split('{').next().unwrap();
            assert!(lookup_command(head).is_some(), "{alias} expands to unknown {head}");
        }
    }

    #[test]
    fn test_delimiters_and_negations() {
        assert_eq!(DELIMITERS.get("\\langle"), Some(&Some('\u{27E8}')));
        assert_eq!(DELIMITERS.get("."), Some(&None));
        assert_eq!(NEGATIONS.get(&'='), Some(&'\u{2260}'));
        assert!(symbol_takes_limits('\u{2211}'));
        assert!(!symbol_takes_limits('\u{222B}'));
    }
}
