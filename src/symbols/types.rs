use strum::{AsRefStr, EnumIter, IntoStaticStr};

/// TeX's atom classes, which decide the implicit space between neighbours.
///
/// The lowercase name (`"ord"`, `"bin"`, ...) is the key used by the spacing
/// tables in [`crate::spacing_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum AtomClass {
    /// Ordinary symbols: letters, digits, most miscellaneous symbols.
    Ord,
    /// Large operators and named functions: `∑`, `\sin`.
    Op,
    /// Binary operators: `+`, `×`.
    Bin,
    /// Relations: `=`, `≤`, arrows.
    Rel,
    /// Opening delimiters.
    Open,
    /// Closing delimiters.
    Close,
    /// Punctuation.
    Punct,
    /// Delimited subformulas such as `\left( .. \right)`.
    Inner,
}

/// Font variants, named by their MathML `mathvariant` value.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum MathVariant {
    Normal,
    Bold,
    Italic,
    BoldItalic,
    DoubleStruck,
    BoldFraktur,
    Script,
    BoldScript,
    Fraktur,
    SansSerif,
    BoldSansSerif,
    SansSerifItalic,
    SansSerifBoldItalic,
    Monospace,
}

impl MathVariant {
    /// Commands that reproduce this variant in LaTeX, outermost first.
    ///
    /// Variants LaTeX has no font for are approximated by combining
    /// `\boldsymbol` with the nearest plain alphabet.
    #[must_use]
    pub const fn tex_commands(self) -> &'static [&'static str] {
        match self {
            Self::Normal => &["\\mathrm"],
            Self::Bold => &["\\mathbf"],
            Self::Italic => &["\\mathit"],
            Self::BoldItalic => &["\\boldsymbol"],
            Self::DoubleStruck => &["\\mathbb"],
            Self::BoldFraktur => &["\\boldsymbol", "\\mathfrak"],
            Self::Script => &["\\mathcal"],
            Self::BoldScript => &["\\boldsymbol", "\\mathcal"],
            Self::Fraktur => &["\\mathfrak"],
            Self::SansSerif | Self::SansSerifItalic => &["\\mathsf"],
            Self::BoldSansSerif | Self::SansSerifBoldItalic => &["\\boldsymbol", "\\mathsf"],
            Self::Monospace => &["\\mathtt"],
        }
    }

    /// Old-style font switch for this variant, if LaTeX has one.
    #[must_use]
    pub const fn tex_switch(self) -> Option<&'static str> {
        match self {
            Self::Normal => Some("\\rm"),
            Self::Bold => Some("\\bf"),
            Self::Italic => Some("\\it"),
            Self::Script => Some("\\cal"),
            Self::SansSerif => Some("\\sf"),
            Self::Monospace => Some("\\tt"),
            _ => None,
        }
    }
}

/// The four TeX math styles.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MathStyle {
    Display,
    Text,
    Script,
    ScriptScript,
}

impl MathStyle {
    /// Style of superscripts and subscripts attached in this style.
    #[must_use]
    pub const fn script(self) -> Self {
        match self {
            Self::Display | Self::Text => Self::Script,
            Self::Script | Self::ScriptScript => Self::ScriptScript,
        }
    }

    /// Style of the numerator and denominator of a fraction set in this style.
    #[must_use]
    pub const fn fraction(self) -> Self {
        match self {
            Self::Display => Self::Text,
            Self::Text => Self::Script,
            Self::Script | Self::ScriptScript => Self::ScriptScript,
        }
    }

    /// Whether spacing should use the tight table.
    #[must_use]
    pub const fn is_tight(self) -> bool {
        matches!(self, Self::Script | Self::ScriptScript)
    }

    /// MathML `scriptlevel` of this style.
    #[must_use]
    pub const fn script_level(self) -> u8 {
        match self {
            Self::Display | Self::Text => 0,
            Self::Script => 1,
            Self::ScriptScript => 2,
        }
    }

    /// The switch command selecting this style.
    #[must_use]
    pub const fn command(self) -> &'static str {
        match self {
            Self::Display => "\\displaystyle",
            Self::Text => "\\textstyle",
            Self::Script => "\\scriptstyle",
            Self::ScriptScript => "\\scriptscriptstyle",
        }
    }
}

/// Generalized fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FractionKind {
    /// `\frac`
    Frac,
    /// `\dfrac`
    DisplayFrac,
    /// `\tfrac`
    TextFrac,
    /// `\binom`
    Binom,
    /// `\dbinom`
    DisplayBinom,
    /// `\tbinom`
    TextBinom,
    /// Infix `\over`
    Over,
    /// Infix `\atop`
    Atop,
    /// Infix `\choose`
    Choose,
}

impl FractionKind {
    /// Whether a fraction bar is drawn.
    #[must_use]
    pub const fn has_bar(self) -> bool {
        matches!(
            self,
            Self::Frac | Self::DisplayFrac | Self::TextFrac | Self::Over
        )
    }

    /// Whether the fraction is wrapped in parentheses.
    #[must_use]
    pub const fn is_binomial(self) -> bool {
        matches!(
            self,
            Self::Binom | Self::DisplayBinom | Self::TextBinom | Self::Choose
        )
    }

    /// Style forced on the whole fraction, if any.
    #[must_use]
    pub const fn forced_style(self) -> Option<MathStyle> {
        match self {
            Self::DisplayFrac | Self::DisplayBinom => Some(MathStyle::Display),
            Self::TextFrac | Self::TextBinom => Some(MathStyle::Text),
            _ => None,
        }
    }
}

/// Accents and over/under decorations.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccentKind {
    Hat,
    WideHat,
    Tilde,
    WideTilde,
    Bar,
    Vec,
    Dot,
    Ddot,
    Acute,
    Grave,
    Breve,
    Check,
    Overline,
    Underline,
    Overbrace,
    Underbrace,
    OverRightArrow,
    OverLeftArrow,
}

impl AccentKind {
    /// The character drawn as the accent.
    #[must_use]
    pub const fn mark(self) -> char {
        match self {
            Self::Hat | Self::WideHat => '^',
            Self::Tilde | Self::WideTilde => '~',
            Self::Bar => '\u{AF}',
            Self::Vec => '\u{2192}',
            Self::Dot => '\u{2D9}',
            Self::Ddot => '\u{A8}',
            Self::Acute => '\u{B4}',
            Self::Grave => '`',
            Self::Breve => '\u{2D8}',
            Self::Check => '\u{2C7}',
            Self::Overline => '\u{AF}',
            Self::Underline => '_',
            Self::Overbrace => '\u{23DE}',
            Self::Underbrace => '\u{23DF}',
            Self::OverRightArrow => '\u{2192}',
            Self::OverLeftArrow => '\u{2190}',
        }
    }

    /// Whether the mark goes below the base.
    #[must_use]
    pub const fn is_under(self) -> bool {
        matches!(self, Self::Underline | Self::Underbrace)
    }

    /// Whether the mark stretches to the width of the base.
    #[must_use]
    pub const fn is_stretchy(self) -> bool {
        matches!(
            self,
            Self::WideHat
                | Self::WideTilde
                | Self::Overline
                | Self::Underline
                | Self::Overbrace
                | Self::Underbrace
                | Self::OverRightArrow
                | Self::OverLeftArrow
        )
    }

    /// Braces take limits like a large operator.
    #[must_use]
    pub const fn takes_limits(self) -> bool {
        matches!(self, Self::Overbrace | Self::Underbrace)
    }
}

/// Explicit spacing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceWidth {
    /// `\,` (3mu)
    Thin,
    /// `\:` and `\>` (4mu)
    Medium,
    /// `\;` (5mu)
    Thick,
    /// `\!` (-3mu)
    NegativeThin,
    /// `\ ` and `~`
    Interword,
    /// `\quad`
    Quad,
    /// `\qquad`
    Qquad,
}

impl SpaceWidth {
    /// Width in ems.
    #[must_use]
    pub fn em(self) -> f64 {
        match self {
            Self::Thin => 3.0 / 18.0,
            Self::Medium => 4.0 / 18.0,
            Self::Thick => 5.0 / 18.0,
            Self::NegativeThin => -3.0 / 18.0,
            Self::Interword => 1.0 / 3.0,
            Self::Quad => 1.0,
            Self::Qquad => 2.0,
        }
    }
}

/// `\overset`, `\underset` and `\stackrel`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackKind {
    Overset,
    Underset,
    Stackrel,
}

/// Sizes of the `\big` family.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelimSize {
    Big,
    BigCap,
    Bigg,
    BiggCap,
}

impl DelimSize {
    /// Height of the delimiter in ems.
    #[must_use]
    pub const fn em(self) -> f64 {
        match self {
            Self::Big => 1.2,
            Self::BigCap => 1.8,
            Self::Bigg => 2.4,
            Self::BiggCap => 3.0,
        }
    }
}

/// What a control sequence does once the parser meets it.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// A single symbol.
    Symbol(char),
    /// A named operator such as `\sin`; `limits` is the display-style default.
    Operator {
        name: &'static str,
        limits: bool,
    },
    Fraction(FractionKind),
    Sqrt,
    Accent(AccentKind),
    Space(SpaceWidth),
    /// Font command taking one argument, e.g. `\mathbf`.
    FontArg(MathVariant),
    /// Font switch lasting to the end of the group, e.g. `\bf`.
    FontSwitch(MathVariant),
    Style(MathStyle),
    /// `\text`-family command; the variant is applied to the text.
    Text(Option<MathVariant>),
    OperatorName,
    /// `\mathrel` and friends.
    Class(AtomClass),
    Infix(FractionKind),
    Stack(StackKind),
    BigDelimiter(DelimSize),
    Left,
    Right,
    Begin,
    End,
    /// `\limits` (`true`) or `\nolimits` (`false`).
    Limits(bool),
    /// `\\` and `\cr`
    RowTerminator,
    Not,
}

/// Number of arguments a command reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    /// Required arguments (a single token or a braced group each).
    pub required: u8,
    /// Whether a bracketed optional argument may come first.
    pub optional: bool,
}

/// Entry of the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Spacing class of the atom the command produces.
    pub class: AtomClass,
    /// Behaviour of the command.
    pub kind: CommandKind,
}

impl CommandSpec {
    /// Arguments read after the command name.
    ///
    /// Delimiter commands read their delimiter separately and report zero.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        let (required, optional) = match self.kind {
            CommandKind::Fraction(_) | CommandKind::Stack(_) => (2, false),
            CommandKind::Sqrt => (1, true),
            CommandKind::Accent(_)
            | CommandKind::FontArg(_)
            | CommandKind::Text(_)
            | CommandKind::OperatorName
            | CommandKind::Class(_)
            | CommandKind::Begin
            | CommandKind::End => (1, false),
            _ => (0, false),
        };
        Arity { required, optional }
    }
}
