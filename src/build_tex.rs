//! Purified TeX generation
//!
//! Purified TeX re-emits the parse tree using only commands that a stock
//! LaTeX installation with the AMS packages understands. Every argument and
//! script is braced and every command is written out under the name that
//! produced it, so the result can be fed to LaTeX without further checks.
//!
//! Non-ASCII characters are admitted according to [`PurifiedTexOptions`]:
//! symbols with a command are written as that command, CJK text needs the
//! `CJK` package and anything else needs `ucs`. The full document loads
//! those packages only when the expression actually uses them.

use crate::parser::{
    Delimiter, Environment, ParseNode, ParseNodeArray, ParseNodeCharacter, ParseNodeFraction,
    ParseNodeOperator, ParseNodeSupSub, ParseNodeText, ParseTree,
};
use crate::symbols::{FractionKind, SpaceWidth, command_for_char};
use crate::types::{
    ErrorLocationProvider, ParseError, ParseErrorKind, PurifiedTexOptions, code_point_label,
};
use crate::wide_character::is_plane1;
use alloc::string::String;

/// The two purified TeX outputs of one expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PurifiedTex {
    /// A complete LaTeX document typesetting the expression.
    pub full: String,
    /// The expression alone, without math delimiters.
    pub math_only: String,
}

/// Builds purified TeX for `tree`.
///
/// With `texvc_compatibility` set, a handful of commands are rewritten into
/// the forms legacy texvc installations expect (`\text` becomes `\mbox`,
/// `\operatorname` becomes `\mathop{\mathrm{..}}` and so on).
///
/// # Examples
///
/// ```
/// use blahtex::PurifiedTexOptions;
/// use blahtex::build_tex::build_purified_tex;
/// use blahtex::lexer::tokenize;
/// use blahtex::parser::parse;
///
/// let tree = parse(tokenize("x^2_i"), false).unwrap();
/// let tex = build_purified_tex(&tree, &PurifiedTexOptions::default(), false).unwrap();
/// assert_eq!(tex.math_only, "x_{i}^{2}");
/// assert!(tex.full.contains("$x_{i}^{2}$"));
/// ```
pub fn build_purified_tex(
    tree: &ParseTree,
    options: &PurifiedTexOptions,
    texvc_compatibility: bool,
) -> Result<PurifiedTex, ParseError> {
    let mut writer = TexWriter {
        options,
        texvc_compatibility,
        out: String::new(),
        after_control_word: false,
        uses_ucs: false,
        uses_cjk: false,
    };
    for node in &tree.root.body {
        writer.write_node(node)?;
    }
    let full = writer.document();
    Ok(PurifiedTex {
        full,
        math_only: writer.out,
    })
}

/// Whether `ch` belongs to one of the CJK blocks handled by the `CJK`
/// package.
#[must_use]
pub const fn is_cjk(ch: char) -> bool {
    matches!(
        ch,
        '\u{1100}'..='\u{11FF}'
            | '\u{2E80}'..='\u{2FDF}'
            | '\u{3000}'..='\u{303F}'
            | '\u{3040}'..='\u{30FF}'
            | '\u{3100}'..='\u{31FF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{AC00}'..='\u{D7AF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{FF00}'..='\u{FFEF}'
    )
}

struct TexWriter<'a> {
    options: &'a PurifiedTexOptions,
    texvc_compatibility: bool,
    out: String,
    /// The output ends in a control word, so a following letter needs a space.
    after_control_word: bool,
    uses_ucs: bool,
    uses_cjk: bool,
}

impl TexWriter<'_> {
    fn push(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.after_control_word && text.starts_with(|ch: char| ch.is_ascii_alphabetic()) {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.after_control_word = text
            .rsplit_once('\\')
            .is_some_and(|(_, word)| !word.is_empty() && word.chars().all(|ch| ch.is_ascii_alphabetic()));
    }

    fn push_char(&mut self, ch: char) {
        let mut buf = [0; 4];
        self.push(ch.encode_utf8(&mut buf));
    }

    /// `{` node `}`, without doubling the braces of an explicit group.
    fn write_argument(&mut self, node: &ParseNode) -> Result<(), ParseError> {
        self.push("{");
        self.write_inner(node)?;
        self.push("}");
        Ok(())
    }

    fn write_inner(&mut self, node: &ParseNode) -> Result<(), ParseError> {
        match node {
            ParseNode::Row(row) => self.write_row(&row.body),
            node => self.write_node(node),
        }
    }

    fn write_row(&mut self, nodes: &[ParseNode]) -> Result<(), ParseError> {
        for node in nodes {
            self.write_node(node)?;
        }
        Ok(())
    }

    fn write_node(&mut self, node: &ParseNode) -> Result<(), ParseError> {
        match node {
            ParseNode::Character(ch) => self.write_character(ch)?,
            ParseNode::Operator(op) => self.write_operator(op)?,
            ParseNode::Text(text) => self.write_text(text)?,
            ParseNode::Row(row) => {
                self.push("{");
                self.write_row(&row.body)?;
                self.push("}");
            }
            ParseNode::Fraction(frac) => self.write_fraction(frac)?,
            ParseNode::Sqrt(sqrt) => {
                self.push("\\sqrt");
                if let Some(index) = &sqrt.index {
                    self.push("[");
                    self.write_inner(index)?;
                    self.push("]");
                }
                self.write_argument(&sqrt.body)?;
            }
            ParseNode::SupSub(supsub) => self.write_supsub(supsub)?,
            ParseNode::Accent(accent) => {
                self.push(accent.command);
                self.write_argument(&accent.base)?;
            }
            ParseNode::Space(space) => {
                let command = if self.texvc_compatibility && space.width == SpaceWidth::Medium {
                    "\\>"
                } else {
                    space.command
                };
                self.push(command);
            }
            ParseNode::Font(font) if font.is_switch => {
                self.push(font.command);
                self.write_row(&font.body.body)?;
            }
            ParseNode::Font(font) => {
                self.push(font.command);
                self.push("{");
                self.write_row(&font.body.body)?;
                self.push("}");
            }
            ParseNode::Styling(styling) => {
                self.push(styling.style.command());
                self.write_row(&styling.body.body)?;
            }
            ParseNode::LeftRight(left_right) => {
                self.push("\\left");
                self.write_delimiter(left_right.left);
                self.write_row(&left_right.body.body)?;
                self.push("\\right");
                self.write_delimiter(left_right.right);
            }
            ParseNode::BigDelimiter(big) => {
                self.push(big.command);
                self.write_delimiter(big.delimiter);
            }
            ParseNode::Class(class) => {
                self.push(class.command);
                self.write_argument(&class.body)?;
            }
            ParseNode::Stack(stack) => {
                self.push(stack.command);
                self.write_argument(&stack.annotation)?;
                self.write_argument(&stack.base)?;
            }
            ParseNode::Array(array) => self.write_array(array)?,
        }
        Ok(())
    }

    fn write_delimiter(&mut self, delimiter: Delimiter) {
        self.push(delimiter.name);
    }

    fn write_character(&mut self, node: &ParseNodeCharacter) -> Result<(), ParseError> {
        if let Some(base) = &node.negation_of {
            self.push("\\not");
            return self.write_character(base);
        }
        // Typed plane-1 letters and their letterlike stand-ins were split at
        // parse time; the variant has to be spelled out again.
        if node.styled_input
            && let Some(variant) = node.variant
        {
            let commands = variant.tex_commands();
            for command in commands {
                self.push(command);
                self.push("{");
            }
            self.push_char(node.ch);
            for _ in commands {
                self.push("}");
            }
            return Ok(());
        }
        if let Some(command) = node.command {
            self.push(command);
            return Ok(());
        }
        if node.ch.is_ascii() {
            self.push_char(node.ch);
            return Ok(());
        }
        if let Some((command, _)) = command_for_char(node.ch) {
            self.push(command);
            return Ok(());
        }
        self.admit(node.ch, node)?;
        if is_cjk(node.ch) {
            self.push("\\mbox{");
            self.push_char(node.ch);
            self.push("}");
        } else {
            self.push_char(node.ch);
        }
        Ok(())
    }

    /// Checks that a non-ASCII character with no command may be written raw,
    /// recording which package it needs.
    fn admit(&mut self, ch: char, location: &dyn ErrorLocationProvider) -> Result<(), ParseError> {
        let code = code_point_label(ch);
        if is_plane1(ch) {
            return Err(ParseError::with_token(
                ParseErrorKind::NoPurifiedTexEquivalent { character: ch, code },
                location,
            ));
        }
        if is_cjk(ch) {
            if !self.options.allow_cjk {
                return Err(ParseError::with_token(
                    ParseErrorKind::CjkNotAllowed { character: ch, code },
                    location,
                ));
            }
            self.uses_cjk = true;
        } else {
            if !self.options.allow_ucs {
                return Err(ParseError::with_token(
                    ParseErrorKind::UcsNotAllowed { character: ch, code },
                    location,
                ));
            }
            self.uses_ucs = true;
        }
        Ok(())
    }

    fn write_operator(&mut self, op: &ParseNodeOperator) -> Result<(), ParseError> {
        if let Some(command) = op.command {
            self.push(command);
            return Ok(());
        }
        if self.texvc_compatibility {
            self.push("\\mathop{\\mathrm{");
            self.write_escaped(&op.name, op)?;
            self.push("}}");
        } else {
            self.push(if op.starred {
                "\\operatorname*{"
            } else {
                "\\operatorname{"
            });
            self.write_escaped(&op.name, op)?;
            self.push("}");
        }
        Ok(())
    }

    fn write_text(&mut self, text: &ParseNodeText) -> Result<(), ParseError> {
        let command = if self.texvc_compatibility && text.command == "\\text" {
            "\\mbox"
        } else {
            text.command
        };
        self.push(command);
        self.push("{");
        self.write_escaped(&text.text, text)?;
        self.push("}");
        Ok(())
    }

    /// Writes text-mode content, escaping the characters LaTeX treats
    /// specially.
    fn write_escaped(&mut self, text: &str, location: &dyn ErrorLocationProvider) -> Result<(), ParseError> {
        for ch in text.chars() {
            match ch {
                '{' | '}' | '#' | '$' | '%' | '&' | '_' => {
                    self.push("\\");
                    self.push_char(ch);
                }
                '^' => self.push("\\^{}"),
                '~' => self.push("\\~{}"),
                '\\' => self.push("\\textbackslash{}"),
                '\u{A0}' => self.push("~"),
                ch if ch.is_ascii() => self.push_char(ch),
                ch => {
                    self.admit(ch, location)?;
                    self.push_char(ch);
                }
            }
        }
        Ok(())
    }

    fn write_fraction(&mut self, frac: &ParseNodeFraction) -> Result<(), ParseError> {
        if frac.kind == FractionKind::Atop {
            // An infix fraction is the only node of its row, and the row is
            // already delimited by whatever holds it.
            self.write_inner(&frac.numer)?;
            self.push("\\atop");
            self.write_inner(&frac.denom)?;
            return Ok(());
        }
        let texvc_style = match frac.kind {
            FractionKind::DisplayFrac if self.texvc_compatibility => Some("\\displaystyle"),
            FractionKind::TextFrac if self.texvc_compatibility => Some("\\textstyle"),
            _ => None,
        };
        if let Some(style) = texvc_style {
            self.push("{");
            self.push(style);
            self.push("\\frac");
        } else {
            match frac.kind {
                FractionKind::Over => self.push("\\frac"),
                FractionKind::Choose => self.push("\\binom"),
                _ => self.push(frac.command),
            }
        }
        self.write_argument(&frac.numer)?;
        self.write_argument(&frac.denom)?;
        if texvc_style.is_some() {
            self.push("}");
        }
        Ok(())
    }

    fn write_supsub(&mut self, supsub: &ParseNodeSupSub) -> Result<(), ParseError> {
        match &supsub.base {
            ParseNode::Row(row) if row.is_empty() => self.push("{}"),
            base => self.write_node(base)?,
        }
        match supsub.explicit_limits {
            Some(true) => self.push("\\limits"),
            Some(false) => self.push("\\nolimits"),
            None => {}
        }
        if let Some(sub) = &supsub.sub {
            self.push("_");
            self.write_argument(sub)?;
        }
        if let Some(sup) = &supsub.sup {
            self.push("^");
            self.write_argument(sup)?;
        }
        Ok(())
    }

    fn write_array(&mut self, array: &ParseNodeArray) -> Result<(), ParseError> {
        let name = array.environment.as_ref();
        self.push("\\begin{");
        self.push(name);
        self.push("}");
        if array.environment == Environment::Array
            && let Some(spec) = &array.column_spec
        {
            self.push("{");
            self.push(spec);
            self.push("}");
        }
        for (i, row) in array.rows.iter().enumerate() {
            if i > 0 {
                self.push("\\\\");
            }
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    self.push("&");
                }
                self.write_row(&cell.body)?;
            }
        }
        self.push("\\end{");
        self.push(name);
        self.push("}");
        Ok(())
    }

    /// The complete LaTeX document around the math.
    fn document(&self) -> String {
        let options = self.options;
        let mut doc = String::from("\\nonstopmode\n\\documentclass[12pt]{article}\n");
        if self.uses_ucs {
            doc.push_str("\\usepackage{ucs}\n\\usepackage[utf8x]{inputenc}\n");
        }
        doc.push_str("\\usepackage{amsmath}\n\\usepackage{amsfonts}\n\\usepackage{amssymb}\n");
        if self.uses_cjk {
            doc.push_str("\\usepackage{CJK}\n");
        }
        if options.allow_preview {
            doc.push_str("\\usepackage[active]{preview}\n");
        }
        if !options.latex_preamble.is_empty() {
            doc.push_str(&options.latex_preamble);
            doc.push('\n');
        }
        doc.push_str("\\pagestyle{empty}\n\\begin{document}\n");
        if self.uses_cjk {
            doc.push_str(&format!("\\begin{{CJK}}{{UTF8}}{{{}}}\n", options.cjk_font()));
        }
        if options.allow_preview {
            doc.push_str("\\begin{preview}\n");
        }
        doc.push_str(&options.latex_before_math);
        if options.display_math {
            doc.push_str(&format!("\\[{}\\]\n", self.out));
        } else {
            doc.push_str(&format!("${}$\n", self.out));
        }
        if options.allow_preview {
            doc.push_str("\\end{preview}\n");
        }
        if self.uses_cjk {
            doc.push_str("\\end{CJK}\n");
        }
        doc.push_str("\\end{document}\n");
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn purify_with(
        input: &str,
        options: &PurifiedTexOptions,
        texvc: bool,
    ) -> Result<PurifiedTex, ParseError> {
        let tree = parse(tokenize(input), false)?;
        build_purified_tex(&tree, options, texvc)
    }

    fn purify(input: &str) -> String {
        purify_with(input, &PurifiedTexOptions::default(), false)
            .unwrap()
            .math_only
    }

    #[test]
    fn test_arguments_are_braced() {
        assert_eq!(purify(""), "");
        assert_eq!(purify("\\frac12"), "\\frac{1}{2}");
        assert_eq!(purify("x^2_i"), "x_{i}^{2}");
        assert_eq!(purify("{ab}^{c}"), "{ab}^{c}");
        assert_eq!(purify("^2"), "{}^{2}");
        assert_eq!(purify("\\sqrt[3]{x}"), "\\sqrt[3]{x}");
        assert_eq!(purify("f'"), "f^{\\prime}");
    }

    #[test]
    fn test_control_words_are_separated() {
        assert_eq!(purify("\\alpha x"), "\\alpha x");
        assert_eq!(purify("\\alpha\\beta"), "\\alpha\\beta");
        assert_eq!(purify("\\sin x"), "\\sin x");
        assert_eq!(purify("{\\bf x}y"), "{\\bf x}y");
        assert_eq!(purify("a\\,b"), "a\\,b");
    }

    #[test]
    fn test_infix_and_negation() {
        assert_eq!(purify("a \\over b"), "\\frac{a}{b}");
        assert_eq!(purify("n \\choose k"), "\\binom{n}{k}");
        assert_eq!(purify("a \\atop b"), "a\\atop b");
        assert_eq!(purify("\\frac{x \\atop y}{2}"), "\\frac{x\\atop y}{2}");
        assert_eq!(purify("\\left(n \\atop k\\right)"), "\\left(n\\atop k\\right)");
        assert_eq!(purify("\\not="), "\\not=");
        assert_eq!(purify("\\sum\\limits_{i}"), "\\sum\\limits_{i}");
    }

    #[test]
    fn test_delimiters_and_environments() {
        assert_eq!(purify("\\left(x\\right)"), "\\left(x\\right)");
        assert_eq!(
            purify("\\begin{pmatrix}a&b\\\\c&d\\end{pmatrix}"),
            "\\begin{pmatrix}a&b\\\\c&d\\end{pmatrix}"
        );
        assert_eq!(
            purify("\\begin{array}{l|r}a&b\\end{array}"),
            "\\begin{array}{l|r}a&b\\end{array}"
        );
    }

    #[test]
    fn test_text_escaping() {
        assert_eq!(purify("\\text{a_b \\% c}"), "\\text{a\\_b \\% c}");
        assert_eq!(purify("\\text{x^y}"), "\\text{x\\^{}y}");
        assert_eq!(purify("\\operatorname*{argmax}_x"), "\\operatorname*{argmax}_{x}");
    }

    #[test]
    fn test_styled_input_is_spelled_out() {
        assert_eq!(purify("\u{211D}"), "\\mathbb{R}");
        assert_eq!(purify("\\mathbb{R}"), "\\mathbb{R}");
    }

    #[test]
    fn test_texvc_substitutions() {
        let options = PurifiedTexOptions::default();
        let texvc = |input| purify_with(input, &options, true).unwrap().math_only;
        assert_eq!(texvc("\\text{a}"), "\\mbox{a}");
        assert_eq!(texvc("\\operatorname{sgn}x"), "\\mathop{\\mathrm{sgn}}x");
        assert_eq!(texvc("\\dfrac{a}{b}"), "{\\displaystyle\\frac{a}{b}}");
        assert_eq!(texvc("a\\:b"), "a\\>b");
    }

    #[test]
    fn test_unicode_admission() {
        let err = purify_with("\\text{\u{E9}}", &PurifiedTexOptions::default(), false).unwrap_err();
        assert_eq!(err.code(), "UcsNotAllowed");
        assert_eq!(err.args(), vec!["\u{E9}".to_owned(), "U+00E9".to_owned()]);

        let err = purify_with("\\text{\u{6F22}}", &PurifiedTexOptions::default(), false).unwrap_err();
        assert_eq!(err.code(), "CjkNotAllowed");

        let ucs = PurifiedTexOptions::builder().allow_ucs(true).build();
        let tex = purify_with("\\text{\u{E9}}", &ucs, false).unwrap();
        assert_eq!(tex.math_only, "\\text{\u{E9}}");
        assert!(tex.full.contains("\\usepackage{ucs}\n\\usepackage[utf8x]{inputenc}\n"));

        let cjk = PurifiedTexOptions::builder().allow_cjk(true).build();
        let tex = purify_with("\\text{\u{6F22}}", &cjk, false).unwrap();
        assert!(tex.full.contains("\\usepackage{CJK}\n"));
        assert!(tex.full.contains("\\begin{CJK}{UTF8}{min}\n"));
        assert!(tex.full.contains("\\end{CJK}\n"));

        let gothic = PurifiedTexOptions::builder()
            .allow_cjk(true)
            .japanese_font("goth")
            .display_math(true)
            .build();
        let tex = purify_with("\\text{\u{6F22}}", &gothic, false).unwrap();
        let opening = format!(
            "\\begin{{document}}\n\\begin{{CJK}}{{UTF8}}{{goth}}\n\\[{}\\]\n",
            tex.math_only
        );
        assert!(tex.full.contains(&opening));
    }

    #[test]
    fn test_full_document() {
        let tex = purify_with("x", &PurifiedTexOptions::default(), false).unwrap();
        assert_eq!(
            tex.full,
            "\\nonstopmode\n\\documentclass[12pt]{article}\n\\usepackage{amsmath}\n\
             \\usepackage{amsfonts}\n\\usepackage{amssymb}\n\\pagestyle{empty}\n\
             \\begin{document}\n$x$\n\\end{document}\n"
        );

        let options = PurifiedTexOptions::builder()
            .display_math(true)
            .allow_preview(true)
            .latex_preamble("\\usepackage{color}")
            .latex_before_math("\\color{red}")
            .build();
        let tex = purify_with("x", &options, false).unwrap();
        assert!(tex.full.contains("\\usepackage[active]{preview}\n\\usepackage{color}\n"));
        assert!(tex.full.contains("\\begin{preview}\n\\color{red}\\[x\\]\n\\end{preview}\n"));
    }
}
