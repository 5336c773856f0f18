//! Core entry points

use crate::build_mathml::{build_mathml, mathml_document};
use crate::build_tex::{PurifiedTex, build_purified_tex};
use crate::lexer::tokenize;
use crate::parser::{ParseTree, parse};
use crate::types::{ParseError, Settings};
use alloc::string::String;

/// Every output of one translated expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Content of the `<math>` element.
    pub mathml: String,
    /// Purified TeX, both as a document and as the bare expression.
    pub purified_tex: PurifiedTex,
    /// Whether the expression was translated in display style.
    pub display_style: bool,
}

impl Translation {
    /// The MathML wrapped in a `<math>` element.
    #[must_use]
    pub fn mathml_document(&self) -> String {
        mathml_document(&self.mathml, self.display_style)
    }
}

/// Parse an expression and return the parse tree
///
/// The lexer accepts any input; every failure comes from the parser.
pub fn parse_input(input: &str, display_style: bool) -> Result<ParseTree, ParseError> {
    parse(tokenize(input), display_style)
}

/// Translate an expression into MathML and purified TeX in one go.
///
/// `settings.purified_tex.display_math` chooses `\[..\]` or `$..$` in the
/// purified TeX document independently of `display_style`.
///
/// # Examples
///
/// ```
/// use blahtex::{Settings, translate};
///
/// let out = translate(r"\sqrt{3}", false, &Settings::default()).unwrap();
/// assert_eq!(out.mathml, "<msqrt><mn>3</mn></msqrt>");
/// assert_eq!(out.purified_tex.math_only, r"\sqrt{3}");
/// ```
pub fn translate(
    input: &str,
    display_style: bool,
    settings: &Settings,
) -> Result<Translation, ParseError> {
    let tree = parse_input(input, display_style)?;
    translate_tree(&tree, settings)
}

/// Both outputs of an already parsed expression.
pub fn translate_tree(tree: &ParseTree, settings: &Settings) -> Result<Translation, ParseError> {
    let mathml = build_mathml(tree, &settings.mathml, &settings.encoding, settings.indented)?;
    let purified_tex =
        build_purified_tex(tree, &settings.purified_tex, settings.texvc_compatibility)?;
    Ok(Translation {
        mathml,
        purified_tex,
        display_style: tree.display_style,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_both_outputs() {
        let out = translate("\\frac{1}{2}", false, &Settings::default()).unwrap();
        assert_eq!(out.mathml, "<mfrac><mn>1</mn><mn>2</mn></mfrac>");
        assert_eq!(out.purified_tex.math_only, "\\frac{1}{2}");
        assert_eq!(
            out.mathml_document(),
            "<math xmlns=\"http://www.w3.org/1998/Math/MathML\" display=\"inline\">\
             <mfrac><mn>1</mn><mn>2</mn></mfrac></math>"
        );
    }

    #[test]
    fn test_translate_reports_first_error() {
        let err = translate("\\unknown{1}", false, &Settings::default()).unwrap_err();
        assert_eq!(err.code(), "UnrecognisedCommand");
        assert_eq!(err.args(), vec!["\\unknown".to_owned()]);
    }

    #[test]
    fn test_display_style_is_kept() {
        let out = translate("x", true, &Settings::default()).unwrap();
        assert!(out.display_style);
        assert!(out.mathml_document().contains("display=\"block\""));
    }
}
