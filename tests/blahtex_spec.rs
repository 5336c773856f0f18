mod setup;
use blahtex::{
    MathmlEncoding, Session, Settings, SpacingControl,
    build_mathml::mathml_document,
    core::{parse_input, translate},
    parser::{MAX_NESTING, ParseNode},
};
use setup::*;

/// Expressions covering every construct that is rewritten on the way to
/// purified TeX.
const REWRITTEN_INPUTS: [&str; 22] = [
    "",
    "x",
    r"\frac{1}{2}",
    "x^2_i",
    "f'",
    r"\sqrt[3]{x}",
    r"a \over b",
    r"a \atop b",
    r"n \choose k",
    r"\frac{x \atop y}{2}",
    r"\sum_{i=1}^n i",
    r"\R^n",
    r"\not\leq",
    r"\operatorname*{argmax}_x",
    r"\left<x\right>",
    r"\hat{x} + \vec{v}",
    r"{\bf x} y",
    r"a\,b \quad c",
    r"\text{if } x > 0",
    r"\begin{pmatrix} a & b \\ c & d \end{pmatrix}",
    r"x \isin A",
    r"\mathcal{A} \cup \mathfrak{g}",
];

#[test]

// Every function is equivalent to a "describe" block

fn a_parser() {
    it("should not fail on an empty string", || expect!("").to_parse());

    it("should ignore whitespace", || {
        expect!("    x    y    ").to_parse_like("xy")
    });

    it("should ignore whitespace in atom", || {
        expect!("    x   ^ y    ").to_parse()?;
        expect!("x^y").to_parse()
    });

    it("should accept scripts in either order", || {
        expect!("x^2_i").to_parse_like("x_i^2")
    });
}

#[test]
fn an_ord_parser() {
    let expression = "1234|/@.\"`abcdefgzABCDEFGZ";

    it("should not fail", || expect!(expression).to_parse());

    it("should parse the right number of ords", || {
        let tree = parse_input(expression, false)?;
        assert_eq!(tree.root.body.len(), expression.chars().count());
        for node in &tree.root.body {
            assert!(matches!(node, ParseNode::Character(_)));
        }
        Ok(())
    });
}

#[test]
fn a_parser_with_errors() {
    it("should reject unknown commands", || {
        expect!(r"\unknown{1}").not_to_parse_with("UnrecognisedCommand")
    });

    it("should report the command as the argument", || {
        let err = parse_input(r"\unknown{1}", false).unwrap_err();
        assert_eq!(err.args(), vec![r"\unknown".to_owned()]);
        assert_eq!(err.position, Some(0));
        Ok(())
    });

    it("should reject unbalanced groups", || {
        expect!("{x").not_to_parse_with("UnmatchedOpenBrace")?;
        expect!("x}").not_to_parse_with("UnmatchedCloseBrace")?;
        expect!(r"\left( x").not_to_parse_with("UnmatchedLeft")?;
        expect!(r"x \right)").not_to_parse_with("UnmatchedRight")
    });

    it("should reject double scripts", || {
        expect!("x^1^2").not_to_parse_with("DoubleSuperscript")?;
        expect!("x_1_2").not_to_parse_with("DoubleSubscript")
    });

    it("should reject misplaced structure", || {
        expect!(r"a \over b \over c").not_to_parse_with("AmbiguousInfix")?;
        expect!(r"x\limits_2").not_to_parse_with("MisplacedLimits")?;
        expect!("a & b").not_to_parse_with("MisplacedAlignment")?;
        expect!(r"a \\ b").not_to_parse_with("MisplacedRowTerminator")?;
        expect!(r"\not x").not_to_parse_with("IllegalNegation")
    });

    it("should reject bad environments", || {
        expect!(r"\begin{align} x \end{align}").not_to_parse_with("UnrecognisedEnvironment")?;
        expect!(r"\begin{matrix} x").not_to_parse_with("UnmatchedBegin")?;
        expect!(r"\begin{matrix} x \end{pmatrix}").not_to_parse_with("MismatchedBeginAndEnd")?;
        expect!(r"\begin{matrix} a & b \\ c \end{matrix}")
            .not_to_parse_with("InconsistentColumnCount")
    });

    it("should reject illegal characters and final backslashes", || {
        expect!("$x$").not_to_parse_with("IllegalCharacter")?;
        expect!("x\\").not_to_parse_with("IllegalFinalBackslash")
    });
}

#[test]
fn a_mathml_builder() {
    let settings = default_settings();

    it("should build identifiers and numbers", || {
        expect!("x").to_mathml(&settings, "<mi>x</mi>")?;
        expect!("").to_mathml(&settings, "<mrow></mrow>")?;
        expect!("3.14").to_mathml(&settings, "<mn>3.14</mn>")
    });

    it("should build fractions and roots", || {
        expect!(r"\frac{1}{2}").to_mathml(&settings, "<mfrac><mn>1</mn><mn>2</mn></mfrac>")?;
        expect!(r"\sqrt{3}").to_mathml(&settings, "<msqrt><mn>3</mn></msqrt>")
    });

    it("should build scripts", || {
        expect!("x^2_i").to_mathml(
            &settings,
            "<msubsup><mi>x</mi><mi>i</mi><mn>2</mn></msubsup>",
        )
    });

    it("should build fenced matrices", || {
        expect!(r"\begin{bmatrix}1\end{bmatrix}").to_mathml(
            &settings,
            "<mrow><mo fence=\"true\" stretchy=\"true\">[</mo><mtable><mtr><mtd><mn>1</mn></mtd>\
             </mtr></mtable><mo fence=\"true\" stretchy=\"true\">]</mo></mrow>",
        )
    });

    it("should honour strict spacing", || {
        expect!("a=b").to_mathml(
            &spacing_settings(SpacingControl::Strict),
            "<mrow><mi>a</mi><mspace width=\"0.2778em\"/><mo lspace=\"0\" rspace=\"0\">=</mo>\
             <mspace width=\"0.2778em\"/><mi>b</mi></mrow>",
        )
    });

    it("should only add thin spaces in moderate mode", || {
        expect!(r"\sin x").to_mathml(
            &spacing_settings(SpacingControl::Moderate),
            "<mrow><mi>sin</mi><mspace width=\"0.1667em\"/><mi>x</mi></mrow>",
        )
    });

    it("should use plane-1 letters when allowed", || {
        expect!(r"\mathbb{R}").to_mathml(&settings, "<mi>\u{211D}</mi>")?;
        expect!(r"\mathfrak{g}").to_mathml(&settings, "<mi>\u{1D524}</mi>")?;
        expect!(r"\mathfrak{g}").to_mathml(
            &bmp_only_settings(),
            "<mi mathvariant=\"fraktur\">g</mi>",
        )
    });

    it("should reject plane-1 characters it cannot express", || {
        expect!("\u{1F600}").not_to_translate_with(&bmp_only_settings(), "DisallowedPlane1")
    });

    it("should split typed plane-1 letters back when plane 1 is disallowed", || {
        expect!("\u{1D400}").to_mathml(&bmp_only_settings(), "<mi mathvariant=\"bold\">A</mi>")
    });
}

#[test]
fn a_mathml_encoder() {
    it("should write numeric references", || {
        let mut settings = Settings::default();
        settings.encoding.mathml_encoding = MathmlEncoding::Numeric;
        expect!(r"\alpha").to_mathml(&settings, "<mi>&#x3B1;</mi>")
    });

    it("should always escape markup characters", || {
        expect!("a<b").to_mathml(
            &default_settings(),
            "<mrow><mi>a</mi><mo>&lt;</mo><mi>b</mi></mrow>",
        )
    });
}

#[test]
fn a_purified_tex_builder() {
    let settings = default_settings();

    it("should brace every argument", || {
        expect!(r"\frac{1}{2}").to_purified_tex(&settings, r"\frac{1}{2}")?;
        expect!("x^2_i").to_purified_tex(&settings, "x_{i}^{2}")?;
        expect!("").to_purified_tex(&settings, "")
    });

    it("should rewrite infix fractions", || {
        expect!(r"a \over b").to_purified_tex(&settings, r"\frac{a}{b}")
    });

    it("should expand texvc aliases", || {
        expect!(r"\R").to_purified_tex(&settings, r"\mathbb{R}")?;
        expect!(r"x \isin A").to_purified_tex(&settings, r"x\in A")
    });

    it("should apply texvc substitutions only when asked", || {
        expect!(r"\text{a}").to_purified_tex(&settings, r"\text{a}")?;
        expect!(r"\text{a}").to_purified_tex(&texvc_settings(), r"\mbox{a}")
    });

    it("should admit unicode only with the right package", || {
        expect!("\\text{\u{E9}}").not_to_translate_with(&settings, "UcsNotAllowed")?;
        expect!("\\text{\u{6F22}}").not_to_translate_with(&settings, "CjkNotAllowed")?;
        expect!("\\text{\u{E9}}").to_purified_tex(&unicode_settings(), "\\text{\u{E9}}")
    });
}

#[test]
fn a_session() {
    it("should convert to a complete math element", || {
        let mut session = Session::default();
        let math = session.convert(r"\sqrt{3}", false)?;
        assert_eq!(math, mathml_document("<msqrt><mn>3</mn></msqrt>", false));
        Ok(())
    });

    it("should fail cleanly before any parse", || {
        let mut session = Session::default();
        assert_eq!(session.get_mathml().unwrap_err().code(), "NoSuccessfulParse");
        Ok(())
    });

    it("should agree with one-shot translation", || {
        let settings = spacing_settings(SpacingControl::Strict);
        let mut session = Session::new(settings.clone());
        session.process_input(r"\sum_{i=1}^n i", true)?;
        let out = translate(r"\sum_{i=1}^n i", true, &settings)?;
        assert_eq!(session.get_mathml()?, out.mathml);
        assert_eq!(session.get_purified_tex_only()?, out.purified_tex.math_only);
        Ok(())
    });
}

#[test]
fn a_translation() {
    it("should give identical outputs when repeated", || {
        for input in REWRITTEN_INPUTS {
            expect!(input).to_translate_stably(&default_settings())?;
            expect!(input).to_translate_stably(&spacing_settings(SpacingControl::Strict))?;
        }
        Ok(())
    });

    it("should keep each output independent of the other's options", || {
        for input in REWRITTEN_INPUTS {
            expect!(input).to_keep_outputs_independent()?;
        }
        Ok(())
    });

    it("should produce purified TeX that translates to the same MathML", || {
        for input in REWRITTEN_INPUTS {
            expect!(input).to_round_trip(&default_settings())?;
        }
        Ok(())
    });

    it("should write atop in a form it reads back", || {
        expect!(r"a \atop b").to_purified_tex(&default_settings(), r"a\atop b")?;
        expect!(r"a\atop b").to_parse_like(r"a \atop b")
    });
}

#[test]
fn a_nesting_limit() {
    let braces = |n: usize| "{".repeat(n) + "x" + &"}".repeat(n);
    let lefts = |n: usize| r"\left(".repeat(n) + "x" + &r"\right)".repeat(n);
    let roots = |n: usize| r"\sqrt[".repeat(n) + "x" + &"]y".repeat(n);
    // A fraction and its braced numerator are one level each.
    let fracs = |n: usize| r"\frac{".repeat(n) + "x" + &"}{1}".repeat(n);

    it("should translate the deepest accepted nesting", || {
        for deepest in [
            braces(MAX_NESTING - 1),
            lefts(MAX_NESTING - 1),
            roots(MAX_NESTING - 1),
            fracs((MAX_NESTING - 1) / 2),
        ] {
            translate(&deepest, false, &default_settings())?;
            translate(&deepest, true, &spacing_settings(SpacingControl::Strict))?;
        }
        Ok(())
    });

    it("should reject one level more", || {
        for too_deep in [
            braces(MAX_NESTING),
            lefts(MAX_NESTING),
            roots(MAX_NESTING),
            fracs(MAX_NESTING / 2),
        ] {
            expect!(&too_deep).not_to_parse_with("NestingTooDeep")?;
        }
        Ok(())
    });
}
