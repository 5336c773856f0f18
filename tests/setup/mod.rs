use std::panic::{UnwindSafe, catch_unwind};

use blahtex::{
    EncodingOptions, MathmlEncoding, MathmlOptions, ParseError, PurifiedTexOptions, Settings,
    SpacingControl,
    core::{parse_input, translate},
    parser::{ParseNode, ParseNodeCharacter, ParseNodeRow, ParseTree},
};

pub struct TestExpr {
    pub expr: String,
    pub file: &'static str,
    pub line: u32,
    pub code: &'static str,
}

fn strip_character(node: &mut ParseNodeCharacter) {
    node.loc = None;
    if let Some(base) = &mut node.negation_of {
        strip_character(base);
    }
}

fn strip_row(row: &mut ParseNodeRow) {
    for node in &mut row.body {
        strip_positions(node);
    }
}

/// Set all `loc` to None for easier comparison
pub fn strip_positions(node: &mut ParseNode) {
    match node {
        ParseNode::Character(character) => strip_character(character),
        ParseNode::Operator(operator) => operator.loc = None,
        ParseNode::Text(text) => text.loc = None,
        ParseNode::Row(row) => strip_row(row),
        ParseNode::Fraction(fraction) => {
            strip_positions(&mut fraction.numer);
            strip_positions(&mut fraction.denom);
        }
        ParseNode::Sqrt(sqrt) => {
            strip_positions(&mut sqrt.body);
            if let Some(index) = &mut sqrt.index {
                strip_positions(index);
            }
        }
        ParseNode::SupSub(supsub) => {
            strip_positions(&mut supsub.base);
            if let Some(sup) = &mut supsub.sup {
                strip_positions(sup);
            }
            if let Some(sub) = &mut supsub.sub {
                strip_positions(sub);
            }
        }
        ParseNode::Accent(accent) => strip_positions(&mut accent.base),
        ParseNode::Space(_) | ParseNode::BigDelimiter(_) => {}
        ParseNode::Font(font) => strip_row(&mut font.body),
        ParseNode::Styling(styling) => strip_row(&mut styling.body),
        ParseNode::LeftRight(left_right) => strip_row(&mut left_right.body),
        ParseNode::Class(class) => strip_positions(&mut class.body),
        ParseNode::Stack(stack) => {
            strip_positions(&mut stack.annotation);
            strip_positions(&mut stack.base);
        }
        ParseNode::Array(array) => {
            for row in &mut array.rows {
                for cell in row {
                    strip_row(cell);
                }
            }
        }
    }
}

fn stripped(mut tree: ParseTree) -> ParseTree {
    strip_row(&mut tree.root);
    tree
}

impl TestExpr {
    fn describe(&self) -> String {
        format!("{} ({}:{})", self.code, self.file, self.line)
    }

    pub fn to_parse(self) -> Result<(), ParseError> {
        parse_input(&self.expr, false).map(|_| ())
    }

    pub fn not_to_parse_with(self, code: &str) -> Result<(), ParseError> {
        match parse_input(&self.expr, false) {
            Ok(tree) => panic!(
                "expected {} to fail with {code}, parsed as {tree:#?}",
                self.describe()
            ),
            Err(err) => {
                assert_eq!(err.code(), code, "wrong failure for {}: {err}", self.describe());
                Ok(())
            }
        }
    }

    pub fn to_parse_like(self, other: &str) -> Result<(), ParseError> {
        let tree1 = stripped(parse_input(&self.expr, false)?);
        let tree2 = stripped(parse_input(other, false)?);
        assert_eq!(
            tree1, tree2,
            "Parse trees do not match between '{}' and '{}'",
            self.expr, other
        );
        Ok(())
    }

    pub fn to_mathml(self, settings: &Settings, expected: &str) -> Result<(), ParseError> {
        let out = translate(&self.expr, false, settings)?;
        assert_eq!(out.mathml, expected, "MathML of {}", self.describe());
        Ok(())
    }

    pub fn to_purified_tex(self, settings: &Settings, expected: &str) -> Result<(), ParseError> {
        let out = translate(&self.expr, false, settings)?;
        assert_eq!(
            out.purified_tex.math_only, expected,
            "purified TeX of {}",
            self.describe()
        );
        Ok(())
    }

    /// Translating twice with the same settings gives identical outputs.
    pub fn to_translate_stably(self, settings: &Settings) -> Result<(), ParseError> {
        for display in [false, true] {
            let first = translate(&self.expr, display, settings)?;
            let second = translate(&self.expr, display, settings)?;
            assert_eq!(first, second, "repeated translation of {}", self.describe());
        }
        Ok(())
    }

    /// The purified TeX translates back to the same MathML.
    pub fn to_round_trip(self, settings: &Settings) -> Result<(), ParseError> {
        for display in [false, true] {
            let out = translate(&self.expr, display, settings)?;
            let purified = &out.purified_tex.math_only;
            let again = translate(purified, display, settings)?;
            assert_eq!(
                again.mathml,
                out.mathml,
                "MathML of purified {purified:?} from {}",
                self.describe()
            );
        }
        Ok(())
    }

    /// MathML options leave the purified TeX alone and purified TeX options
    /// leave the MathML alone.
    pub fn to_keep_outputs_independent(self) -> Result<(), ParseError> {
        let base = translate(&self.expr, false, &default_settings())?;
        for settings in mathml_variants() {
            let out = translate(&self.expr, false, &settings)?;
            assert_eq!(
                out.purified_tex,
                base.purified_tex,
                "purified TeX of {} under {settings:?}",
                self.describe()
            );
        }
        for settings in purified_variants() {
            let out = translate(&self.expr, false, &settings)?;
            assert_eq!(
                out.mathml,
                base.mathml,
                "MathML of {} under {settings:?}",
                self.describe()
            );
        }
        Ok(())
    }

    pub fn not_to_translate_with(self, settings: &Settings, code: &str) -> Result<(), ParseError> {
        match translate(&self.expr, false, settings) {
            Ok(out) => panic!(
                "expected {} to fail with {code}, got {}",
                self.describe(),
                out.mathml
            ),
            Err(err) => {
                assert_eq!(err.code(), code, "wrong failure for {}: {err}", self.describe());
                Ok(())
            }
        }
    }
}

pub fn expect_impl(expr: &str, file: &'static str, line: u32, code: &'static str) -> TestExpr {
    TestExpr {
        expr: expr.to_owned(),
        file,
        line,
        code,
    }
}

#[macro_export]
macro_rules! expect {
    ($e:expr) => {
        $crate::setup::expect_impl($e, file!(), line!(), stringify!($e))
    };
}

pub fn it<F>(desc: &str, test_fn: F)
where
    F: FnOnce() -> Result<(), ParseError> + UnwindSafe,
{
    match catch_unwind(test_fn) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            panic!(
                "Test '{}' failed with Result::Err: {} (code {}, args {:?})",
                desc,
                e,
                e.code(),
                e.args()
            );
        }
        Err(panic_payload) => {
            let msg = if let Some(s) = panic_payload.downcast_ref::<&str>() {
                (*s).to_owned()
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "<non-string panic payload>".to_owned()
            };
            panic!("Test '{}' panicked: {}", desc, msg);
        }
    }
}

/// Settings helpers
pub fn default_settings() -> Settings {
    Settings::default()
}

pub fn spacing_settings(spacing_control: SpacingControl) -> Settings {
    Settings::builder()
        .mathml(MathmlOptions::builder().spacing_control(spacing_control).build())
        .build()
}

pub fn bmp_only_settings() -> Settings {
    Settings::builder()
        .mathml(MathmlOptions::builder().allow_plane1(false).build())
        .encoding(EncodingOptions::builder().allow_plane1(false).build())
        .build()
}

pub fn texvc_settings() -> Settings {
    Settings::builder().texvc_compatibility(true).build()
}

pub fn unicode_settings() -> Settings {
    Settings::builder()
        .purified_tex(
            PurifiedTexOptions::builder()
                .allow_ucs(true)
                .allow_cjk(true)
                .build(),
        )
        .build()
}

/// Settings that differ from the defaults only in MathML or encoding options.
pub fn mathml_variants() -> Vec<Settings> {
    let mut numeric = default_settings();
    numeric.encoding.mathml_encoding = MathmlEncoding::Numeric;
    let mut long_names = default_settings();
    long_names.encoding.mathml_encoding = MathmlEncoding::Long;
    let mut version1 = default_settings();
    version1.mathml.use_version1_font_attributes = true;
    let mut indented = default_settings();
    indented.indented = true;
    vec![
        spacing_settings(SpacingControl::Strict),
        spacing_settings(SpacingControl::Moderate),
        bmp_only_settings(),
        numeric,
        long_names,
        version1,
        indented,
    ]
}

/// Settings that differ from the defaults only in purified TeX options.
pub fn purified_variants() -> Vec<Settings> {
    let mut display = default_settings();
    display.purified_tex.display_math = true;
    let mut preview = default_settings();
    preview.purified_tex.allow_preview = true;
    preview.purified_tex.latex_preamble = String::from("\\usepackage{bm}");
    vec![texvc_settings(), unicode_settings(), display, preview]
}
