//! Stateful translation session
//!
//! A [`Session`] holds the configuration and the parse tree of the most
//! recent successful [`Session::process_input`] call. Outputs are rendered on
//! first request and cached together with the options they were rendered
//! with, so changing [`Session::settings`] between calls re-renders only the
//! outputs whose options changed.

use crate::build_mathml::{build_mathml, mathml_document};
use crate::build_tex::{PurifiedTex, build_purified_tex};
use crate::core::parse_input;
use crate::parser::ParseTree;
use crate::types::{
    EncodingOptions, MathmlOptions, ParseError, ParseErrorKind, PurifiedTexOptions, Settings,
};
use alloc::string::String;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
struct MathmlKey {
    options: MathmlOptions,
    encoding: EncodingOptions,
    indented: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PurifiedKey {
    options: PurifiedTexOptions,
    texvc_compatibility: bool,
}

#[derive(Debug, Clone)]
struct Cached<K, V> {
    key: K,
    value: V,
}

/// Translator state: configuration, last parse and rendered outputs.
///
/// # Examples
///
/// ```
/// use blahtex::Session;
///
/// let mut session = Session::default();
/// session.process_input(r"\sqrt{3}", false).unwrap();
/// assert_eq!(session.get_mathml().unwrap(), "<msqrt><mn>3</mn></msqrt>");
/// assert_eq!(session.get_purified_tex_only().unwrap(), r"\sqrt{3}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Options applied by the next render call.
    pub settings: Settings,
    tree: Option<ParseTree>,
    mathml: Option<Cached<MathmlKey, String>>,
    purified: Option<Cached<PurifiedKey, PurifiedTex>>,
}

fn no_successful_parse() -> ParseError {
    ParseError::new(ParseErrorKind::NoSuccessfulParse)
}

impl Session {
    /// Creates a session with the given settings and no parse.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Parses `input`, replacing the previous parse.
    ///
    /// The display flag is also copied into the purified TeX options, so the
    /// purified document uses `\[..\]` exactly when the MathML is
    /// `display="block"`. On failure the previous parse is discarded as
    /// well, and every output accessor fails until the next success.
    #[instrument(level = "debug", skip(self, input), fields(len = input.len()))]
    pub fn process_input(&mut self, input: &str, display_style: bool) -> Result<(), ParseError> {
        self.mathml = None;
        self.purified = None;
        self.settings.purified_tex.display_math = display_style;
        match parse_input(input, display_style) {
            Ok(tree) => {
                debug!(display_style, "input parsed");
                self.tree = Some(tree);
                Ok(())
            }
            Err(err) => {
                debug!(code = err.code(), "input rejected");
                self.tree = None;
                Err(err)
            }
        }
    }

    /// The parse tree of the last successful [`Session::process_input`].
    #[must_use]
    pub const fn tree(&self) -> Option<&ParseTree> {
        self.tree.as_ref()
    }

    /// The MathML for the current parse, without the `<math>` wrapper.
    pub fn get_mathml(&mut self) -> Result<&str, ParseError> {
        let tree = self.tree.as_ref().ok_or_else(no_successful_parse)?;
        let key = MathmlKey {
            options: self.settings.mathml.clone(),
            encoding: self.settings.encoding.clone(),
            indented: self.settings.indented,
        };
        if self.mathml.as_ref().is_some_and(|cached| cached.key == key) {
            debug!("mathml cache hit");
        } else {
            debug!("rendering mathml");
            let value = build_mathml(tree, &key.options, &key.encoding, key.indented)?;
            self.mathml = Some(Cached { key, value });
        }
        match &self.mathml {
            Some(cached) => Ok(&cached.value),
            None => Err(no_successful_parse()),
        }
    }

    /// The MathML for the current parse inside a `<math>` element whose
    /// `display` attribute follows the parse's display flag.
    pub fn get_mathml_document(&mut self) -> Result<String, ParseError> {
        let display = self.tree.as_ref().is_some_and(|tree| tree.display_style);
        let mathml = self.get_mathml()?;
        Ok(mathml_document(mathml, display))
    }

    fn purified(&mut self) -> Result<&PurifiedTex, ParseError> {
        let tree = self.tree.as_ref().ok_or_else(no_successful_parse)?;
        let key = PurifiedKey {
            options: self.settings.purified_tex.clone(),
            texvc_compatibility: self.settings.texvc_compatibility,
        };
        if self.purified.as_ref().is_some_and(|cached| cached.key == key) {
            debug!("purified tex cache hit");
        } else {
            debug!("rendering purified tex");
            let value = build_purified_tex(tree, &key.options, key.texvc_compatibility)?;
            self.purified = Some(Cached { key, value });
        }
        match &self.purified {
            Some(cached) => Ok(&cached.value),
            None => Err(no_successful_parse()),
        }
    }

    /// The purified TeX for the current parse as a complete LaTeX document.
    pub fn get_purified_tex(&mut self) -> Result<&str, ParseError> {
        Ok(&self.purified()?.full)
    }

    /// The purified TeX for the current parse, expression only.
    pub fn get_purified_tex_only(&mut self) -> Result<&str, ParseError> {
        Ok(&self.purified()?.math_only)
    }

    /// Parses `input` and returns the complete `<math>` element.
    pub fn convert(&mut self, input: &str, display_style: bool) -> Result<String, ParseError> {
        self.process_input(input, display_style)?;
        self.get_mathml_document()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SpacingControl;

    #[test]
    fn test_outputs_need_a_parse() {
        let mut session = Session::default();
        assert_eq!(session.get_mathml().unwrap_err().code(), "NoSuccessfulParse");
        assert_eq!(session.get_purified_tex().unwrap_err().code(), "NoSuccessfulParse");
        assert_eq!(
            session.get_purified_tex_only().unwrap_err().code(),
            "NoSuccessfulParse"
        );
    }

    #[test]
    fn test_failed_parse_discards_previous_tree() {
        let mut session = Session::default();
        session.process_input("x", false).unwrap();
        assert_eq!(session.get_mathml().unwrap(), "<mi>x</mi>");
        let err = session.process_input("\\frac{1}", false).unwrap_err();
        assert_eq!(err.code(), "MissingArgument");
        assert!(session.tree().is_none());
        assert_eq!(session.get_mathml().unwrap_err().code(), "NoSuccessfulParse");
    }

    #[test]
    fn test_cache_follows_settings() {
        let mut session = Session::default();
        session.process_input("a+b", false).unwrap();
        assert_eq!(
            session.get_mathml().unwrap(),
            "<mrow><mi>a</mi><mo>+</mo><mi>b</mi></mrow>"
        );
        session.settings.mathml.spacing_control = SpacingControl::Strict;
        assert!(session.get_mathml().unwrap().contains("<mspace width=\"0.2222em\"/>"));
        session.settings.indented = true;
        assert!(session.get_mathml().unwrap().starts_with("<mrow>\n"));
    }

    #[test]
    fn test_convert_and_documents() {
        let mut session = Session::default();
        assert_eq!(
            session.convert("\\sqrt{3}", false).unwrap(),
            "<math xmlns=\"http://www.w3.org/1998/Math/MathML\" display=\"inline\">\
             <msqrt><mn>3</mn></msqrt></math>"
        );
        session.process_input("x", true).unwrap();
        assert!(session.get_mathml_document().unwrap().contains("display=\"block\""));
        assert!(session.get_purified_tex().unwrap().contains("\\[x\\]"));
        session.settings.texvc_compatibility = true;
        session.process_input("\\text{a}", false).unwrap();
        assert_eq!(session.get_purified_tex_only().unwrap(), "\\mbox{a}");
        assert!(session.get_purified_tex().unwrap().contains("$\\mbox{a}$"));
    }
}
