//! Translation options.
//!
//! The options fall into three independent groups, one per output: the
//! MathML generator ([`MathmlOptions`]), the character-data encoder applied
//! to the MathML text ([`EncodingOptions`]) and the purified TeX generator
//! ([`PurifiedTexOptions`]). [`Settings`] bundles them with the global flags.

use alloc::string::String;
use bon::bon;
use strum::{AsRefStr, EnumString};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How much inter-atom spacing the MathML generator makes explicit.
///
/// Renderers apply their own operator dictionary spacing around `<mo>`
/// elements; this setting decides how much of TeX's spacing table is written
/// out as `<mspace>` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, EnumString)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum SpacingControl {
    /// Every non-zero entry of TeX's spacing table becomes an `<mspace>`,
    /// and every `<mo>` gets `lspace="0" rspace="0"`.
    Strict,
    /// Only thin spaces next to operators, punctuation and inner atoms.
    Moderate,
    /// Leave all implicit spacing to the renderer.
    #[default]
    Relaxed,
}

/// How non-ASCII characters are written into the MathML text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, EnumString)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum MathmlEncoding {
    /// Characters are written as UTF-8.
    #[default]
    Raw,
    /// Every non-ASCII character becomes `&#xHEX;`.
    Numeric,
    /// Short entity names (`&pm;`) where one exists.
    Short,
    /// Long entity names (`&PlusMinus;`) where one exists.
    Long,
}

/// Options for the MathML generator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MathmlOptions {
    /// Spacing policy, see [`SpacingControl`].
    pub spacing_control: SpacingControl,
    /// Use MathML 1 `fontweight`/`fontstyle`/`fontfamily` attributes instead
    /// of `mathvariant` where an equivalent exists.
    pub use_version1_font_attributes: bool,
    /// Emit Mathematical Alphanumeric Symbols (U+1D400 block) for
    /// double-struck, script and fraktur letters.
    pub allow_plane1: bool,
}

#[bon]
impl MathmlOptions {
    /// Creates MathML options, defaulting every unset field.
    #[must_use]
    #[builder]
    pub fn new(
        /// Spacing policy. Defaults to [`SpacingControl::Relaxed`].
        spacing_control: Option<SpacingControl>,
        /// MathML 1 font attributes. Defaults to `false`.
        use_version1_font_attributes: Option<bool>,
        /// Plane-1 letters. Defaults to `true`.
        allow_plane1: Option<bool>,
    ) -> Self {
        Self {
            spacing_control: spacing_control.unwrap_or_default(),
            use_version1_font_attributes: use_version1_font_attributes.unwrap_or(false),
            allow_plane1: allow_plane1.unwrap_or(true),
        }
    }
}

impl Default for MathmlOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Options for writing character data into the MathML text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncodingOptions {
    /// How non-ASCII characters are written.
    pub mathml_encoding: MathmlEncoding,
    /// For [`MathmlEncoding::Short`]/[`MathmlEncoding::Long`]: write
    /// characters without a named entity raw (`true`) or numeric (`false`).
    pub other_encoding_raw: bool,
    /// Whether characters outside the BMP may appear in the output at all.
    pub allow_plane1: bool,
}

#[bon]
impl EncodingOptions {
    /// Creates encoding options, defaulting every unset field.
    #[must_use]
    #[builder]
    pub fn new(
        /// Encoding scheme. Defaults to [`MathmlEncoding::Raw`].
        mathml_encoding: Option<MathmlEncoding>,
        /// Fallback for characters without an entity. Defaults to `true`.
        other_encoding_raw: Option<bool>,
        /// Allow plane-1 characters. Defaults to `true`.
        allow_plane1: Option<bool>,
    ) -> Self {
        Self {
            mathml_encoding: mathml_encoding.unwrap_or_default(),
            other_encoding_raw: other_encoding_raw.unwrap_or(true),
            allow_plane1: allow_plane1.unwrap_or(true),
        }
    }
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Options for the purified TeX generator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PurifiedTexOptions {
    /// Wrap the math in `\[ \]` rather than `$ $` in the full document.
    pub display_math: bool,
    /// Allow non-ASCII characters (loads the `ucs` package when used).
    pub allow_ucs: bool,
    /// Allow CJK characters (loads the `CJK` package when used).
    pub allow_cjk: bool,
    /// Load the `preview` package and wrap the math in a preview environment.
    pub allow_preview: bool,
    /// CJK font family; empty means `min`.
    pub japanese_font: String,
    /// Extra preamble lines inserted before `\begin{document}`.
    pub latex_preamble: String,
    /// Text inserted directly before the math.
    pub latex_before_math: String,
}

#[bon]
impl PurifiedTexOptions {
    /// Creates purified TeX options, defaulting every unset field.
    #[must_use]
    #[builder]
    pub fn new(
        /// `\[ \]` instead of `$ $`.
        display_math: Option<bool>,
        /// Non-ASCII characters through the `ucs` package.
        allow_ucs: Option<bool>,
        /// CJK characters through the `CJK` package.
        allow_cjk: Option<bool>,
        /// The `preview` package.
        allow_preview: Option<bool>,
        /// CJK font family.
        #[builder(into)]
        japanese_font: Option<String>,
        /// Extra preamble.
        #[builder(into)]
        latex_preamble: Option<String>,
        /// Text before the math.
        #[builder(into)]
        latex_before_math: Option<String>,
    ) -> Self {
        Self {
            display_math: display_math.unwrap_or(false),
            allow_ucs: allow_ucs.unwrap_or(false),
            allow_cjk: allow_cjk.unwrap_or(false),
            allow_preview: allow_preview.unwrap_or(false),
            japanese_font: japanese_font.unwrap_or_default(),
            latex_preamble: latex_preamble.unwrap_or_default(),
            latex_before_math: latex_before_math.unwrap_or_default(),
        }
    }

    /// The CJK font family to use, falling back to `min`.
    #[must_use]
    pub fn cjk_font(&self) -> &str {
        if self.japanese_font.is_empty() {
            "min"
        } else {
            &self.japanese_font
        }
    }
}

/// Complete configuration of a translation.
///
/// # Examples
///
/// ```
/// use blahtex::{MathmlOptions, Settings, SpacingControl};
///
/// let settings = Settings::builder()
///     .mathml(
///         MathmlOptions::builder()
///             .spacing_control(SpacingControl::Strict)
///             .build(),
///     )
///     .indented(true)
///     .build();
/// assert!(settings.indented);
/// assert!(settings.encoding.allow_plane1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// MathML generator options.
    pub mathml: MathmlOptions,
    /// MathML character-data options.
    pub encoding: EncodingOptions,
    /// Purified TeX options.
    pub purified_tex: PurifiedTexOptions,
    /// Rewrite purified TeX with the substitutions legacy texvc expects.
    pub texvc_compatibility: bool,
    /// Pretty-print the MathML with newlines and two-space indentation.
    pub indented: bool,
}

#[bon]
impl Settings {
    /// Creates a new [`Settings`] instance, defaulting every unset group.
    #[must_use]
    #[builder]
    pub fn new(
        /// MathML generator options.
        mathml: Option<MathmlOptions>,
        /// MathML character-data options.
        encoding: Option<EncodingOptions>,
        /// Purified TeX options.
        purified_tex: Option<PurifiedTexOptions>,
        /// texvc substitutions. Defaults to `false`.
        texvc_compatibility: Option<bool>,
        /// Indented MathML. Defaults to `false`.
        indented: Option<bool>,
    ) -> Self {
        Self {
            mathml: mathml.unwrap_or_default(),
            encoding: encoding.unwrap_or_default(),
            purified_tex: purified_tex.unwrap_or_default(),
            texvc_compatibility: texvc_compatibility.unwrap_or(false),
            indented: indented.unwrap_or(false),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::builder().build()
    }
}
