//! blahtex: TeX math to MathML and purified TeX
//!
//! This crate translates a TeX math expression into two outputs:
//!
//! - MathML presentation markup, with configurable inter-atom spacing, font
//!   attributes and character encoding
//! - *purified TeX*, a restricted rewrite of the expression that only uses
//!   commands from LaTeX and the AMS packages, either alone or wrapped in a
//!   complete document ready for a LaTeX run
//!
//! The pipeline is lexer, parser, parse tree, then one generator per output.
//! Everything is synchronous and performs no I/O; the static command tables
//! are immutable and may be shared between threads.
//!
//! # Examples
//!
//! One-shot translation:
//!
//! ```rust
//! use blahtex::{Settings, translate};
//!
//! let out = translate(r"x^2_i", false, &Settings::default()).unwrap();
//! assert_eq!(out.mathml, "<msubsup><mi>x</mi><mi>i</mi><mn>2</mn></msubsup>");
//! assert_eq!(out.purified_tex.math_only, "x_{i}^{2}");
//! ```
//!
//! A [`Session`] keeps the last parse and renders outputs on demand:
//!
//! ```rust
//! use blahtex::{Session, SpacingControl};
//!
//! let mut session = Session::default();
//! session.settings.mathml.spacing_control = SpacingControl::Moderate;
//! let math = session.convert(r"\sin x", false).unwrap();
//! assert!(math.starts_with("<math xmlns="));
//! ```
//!
//! Errors carry a stable code and ordered arguments:
//!
//! ```rust
//! use blahtex::{Settings, translate};
//!
//! let err = translate(r"\unknown{1}", false, &Settings::default()).unwrap_err();
//! assert_eq!(err.code(), "UnrecognisedCommand");
//! assert_eq!(err.args(), vec![r"\unknown".to_owned()]);
//! ```
#![warn(missing_docs)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::str_to_string)]
#![warn(clippy::non_ascii_literal)]
#![warn(clippy::pointer_format)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::absolute_paths)]
#![warn(clippy::panic)]
#![warn(clippy::expect_used)]
#![warn(clippy::unwrap_in_result)]
#![warn(clippy::if_then_some_else_none)]
#![warn(clippy::unused_trait_names)]
#![warn(clippy::get_unwrap)]
#![warn(clippy::impl_trait_in_params)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::unimplemented)]
#![warn(clippy::return_and_then)]
#![warn(clippy::needless_raw_strings)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::rc_buffer)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::map_with_unused_argument_over_ranges)]
#![warn(clippy::missing_asserts_for_indexing)]
#![warn(clippy::separated_literal_suffix)]
#![warn(clippy::ref_patterns)]
// Not sure
#![allow(clippy::indexing_slicing)]
#![allow(clippy::string_slice)]
#![allow(clippy::pub_use)]
// clippy exceptions
#![allow(clippy::float_cmp)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::default_numeric_fallback)]
#![allow(clippy::single_call_fn)]

extern crate alloc;
pub mod build_mathml;
pub mod build_tex;
pub mod core;
pub mod encoding;
pub mod interface;
pub mod lexer;
pub mod mathml_tree;
/// Recursive-descent parser producing the parse tree.
pub mod parser;
pub mod spacing_data;
pub mod symbols;
pub mod types;
pub mod units;
pub mod wide_character;

/// Translates an expression into every output at once.
///
/// See [`core::translate`] for details.
pub use crate::core::{Translation, translate};

/// Stateful translator with cached outputs.
pub use crate::interface::Session;

/// Purified TeX outputs of one expression.
pub use crate::build_tex::PurifiedTex;

/// Error type for every translation failure.
///
/// The error carries a stable [`ParseError::code`] (the variant name of its
/// [`ParseErrorKind`]) and ordered string [`ParseError::args`]. When the
/// failure can be pinned to the input, `position` and `length` locate it and
/// the `Display` output underlines the offending text.
pub use crate::types::{ParseError, ParseErrorKind};

/// Configuration of a translation.
pub use crate::types::{
    EncodingOptions, MathmlEncoding, MathmlOptions, PurifiedTexOptions, Settings, SpacingControl,
};

/// Current version of the blahtex crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
