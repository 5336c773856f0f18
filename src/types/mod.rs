//! Core type definitions shared by every stage of the translator.

mod source_location;
pub use source_location::SourceLocation;

mod parse_error;
pub use parse_error::{ErrorLocationProvider, ParseError, ParseErrorKind, code_point_label};

mod tokens;
pub use tokens::{Token, TokenKind};

mod settings;
pub use settings::{
    EncodingOptions, MathmlEncoding, MathmlOptions, PurifiedTexOptions, Settings, SpacingControl,
};
