//! Length formatting for MathML attributes.

use alloc::string::String;

/// Round to 4 decimal places and append "em", dropping trailing zeros.
#[must_use]
pub fn make_em(n: f64) -> String {
    let mut s = format!("{n:.4}");

    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }

    if s == "-0" {
        "0".clone_into(&mut s);
    } else if s.is_empty() {
        s.push('0');
    }

    s.push_str("em");
    s
}
