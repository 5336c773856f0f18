use alloc::sync::Arc;

use crate::types::ErrorLocationProvider;

/// Represents a span of the input expression.
///
/// Stores a reference-counted copy of the input together with byte offsets,
/// so that errors raised long after lexing can still render the offending
/// text with its surrounding context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    /// Reference-counted input string that was processed.
    pub input: Arc<str>,

    /// Zero-based inclusive start offset in the input string.
    ///
    /// For multi-byte UTF-8 characters this points to the first byte.
    pub start: usize,

    /// Zero-based exclusive end offset in the input string.
    pub end: usize,
}

impl SourceLocation {
    /// Creates a new `SourceLocation` with the given input string and byte
    /// range.
    ///
    /// # Examples
    ///
    /// ```
    /// use blahtex::types::SourceLocation;
    /// use std::sync::Arc;
    ///
    /// let input = Arc::from("x^2");
    /// let loc = SourceLocation::new(input, 0, 3);
    /// assert_eq!(loc.text(), "x^2");
    /// ```
    #[must_use]
    pub const fn new(input: Arc<str>, start: usize, end: usize) -> Self {
        Self { input, start, end }
    }

    /// Start offset of the span.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// End offset of the span.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// The covered slice of the input.
    #[must_use]
    pub fn text(&self) -> &str {
        self.input.get(self.start..self.end).unwrap_or_default()
    }

    /// Merges two locations over the same input into one spanning both.
    ///
    /// Returns `None` if either side is missing or they refer to different
    /// inputs.
    #[must_use]
    pub fn range(first: Option<&Self>, second: Option<&Self>) -> Option<Self> {
        let (first, second) = (first?, second?);
        if !Arc::ptr_eq(&first.input, &second.input) {
            return None;
        }
        Some(Self {
            input: Arc::clone(&first.input),
            start: first.start.min(second.start),
            end: first.end.max(second.end),
        })
    }
}

impl ErrorLocationProvider for SourceLocation {
    fn loc(&self) -> Option<&SourceLocation> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_merges_spans() {
        let input: Arc<str> = Arc::from(r"\frac{a}{b}");
        let a = SourceLocation::new(Arc::clone(&input), 0, 5);
        let b = SourceLocation::new(Arc::clone(&input), 8, 11);
        let merged = SourceLocation::range(Some(&a), Some(&b)).unwrap();
        assert_eq!(merged.start, 0);
        assert_eq!(merged.end, 11);
        assert_eq!(merged.text(), r"\frac{a}{b}");
    }

    #[test]
    fn test_range_rejects_foreign_inputs() {
        let a = SourceLocation::new(Arc::from("ab"), 0, 1);
        let b = SourceLocation::new(Arc::from("ab"), 1, 2);
        assert!(SourceLocation::range(Some(&a), Some(&b)).is_none());
        assert!(SourceLocation::range(Some(&a), None).is_none());
    }
}
