//! Inter-atom spacing tables
//!
//! TeX inserts implicit space between neighbouring atoms according to their
//! classes. The tables here hold that rule set, keyed by the lowercase
//! [`AtomClass`] names, for normal (display and text) styles and for the
//! tighter script styles.

use crate::symbols::{AtomClass, MathStyle};
use phf::{Map, phf_map};

/// Measurement structure representing a size with number and unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Numeric value of the measurement
    pub number: f64,
    /// Unit of measurement, `"mu"` for every table entry
    pub unit: &'static str,
}

impl Measurement {
    /// The measurement in ems (18mu to the em).
    #[must_use]
    pub fn to_em(self) -> f64 {
        if self.unit == "mu" {
            self.number / 18.0
        } else {
            self.number
        }
    }
}

/// Thin space measurement (3 mu) - corresponds to `\,` in LaTeX.
pub const THINSPACE: Measurement = Measurement {
    number: 3.0,
    unit: "mu",
};

/// Medium space measurement (4 mu) - corresponds to `\:` in LaTeX.
pub const MEDIUMSPACE: Measurement = Measurement {
    number: 4.0,
    unit: "mu",
};

/// Thick space measurement (5 mu) - corresponds to `\;` in LaTeX.
pub const THICKSPACE: Measurement = Measurement {
    number: 5.0,
    unit: "mu",
};

/// Nested map from left class to right class to the space between them.
pub type Spacings = Map<&'static str, Map<&'static str, Measurement>>;

/// Spacing for display and text styles.
///
/// | Left \ Right | ord   | op    | bin  | rel   | open  | close | punct | inner |
/// |--------------|-------|-------|------|-------|-------|-------|-------|-------|
/// | ord          | -     | thin  | med  | thick | -     | -     | -     | thin  |
/// | op           | thin  | thin  | -    | thick | -     | -     | -     | thin  |
/// | bin          | med   | med   | -    | -     | med   | -     | -     | med   |
/// | rel          | thick | thick | -    | -     | thick | -     | -     | thick |
/// | open         | -     | -     | -    | -     | -     | -     | -     | -     |
/// | close        | -     | thin  | med  | thick | -     | -     | -     | thin  |
/// | punct        | thin  | thin  | -    | thin  | thin  | thin  | thin  | thin  |
/// | inner        | thin  | thin  | med  | thick | thin  | -     | thin  | thin  |
///
/// # Examples
/// ```
/// use blahtex::spacing_data::{spacing_between, MEDIUMSPACE, THINSPACE};
/// use blahtex::symbols::{AtomClass, MathStyle};
///
/// let space = spacing_between(AtomClass::Ord, AtomClass::Op, MathStyle::Text);
/// assert_eq!(space, Some(THINSPACE));
/// let space = spacing_between(AtomClass::Bin, AtomClass::Ord, MathStyle::Text);
/// assert_eq!(space, Some(MEDIUMSPACE));
/// ```
pub static SPACINGS: Spacings = phf_map! {
    "ord" => phf_map! {
        "op" => THINSPACE,
        "bin" => MEDIUMSPACE,
        "rel" => THICKSPACE,
        "inner" => THINSPACE,
    },
    "op" => phf_map! {
        "ord" => THINSPACE,
        "op" => THINSPACE,
        "rel" => THICKSPACE,
        "inner" => THINSPACE,
    },
    "bin" => phf_map! {
        "ord" => MEDIUMSPACE,
        "op" => MEDIUMSPACE,
        "open" => MEDIUMSPACE,
        "inner" => MEDIUMSPACE,
    },
    "rel" => phf_map! {
        "ord" => THICKSPACE,
        "op" => THICKSPACE,
        "open" => THICKSPACE,
        "inner" => THICKSPACE,
    },
    "open" => phf_map!{},
    "close" => phf_map! {
        "op" => THINSPACE,
        "bin" => MEDIUMSPACE,
        "rel" => THICKSPACE,
        "inner" => THINSPACE,
    },
    "punct" => phf_map! {
        "ord" => THINSPACE,
        "op" => THINSPACE,
        "rel" => THINSPACE,
        "open" => THINSPACE,
        "close" => THINSPACE,
        "punct" => THINSPACE,
        "inner" => THINSPACE,
    },
    "inner" => phf_map! {
        "ord" => THINSPACE,
        "op" => THINSPACE,
        "bin" => MEDIUMSPACE,
        "rel" => THICKSPACE,
        "open" => THINSPACE,
        "punct" => THINSPACE,
        "inner" => THINSPACE,
    },
};

/// Spacing for script and scriptscript styles.
pub static TIGHT_SPACINGS: Spacings = phf_map! {
    "ord" => phf_map! {
        "op" => THINSPACE,
    },
    "op" => phf_map! {
        "ord" => THINSPACE,
        "op" => THINSPACE,
    },
    "bin" => phf_map!{},
    "rel" => phf_map!{},
    "open" => phf_map!{},
    "close" => phf_map! {
        "op" => THINSPACE,
    },
    "punct" => phf_map!{},
    "inner" => phf_map! {
        "op" => THINSPACE,
    },
};

/// Implicit space between two adjacent atoms in `style`.
///
/// The classes must already have had TeX's bin-to-ord rule applied (see
/// [`resolve_classes`]).
#[must_use]
pub fn spacing_between(
    left: AtomClass,
    right: AtomClass,
    style: MathStyle,
) -> Option<Measurement> {
    let table = if style.is_tight() {
        &TIGHT_SPACINGS
    } else {
        &SPACINGS
    };
    table.get(left.as_ref())?.get(right.as_ref()).copied()
}

/// Applies TeX's rule that a binary operator with no sensible left or right
/// operand is treated as ordinary.
///
/// A `Bin` becomes `Ord` when it starts the list or follows a `Bin`, `Op`,
/// `Rel`, `Open` or `Punct`; a `Bin` followed by a `Rel`, `Close` or `Punct`,
/// or ending the list, becomes `Ord` as well.
pub fn resolve_classes(classes: &mut [AtomClass]) {
    for i in 0..classes.len() {
        if classes[i] != AtomClass::Bin {
            continue;
        }
        let demote_left = i == 0
            || matches!(
                classes[i - 1],
                AtomClass::Bin | AtomClass::Op | AtomClass::Rel | AtomClass::Open | AtomClass::Punct
            );
        let demote_right = classes
            .get(i + 1)
            .is_none_or(|next| matches!(next, AtomClass::Rel | AtomClass::Close | AtomClass::Punct));
        if demote_left || demote_right {
            classes[i] = AtomClass::Ord;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator as _;

    #[test]
    fn test_measurement_constants() {
        assert_eq!(THINSPACE.number, 3.0);
        assert_eq!(MEDIUMSPACE.number, 4.0);
        assert_eq!(THICKSPACE.number, 5.0);
        assert_eq!(THINSPACE.unit, "mu");
        assert_eq!(MEDIUMSPACE.to_em(), 4.0 / 18.0);
    }

    #[test]
    fn test_spacings_structure() {
        for class in AtomClass::iter() {
            assert!(
                SPACINGS.contains_key(class.as_ref()),
                "Missing atom class: {class:?}"
            );
            assert!(TIGHT_SPACINGS.contains_key(class.as_ref()));
        }
        assert_eq!(
            spacing_between(AtomClass::Ord, AtomClass::Rel, MathStyle::Display),
            Some(THICKSPACE)
        );
        assert_eq!(
            spacing_between(AtomClass::Ord, AtomClass::Rel, MathStyle::Script),
            None
        );
        assert_eq!(
            spacing_between(AtomClass::Ord, AtomClass::Op, MathStyle::ScriptScript),
            Some(THINSPACE)
        );
    }

    #[test]
    fn test_bin_demotion() {
        // "-x": leading minus is unary
        let mut classes = [AtomClass::Bin, AtomClass::Ord];
        resolve_classes(&mut classes);
        assert_eq!(classes, [AtomClass::Ord, AtomClass::Ord]);

        // "a+b" keeps its binary plus
        let mut classes = [AtomClass::Ord, AtomClass::Bin, AtomClass::Ord];
        resolve_classes(&mut classes);
        assert_eq!(classes[1], AtomClass::Bin);

        // "a=-b" and "a+" demote
        let mut classes = [AtomClass::Ord, AtomClass::Rel, AtomClass::Bin, AtomClass::Ord];
        resolve_classes(&mut classes);
        assert_eq!(classes[2], AtomClass::Ord);
        let mut classes = [AtomClass::Ord, AtomClass::Bin];
        resolve_classes(&mut classes);
        assert_eq!(classes[1], AtomClass::Ord);
    }
}
