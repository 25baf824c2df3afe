use core::fmt;
use core::str::FromStr;

use convert_case::{Case, Casing};

use crate::SchemaError;

// -----------------------------------------------------------------------------
// Convention

/// A naming convention accepted by the `rename_all` family of attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    /// `lowercase`: the whole identifier lowercased, separators kept.
    Lower,
    /// `UPPERCASE`: the whole identifier uppercased, separators kept.
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl Convention {
    pub const ALL: [Convention; 8] = [
        Convention::Lower,
        Convention::Upper,
        Convention::Pascal,
        Convention::Camel,
        Convention::Snake,
        Convention::ScreamingSnake,
        Convention::Kebab,
        Convention::ScreamingKebab,
    ];

    /// The attribute spelling of the convention.
    pub const fn name(self) -> &'static str {
        match self {
            Convention::Lower => "lowercase",
            Convention::Upper => "UPPERCASE",
            Convention::Pascal => "PascalCase",
            Convention::Camel => "camelCase",
            Convention::Snake => "snake_case",
            Convention::ScreamingSnake => "SCREAMING_SNAKE_CASE",
            Convention::Kebab => "kebab-case",
            Convention::ScreamingKebab => "SCREAMING-KEBAB-CASE",
        }
    }

    /// Shorthand for [`convert`].
    #[inline]
    pub fn apply(self, ident: &str) -> String {
        convert(ident, self)
    }
}

impl fmt::Display for Convention {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Convention {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Convention::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| SchemaError::InvalidCaseName(s.to_owned()))
    }
}

// -----------------------------------------------------------------------------
// convert

/// Rewrites `ident` in the given naming convention.
///
/// Words are split at underscores, hyphens and case transitions. The
/// conversion is lossy: `AB_cd` and `ab_cd` may map to the same name.
///
/// # Examples
///
/// ```
/// use tc_schema::{Convention, convert};
///
/// assert_eq!(convert("pen_pineapple", Convention::Camel), "penPineapple");
/// assert_eq!(convert("PenPineapple", Convention::Kebab), "pen-pineapple");
/// assert_eq!(convert("pen_pineapple", Convention::ScreamingSnake), "PEN_PINEAPPLE");
/// ```
pub fn convert(ident: &str, convention: Convention) -> String {
    match convention {
        Convention::Lower => ident.to_lowercase(),
        Convention::Upper => ident.to_uppercase(),
        Convention::Pascal => ident.to_case(Case::Pascal),
        Convention::Camel => ident.to_case(Case::Camel),
        Convention::Snake => ident.to_case(Case::Snake),
        Convention::ScreamingSnake => ident.to_case(Case::UpperSnake),
        Convention::Kebab => ident.to_case(Case::Kebab),
        Convention::ScreamingKebab => ident.to_case(Case::Kebab).to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Convention, convert};
    use crate::SchemaError;

    #[test]
    fn known_conversions() {
        assert_eq!(convert("pen_pineapple", Convention::Camel), "penPineapple");
        assert_eq!(convert("PenPineapple", Convention::Kebab), "pen-pineapple");
        assert_eq!(
            convert("pen_pineapple", Convention::ScreamingSnake),
            "PEN_PINEAPPLE"
        );
        assert_eq!(convert("pen_pineapple", Convention::Pascal), "PenPineapple");
        assert_eq!(convert("penPineapple", Convention::Snake), "pen_pineapple");
        assert_eq!(
            convert("pen_pineapple", Convention::ScreamingKebab),
            "PEN-PINEAPPLE"
        );
        assert_eq!(convert("Pen_Pineapple", Convention::Lower), "pen_pineapple");
        assert_eq!(convert("pen_pineapple", Convention::Upper), "PEN_PINEAPPLE");
    }

    #[test]
    fn parse_names() {
        for convention in Convention::ALL {
            assert_eq!(convention.name().parse::<Convention>(), Ok(convention));
        }
        assert_eq!(
            "Snake_Case".parse::<Convention>(),
            Err(SchemaError::InvalidCaseName("Snake_Case".into()))
        );
    }

    mod properties {
        use proptest::prelude::*;

        use super::super::{Convention, convert};

        proptest! {
            #[test]
            fn conversion_is_deterministic(ident in "[a-zA-Z][a-zA-Z0-9_]{0,16}") {
                for convention in Convention::ALL {
                    prop_assert_eq!(convert(&ident, convention), convert(&ident, convention));
                }
            }

            #[test]
            fn snake_output_has_no_uppercase(ident in "[a-zA-Z][a-zA-Z_]{0,16}") {
                let snake = convert(&ident, Convention::Snake);
                prop_assert!(!snake.chars().any(|c| c.is_uppercase()));
            }
        }
    }
}
