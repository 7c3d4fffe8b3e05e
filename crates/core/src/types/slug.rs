//! URL slug type for tenants, categories and products.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input string is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `a-z`, `0-9` and `-`.
    #[error("slug contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The input starts or ends with a hyphen, or has two in a row.
    #[error("slug hyphens must separate words")]
    MisplacedHyphen,
}

/// A lowercase, hyphen-separated URL slug such as `estafeten` or
/// `bocadillos-calientes`.
///
/// ## Constraints
///
/// - Length: 1-96 characters
/// - Only ASCII lowercase letters, digits and `-`
/// - No leading, trailing or doubled hyphens
///
/// ## Examples
///
/// ```
/// use comanda_core::Slug;
///
/// assert!(Slug::parse("estafeten").is_ok());
/// assert!(Slug::parse("pollo-al-curry-2").is_ok());
///
/// assert!(Slug::parse("").is_err());          // empty
/// assert!(Slug::parse("Estafeten").is_err()); // uppercase
/// assert!(Slug::parse("-pollo").is_err());    // leading hyphen
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a slug.
    pub const MAX_LENGTH: usize = 96;

    /// Parse a `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 96 characters,
    /// contains anything other than lowercase ASCII alphanumerics and
    /// hyphens, or has a leading, trailing or doubled hyphen.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidCharacter(c));
        }

        if s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return Err(SlugError::MisplacedHyphen);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_slugs() {
        assert!(Slug::parse("estafeten").is_ok());
        assert!(Slug::parse("bocadillos").is_ok());
        assert!(Slug::parse("pollo-al-curry").is_ok());
        assert!(Slug::parse("menu-2").is_ok());
        assert!(Slug::parse("a").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(97);
        assert!(matches!(Slug::parse(&long), Err(SlugError::TooLong { .. })));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert_eq!(Slug::parse("Pollo"), Err(SlugError::InvalidCharacter('P')));
        assert_eq!(
            Slug::parse("pollo curry"),
            Err(SlugError::InvalidCharacter(' '))
        );
        assert_eq!(Slug::parse("piña"), Err(SlugError::InvalidCharacter('ñ')));
    }

    #[test]
    fn test_parse_misplaced_hyphens() {
        assert_eq!(Slug::parse("-pollo"), Err(SlugError::MisplacedHyphen));
        assert_eq!(Slug::parse("pollo-"), Err(SlugError::MisplacedHyphen));
        assert_eq!(Slug::parse("pollo--curry"), Err(SlugError::MisplacedHyphen));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Slug = serde_json::from_str("\"estafeten\"").unwrap();
        assert_eq!(ok.as_str(), "estafeten");

        let err = serde_json::from_str::<Slug>("\"Estafeten\"");
        assert!(err.is_err());
    }
}
