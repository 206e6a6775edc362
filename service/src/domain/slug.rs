//! [`Slug`] definitions.

use std::str::FromStr;

use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Human-readable URL-friendly identifier derived from a name.
///
/// Consists of lowercase alphanumeric characters separated by single `-`.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(str)]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a [`Slug`] in bytes.
    const MAX_LEN: usize = 255;

    /// Creates a new [`Slug`] if the given `slug` is valid.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Option<Self> {
        let slug = slug.into();
        Self::check(&slug).then_some(Self(slug))
    }

    /// Derives a new [`Slug`] from the provided `name`.
    ///
    /// Every run of non-alphanumeric characters becomes a single `-`, leading
    /// and trailing ones are dropped, letters are lowercased.
    ///
    /// [`None`] is returned if the `name` contains no alphanumeric characters.
    #[must_use]
    pub fn derive(name: impl AsRef<str>) -> Option<Self> {
        let mut slug = String::with_capacity(name.as_ref().len());
        let mut pending_dash = false;
        for c in name.as_ref().chars() {
            // Lowercasing may expand into combining marks, like `İ` does.
            let mut lower = c
                .to_lowercase()
                .filter(|l| l.is_alphanumeric() && !l.is_uppercase())
                .peekable();
            if lower.peek().is_none() {
                pending_dash = true;
                continue;
            }
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(lower);
        }

        if slug.len() > Self::MAX_LEN {
            let mut end = Self::MAX_LEN;
            while !slug.is_char_boundary(end) {
                end -= 1;
            }
            slug.truncate(end);
            slug.truncate(slug.trim_end_matches('-').len());
        }

        Self::new(slug)
    }

    /// Checks whether the given `slug` is a valid [`Slug`].
    fn check(slug: impl AsRef<str>) -> bool {
        let slug = slug.as_ref();
        !slug.is_empty()
            && slug.len() <= Self::MAX_LEN
            && !slug.starts_with('-')
            && !slug.ends_with('-')
            && !slug.contains("--")
            && slug
                .chars()
                .all(|c| c == '-' || (c.is_alphanumeric() && !c.is_uppercase()))
    }
}

impl FromStr for Slug {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Slug`")
    }
}
