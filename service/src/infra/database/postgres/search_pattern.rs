//! [`SearchPattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

use crate::read::Search;

/// `ILIKE` pattern matching any text containing a [`Search`] query.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct SearchPattern(String);

impl SearchPattern {
    /// Creates a new [`SearchPattern`] out of the provided [`Search`].
    ///
    /// Wildcards of the query are escaped, so they match literally.
    #[must_use]
    pub fn new(search: &Search) -> Self {
        let query = search
            .as_ref()
            .replace('\\', r"\\")
            .replace('%', r"\%")
            .replace('_', r"\_");
        Self(format!("%{query}%"))
    }
}

#[cfg(test)]
mod spec {
    use crate::read::Search;

    use super::SearchPattern;

    #[test]
    fn escapes_wildcards() {
        let p = |q| SearchPattern::new(&Search::new(q).unwrap()).to_string();

        assert_eq!(p("stadion"), "%stadion%");
        assert_eq!(p("50%_off"), r"%50\%\_off%");
        assert_eq!(p(r"a\b"), r"%a\\b%");
    }
}
