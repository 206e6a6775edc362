//! Read entities definitions.

pub mod facility;
pub mod facility_type;
pub mod form;
pub mod photo;

use derive_more::{AsRef, Display};

pub use self::photo::Photo;

/// Case-insensitive substring to search for.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Search(String);

impl Search {
    /// Creates a new [`Search`] out of the provided `query`.
    ///
    /// [`None`] is returned if the `query` is blank. Otherwise, the `query`
    /// is kept as is, surrounding whitespace included.
    #[must_use]
    pub fn new(query: impl AsRef<str>) -> Option<Self> {
        let query = query.as_ref();
        (!query.trim().is_empty()).then(|| Self(query.to_owned()))
    }

    /// Checks whether the provided `haystack` contains this [`Search`]
    /// ignoring case.
    #[must_use]
    pub fn matches(&self, haystack: impl AsRef<str>) -> bool {
        haystack
            .as_ref()
            .to_lowercase()
            .contains(&self.0.to_lowercase())
    }
}

#[cfg(test)]
mod spec {
    use super::Search;

    #[test]
    fn ignores_blank_queries() {
        assert!(Search::new("").is_none());
        assert!(Search::new("  \t").is_none());
        assert_eq!(Search::new(" gor ").unwrap().as_ref(), " gor ");
    }

    #[test]
    fn keeps_surrounding_whitespace() {
        let search = Search::new(" a").unwrap();

        assert!(search.matches("Kolam Renang A"));
        assert!(!search.matches("Stadion"));
    }

    #[test]
    fn matches_ignoring_case() {
        let search = Search::new("STADION").unwrap();

        assert!(search.matches("Stadion Benteng"));
        assert!(search.matches("gor stadion"));
        assert!(!search.matches("Lapangan"));
    }
}
