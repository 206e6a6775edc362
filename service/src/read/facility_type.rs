//! [`FacilityType`]-related read definitions.

#[cfg(doc)]
use crate::domain::FacilityType;

use super::Search;

/// Filter of [`FacilityType`] options.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// [`Search`] for the [`FacilityType`] name.
    pub name: Option<Search>,
}
