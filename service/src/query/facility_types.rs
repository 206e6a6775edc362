//! [`Query`] collection related to the multiple [`FacilityType`]s.

use common::operations::By;

use crate::{domain::FacilityType, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`FacilityType`]s matching the provided
/// [`read::facility_type::Filter`], ordered by name.
pub type List =
    DatabaseQuery<By<Vec<FacilityType>, read::facility_type::Filter>>;
