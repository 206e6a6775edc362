//! [`Query`] collection related to a single [`FacilityType`].

use common::operations::By;

use crate::domain::{facility_type, FacilityType};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`FacilityType`] by its [`facility_type::Id`].
pub type ById = DatabaseQuery<By<Option<FacilityType>, facility_type::Id>>;
