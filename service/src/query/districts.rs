//! [`Query`] collection related to the multiple [`District`]s.

use common::operations::By;

use crate::domain::District;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`District`]s, ordered by name.
pub type List = DatabaseQuery<By<Vec<District>, ()>>;
