//! [`Query`] collection related to the multiple [`Kelurahan`]s.

use common::operations::By;

use crate::domain::{district, Kelurahan};
#[cfg(doc)]
use crate::{domain::District, Query};

use super::DatabaseQuery;

/// Queries all the [`Kelurahan`]s of a [`District`], ordered by name.
pub type ByDistrict = DatabaseQuery<By<Vec<Kelurahan>, district::Id>>;
