//! [`Query`] collection related to a single [`Facility`].

use common::operations::By;

use crate::domain::{facility, Facility};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Facility`] by its [`facility::Id`].
pub type ById = DatabaseQuery<By<Option<Facility>, facility::Id>>;
