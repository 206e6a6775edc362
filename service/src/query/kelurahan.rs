//! [`Query`] collection related to a single [`Kelurahan`].

use common::operations::By;

use crate::domain::{kelurahan, Kelurahan};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Kelurahan`] by its [`kelurahan::Id`].
pub type ById = DatabaseQuery<By<Option<Kelurahan>, kelurahan::Id>>;
