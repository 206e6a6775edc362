//! [`Query`] collection related to a single [`District`].

use common::operations::By;

use crate::domain::{district, District};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`District`] by its [`district::Id`].
pub type ById = DatabaseQuery<By<Option<District>, district::Id>>;
