//! [`District`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{district, District},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Builds a [`District`] out of the provided `districts` table [`Row`].
fn district(row: &Row) -> District {
    District {
        id: row.get("id"),
        name: row.get("name"),
    }
}

impl<C> Database<Select<By<Option<District>, district::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<District>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<District>, district::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: district::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name \
            FROM districts \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(district))
    }
}

impl<C> Database<Select<By<Vec<District>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<District>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<District>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, name \
            FROM districts \
            ORDER BY name ASC, id ASC";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(district)
            .collect())
    }
}
