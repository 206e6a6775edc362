//! [`Kelurahan`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{district, kelurahan, Kelurahan, Location},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Builds a [`Kelurahan`] out of the provided `kelurahans` table [`Row`].
fn kelurahan(row: &Row) -> Kelurahan {
    Kelurahan {
        id: row.get("id"),
        name: row.get("name"),
        district_id: row.get("district_id"),
        location: Location {
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
        },
    }
}

impl<C> Database<Select<By<Option<Kelurahan>, kelurahan::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Kelurahan>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Kelurahan>, kelurahan::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: kelurahan::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, district_id, latitude, longitude \
            FROM kelurahans \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(kelurahan))
    }
}

impl<C> Database<Select<By<Vec<Kelurahan>, district::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Kelurahan>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Kelurahan>, district::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let district_id: district::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, district_id, latitude, longitude \
            FROM kelurahans \
            WHERE district_id = $1::UUID \
            ORDER BY name ASC, id ASC";
        Ok(self
            .query(SQL, &[&district_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(kelurahan)
            .collect())
    }
}
