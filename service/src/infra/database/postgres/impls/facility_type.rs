//! [`FacilityType`]-related [`Database`] implementations.

use common::operations::{By, Select};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{facility_type, FacilityType, Slug},
    infra::{
        database::{
            self,
            postgres::{Connection, SearchPattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Builds a [`FacilityType`] out of the provided `facility_types` [`Row`].
fn facility_type(row: &Row) -> FacilityType {
    FacilityType {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
    }
}

impl<C> Database<Select<By<Option<FacilityType>, facility_type::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<FacilityType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<FacilityType>, facility_type::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: facility_type::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, slug \
            FROM facility_types \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(facility_type))
    }
}

impl<C> Database<Select<By<Option<FacilityType>, Slug>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<FacilityType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<FacilityType>, Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug: Slug = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, slug \
            FROM facility_types \
            WHERE slug = $1::VARCHAR";
        Ok(self
            .query_opt(SQL, &[&slug])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(facility_type))
    }
}

impl<C> Database<Select<By<Vec<FacilityType>, read::facility_type::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<FacilityType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<FacilityType>, read::facility_type::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::facility_type::Filter { name } = by.into_inner();

        let name_pattern = name.as_ref().map(SearchPattern::new);

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let name_idx = name_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let sql = format!(
            "SELECT id, name, slug \
             FROM facility_types \
             WHERE true \
                   {name_filtering} \
             ORDER BY name ASC, id ASC",
            name_filtering = name_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND name ILIKE ${idx}::VARCHAR"))
            }),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(facility_type)
            .collect())
    }
}
