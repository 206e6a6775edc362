//! [`Facility`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    pagination::Page,
    Area,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{facility, Facility, Location, Slug},
    infra::{
        database::{
            self,
            postgres::{Connection, SearchPattern},
            Postgres,
        },
        Database,
    },
    read::{self, facility::list::Column},
};

/// Builds a [`Facility`] out of the provided `facilities` table [`Row`].
fn facility(row: &Row) -> Facility {
    Facility {
        id: row.get("id"),
        slug: row.get("slug"),
        name: row.get("name"),
        facility_type_id: row.get("facility_type_id"),
        is_government_owned: row.get("is_government_owned"),
        is_private_owned: row.get("is_private_owned"),
        pbg_permit: row.get("pbg_permit"),
        capacity: row
            .get::<_, Option<i64>>("capacity")
            .map(u32::try_from)
            .transpose()
            .expect("`capacity` overflow"),
        employees_count: row
            .get::<_, Option<i64>>("employees_count")
            .map(u32::try_from)
            .transpose()
            .expect("`employees_count` overflow"),
        land_area: Area::new(row.get("land_area"), row.get("land_area_unit"))
            .expect("negative `land_area`"),
        building_area: Area::new(
            row.get("building_area"),
            row.get("building_area_unit"),
        )
        .expect("negative `building_area`"),
        district_id: row.get("district_id"),
        kelurahan_id: row.get("kelurahan_id"),
        address: row.get("address"),
        description: row.get("description"),
        location: Location {
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C> Database<Select<By<HashMap<facility::Id, Facility>, Vec<facility::Id>>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = HashMap<facility::Id, Facility>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<facility::Id, Facility>, Vec<facility::Id>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT id, slug, name, facility_type_id, \
                   is_government_owned, is_private_owned, pbg_permit, \
                   capacity, employees_count, \
                   land_area, land_area_unit, \
                   building_area, building_area_unit, \
                   district_id, kelurahan_id, address, description, \
                   latitude, longitude, \
                   created_at, updated_at \
            FROM facilities \
            WHERE id = ANY($1::UUID[])";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let f = facility(row);
                (f.id, f)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Facility>, facility::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<facility::Id, Facility>, Vec<facility::Id>>>,
        Ok = HashMap<facility::Id, Facility>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Facility>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Facility>, facility::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new(vec![id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Option<Facility>, Slug>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Facility>, facility::Id>>,
        Ok = Option<Facility>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Facility>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Facility>, Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM facilities \
            WHERE slug = $1::VARCHAR \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&slug])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::new(row.get::<_, facility::Id>("id"))))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Facility>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Facility>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(facility): Insert<Facility>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(facility)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Facility>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(facility): Update<Facility>,
    ) -> Result<Self::Ok, Self::Err> {
        let Facility {
            id,
            slug,
            name,
            facility_type_id,
            is_government_owned,
            is_private_owned,
            pbg_permit,
            capacity,
            employees_count,
            land_area,
            building_area,
            district_id,
            kelurahan_id,
            address,
            description,
            location,
            created_at,
            updated_at,
        } = facility;

        let capacity = capacity.map(i64::from);
        let employees_count = employees_count.map(i64::from);
        let (land_area, land_area_unit) =
            (land_area.amount(), land_area.unit());
        let (building_area, building_area_unit) =
            (building_area.amount(), building_area.unit());

        const SQL: &str = "\
            INSERT INTO facilities (\
                id, slug, name, facility_type_id, \
                is_government_owned, is_private_owned, pbg_permit, \
                capacity, employees_count, \
                land_area, land_area_unit, \
                building_area, building_area_unit, \
                district_id, kelurahan_id, address, description, \
                latitude, longitude, \
                created_at, updated_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::UUID, \
                $5::BOOLEAN, $6::BOOLEAN, $7::VARCHAR, \
                $8::INT8, $9::INT8, \
                $10::NUMERIC, $11::VARCHAR, \
                $12::NUMERIC, $13::VARCHAR, \
                $14::UUID, $15::UUID, $16::VARCHAR, $17::TEXT, \
                $18::NUMERIC, $19::NUMERIC, \
                $20::TIMESTAMPTZ, $21::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                facility_type_id = EXCLUDED.facility_type_id, \
                is_government_owned = EXCLUDED.is_government_owned, \
                is_private_owned = EXCLUDED.is_private_owned, \
                pbg_permit = EXCLUDED.pbg_permit, \
                capacity = EXCLUDED.capacity, \
                employees_count = EXCLUDED.employees_count, \
                land_area = EXCLUDED.land_area, \
                land_area_unit = EXCLUDED.land_area_unit, \
                building_area = EXCLUDED.building_area, \
                building_area_unit = EXCLUDED.building_area_unit, \
                district_id = EXCLUDED.district_id, \
                kelurahan_id = EXCLUDED.kelurahan_id, \
                address = EXCLUDED.address, \
                description = EXCLUDED.description, \
                latitude = EXCLUDED.latitude, \
                longitude = EXCLUDED.longitude, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &slug,
                &name,
                &facility_type_id,
                &is_government_owned,
                &is_private_owned,
                &pbg_permit,
                &capacity,
                &employees_count,
                &land_area,
                &land_area_unit,
                &building_area,
                &building_area_unit,
                &district_id,
                &kelurahan_id,
                &address,
                &description,
                &location.latitude,
                &location.longitude,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Facility, facility::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Facility, facility::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: facility::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM facilities \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Vec<facility::Id>, Vec<facility::Id>>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<facility::Id>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<facility::Id>, Vec<facility::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        if ids.is_empty() {
            return Ok(vec![]);
        }

        // `media` rows are removed by `ON DELETE CASCADE`.
        const SQL: &str = "\
            DELETE FROM facilities \
            WHERE id = ANY($1::UUID[]) \
            RETURNING id";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| row.get("id"))
            .collect())
    }
}

/// Returns the SQL expression to sort the provided [`Column`] by.
const fn sort_sql(column: Column) -> &'static str {
    match column {
        Column::Name => "f.name",
        Column::District => "d.name",
        Column::Address => "f.address",
        Column::FacilityType => "t.name",
        Column::IsGovernmentOwned => "f.is_government_owned",
        Column::IsPrivateOwned => "f.is_private_owned",
        Column::Capacity => "f.capacity",
        Column::EmployeesCount => "f.employees_count",
        Column::LandArea => "f.land_area",
        Column::LandAreaUnit => "f.land_area_unit",
        Column::BuildingArea => "f.building_area",
        Column::BuildingAreaUnit => "f.building_area_unit",
    }
}

/// Returns the textual SQL expression to search the provided [`Column`] in.
const fn search_sql(column: Column) -> &'static str {
    match column {
        Column::Capacity => "f.capacity::TEXT",
        Column::EmployeesCount => "f.employees_count::TEXT",
        Column::LandArea => "f.land_area::TEXT",
        Column::BuildingArea => "f.building_area::TEXT",
        Column::Name
        | Column::District
        | Column::Address
        | Column::FacilityType
        | Column::IsGovernmentOwned
        | Column::IsPrivateOwned
        | Column::LandAreaUnit
        | Column::BuildingAreaUnit => sort_sql(column),
    }
}

impl<C>
    Database<
        Select<
            By<read::facility::list::Page, read::facility::list::Selector>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::facility::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::facility::list::Page, read::facility::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::facility::list::Selector {
            arguments,
            sort,
            filter:
                read::facility::list::Filter {
                    search,
                    columns,
                    district_id,
                },
        } = by.into_inner();

        let column_patterns = columns
            .iter()
            .map(|c| (c.column(), SearchPattern::new(c.query())))
            .collect::<Vec<_>>();
        let search_pattern = search.as_ref().map(SearchPattern::new);
        let limit = i64::try_from(arguments.per_page()).unwrap_or(i64::MAX);
        let offset = i64::try_from(arguments.offset()).unwrap_or(i64::MAX);

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let district_idx = district_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let column_idxs = column_patterns
            .iter()
            .map(|(column, pattern)| {
                ps.push(pattern);
                (*column, ps.len())
            })
            .collect::<Vec<_>>();
        let search_idx = search_pattern.as_ref().map(|pattern| {
            ps.push(pattern);
            ps.len()
        });

        let filtering = format!(
            "FROM facilities AS f \
             JOIN districts AS d ON d.id = f.district_id \
             JOIN facility_types AS t ON t.id = f.facility_type_id \
             WHERE true \
                   {district} \
                   {columns} \
                   {search}",
            district = district_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND f.district_id = ${idx}::UUID"))
            }),
            columns = column_idxs.iter().format_with(" ", |(column, idx), f| {
                let expr = search_sql(*column);
                f(&format_args!("AND {expr} ILIKE ${idx}::VARCHAR"))
            }),
            search = search_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(
                    "AND ({})",
                    Column::ALL
                        .iter()
                        .filter(|c| c.is_searchable())
                        .format_with(" OR ", |c, f| {
                            let expr = search_sql(*c);
                            f(&format_args!("{expr} ILIKE ${idx}::VARCHAR"))
                        }),
                ))
            }),
        );

        let count_sql = format!("SELECT COUNT(*)::INT8 {filtering}");
        let total_count = self
            .query_one(&count_sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .get::<_, i64>(0);

        ps.push(&limit);
        let limit_idx = ps.len();
        ps.push(&offset);
        let offset_idx = ps.len();

        let sql = format!(
            "SELECT f.id {filtering} \
             ORDER BY {column} {order}, f.id ASC \
             LIMIT ${limit_idx}::INT8 \
             OFFSET ${offset_idx}::INT8",
            column = sort_sql(sort.column),
            order = sort.order.sql(),
        );
        let ids = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| row.get::<_, facility::Id>("id"))
            .collect::<Vec<_>>();

        Ok(Page::new(
            arguments,
            ids,
            usize::try_from(total_count).unwrap_or_default(),
        ))
    }
}
