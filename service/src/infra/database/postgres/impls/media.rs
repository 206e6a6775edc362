//! [`Media`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{facility, media, Media},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Builds a [`Media`] out of the provided `media` table [`Row`].
fn media(row: &Row) -> Media {
    Media {
        id: row.get("id"),
        facility_id: row.get("facility_id"),
        collection: row.get("collection"),
        file_name: row.get("file_name"),
        mime_type: row.get("mime_type"),
        size: u32::try_from(row.get::<_, i64>("size"))
            .expect("`size` overflow"),
        order: u16::try_from(row.get::<_, i32>("order"))
            .expect("`order` overflow"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Vec<Media>, (facility::Id, media::Collection)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Media>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Media>, (facility::Id, media::Collection)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (facility_id, collection) = by.into_inner();

        const SQL: &str = "\
            SELECT id, facility_id, collection, file_name, mime_type, \
                   size, \"order\", created_at \
            FROM media \
            WHERE facility_id = $1::UUID \
              AND collection = $2::VARCHAR \
            ORDER BY \"order\" ASC, created_at ASC";
        Ok(self
            .query(SQL, &[&facility_id, &collection])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(media)
            .collect())
    }
}

impl<C> Database<Insert<Media>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(media): Insert<Media>,
    ) -> Result<Self::Ok, Self::Err> {
        let Media {
            id,
            facility_id,
            collection,
            file_name,
            mime_type,
            size,
            order,
            created_at,
        } = media;

        let size = i64::from(size);
        let order = i32::from(order);

        const SQL: &str = "\
            INSERT INTO media (\
                id, facility_id, collection, file_name, mime_type, \
                size, \"order\", created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                $6::INT8, $7::INT4, $8::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &facility_id,
                &collection,
                &file_name,
                &mime_type,
                &size,
                &order,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Media>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(media): Update<Media>,
    ) -> Result<Self::Ok, Self::Err> {
        // Only the position of a `Media` is ever changed.
        let order = i32::from(media.order);

        const SQL: &str = "\
            UPDATE media \
            SET \"order\" = $2::INT4 \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&media.id, &order])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Media, media::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Media, media::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: media::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM media \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
