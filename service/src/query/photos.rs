//! [`Query`] collection related to photos of a [`Facility`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        facility,
        media::{self, Collection},
        Facility, Media,
    },
    infra::{database, storage, Database, Storage},
    read, Query, Service,
};

/// Queries all the [`read::Photo`]s of a [`Facility`] in their display order.
#[derive(Clone, Copy, Debug)]
pub struct OfFacility(pub facility::Id);

impl<Db, St> Query<OfFacility> for Service<Db, St>
where
    Db: Database<
            Select<By<Option<Facility>, facility::Id>>,
            Ok = Option<Facility>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Media>, (facility::Id, Collection)>>,
            Ok = Vec<Media>,
            Err = Traced<database::Error>,
        >,
    St: Storage<
        Select<By<media::Url, media::Path>>,
        Ok = media::Url,
        Err = Traced<storage::Error>,
    >,
{
    type Ok = Vec<read::Photo>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        OfFacility(facility_id): OfFacility,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        _ = self
            .database()
            .execute(Select(By::<Option<Facility>, _>::new(facility_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::FacilityNotExists(facility_id))
            .map_err(tracerr::wrap!())?;

        let media = self
            .database()
            .execute(Select(By::new((facility_id, Collection::Files))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut photos = Vec::with_capacity(media.len());
        for media in media {
            let url = self
                .storage()
                .execute(Select(By::new(media.path())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            photos.push(read::Photo { media, url });
        }
        Ok(photos)
    }
}

/// Error of [`OfFacility`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Facility`] with the provided ID does not exist.
    #[display("`Facility(id: {_0})` does not exist")]
    FacilityNotExists(#[error(not(source))] facility::Id),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    #[from]
    Storage(storage::Error),
}

#[cfg(test)]
mod spec {
    use common::Handler as _;

    use crate::{
        command::{AttachFacilityPhoto, ReorderFacilityPhotos},
        domain::{
            facility,
            media::{FileName, MimeType},
        },
        test_support::{facility, seed, service},
        SlugUniqueness,
    };

    use super::{ExecutionError, OfFacility};

    #[tokio::test]
    async fn lists_photo_urls_in_order() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let f = facility(&svc, &refs, "Stadion A");
        let mut ids = vec![];
        for name in ["depan.jpg", "tribun.jpg"] {
            ids.push(
                svc.execute(AttachFacilityPhoto {
                    facility_id: f.id,
                    file_name: FileName::new(name).unwrap(),
                    mime_type: MimeType::new("image/jpeg").unwrap(),
                    content: vec![7],
                })
                .await
                .unwrap()
                .id,
            );
        }
        ids.reverse();
        _ = svc
            .execute(ReorderFacilityPhotos {
                facility_id: f.id,
                order: ids.clone(),
            })
            .await
            .unwrap();

        let photos = svc.execute(OfFacility(f.id)).await.unwrap();

        assert_eq!(
            photos.iter().map(|p| p.media.id).collect::<Vec<_>>(),
            ids,
        );
        assert_eq!(
            photos[0].url.to_string(),
            format!("/media/{}/files/{}/tribun.jpg", f.id, ids[0]),
        );
    }

    #[tokio::test]
    async fn lists_nothing_for_facility_without_photos() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let f = facility(&svc, &refs, "Stadion A");

        assert!(svc.execute(OfFacility(f.id)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fails_on_non_existent_facility() {
        let svc = service(SlugUniqueness::default());
        _ = seed(&svc);
        let missing = facility::Id::new();

        let err = svc.execute(OfFacility(missing)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::FacilityNotExists(id) if *id == missing,
        ));
    }
}
