//! [`Command`] for detaching a photo from a [`Facility`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        facility,
        media::{self, Collection},
        Facility, Media,
    },
    infra::{database, storage, Database, Storage},
    Service,
};

use super::Command;

/// [`Command`] for detaching a photo from a [`Facility`].
///
/// Remaining photos keep their relative order.
#[derive(Clone, Copy, Debug)]
pub struct DetachFacilityPhoto {
    /// ID of the [`Facility`] to detach the photo from.
    pub facility_id: facility::Id,

    /// ID of the photo to be detached.
    pub media_id: media::Id,
}

impl<Db, St> Command<DetachFacilityPhoto> for Service<Db, St>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Facility, facility::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Media>, (facility::Id, Collection)>>,
            Ok = Vec<Media>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Media, media::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Media>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    St: Storage<Delete<By<Media, media::Path>>, Err = Traced<storage::Error>>,
{
    type Ok = Media;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DetachFacilityPhoto,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DetachFacilityPhoto {
            facility_id,
            media_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(facility_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut photos = tx
            .execute(Select(By::new((facility_id, Collection::Files))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let pos = photos
            .iter()
            .position(|m| m.id == media_id)
            .ok_or(E::MediaNotExists {
                facility_id,
                media_id,
            })
            .map_err(tracerr::wrap!())?;
        let detached = photos.remove(pos);

        tx.execute(Delete(By::new(media_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        for (order, mut photo) in (0..).zip(photos) {
            if photo.order != order {
                photo.order = order;
                tx.execute(Update(photo))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let path = detached.path();
        if let Err(e) = self
            .storage()
            .execute(Delete(By::<Media, _>::new(path.clone())))
            .await
        {
            log::warn!("failed to remove `{path}` file: {e}");
        }

        Ok(detached)
    }
}

/// Error of [`DetachFacilityPhoto`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Photo is not attached to the [`Facility`].
    #[display(
        "`Media(id: {media_id})` is not attached to \
         `Facility(id: {facility_id})`"
    )]
    MediaNotExists {
        /// ID of the [`Facility`].
        facility_id: facility::Id,

        /// ID of the photo.
        media_id: media::Id,
    },
}

#[cfg(test)]
mod spec {
    use common::Handler as _;

    use crate::{
        command::AttachFacilityPhoto,
        domain::media::{self, FileName, MimeType},
        test_support::{facility, seed, service},
        SlugUniqueness,
    };

    use super::{DetachFacilityPhoto, ExecutionError};

    #[tokio::test]
    async fn detaches_photo_and_compacts_order() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let f = facility(&svc, &refs, "Stadion A");
        let mut attached = vec![];
        for name in ["a.png", "b.png", "c.png"] {
            attached.push(
                svc.execute(AttachFacilityPhoto {
                    facility_id: f.id,
                    file_name: FileName::new(name).unwrap(),
                    mime_type: MimeType::new("image/png").unwrap(),
                    content: vec![1],
                })
                .await
                .unwrap(),
            );
        }

        let detached = svc
            .execute(DetachFacilityPhoto {
                facility_id: f.id,
                media_id: attached[1].id,
            })
            .await
            .unwrap();

        assert_eq!(detached.id, attached[1].id);
        let mut left = svc
            .database()
            .data()
            .media
            .iter()
            .map(|m| (m.order, m.id))
            .collect::<Vec<_>>();
        left.sort_unstable_by_key(|(order, _)| *order);
        assert_eq!(left, [(0, attached[0].id), (1, attached[2].id)]);

        let files = svc.storage().files();
        assert_eq!(files.len(), 2);
        assert!(!files.contains_key(&detached.path().to_string()));
    }

    #[tokio::test]
    async fn fails_on_photo_of_another_facility() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let f = facility(&svc, &refs, "Stadion A");
        let g = facility(&svc, &refs, "Stadion B");
        let theirs = svc
            .execute(AttachFacilityPhoto {
                facility_id: g.id,
                file_name: FileName::new("x.png").unwrap(),
                mime_type: MimeType::new("image/png").unwrap(),
                content: vec![1],
            })
            .await
            .unwrap();

        for media_id in [theirs.id, media::Id::new()] {
            let err = svc
                .execute(DetachFacilityPhoto {
                    facility_id: f.id,
                    media_id,
                })
                .await
                .unwrap_err();

            assert!(matches!(
                err.as_ref(),
                ExecutionError::MediaNotExists { .. },
            ));
        }
        assert_eq!(svc.database().data().media.len(), 1);
    }
}
