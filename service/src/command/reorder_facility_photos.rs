//! [`Command`] for reordering photos of a [`Facility`].

use std::collections::HashSet;

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        facility,
        media::{self, Collection},
        Facility, Media,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for persisting a user-defined order of [`Facility`] photos.
#[derive(Clone, Debug)]
pub struct ReorderFacilityPhotos {
    /// ID of the [`Facility`] whose photos are reordered.
    pub facility_id: facility::Id,

    /// IDs of all the photos of the [`Facility`] in the desired order.
    pub order: Vec<media::Id>,
}

impl<Db, St> Command<ReorderFacilityPhotos> for Service<Db, St>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Facility, facility::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Facility>, facility::Id>>,
            Ok = Option<Facility>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Media>, (facility::Id, Collection)>>,
            Ok = Vec<Media>,
            Err = Traced<database::Error>,
        > + Database<Update<Media>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vec<Media>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReorderFacilityPhotos,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReorderFacilityPhotos { facility_id, order } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(facility_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        _ = tx
            .execute(Select(By::<Option<Facility>, _>::new(facility_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::FacilityNotExists(facility_id))
            .map_err(tracerr::wrap!())?;

        let mut photos = tx
            .execute(Select(By::new((facility_id, Collection::Files))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let existing = photos.iter().map(|m| m.id).collect::<HashSet<_>>();
        let requested = order.iter().copied().collect::<HashSet<_>>();
        if order.len() != photos.len() || requested != existing {
            return Err(tracerr::new!(E::NotPermutation(facility_id)));
        }

        for (pos, id) in (0..).zip(&order) {
            let Some(photo) = photos.iter_mut().find(|m| m.id == *id) else {
                continue;
            };
            if photo.order != pos {
                photo.order = pos;
                tx.execute(Update(photo.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        photos.sort_by_key(|m| m.order);
        Ok(photos)
    }
}

/// Error of [`ReorderFacilityPhotos`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Facility`] with the provided ID does not exist.
    #[display("`Facility(id: {_0})` does not exist")]
    FacilityNotExists(#[error(not(source))] facility::Id),

    /// Provided order doesn't list every photo of the [`Facility`] exactly
    /// once.
    #[display(
        "Order must list every photo of `Facility(id: {_0})` exactly once"
    )]
    NotPermutation(#[error(not(source))] facility::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        Handler as _,
    };

    use crate::{
        command::AttachFacilityPhoto,
        domain::{
            facility,
            media::{self, Collection, FileName, MimeType},
            Media,
        },
        test_support::{facility, seed, service, TestService},
        SlugUniqueness,
    };

    use super::{ExecutionError, ReorderFacilityPhotos};

    async fn attach(
        svc: &TestService,
        facility_id: facility::Id,
        names: &[&str],
    ) -> Vec<Media> {
        let mut attached = vec![];
        for name in names {
            attached.push(
                svc.execute(AttachFacilityPhoto {
                    facility_id,
                    file_name: FileName::new(*name).unwrap(),
                    mime_type: MimeType::new("image/png").unwrap(),
                    content: vec![1],
                })
                .await
                .unwrap(),
            );
        }
        attached
    }

    #[tokio::test]
    async fn persists_user_defined_order() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let f = facility(&svc, &refs, "Stadion A");
        let [a, b, c] = <[Media; 3]>::try_from(
            attach(&svc, f.id, &["a.png", "b.png", "c.png"]).await,
        )
        .unwrap();

        let reordered = svc
            .execute(ReorderFacilityPhotos {
                facility_id: f.id,
                order: vec![c.id, a.id, b.id],
            })
            .await
            .unwrap();

        let ids = |photos: &[Media]| {
            photos.iter().map(|m| m.id).collect::<Vec<media::Id>>()
        };
        assert_eq!(ids(&reordered), [c.id, a.id, b.id]);
        assert_eq!(
            reordered.iter().map(|m| m.order).collect::<Vec<_>>(),
            [0, 1, 2],
        );

        let stored = svc
            .database()
            .execute(Select(By::<Vec<Media>, _>::new((
                f.id,
                Collection::Files,
            ))))
            .await
            .unwrap();
        assert_eq!(ids(&stored), [c.id, a.id, b.id]);
    }

    #[tokio::test]
    async fn rejects_incomplete_or_foreign_order() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let f = facility(&svc, &refs, "Stadion A");
        let g = facility(&svc, &refs, "Stadion B");
        let ours = attach(&svc, f.id, &["a.png", "b.png"]).await;
        let theirs = attach(&svc, g.id, &["x.png"]).await;

        for order in [
            vec![ours[0].id],
            vec![ours[0].id, ours[0].id],
            vec![ours[0].id, theirs[0].id],
            vec![ours[1].id, ours[0].id, theirs[0].id],
        ] {
            let err = svc
                .execute(ReorderFacilityPhotos {
                    facility_id: f.id,
                    order,
                })
                .await
                .unwrap_err();

            assert!(matches!(
                err.as_ref(),
                ExecutionError::NotPermutation(id) if *id == f.id,
            ));
        }

        let stored = svc
            .database()
            .execute(Select(By::<Vec<Media>, _>::new((
                f.id,
                Collection::Files,
            ))))
            .await
            .unwrap();
        assert_eq!(
            stored.iter().map(|m| m.id).collect::<Vec<_>>(),
            [ours[0].id, ours[1].id],
        );
    }
}
