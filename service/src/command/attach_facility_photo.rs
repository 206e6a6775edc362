//! [`Command`] for attaching a photo to a [`Facility`].

use common::{
    operations::{
        By, Commit, Delete, Insert, Lock, Select, Transact, Transacted,
    },
    DateTime,
};
use derive_more::{Debug, Display, Error, From};
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

/// [`Command`] for attaching a new photo to a [`Facility`].
///
/// The photo is appended to the end of the [`Collection::Files`].
#[derive(Clone, Debug)]
pub struct AttachFacilityPhoto {
    /// ID of the [`Facility`] to attach the photo to.
    pub facility_id: facility::Id,

    /// [`media::FileName`] of the photo.
    pub file_name: media::FileName,

    /// [`media::MimeType`] of the photo.
    pub mime_type: media::MimeType,

    /// Content of the photo.
    #[debug(skip)]
    pub content: Vec<u8>,
}

impl<Db, St> Command<AttachFacilityPhoto> for Service<Db, St>
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
        > + Database<Insert<Media>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    St: Storage<Insert<storage::Object>, Err = Traced<storage::Error>>
        + Storage<Delete<By<Media, media::Path>>, Err = Traced<storage::Error>>,
{
    type Ok = Media;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AttachFacilityPhoto,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AttachFacilityPhoto {
            facility_id,
            file_name,
            mime_type,
            content,
        } = cmd;

        if !mime_type.is_image() {
            return Err(tracerr::new!(E::UnsupportedMediaType(mime_type)));
        }
        let max = self.config().max_photo_size;
        let size = media::Size::try_from(content.len())
            .ok()
            .filter(|s| *s <= max)
            .ok_or(E::TooLarge {
                size: content.len(),
                max,
            })
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid exceeding the limit by concurrent uploads.
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

        let collection = Collection::Files;
        let attached = tx
            .execute(Select(By::new((facility_id, collection))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let order = media::Order::try_from(attached.len())
            .ok()
            .filter(|_| attached.len() < collection.max_len())
            .ok_or(E::TooManyPhotos {
                facility_id,
                max: collection.max_len(),
            })
            .map_err(tracerr::wrap!())?;

        let media = Media {
            id: media::Id::new(),
            facility_id,
            collection,
            file_name,
            mime_type,
            size,
            order,
            created_at: DateTime::now().coerce(),
        };

        self.storage()
            .execute(Insert(storage::Object {
                path: media.path(),
                content,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let saved = match tx.execute(Insert(media.clone())).await {
            Ok(_) => tx.execute(Commit).await.map(drop),
            Err(e) => Err(e),
        };
        if saved.is_err() {
            let path = media.path();
            if let Err(e) = self
                .storage()
                .execute(Delete(By::<Media, _>::new(path.clone())))
                .await
            {
                log::warn!("failed to remove `{path}` file: {e}");
            }
        }
        saved.map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(media)
    }
}

/// Error of [`AttachFacilityPhoto`] [`Command`] execution.
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

    /// Photo is larger than allowed.
    #[display("Photo of {size} bytes exceeds the limit of {max} bytes")]
    TooLarge {
        /// Size of the photo in bytes.
        size: usize,

        /// Maximum allowed size in bytes.
        max: media::Size,
    },

    /// [`Facility`] already has the maximum number of photos.
    #[display("`Facility(id: {facility_id})` already has {max} photos")]
    TooManyPhotos {
        /// ID of the [`Facility`].
        facility_id: facility::Id,

        /// Maximum allowed number of photos.
        max: usize,
    },

    /// Uploaded file is not an image.
    #[display("`{_0}` files are not supported, only images are")]
    UnsupportedMediaType(#[error(not(source))] media::MimeType),
}

#[cfg(test)]
mod spec {
    use common::Handler as _;

    use crate::{
        domain::{
            facility,
            media::{FileName, MimeType},
        },
        test_support::{facility, seed, service, TestService},
        SlugUniqueness,
    };

    use super::{AttachFacilityPhoto, ExecutionError};

    fn photo(facility_id: facility::Id, name: &str) -> AttachFacilityPhoto {
        AttachFacilityPhoto {
            facility_id,
            file_name: FileName::new(name).unwrap(),
            mime_type: MimeType::new("image/jpeg").unwrap(),
            content: name.as_bytes().to_vec(),
        }
    }

    async fn attach_five(svc: &TestService, facility_id: facility::Id) {
        for i in 0..5 {
            _ = svc
                .execute(photo(facility_id, &format!("foto-{i}.jpg")))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn appends_photos_in_order() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let f = facility(&svc, &refs, "Stadion A");

        let first = svc.execute(photo(f.id, "depan.jpg")).await.unwrap();
        let second = svc.execute(photo(f.id, "belakang.jpg")).await.unwrap();

        assert_eq!(first.order, 0);
        assert_eq!(second.order, 1);
        assert_eq!(second.size, 12);
        assert_eq!(
            svc.storage().files().get(&second.path().to_string()),
            Some(&b"belakang.jpg".to_vec()),
        );
        assert_eq!(svc.database().data().media.len(), 2);
    }

    #[tokio::test]
    async fn rejects_sixth_photo_keeping_existing_five() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let f = facility(&svc, &refs, "Stadion A");
        attach_five(&svc, f.id).await;

        let err = svc.execute(photo(f.id, "foto-5.jpg")).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::TooManyPhotos { facility_id, max: 5 }
                if *facility_id == f.id,
        ));
        let data = svc.database().data();
        assert_eq!(data.media.len(), 5);
        let mut orders = data.media.iter().map(|m| m.order).collect::<Vec<_>>();
        orders.sort_unstable();
        assert_eq!(orders, [0, 1, 2, 3, 4]);
        drop(data);
        assert_eq!(svc.storage().files().len(), 5);
    }

    #[tokio::test]
    async fn rejects_non_images() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let f = facility(&svc, &refs, "Stadion A");

        let err = svc
            .execute(AttachFacilityPhoto {
                mime_type: MimeType::new("application/pdf").unwrap(),
                ..photo(f.id, "izin.pdf")
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::UnsupportedMediaType(_),
        ));
        assert!(svc.storage().files().is_empty());
    }

    #[tokio::test]
    async fn rejects_too_large_photos() {
        let svc = service(SlugUniqueness::default());
        let refs = seed(&svc);
        let f = facility(&svc, &refs, "Stadion A");

        let err = svc
            .execute(AttachFacilityPhoto {
                content: vec![0; 1025],
                ..photo(f.id, "besar.jpg")
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::TooLarge {
                size: 1025,
                max: 1024,
            },
        ));
        assert!(svc.database().data().media.is_empty());
    }

    #[tokio::test]
    async fn fails_on_non_existent_facility() {
        let svc = service(SlugUniqueness::default());
        _ = seed(&svc);
        let missing = facility::Id::new();

        let err = svc.execute(photo(missing, "foto.jpg")).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::FacilityNotExists(id) if *id == missing,
        ));
        assert!(svc.storage().files().is_empty());
    }
}
