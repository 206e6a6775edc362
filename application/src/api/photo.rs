//! [`Photo`]-related definitions.

use common::{DateTime, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, read};
use uuid::Uuid;

use crate::{api, api::scalar, define_error, AsError, Context, Error};

/// Condition photo of a `Facility`.
#[derive(Clone, Debug, From, Into)]
pub struct Photo(read::Photo);

impl Photo {
    /// Loads all the [`Photo`]s of the provided `Facility` in their display
    /// order.
    ///
    /// # Errors
    ///
    /// Errors if the `Facility` doesn't exist.
    pub(crate) async fn of_facility(
        id: api::facility::Id,
        ctx: &Context,
    ) -> Result<Vec<Self>, Error> {
        ctx.service()
            .execute(query::photos::OfFacility(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|photos| photos.into_iter().map(Into::into).collect())
    }
}

/// Condition photo of a `Facility`.
#[graphql_object(context = Context)]
impl Photo {
    /// Unique identifier of this `Photo`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Photo.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.media.id.into()
    }

    /// Name of the file of this `Photo`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Photo.fileName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn file_name(&self) -> FileName {
        self.0.media.file_name.clone().into()
    }

    /// MIME type of the file of this `Photo`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Photo.mimeType",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn mime_type(&self) -> String {
        self.0.media.mime_type.to_string()
    }

    /// Size of the file of this `Photo` in bytes.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Photo.size",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn size(&self) -> Result<i32, Error> {
        i32::try_from(self.0.media.size).map_err(AsError::into_error)
    }

    /// Display position of this `Photo`, starting from `0`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Photo.order",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn order(&self) -> i32 {
        self.0.media.order.into()
    }

    /// Public URL of this `Photo`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Photo.url",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn url(&self) -> String {
        self.0.url.to_string()
    }

    /// `DateTime` when this `Photo` was uploaded.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Photo.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.media.created_at.coerce()
    }
}

/// Unique identifier of a `Photo`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::media::Id)]
#[into(domain::media::Id)]
#[graphql(name = "PhotoId", transparent)]
pub struct Id(Uuid);

/// Name of a `Photo` file.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PhotoFileName",
    with = scalar::Via::<domain::media::FileName>,
)]
pub struct FileName(domain::media::FileName);

impl AsError for query::photos::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::FacilityNotExists(_) => {
                Some(api::facility::FacilityError::NotExists.into())
            }
            Self::Storage(_) => None,
        }
    }
}

impl AsError for service::command::attach_facility_photo::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PHOTO_TOO_LARGE"]
                #[status = PAYLOAD_TOO_LARGE]
                #[message = "Photo exceeds the maximum allowed size"]
                TooLarge,

                #[code = "TOO_MANY_PHOTOS"]
                #[status = CONFLICT]
                #[message = "`Facility` already has the maximum number of \
                             photos"]
                TooManyPhotos,

                #[code = "UNSUPPORTED_MEDIA_TYPE"]
                #[status = UNSUPPORTED_MEDIA_TYPE]
                #[message = "Only image files can be attached as photos"]
                UnsupportedMediaType,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::Storage(_) => return None,
            Self::FacilityNotExists(_) => {
                api::facility::FacilityError::NotExists.into()
            }
            Self::TooLarge { .. } => Error::TooLarge.into(),
            Self::TooManyPhotos { .. } => Error::TooManyPhotos.into(),
            Self::UnsupportedMediaType(_) => {
                Error::UnsupportedMediaType.into()
            }
        })
    }
}

impl AsError for service::command::reorder_facility_photos::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_PHOTO_ORDER"]
                #[status = BAD_REQUEST]
                #[message = "Order must list every photo of the `Facility` \
                             exactly once"]
                NotPermutation,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::FacilityNotExists(_) => {
                api::facility::FacilityError::NotExists.into()
            }
            Self::NotPermutation(_) => Error::NotPermutation.into(),
        })
    }
}

impl AsError for service::command::detach_facility_photo::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PHOTO_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Photo` is not attached to the `Facility`"]
                NotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::MediaNotExists { .. } => Some(Error::NotExists.into()),
        }
    }
}
