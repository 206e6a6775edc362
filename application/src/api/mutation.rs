//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use service::{command, Command as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Facility` from the submitted `FacilityFormState`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - some fields are invalid, all of them are listed
    ///                         in the `fields` extension;
    /// - `KELURAHAN_NOT_IN_DISTRICT` - the selected `Kelurahan` doesn't
    ///                                 belong to the selected `District`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createFacility",
            name = %state.name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_facility(
        state: api::form::StateInput,
        ctx: &Context,
    ) -> Result<api::Facility, Error> {
        ctx.service()
            .execute(command::CreateFacility {
                state: state.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the specified `Facility` with the submitted
    /// `FacilityFormState`.
    ///
    /// The `Facility` keeps its slug.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `FACILITY_NOT_EXISTS` - the `Facility` with the specified ID does
    ///                           not exist;
    /// - `VALIDATION_FAILED` - some fields are invalid, all of them are listed
    ///                         in the `fields` extension;
    /// - `KELURAHAN_NOT_IN_DISTRICT` - the selected `Kelurahan` doesn't
    ///                                 belong to the selected `District`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateFacility",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_facility(
        id: api::facility::Id,
        state: api::form::StateInput,
        ctx: &Context,
    ) -> Result<api::Facility, Error> {
        ctx.service()
            .execute(command::UpdateFacility {
                id: id.into(),
                state: state.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the specified `Facility`s along with their `Photo`s.
    ///
    /// Returns IDs of the actually deleted `Facility`s, non-existent ones
    /// are skipped.
    #[tracing::instrument(
        skip_all,
        fields(
            count = ids.len(),
            gql.name = "deleteFacilities",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_facilities(
        ids: Vec<api::facility::Id>,
        ctx: &Context,
    ) -> Result<Vec<api::facility::Id>, Error> {
        ctx.service()
            .execute(command::DeleteFacilities {
                ids: ids.into_iter().map(Into::into).collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ids| ids.into_iter().map(Into::into).collect())
    }

    /// Reorders the `Photo`s of the specified `Facility`.
    ///
    /// `order` must list every `Photo` of the `Facility` exactly once.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `FACILITY_NOT_EXISTS` - the `Facility` with the specified ID does
    ///                           not exist;
    /// - `INVALID_PHOTO_ORDER` - `order` is not a permutation of the
    ///                           `Facility` `Photo`s.
    #[tracing::instrument(
        skip_all,
        fields(
            facility_id = %facility_id,
            gql.name = "reorderFacilityPhotos",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reorder_facility_photos(
        facility_id: api::facility::Id,
        order: Vec<api::photo::Id>,
        ctx: &Context,
    ) -> Result<Vec<api::Photo>, Error> {
        _ = ctx
            .service()
            .execute(command::ReorderFacilityPhotos {
                facility_id: facility_id.into(),
                order: order.into_iter().map(Into::into).collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        api::Photo::of_facility(facility_id, ctx).await
    }

    /// Detaches the specified `Photo` from the `Facility`, deleting its
    /// file. Remaining `Photo`s are renumbered contiguously.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PHOTO_NOT_EXISTS` - the `Photo` is not attached to the `Facility`.
    #[tracing::instrument(
        skip_all,
        fields(
            facility_id = %facility_id,
            gql.name = "detachFacilityPhoto",
            otel.name = Self::SPAN_NAME,
            photo_id = %photo_id,
        ),
    )]
    pub async fn detach_facility_photo(
        facility_id: api::facility::Id,
        photo_id: api::photo::Id,
        ctx: &Context,
    ) -> Result<api::photo::Id, Error> {
        ctx.service()
            .execute(command::DetachFacilityPhoto {
                facility_id: facility_id.into(),
                media_id: photo_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|media| media.id.into())
    }
}
