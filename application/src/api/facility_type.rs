//! [`FacilityType`]-related definitions.

use common::Handler as _;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use uuid::Uuid;

use crate::{api, api::scalar, define_error, AsError, Context, Error};

/// Kind of sport a `Facility` is intended for.
#[derive(Clone, Debug, From, Into)]
pub struct FacilityType(domain::FacilityType);

impl FacilityType {
    /// Loads the [`FacilityType`] with the provided ID.
    ///
    /// # Errors
    ///
    /// Errors if the [`FacilityType`] doesn't exist.
    pub(crate) async fn load(
        id: domain::facility_type::Id,
        ctx: &Context,
    ) -> Result<Self, Error> {
        ctx.service()
            .execute(query::facility_type::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .map(Into::into)
            .ok_or_else(|| FacilityTypeError::NotExists.into())
            .map_err(ctx.error())
    }
}

/// Kind of sport a `Facility` is intended for.
#[graphql_object(context = Context)]
impl FacilityType {
    /// Unique identifier of this `FacilityType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "FacilityType.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Unique name of this `FacilityType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "FacilityType.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Unique URL-friendly identifier of this `FacilityType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "FacilityType.slug",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn slug(&self) -> api::facility::Slug {
        self.0.slug.clone().into()
    }
}

/// Unique identifier of a `FacilityType`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::facility_type::Id)]
#[into(domain::facility_type::Id)]
#[graphql(name = "FacilityTypeId", transparent)]
pub struct Id(Uuid);

/// Name of a `FacilityType`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "FacilityTypeName",
    with = scalar::Via::<domain::facility_type::Name>,
)]
pub struct Name(domain::facility_type::Name);

define_error! {
    enum FacilityTypeError {
        #[code = "FACILITY_TYPE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`FacilityType` with the specified ID does not exist"]
        NotExists,
    }
}
