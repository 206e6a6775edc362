//! [`District`]-related definitions.

use common::Handler as _;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use uuid::Uuid;

use crate::{api, api::scalar, define_error, AsError, Context, Error};

/// District, the upper level of the administrative areas.
#[derive(Clone, Debug, From, Into)]
pub struct District(domain::District);

impl District {
    /// Loads the [`District`] with the provided ID.
    ///
    /// # Errors
    ///
    /// Errors if the [`District`] doesn't exist.
    pub(crate) async fn load(
        id: domain::district::Id,
        ctx: &Context,
    ) -> Result<Self, Error> {
        ctx.service()
            .execute(query::district::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .map(Into::into)
            .ok_or_else(|| DistrictError::NotExists.into())
            .map_err(ctx.error())
    }
}

/// District, the upper level of the administrative areas.
#[graphql_object(context = Context)]
impl District {
    /// Unique identifier of this `District`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "District.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Name of this `District`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "District.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// `Kelurahan`s of this `District` ordered by name.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "District.kelurahans",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kelurahans(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Kelurahan>, Error> {
        api::Kelurahan::of_district(self.0.id, ctx).await
    }
}

/// Unique identifier of a `District`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::district::Id)]
#[into(domain::district::Id)]
#[graphql(name = "DistrictId", transparent)]
pub struct Id(Uuid);

/// Name of a `District`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "DistrictName", with = scalar::Via::<domain::district::Name>)]
pub struct Name(domain::district::Name);

define_error! {
    enum DistrictError {
        #[code = "DISTRICT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`District` with the specified ID does not exist"]
        NotExists,
    }
}
