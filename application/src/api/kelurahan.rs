//! [`Kelurahan`]-related definitions.

use common::Handler as _;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use uuid::Uuid;

use crate::{api, api::scalar, define_error, AsError, Context, Error};

/// Kelurahan (sub-district), the lower level of the administrative areas.
#[derive(Clone, Debug, From, Into)]
pub struct Kelurahan(domain::Kelurahan);

impl Kelurahan {
    /// Loads the [`Kelurahan`] with the provided ID.
    ///
    /// # Errors
    ///
    /// Errors if the [`Kelurahan`] doesn't exist.
    pub(crate) async fn load(
        id: domain::kelurahan::Id,
        ctx: &Context,
    ) -> Result<Self, Error> {
        ctx.service()
            .execute(query::kelurahan::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .map(Into::into)
            .ok_or_else(|| KelurahanError::NotExists.into())
            .map_err(ctx.error())
    }

    /// Loads all the [`Kelurahan`]s of the provided district ordered by name.
    ///
    /// # Errors
    ///
    /// Errors if the [`Database`] operation fails.
    ///
    /// [`Database`]: service::infra::Database
    pub(crate) async fn of_district(
        id: domain::district::Id,
        ctx: &Context,
    ) -> Result<Vec<Self>, Error> {
        ctx.service()
            .execute(query::kelurahans::ByDistrict::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ks| ks.into_iter().map(Into::into).collect())
    }
}

/// Kelurahan (sub-district), the lower level of the administrative areas.
#[graphql_object(context = Context)]
impl Kelurahan {
    /// Unique identifier of this `Kelurahan`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Kelurahan.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Name of this `Kelurahan`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Kelurahan.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// `District` this `Kelurahan` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Kelurahan.district",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn district(
        &self,
        ctx: &Context,
    ) -> Result<api::District, Error> {
        api::District::load(self.0.district_id, ctx).await
    }

    /// Default `Location` of a `Facility` situated in this `Kelurahan`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Kelurahan.location",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn location(&self) -> api::map::Location {
        self.0.location.into()
    }
}

/// Unique identifier of a `Kelurahan`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::kelurahan::Id)]
#[into(domain::kelurahan::Id)]
#[graphql(name = "KelurahanId", transparent)]
pub struct Id(Uuid);

/// Name of a `Kelurahan`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "KelurahanName",
    with = scalar::Via::<domain::kelurahan::Name>,
)]
pub struct Name(domain::kelurahan::Name);

define_error! {
    enum KelurahanError {
        #[code = "KELURAHAN_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Kelurahan` with the specified ID does not exist"]
        NotExists,
    }
}
