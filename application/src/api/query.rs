//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{form, query, read, Query as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Facility` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `FACILITY_NOT_EXISTS` - the `Facility` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "facility",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn facility(
        id: api::facility::Id,
        ctx: &Context,
    ) -> Result<api::Facility, Error> {
        ctx.service()
            .execute(query::facility::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .map(Into::into)
            .ok_or_else(|| api::facility::FacilityError::NotExists.into())
            .map_err(ctx.error())
    }

    /// Fetches a page of the `Facility` list.
    ///
    /// By default, the list is sorted by `NAME` in ascending order, 10
    /// `Facility`s per page.
    ///
    /// `search` matches if any searchable column contains it, while every
    /// `columns` search must match its own column.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PAGINATION_ARGUMENTS` - `page` is less than 1, or `perPage`
    ///                                    is not in `1..=100` range;
    /// - `COLUMN_NOT_SEARCHABLE` - a boolean column is searched in.
    #[tracing::instrument(
        skip_all,
        fields(
            district_id = ?district_id.map(|id| id.to_string()),
            gql.name = "facilities",
            otel.name = Self::SPAN_NAME,
            page = ?page,
            per_page = ?per_page,
            search = ?search,
            sort = ?sort,
        ),
    )]
    pub async fn facilities(
        page: Option<i32>,
        per_page: Option<i32>,
        sort: Option<api::facility::list::Sort>,
        search: Option<String>,
        columns: Option<Vec<api::facility::list::ColumnSearch>>,
        district_id: Option<api::district::Id>,
        ctx: &Context,
    ) -> Result<api::facility::list::Page, Error> {
        const DEFAULT_PER_PAGE: i32 = 10;

        let arguments = read::facility::list::Arguments::new(
            page,
            per_page,
            DEFAULT_PER_PAGE,
        )
        .ok_or_else(|| api::PaginationError::Invalid.into())
        .map_err(ctx.error())?;

        let columns = columns
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.into_read().transpose())
            .collect::<Result<Vec<_>, _>>()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::facilities::List::by(
                read::facility::list::Selector {
                    arguments,
                    sort: sort.map(Into::into).unwrap_or_default(),
                    filter: read::facility::list::Filter {
                        search: search.and_then(read::Search::new),
                        columns,
                        district_id: district_id.map(Into::into),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(api::facility::list::Page)
    }

    /// Returns all the `Photo`s of the specified `Facility` in their display
    /// order.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `FACILITY_NOT_EXISTS` - the `Facility` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            facility_id = %facility_id,
            gql.name = "facilityPhotos",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn facility_photos(
        facility_id: api::facility::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Photo>, Error> {
        api::Photo::of_facility(facility_id, ctx).await
    }

    /// Returns all the `FacilityType`s ordered by name, optionally filtered
    /// by a case-insensitive substring of their name.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "facilityTypes",
            name = ?name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn facility_types(
        name: Option<String>,
        ctx: &Context,
    ) -> Result<Vec<api::FacilityType>, Error> {
        ctx.service()
            .execute(query::facility_types::List::by(
                read::facility_type::Filter {
                    name: name.and_then(read::Search::new),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ts| ts.into_iter().map(Into::into).collect())
    }

    /// Returns all the `District`s ordered by name.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "districts",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn districts(ctx: &Context) -> Result<Vec<api::District>, Error> {
        ctx.service()
            .execute(query::districts::List::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ds| ds.into_iter().map(Into::into).collect())
    }

    /// Returns all the `Kelurahan`s of the specified `District` ordered by
    /// name.
    ///
    /// Empty list is returned if no `District` is specified.
    #[tracing::instrument(
        skip_all,
        fields(
            district_id = ?district_id.map(|id| id.to_string()),
            gql.name = "kelurahans",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn kelurahans(
        district_id: Option<api::district::Id>,
        ctx: &Context,
    ) -> Result<Vec<api::Kelurahan>, Error> {
        let Some(id) = district_id else {
            return Ok(vec![]);
        };
        api::Kelurahan::of_district(id.into(), ctx).await
    }

    /// Returns a `FacilityFormState` to start an edit session with.
    ///
    /// Without an `id` the state is empty, for creating a new `Facility`.
    /// Otherwise, it's pre-populated with the specified `Facility`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `FACILITY_NOT_EXISTS` - the `Facility` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "facilityForm",
            id = ?id.map(|id| id.to_string()),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn facility_form(
        id: Option<api::facility::Id>,
        ctx: &Context,
    ) -> Result<api::form::State, Error> {
        let Some(id) = id else {
            return Ok(form::State::new().into());
        };
        ctx.service()
            .execute(query::form::Edit(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the options to choose from in a `FacilityFormState`.
    ///
    /// `Kelurahan`s are listed for the specified `District` only.
    #[tracing::instrument(
        skip_all,
        fields(
            district_id = ?district_id.map(|id| id.to_string()),
            facility_type_name = ?facility_type_name,
            gql.name = "facilityFormOptions",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn facility_form_options(
        district_id: Option<api::district::Id>,
        facility_type_name: Option<String>,
        ctx: &Context,
    ) -> Result<api::form::Options, Error> {
        ctx.service()
            .execute(query::form::Options {
                district_id: district_id.map(Into::into),
                facility_type_name: facility_type_name
                    .and_then(read::Search::new),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Applies a single change to the provided `FacilityFormState`, returning
    /// the new state with all the dependent fields recomputed.
    ///
    /// Nothing is persisted.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MISSING_CHANGE_VALUE` - an ownership flag is changed without a
    ///                            `flag` value;
    /// - `FIELD_NOT_EDITABLE` - the `SLUG` field is changed;
    /// - `KELURAHAN_NOT_EXISTS` - the selected `Kelurahan` does not exist;
    /// - `KELURAHAN_NOT_IN_DISTRICT` - the selected `Kelurahan` doesn't
    ///                                 belong to the selected `District`.
    #[tracing::instrument(
        skip_all,
        fields(
            field = ?change.field,
            gql.name = "applyFacilityFormChange",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn apply_facility_form_change(
        state: api::form::StateInput,
        change: api::form::ChangeInput,
        ctx: &Context,
    ) -> Result<api::form::Applied, Error> {
        let change = form::Change::try_from(change)
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::form::ApplyChange {
                state: state.into(),
                change,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the configuration of the map widget.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "mapConfig",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub fn map_config(ctx: &Context) -> Result<api::map::MapConfig, Error> {
        api::map::MapConfig::try_from(ctx.map()).map_err(ctx.error())
    }
}
