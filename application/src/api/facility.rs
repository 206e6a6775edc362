//! [`Facility`]-related definitions.

use std::future;

use common::{DateTime, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLObject, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, define_error, AsError, Context, Error};

/// A sports facility.
#[derive(Clone, Debug)]
pub struct Facility {
    /// ID of this [`Facility`].
    id: Id,

    /// Underlying [`domain::Facility`].
    facility: OnceCell<domain::Facility>,
}

impl From<domain::Facility> for Facility {
    fn from(facility: domain::Facility) -> Self {
        Self {
            id: facility.id.into(),
            facility: OnceCell::new_with(Some(facility)),
        }
    }
}

impl Facility {
    /// Returns the underlying [`domain::Facility`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Facility`] doesn't exist.
    async fn facility(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Facility, Error> {
        let id = self.id.into();
        self.facility
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::facility::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|f| {
                        future::ready(
                            f.ok_or_else(|| FacilityError::NotExists.into())
                                .map_err(ctx.error()),
                        )
                    })
            })
            .await
    }
}

/// A sports facility.
#[graphql_object(context = Context)]
impl Facility {
    /// Unique identifier of this `Facility`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// URL-friendly identifier of this `Facility`.
    ///
    /// Derived from the name once, when this `Facility` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.slug",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn slug(&self, ctx: &Context) -> Result<Slug, Error> {
        Ok(self.facility(ctx).await?.slug.clone().into())
    }

    /// Name of this `Facility`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.facility(ctx).await?.name.clone().into())
    }

    /// `FacilityType` of this `Facility`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.facilityType",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn facility_type(
        &self,
        ctx: &Context,
    ) -> Result<api::FacilityType, Error> {
        let id = self.facility(ctx).await?.facility_type_id;
        api::FacilityType::load(id, ctx).await
    }

    /// Indicator whether this `Facility` is owned by the government.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.isGovernmentOwned",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_government_owned(
        &self,
        ctx: &Context,
    ) -> Result<bool, Error> {
        Ok(self.facility(ctx).await?.is_government_owned)
    }

    /// Indicator whether this `Facility` is owned privately.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.isPrivateOwned",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_private_owned(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.facility(ctx).await?.is_private_owned)
    }

    /// PBG (building approval) permit number of this `Facility`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.pbgPermit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn pbg_permit(
        &self,
        ctx: &Context,
    ) -> Result<Option<PbgPermit>, Error> {
        Ok(self.facility(ctx).await?.pbg_permit.clone().map(Into::into))
    }

    /// Number of visitors this `Facility` holds, if known.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.capacity",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn capacity(&self, ctx: &Context) -> Result<Option<i32>, Error> {
        self.facility(ctx)
            .await?
            .capacity
            .map(i32::try_from)
            .transpose()
            .map_err(AsError::into_error)
    }

    /// Number of employees of this `Facility`, if known.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.employeesCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn employees_count(
        &self,
        ctx: &Context,
    ) -> Result<Option<i32>, Error> {
        self.facility(ctx)
            .await?
            .employees_count
            .map(i32::try_from)
            .transpose()
            .map_err(AsError::into_error)
    }

    /// Land `Area` of this `Facility`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.landArea",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn land_area(&self, ctx: &Context) -> Result<Area, Error> {
        Ok(self.facility(ctx).await?.land_area.into())
    }

    /// Building `Area` of this `Facility`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.buildingArea",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn building_area(&self, ctx: &Context) -> Result<Area, Error> {
        Ok(self.facility(ctx).await?.building_area.into())
    }

    /// `District` this `Facility` is located in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.district",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn district(
        &self,
        ctx: &Context,
    ) -> Result<api::District, Error> {
        let id = self.facility(ctx).await?.district_id;
        api::District::load(id, ctx).await
    }

    /// `Kelurahan` this `Facility` is located in, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.kelurahan",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kelurahan(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Kelurahan>, Error> {
        let Some(id) = self.facility(ctx).await?.kelurahan_id else {
            return Ok(None);
        };
        api::Kelurahan::load(id, ctx).await.map(Some)
    }

    /// Full address of this `Facility`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.address",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn address(&self, ctx: &Context) -> Result<Address, Error> {
        Ok(self.facility(ctx).await?.address.clone().into())
    }

    /// Free-text description of this `Facility`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Option<Description>, Error> {
        Ok(self.facility(ctx).await?.description.clone().map(Into::into))
    }

    /// `Location` of this `Facility` on the map.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.location",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn location(
        &self,
        ctx: &Context,
    ) -> Result<api::map::Location, Error> {
        Ok(self.facility(ctx).await?.location.into())
    }

    /// Condition `Photo`s of this `Facility` in their display order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.photos",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn photos(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Photo>, Error> {
        api::Photo::of_facility(self.id, ctx).await
    }

    /// `DateTime` when this `Facility` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.facility(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Facility` was modified the last time.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Facility.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.facility(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of a `Facility`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::facility::Id)]
#[into(domain::facility::Id)]
#[graphql(name = "FacilityId", transparent)]
pub struct Id(Uuid);

/// URL-friendly identifier of a `Facility`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "Slug", with = scalar::Via::<domain::Slug>)]
pub struct Slug(domain::Slug);

/// Name of a `Facility`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "FacilityName",
    with = scalar::Via::<domain::facility::Name>,
)]
pub struct Name(domain::facility::Name);

/// PBG (building approval) permit number of a `Facility`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "FacilityPbgPermit",
    with = scalar::Via::<domain::facility::PbgPermit>,
)]
pub struct PbgPermit(domain::facility::PbgPermit);

/// Full address of a `Facility`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "FacilityAddress",
    with = scalar::Via::<domain::facility::Address>,
)]
pub struct Address(domain::facility::Address);

/// Free-text description of a `Facility`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "FacilityDescription",
    with = scalar::Via::<domain::facility::Description>,
)]
pub struct Description(domain::facility::Description);

/// Surface area measured in some `AreaUnit`.
#[derive(Clone, Debug, GraphQLObject)]
pub struct Area {
    /// Non-negative decimal amount of this `Area`.
    pub amount: String,

    /// `AreaUnit` of the `amount`.
    pub unit: AreaUnit,
}

impl From<common::Area> for Area {
    fn from(area: common::Area) -> Self {
        Self {
            amount: area.amount().normalize().to_string(),
            unit: area.unit().into(),
        }
    }
}

/// Unit of measure of an `Area`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum AreaUnit {
    /// Square meters (m²).
    SquareMeters,

    /// Hectares (ha).
    Hectares,

    /// Square feet (ft²).
    SquareFeet,
}

impl From<common::AreaUnit> for AreaUnit {
    fn from(unit: common::AreaUnit) -> Self {
        use common::AreaUnit as U;
        match unit {
            U::SquareMeters => Self::SquareMeters,
            U::Hectares => Self::Hectares,
            U::SquareFeet => Self::SquareFeet,
        }
    }
}

impl From<AreaUnit> for common::AreaUnit {
    fn from(unit: AreaUnit) -> Self {
        match unit {
            AreaUnit::SquareMeters => Self::SquareMeters,
            AreaUnit::Hectares => Self::Hectares,
            AreaUnit::SquareFeet => Self::SquareFeet,
        }
    }
}

define_error! {
    enum FacilityError {
        #[code = "FACILITY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Facility` with the specified ID does not exist"]
        NotExists,
    }
}

pub mod list {
    //! Definitions related to the [`Facility`] list.

    use common::{pagination, Handler as _};
    use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject};
    use service::{query, read};

    use crate::{define_error, AsError, Context, Error};

    use super::Facility;

    /// Column of the `Facility` list.
    #[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
    #[graphql(name = "FacilityListColumn")]
    pub enum Column {
        /// Name of a `Facility`.
        Name,

        /// Name of the `District` of a `Facility`.
        District,

        /// Address of a `Facility`.
        Address,

        /// Name of the `FacilityType` of a `Facility`.
        FacilityType,

        /// Government ownership flag of a `Facility`. Sortable only.
        IsGovernmentOwned,

        /// Private ownership flag of a `Facility`. Sortable only.
        IsPrivateOwned,

        /// Capacity of a `Facility`.
        Capacity,

        /// Number of employees of a `Facility`.
        EmployeesCount,

        /// Land area amount of a `Facility`.
        LandArea,

        /// Land area unit of a `Facility`.
        LandAreaUnit,

        /// Building area amount of a `Facility`.
        BuildingArea,

        /// Building area unit of a `Facility`.
        BuildingAreaUnit,
    }

    impl From<Column> for read::facility::list::Column {
        fn from(column: Column) -> Self {
            match column {
                Column::Name => Self::Name,
                Column::District => Self::District,
                Column::Address => Self::Address,
                Column::FacilityType => Self::FacilityType,
                Column::IsGovernmentOwned => Self::IsGovernmentOwned,
                Column::IsPrivateOwned => Self::IsPrivateOwned,
                Column::Capacity => Self::Capacity,
                Column::EmployeesCount => Self::EmployeesCount,
                Column::LandArea => Self::LandArea,
                Column::LandAreaUnit => Self::LandAreaUnit,
                Column::BuildingArea => Self::BuildingArea,
                Column::BuildingAreaUnit => Self::BuildingAreaUnit,
            }
        }
    }

    /// Order of sorting.
    #[derive(Clone, Copy, Debug, Default, Eq, GraphQLEnum, PartialEq)]
    pub enum SortOrder {
        /// Ascending order.
        #[default]
        Asc,

        /// Descending order.
        Desc,
    }

    impl From<SortOrder> for pagination::Order {
        fn from(order: SortOrder) -> Self {
            match order {
                SortOrder::Asc => Self::Ascending,
                SortOrder::Desc => Self::Descending,
            }
        }
    }

    /// Sorting of the `Facility` list.
    #[derive(Clone, Copy, Debug, GraphQLInputObject)]
    #[graphql(name = "FacilityListSort")]
    pub struct Sort {
        /// `FacilityListColumn` to sort by.
        pub column: Column,

        /// Order of sorting. Ascending, if omitted.
        pub order: Option<SortOrder>,
    }

    impl From<Sort> for read::facility::list::Sort {
        fn from(sort: Sort) -> Self {
            Self {
                column: sort.column.into(),
                order: sort.order.unwrap_or_default().into(),
            }
        }
    }

    /// Case-insensitive substring search in a single `FacilityListColumn`.
    #[derive(Clone, Debug, GraphQLInputObject)]
    #[graphql(name = "FacilityListColumnSearch")]
    pub struct ColumnSearch {
        /// Searchable `FacilityListColumn`.
        pub column: Column,

        /// Substring to search for. Blank queries are ignored.
        pub query: String,
    }

    impl ColumnSearch {
        /// Converts this [`ColumnSearch`] into a
        /// [`read::facility::list::ColumnSearch`].
        ///
        /// Blank queries result in [`None`].
        ///
        /// # Errors
        ///
        /// If the [`Column`] is not searchable.
        pub fn into_read(
            self,
        ) -> Result<Option<read::facility::list::ColumnSearch>, Error> {
            let Some(query) = read::Search::new(self.query) else {
                return Ok(None);
            };
            read::facility::list::ColumnSearch::new(self.column.into(), query)
                .map(Some)
                .ok_or_else(|| ListError::NotSearchable.into())
        }
    }

    /// Page of the [`Facility`] list.
    #[derive(Clone, Debug)]
    pub struct Page(pub read::facility::list::Page);

    /// Page of the `Facility` list.
    #[graphql_object(name = "FacilityListPage", context = Context)]
    impl Page {
        /// `Facility`s on this page.
        pub async fn nodes(
            &self,
            ctx: &Context,
        ) -> Result<Vec<Facility>, Error> {
            let mut found = ctx
                .service()
                .execute(query::facilities::ByIds::by(self.0.nodes.clone()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())?;
            // Facilities deleted after the page has been selected are omitted.
            Ok(self
                .0
                .nodes
                .iter()
                .filter_map(|id| found.remove(id))
                .map(Into::into)
                .collect())
        }

        /// Information about this page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo(self.0.page_info())
        }

        /// Total number of `Facility`s matching the selection on all pages.
        pub fn total_count(&self) -> Result<i32, Error> {
            i32::try_from(self.0.total_count).map_err(AsError::into_error)
        }
    }

    /// Information about a [`Page`].
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo(read::facility::list::PageInfo);

    /// Information about a `FacilityListPage`.
    #[graphql_object(name = "FacilityListPageInfo", context = Context)]
    impl PageInfo {
        /// 1-based number of this page.
        pub fn page(&self) -> Result<i32, Error> {
            i32::try_from(self.0.page).map_err(AsError::into_error)
        }

        /// Maximum number of `Facility`s on a page.
        pub fn per_page(&self) -> Result<i32, Error> {
            i32::try_from(self.0.per_page).map_err(AsError::into_error)
        }

        /// Total number of pages.
        pub fn total_pages(&self) -> Result<i32, Error> {
            i32::try_from(self.0.total_pages).map_err(AsError::into_error)
        }

        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.0.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.0.has_previous_page
        }
    }

    define_error! {
        enum ListError {
            #[code = "COLUMN_NOT_SEARCHABLE"]
            #[status = BAD_REQUEST]
            #[message = "Boolean columns can be sorted by only"]
            NotSearchable,
        }
    }
}
