//! In-memory [`Database`] implementation.
//!
//! Transactions are not isolated: every [`Transact`]ed [`Memory`] shares the
//! data with its origin, and [`Commit`] does nothing.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use common::{
    operations::{
        By, Commit, Delete, Insert, Lock, Select, Transact, Update,
    },
    pagination::{Order, Page},
};
use derive_more::{Display, Error as StdError};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{
        district, facility, facility_type, kelurahan, media, District,
        Facility, FacilityType, Kelurahan, Media, Slug,
    },
    infra::{database, Database},
    read::{self, facility::list::Column},
};

/// In-memory [`Database`].
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Stored [`Data`].
    data: Arc<Mutex<Data>>,
}

/// Data stored in a [`Memory`] [`Database`].
#[derive(Debug, Default)]
pub struct Data {
    /// Stored [`FacilityType`]s.
    pub facility_types: Vec<FacilityType>,

    /// Stored [`District`]s.
    pub districts: Vec<District>,

    /// Stored [`Kelurahan`]s.
    pub kelurahans: Vec<Kelurahan>,

    /// Stored [`Facility`]s.
    pub facilities: BTreeMap<facility::Id, Facility>,

    /// Stored [`Media`].
    pub media: Vec<Media>,
}

impl Memory {
    /// Returns the stored [`Data`].
    pub fn data(&self) -> MutexGuard<'_, Data> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Unique constraint is violated.
    #[display("`{_0}` unique constraint is violated")]
    UniqueViolation(#[error(not(source))] &'static str),
}

impl Error {
    /// Checks if this [`Error`] is a unique violation of the specified
    /// constraint (or any, if [`None`]).
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        let Self::UniqueViolation(c) = self;
        constraint.map_or(true, |constraint| constraint == *c)
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<Facility>, facility::Id>>> for Memory {
    type Ok = Option<Facility>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Facility>, facility::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.data().facilities.get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<HashMap<facility::Id, Facility>, Vec<facility::Id>>>>
    for Memory
{
    type Ok = HashMap<facility::Id, Facility>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<facility::Id, Facility>, Vec<facility::Id>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let data = self.data();
        Ok(by
            .into_inner()
            .into_iter()
            .filter_map(|id| Some((id, data.facilities.get(&id)?.clone())))
            .collect())
    }
}

impl Database<Select<By<Option<Facility>, Slug>>> for Memory {
    type Ok = Option<Facility>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Facility>, Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();
        Ok(self
            .data()
            .facilities
            .values()
            .find(|f| f.slug == slug)
            .cloned())
    }
}

impl Database<Insert<Facility>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(facility): Insert<Facility>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut data = self.data();
        if data.facilities.values().any(|f| f.slug == facility.slug) {
            return Err(tracerr::new!(database::Error::Memory(
                Error::UniqueViolation("facilities_slug_key"),
            )));
        }
        _ = data.facilities.insert(facility.id, facility);
        Ok(())
    }
}

impl Database<Update<Facility>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(facility): Update<Facility>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.data().facilities.insert(facility.id, facility);
        Ok(())
    }
}

impl Database<Lock<By<Facility, facility::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Facility, facility::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Delete<By<Vec<facility::Id>, Vec<facility::Id>>>> for Memory {
    type Ok = Vec<facility::Id>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<facility::Id>, Vec<facility::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut data = self.data();
        let deleted = by
            .into_inner()
            .into_iter()
            .filter(|id| data.facilities.remove(id).is_some())
            .collect::<Vec<_>>();
        data.media.retain(|m| !deleted.contains(&m.facility_id));
        Ok(deleted)
    }
}

/// Value of a [`Column`] in a [`Facility`] row.
///
/// Ordered the way PostgreSQL orders them by default: an absent number is
/// greater than any present one, and text compares case-insensitively first.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Cell {
    /// Textual value.
    Text(String),

    /// Numeric value, if any.
    Number(Option<Decimal>),

    /// Boolean value.
    Bool(bool),
}

impl Cell {
    /// Returns the searchable text of this [`Cell`], if any.
    fn text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => n.map(|n| n.to_string()),
            Self::Bool(_) => None,
        }
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (Self::Number(a), Self::Number(b)) => {
                a.is_none().cmp(&b.is_none()).then_with(|| a.cmp(b))
            }
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Text(_), Self::Number(_) | Self::Bool(_))
            | (Self::Number(_), Self::Bool(_)) => Ordering::Less,
            (Self::Number(_) | Self::Bool(_), Self::Text(_))
            | (Self::Bool(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Data {
    /// Returns the value of the provided [`Column`] for the given
    /// [`Facility`].
    fn cell(&self, f: &Facility, column: Column) -> Cell {
        match column {
            Column::Name => Cell::Text(f.name.to_string()),
            Column::District => Cell::Text(
                self.districts
                    .iter()
                    .find(|d| d.id == f.district_id)
                    .map(|d| d.name.to_string())
                    .unwrap_or_default(),
            ),
            Column::Address => Cell::Text(f.address.to_string()),
            Column::FacilityType => Cell::Text(
                self.facility_types
                    .iter()
                    .find(|t| t.id == f.facility_type_id)
                    .map(|t| t.name.to_string())
                    .unwrap_or_default(),
            ),
            Column::IsGovernmentOwned => Cell::Bool(f.is_government_owned),
            Column::IsPrivateOwned => Cell::Bool(f.is_private_owned),
            Column::Capacity => Cell::Number(f.capacity.map(Decimal::from)),
            Column::EmployeesCount => {
                Cell::Number(f.employees_count.map(Decimal::from))
            }
            Column::LandArea => Cell::Number(Some(f.land_area.amount())),
            Column::LandAreaUnit => Cell::Text(f.land_area.unit().to_string()),
            Column::BuildingArea => {
                Cell::Number(Some(f.building_area.amount()))
            }
            Column::BuildingAreaUnit => {
                Cell::Text(f.building_area.unit().to_string())
            }
        }
    }

    /// Checks whether the provided [`Column`] of the given [`Facility`]
    /// matches the [`read::Search`].
    fn matches(&self, f: &Facility, column: Column, q: &read::Search) -> bool {
        column.is_searchable()
            && self.cell(f, column).text().is_some_and(|t| q.matches(t))
    }
}

impl
    Database<
        Select<
            By<read::facility::list::Page, read::facility::list::Selector>,
        >,
    > for Memory
{
    type Ok = read::facility::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::facility::list::Page, read::facility::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::facility::list::Selector {
            arguments,
            sort,
            filter:
                read::facility::list::Filter {
                    search,
                    columns,
                    district_id,
                },
        } = by.into_inner();

        let data = self.data();
        let mut rows = data
            .facilities
            .values()
            .filter(|f| district_id.map_or(true, |id| f.district_id == id))
            .filter(|f| {
                columns
                    .iter()
                    .all(|c| data.matches(f, c.column(), c.query()))
            })
            .filter(|f| {
                search.as_ref().map_or(true, |q| {
                    Column::ALL.iter().any(|c| data.matches(f, *c, q))
                })
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| {
            let by_column =
                data.cell(a, sort.column).cmp(&data.cell(b, sort.column));
            match sort.order {
                Order::Ascending => by_column,
                Order::Descending => by_column.reverse(),
            }
            .then_with(|| a.id.cmp(&b.id))
        });

        let total_count = rows.len();
        Ok(Page::new(
            arguments,
            rows.into_iter()
                .skip(arguments.offset())
                .take(arguments.per_page())
                .map(|f| f.id),
            total_count,
        ))
    }
}

impl Database<Select<By<Option<FacilityType>, facility_type::Id>>> for Memory {
    type Ok = Option<FacilityType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<FacilityType>, facility_type::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .data()
            .facility_types
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }
}

impl Database<Select<By<Option<FacilityType>, Slug>>> for Memory {
    type Ok = Option<FacilityType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<FacilityType>, Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();
        Ok(self
            .data()
            .facility_types
            .iter()
            .find(|t| t.slug == slug)
            .cloned())
    }
}

impl Database<Select<By<Vec<FacilityType>, read::facility_type::Filter>>>
    for Memory
{
    type Ok = Vec<FacilityType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<FacilityType>, read::facility_type::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::facility_type::Filter { name } = by.into_inner();
        let mut types = self
            .data()
            .facility_types
            .iter()
            .filter(|t| name.as_ref().map_or(true, |q| q.matches(&t.name)))
            .cloned()
            .collect::<Vec<_>>();
        types.sort_by(|a, b| by_name(a.name.as_ref(), b.name.as_ref()));
        Ok(types)
    }
}

impl Database<Select<By<Option<District>, district::Id>>> for Memory {
    type Ok = Option<District>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<District>, district::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.data().districts.iter().find(|d| d.id == id).cloned())
    }
}

impl Database<Select<By<Vec<District>, ()>>> for Memory {
    type Ok = Vec<District>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<District>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut districts = self.data().districts.clone();
        districts.sort_by(|a, b| by_name(a.name.as_ref(), b.name.as_ref()));
        Ok(districts)
    }
}

impl Database<Select<By<Option<Kelurahan>, kelurahan::Id>>> for Memory {
    type Ok = Option<Kelurahan>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Kelurahan>, kelurahan::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.data().kelurahans.iter().find(|k| k.id == id).cloned())
    }
}

impl Database<Select<By<Vec<Kelurahan>, district::Id>>> for Memory {
    type Ok = Vec<Kelurahan>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Kelurahan>, district::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let district_id = by.into_inner();
        let mut kelurahans = self
            .data()
            .kelurahans
            .iter()
            .filter(|k| k.district_id == district_id)
            .cloned()
            .collect::<Vec<_>>();
        kelurahans.sort_by(|a, b| by_name(a.name.as_ref(), b.name.as_ref()));
        Ok(kelurahans)
    }
}

impl Database<Select<By<Vec<Media>, (facility::Id, media::Collection)>>>
    for Memory
{
    type Ok = Vec<Media>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Media>, (facility::Id, media::Collection)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (facility_id, collection) = by.into_inner();
        let mut media = self
            .data()
            .media
            .iter()
            .filter(|m| m.facility_id == facility_id)
            .filter(|m| m.collection == collection)
            .cloned()
            .collect::<Vec<_>>();
        media.sort_by_key(|m| m.order);
        Ok(media)
    }
}

impl Database<Insert<Media>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(media): Insert<Media>,
    ) -> Result<Self::Ok, Self::Err> {
        self.data().media.push(media);
        Ok(())
    }
}

impl Database<Update<Media>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(media): Update<Media>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut data = self.data();
        if let Some(m) = data.media.iter_mut().find(|m| m.id == media.id) {
            *m = media;
        }
        Ok(())
    }
}

impl Database<Delete<By<Media, media::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Media, media::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.data().media.retain(|m| m.id != id);
        Ok(())
    }
}

/// Compares names case-insensitively.
fn by_name(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
