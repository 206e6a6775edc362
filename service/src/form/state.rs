//! [`State`] of a form and its [`Change`]s.

use std::collections::{HashSet, VecDeque};

use common::AreaUnit;
use derive_more::{Display, Error};
use smart_default::SmartDefault;

use crate::domain::{
    district, facility, facility_type, kelurahan, Facility, Kelurahan,
    Location, Slug,
};

use super::Field;

/// State of a [`Facility`] form during a single edit session.
///
/// Values typed by hand are kept as entered, so an invalid input survives
/// until it's fixed and is reported by [`State::validate()`].
///
/// [`State::validate()`]: State::validate
#[derive(Clone, Debug, Eq, PartialEq, SmartDefault)]
pub struct State {
    /// ID of the edited [`Facility`], or [`None`] if a new one is created.
    pub facility_id: Option<facility::Id>,

    /// Name of the [`Facility`].
    pub name: String,

    /// [`Slug`] of the [`Facility`].
    ///
    /// Follows the [`State::name`] while creating, and stays untouched once
    /// the [`Facility`] exists.
    pub slug: Option<Slug>,

    /// ID of the selected facility type.
    pub facility_type_id: Option<facility_type::Id>,

    /// Government ownership flag.
    pub is_government_owned: bool,

    /// Private ownership flag.
    pub is_private_owned: bool,

    /// PBG permit number.
    pub pbg_permit: String,

    /// Capacity of the [`Facility`].
    pub capacity: String,

    /// Number of employees of the [`Facility`].
    pub employees_count: String,

    /// Land area amount.
    pub land_area: String,

    /// Unit of the land area.
    #[default(Some(AreaUnit::default()))]
    pub land_area_unit: Option<AreaUnit>,

    /// Building area amount.
    pub building_area: String,

    /// Unit of the building area.
    #[default(Some(AreaUnit::default()))]
    pub building_area_unit: Option<AreaUnit>,

    /// ID of the selected district.
    pub district_id: Option<district::Id>,

    /// ID of the selected [`Kelurahan`].
    pub kelurahan_id: Option<kelurahan::Id>,

    /// Full address.
    pub address: String,

    /// Free-text description.
    pub description: String,

    /// Point picked on the map, if any.
    pub location: Option<Location>,

    /// Latitude as typed.
    pub latitude: String,

    /// Longitude as typed.
    pub longitude: String,
}

impl State {
    /// Creates a new empty [`State`] for creating a [`Facility`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indicates whether the [`Kelurahan`] selector is disabled.
    #[must_use]
    pub fn is_kelurahan_disabled(&self) -> bool {
        self.district_id.is_none()
    }

    /// Applies the provided [`Change`] to this [`State`], recomputing all the
    /// dependent [`Field`]s.
    ///
    /// Dependents are recomputed breadth-first, each [`Field`] at most once,
    /// and propagation stops at a [`Field`] whose value hasn't changed. The
    /// only exception is the map point, which a selected [`Kelurahan`]
    /// always resets along with the typed coordinates.
    ///
    /// Returns all the changed [`Field`]s, starting with the one of the
    /// [`Change`] itself.
    ///
    /// # Errors
    ///
    /// If the [`Change`] selects a [`Kelurahan`] outside the selected
    /// district. This [`State`] is left untouched then.
    pub fn apply(&mut self, change: Change) -> Result<Vec<Field>, ChangeError> {
        let origin = change.field();

        let kelurahan_location = if let Some(k) = change.kelurahan() {
            if self.district_id != Some(k.district_id) {
                return Err(ChangeError::KelurahanNotInDistrict {
                    kelurahan_id: k.id,
                    district_id: self.district_id,
                });
            }
            Some(k.location)
        } else {
            None
        };

        self.write(change);

        let mut changed = vec![origin];
        let mut visited = HashSet::from([origin]);
        let mut queue = VecDeque::from([origin]);
        while let Some(cause) = queue.pop_front() {
            for &field in cause.dependents() {
                if !visited.insert(field) {
                    continue;
                }
                if self.recompute(field, cause, kelurahan_location) {
                    changed.push(field);
                    queue.push_back(field);
                }
            }
        }

        Ok(changed)
    }

    /// Writes the value of the provided [`Change`] into this [`State`].
    fn write(&mut self, change: Change) {
        match change {
            Change::Name(v) => self.name = v,
            Change::FacilityType(v) => self.facility_type_id = v,
            Change::IsGovernmentOwned(v) => self.is_government_owned = v,
            Change::IsPrivateOwned(v) => self.is_private_owned = v,
            Change::PbgPermit(v) => self.pbg_permit = v,
            Change::Capacity(v) => self.capacity = v,
            Change::EmployeesCount(v) => self.employees_count = v,
            Change::LandArea(v) => self.land_area = v,
            Change::LandAreaUnit(v) => self.land_area_unit = v,
            Change::BuildingArea(v) => self.building_area = v,
            Change::BuildingAreaUnit(v) => self.building_area_unit = v,
            Change::District(v) => self.district_id = v,
            Change::Kelurahan(v) => self.kelurahan_id = v.map(|k| k.id),
            Change::Address(v) => self.address = v,
            Change::Description(v) => self.description = v,
            Change::Location(v) => self.location = v,
            Change::Latitude(v) => self.latitude = v,
            Change::Longitude(v) => self.longitude = v,
        }
    }

    /// Recomputes the provided `field` after its `cause` has changed.
    ///
    /// Returns whether the `field` value has changed.
    fn recompute(
        &mut self,
        field: Field,
        cause: Field,
        kelurahan_location: Option<Location>,
    ) -> bool {
        match field {
            Field::Slug => {
                if self.facility_id.is_some() {
                    return false;
                }
                let slug = Slug::derive(&self.name);
                replace(&mut self.slug, slug)
            }
            Field::Kelurahan => self.kelurahan_id.take().is_some(),
            Field::Location => match cause {
                // Selected `Kelurahan` always resets the map point, so the
                // typed coordinates are resynced even if the point stays.
                Field::Kelurahan => kelurahan_location.is_some_and(|l| {
                    _ = replace(&mut self.location, Some(l));
                    true
                }),
                Field::Latitude | Field::Longitude => {
                    Location::parse(&self.latitude, &self.longitude)
                        .is_some_and(|l| replace(&mut self.location, Some(l)))
                }
                Field::Name
                | Field::Slug
                | Field::FacilityType
                | Field::IsGovernmentOwned
                | Field::IsPrivateOwned
                | Field::PbgPermit
                | Field::Capacity
                | Field::EmployeesCount
                | Field::LandArea
                | Field::LandAreaUnit
                | Field::BuildingArea
                | Field::BuildingAreaUnit
                | Field::District
                | Field::Address
                | Field::Description
                | Field::Location => false,
            },
            Field::Latitude => self.location.is_some_and(|l| {
                sync_coordinate(&mut self.latitude, l.latitude)
            }),
            Field::Longitude => self.location.is_some_and(|l| {
                sync_coordinate(&mut self.longitude, l.longitude)
            }),
            Field::Name
            | Field::FacilityType
            | Field::IsGovernmentOwned
            | Field::IsPrivateOwned
            | Field::PbgPermit
            | Field::Capacity
            | Field::EmployeesCount
            | Field::LandArea
            | Field::LandAreaUnit
            | Field::BuildingArea
            | Field::BuildingAreaUnit
            | Field::District
            | Field::Address
            | Field::Description => false,
        }
    }
}

impl From<Facility> for State {
    fn from(facility: Facility) -> Self {
        let Facility {
            id,
            slug,
            name,
            facility_type_id,
            is_government_owned,
            is_private_owned,
            pbg_permit,
            capacity,
            employees_count,
            land_area,
            building_area,
            district_id,
            kelurahan_id,
            address,
            description,
            location,
            created_at: _,
            updated_at: _,
        } = facility;

        Self {
            facility_id: Some(id),
            name: name.to_string(),
            slug: Some(slug),
            facility_type_id: Some(facility_type_id),
            is_government_owned,
            is_private_owned,
            pbg_permit: pbg_permit.map(|p| p.to_string()).unwrap_or_default(),
            capacity: capacity.map(|c| c.to_string()).unwrap_or_default(),
            employees_count: employees_count
                .map(|c| c.to_string())
                .unwrap_or_default(),
            land_area: land_area.amount().normalize().to_string(),
            land_area_unit: Some(land_area.unit()),
            building_area: building_area.amount().normalize().to_string(),
            building_area_unit: Some(building_area.unit()),
            district_id: Some(district_id),
            kelurahan_id,
            address: address.to_string(),
            description: description
                .map(|d| d.to_string())
                .unwrap_or_default(),
            location: Some(location),
            latitude: location.latitude.to_string(),
            longitude: location.longitude.to_string(),
        }
    }
}

/// Replaces the `current` value with the `new` one.
///
/// Returns whether the value has changed.
fn replace<T: PartialEq>(current: &mut T, new: T) -> bool {
    if *current == new {
        return false;
    }
    *current = new;
    true
}

/// Writes the provided coordinate into the `text` field, unless the `text`
/// already holds an equal value.
///
/// Returns whether the `text` has changed.
fn sync_coordinate<C>(text: &mut String, coordinate: C) -> bool
where
    C: ToString + PartialEq + std::str::FromStr,
{
    if text.trim().parse::<C>().is_ok_and(|c| c == coordinate) {
        return false;
    }
    *text = coordinate.to_string();
    true
}

/// Change of a single [`Field`] of a [`State`].
///
/// Selected [`Kelurahan`] is represented by `K`, which is resolved into a
/// whole [`Kelurahan`] before applying.
#[derive(Clone, Debug)]
pub enum Change<K = Kelurahan> {
    /// New name.
    Name(String),

    /// New facility type.
    FacilityType(Option<facility_type::Id>),

    /// New government ownership flag.
    IsGovernmentOwned(bool),

    /// New private ownership flag.
    IsPrivateOwned(bool),

    /// New PBG permit number.
    PbgPermit(String),

    /// New capacity.
    Capacity(String),

    /// New number of employees.
    EmployeesCount(String),

    /// New land area amount.
    LandArea(String),

    /// New land area unit.
    LandAreaUnit(Option<AreaUnit>),

    /// New building area amount.
    BuildingArea(String),

    /// New building area unit.
    BuildingAreaUnit(Option<AreaUnit>),

    /// New district.
    District(Option<district::Id>),

    /// New [`Kelurahan`].
    Kelurahan(Option<K>),

    /// New address.
    Address(String),

    /// New description.
    Description(String),

    /// New point picked on the map.
    Location(Option<Location>),

    /// New latitude as typed.
    Latitude(String),

    /// New longitude as typed.
    Longitude(String),
}

impl<K> Change<K> {
    /// Returns the [`Field`] changed by this [`Change`].
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::Name(_) => Field::Name,
            Self::FacilityType(_) => Field::FacilityType,
            Self::IsGovernmentOwned(_) => Field::IsGovernmentOwned,
            Self::IsPrivateOwned(_) => Field::IsPrivateOwned,
            Self::PbgPermit(_) => Field::PbgPermit,
            Self::Capacity(_) => Field::Capacity,
            Self::EmployeesCount(_) => Field::EmployeesCount,
            Self::LandArea(_) => Field::LandArea,
            Self::LandAreaUnit(_) => Field::LandAreaUnit,
            Self::BuildingArea(_) => Field::BuildingArea,
            Self::BuildingAreaUnit(_) => Field::BuildingAreaUnit,
            Self::District(_) => Field::District,
            Self::Kelurahan(_) => Field::Kelurahan,
            Self::Address(_) => Field::Address,
            Self::Description(_) => Field::Description,
            Self::Location(_) => Field::Location,
            Self::Latitude(_) => Field::Latitude,
            Self::Longitude(_) => Field::Longitude,
        }
    }

    /// Returns the selected [`Kelurahan`] representation, if this [`Change`]
    /// selects one.
    #[must_use]
    pub const fn kelurahan(&self) -> Option<&K> {
        if let Self::Kelurahan(Some(k)) = self {
            Some(k)
        } else {
            None
        }
    }

    /// Converts the selected [`Kelurahan`] representation with the provided
    /// function, leaving any other [`Change`] as is.
    ///
    /// # Errors
    ///
    /// If the provided function fails.
    pub fn try_map_kelurahan<N, E>(
        self,
        f: impl FnOnce(K) -> Result<N, E>,
    ) -> Result<Change<N>, E> {
        Ok(match self {
            Self::Name(v) => Change::Name(v),
            Self::FacilityType(v) => Change::FacilityType(v),
            Self::IsGovernmentOwned(v) => Change::IsGovernmentOwned(v),
            Self::IsPrivateOwned(v) => Change::IsPrivateOwned(v),
            Self::PbgPermit(v) => Change::PbgPermit(v),
            Self::Capacity(v) => Change::Capacity(v),
            Self::EmployeesCount(v) => Change::EmployeesCount(v),
            Self::LandArea(v) => Change::LandArea(v),
            Self::LandAreaUnit(v) => Change::LandAreaUnit(v),
            Self::BuildingArea(v) => Change::BuildingArea(v),
            Self::BuildingAreaUnit(v) => Change::BuildingAreaUnit(v),
            Self::District(v) => Change::District(v),
            Self::Kelurahan(v) => Change::Kelurahan(v.map(f).transpose()?),
            Self::Address(v) => Change::Address(v),
            Self::Description(v) => Change::Description(v),
            Self::Location(v) => Change::Location(v),
            Self::Latitude(v) => Change::Latitude(v),
            Self::Longitude(v) => Change::Longitude(v),
        })
    }
}

/// Error of applying a [`Change`] to a [`State`].
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum ChangeError {
    /// Selected [`Kelurahan`] doesn't belong to the selected district.
    #[display(
        "`Kelurahan(id: {kelurahan_id})` doesn't belong to the selected \
         district"
    )]
    KelurahanNotInDistrict {
        /// ID of the selected [`Kelurahan`].
        #[error(not(source))]
        kelurahan_id: kelurahan::Id,

        /// ID of the selected district, if any.
        #[error(not(source))]
        district_id: Option<district::Id>,
    },
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{Area, AreaUnit, DateTime};

    use crate::domain::{
        district, facility, facility_type, kelurahan, Facility, Kelurahan,
        Location, Slug,
    };

    use super::{Change, ChangeError, Field, State};

    fn kelurahan(district_id: district::Id, lat: &str, lng: &str) -> Kelurahan {
        Kelurahan {
            id: kelurahan::Id::new(),
            name: kelurahan::Name::new("Cipondoh Indah").unwrap(),
            district_id,
            location: Location::parse(lat, lng).unwrap(),
        }
    }

    fn state_in(district_id: district::Id) -> State {
        let mut state = State::new();
        _ = state.apply(Change::District(Some(district_id))).unwrap();
        state
    }

    #[test]
    fn new_state_defaults() {
        let state = State::new();

        assert_eq!(state.land_area_unit, Some(AreaUnit::SquareMeters));
        assert_eq!(state.building_area_unit, Some(AreaUnit::SquareMeters));
        assert!(state.is_kelurahan_disabled());
        assert!(state.location.is_none());
    }

    #[test]
    fn name_derives_slug_while_creating() {
        let mut state = State::new();

        let changed = state.apply(Change::Name("Stadion A".into())).unwrap();

        assert_eq!(changed, [Field::Name, Field::Slug]);
        assert_eq!(state.slug, Slug::new("stadion-a"));

        let changed = state.apply(Change::Name("Stadion  A!".into())).unwrap();

        assert_eq!(changed, [Field::Name]);
    }

    #[test]
    fn name_keeps_slug_of_existing_facility() {
        let mut state = State {
            facility_id: Some(facility::Id::new()),
            slug: Slug::new("stadion-a"),
            ..State::new()
        };

        let changed = state.apply(Change::Name("Stadion B".into())).unwrap();

        assert_eq!(changed, [Field::Name]);
        assert_eq!(state.slug, Slug::new("stadion-a"));
    }

    #[test]
    fn district_clears_kelurahan() {
        let d1 = district::Id::new();
        let mut state = state_in(d1);
        let k = kelurahan(d1, "-6.2", "106.7");
        _ = state.apply(Change::Kelurahan(Some(k.clone()))).unwrap();
        assert_eq!(state.kelurahan_id, Some(k.id));

        let changed = state.apply(Change::District(Some(d1))).unwrap();

        assert_eq!(changed, [Field::District, Field::Kelurahan]);
        assert_eq!(state.kelurahan_id, None);

        let changed = state.apply(Change::District(Some(d1))).unwrap();

        assert_eq!(changed, [Field::District]);
        assert_eq!(state.kelurahan_id, None);
    }

    #[test]
    fn kelurahan_populates_location() {
        let d1 = district::Id::new();
        let mut state = state_in(d1);
        let k = kelurahan(d1, "-6.178306", "106.631889");

        let changed = state.apply(Change::Kelurahan(Some(k.clone()))).unwrap();

        assert_eq!(
            changed,
            [
                Field::Kelurahan,
                Field::Location,
                Field::Latitude,
                Field::Longitude,
            ],
        );
        assert_eq!(state.location, Some(k.location));
        assert_eq!(state.latitude, "-6.178306");
        assert_eq!(state.longitude, "106.631889");
    }

    #[test]
    fn reselected_kelurahan_restores_typed_coordinates() {
        let d1 = district::Id::new();
        let mut state = state_in(d1);
        let k = kelurahan(d1, "-6.2", "106.7");
        _ = state.apply(Change::Kelurahan(Some(k.clone()))).unwrap();
        _ = state.apply(Change::Latitude("north".into())).unwrap();
        assert_eq!(state.location, Some(k.location));

        let changed = state.apply(Change::Kelurahan(Some(k.clone()))).unwrap();

        assert_eq!(
            changed,
            [Field::Kelurahan, Field::Location, Field::Latitude],
        );
        assert_eq!(state.location, Some(k.location));
        assert_eq!(state.latitude, "-6.2");
        assert_eq!(state.longitude, "106.7");
    }

    #[test]
    fn kelurahan_from_another_district_is_rejected() {
        let d1 = district::Id::new();
        let d2 = district::Id::new();
        let mut state = state_in(d1);
        let before = state.clone();
        let k = kelurahan(d2, "-6.2", "106.7");

        let err = state.apply(Change::Kelurahan(Some(k.clone()))).unwrap_err();

        assert_eq!(
            err,
            ChangeError::KelurahanNotInDistrict {
                kelurahan_id: k.id,
                district_id: Some(d1),
            },
        );
        assert_eq!(state, before);

        let mut state = State::new();
        assert!(state.apply(Change::Kelurahan(Some(k))).is_err());
    }

    #[test]
    fn map_point_propagates_to_fields() {
        let mut state = State::new();
        let point = Location::parse("-6.3", "106.8").unwrap();

        let changed = state.apply(Change::Location(Some(point))).unwrap();

        assert_eq!(
            changed,
            [Field::Location, Field::Latitude, Field::Longitude],
        );
        assert_eq!(state.latitude, "-6.3");
        assert_eq!(state.longitude, "106.8");
    }

    #[test]
    fn map_point_keeps_equal_fields_as_typed() {
        let mut state = State {
            latitude: "-6.30".into(),
            longitude: "106.8".into(),
            ..State::new()
        };
        let point = Location::parse("-6.3", "106.9").unwrap();

        let changed = state.apply(Change::Location(Some(point))).unwrap();

        assert_eq!(changed, [Field::Location, Field::Longitude]);
        assert_eq!(state.latitude, "-6.30");
        assert_eq!(state.longitude, "106.9");
    }

    #[test]
    fn typed_coordinates_move_map_point_as_pair() {
        let mut state = State::new();

        let changed = state.apply(Change::Latitude("-6.25".into())).unwrap();

        assert_eq!(changed, [Field::Latitude]);
        assert!(state.location.is_none());

        let changed = state.apply(Change::Longitude("106.75".into())).unwrap();

        assert_eq!(changed, [Field::Longitude, Field::Location]);
        assert_eq!(state.location, Location::parse("-6.25", "106.75"));
        assert_eq!(state.latitude, "-6.25");
        assert_eq!(state.longitude, "106.75");

        let changed = state.apply(Change::Latitude("north".into())).unwrap();

        assert_eq!(changed, [Field::Latitude]);
        assert_eq!(state.location, Location::parse("-6.25", "106.75"));
    }

    #[test]
    fn typed_coordinates_override_kelurahan_default() {
        let d1 = district::Id::new();
        let mut state = state_in(d1);
        let k = kelurahan(d1, "-6.2", "106.7");
        _ = state.apply(Change::Kelurahan(Some(k))).unwrap();

        _ = state.apply(Change::Latitude("-6.21".into())).unwrap();

        assert_eq!(state.location, Location::parse("-6.21", "106.7"));
    }

    #[test]
    fn changing_district_keeps_last_location() {
        let d1 = district::Id::new();
        let d2 = district::Id::new();
        let mut state = state_in(d1);
        let s1 = kelurahan(d1, "-6.2", "106.7");
        _ = state.apply(Change::Kelurahan(Some(s1))).unwrap();
        _ = state
            .apply(Change::Location(Location::parse("-6.22", "106.72")))
            .unwrap();

        let changed = state.apply(Change::District(Some(d2))).unwrap();

        assert_eq!(changed, [Field::District, Field::Kelurahan]);
        assert_eq!(state.kelurahan_id, None);
        assert_eq!(state.location, Location::parse("-6.22", "106.72"));
        assert_eq!(state.latitude, "-6.22");
        assert_eq!(state.longitude, "106.72");
    }

    #[test]
    fn loads_existing_facility() {
        let facility = Facility {
            id: facility::Id::new(),
            slug: Slug::new("stadion-a").unwrap(),
            name: facility::Name::new("Stadion A").unwrap(),
            facility_type_id: facility_type::Id::new(),
            is_government_owned: true,
            is_private_owned: false,
            pbg_permit: None,
            capacity: Some(1500),
            employees_count: None,
            land_area: Area::from_str("120.50 m²").unwrap(),
            building_area: Area::from_str("1 ha").unwrap(),
            district_id: district::Id::new(),
            kelurahan_id: None,
            address: facility::Address::new("Jl. Raya 1").unwrap(),
            description: None,
            location: Location::parse("-6.178306", "106.631889").unwrap(),
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        };
        let id = facility.id;

        let state = State::from(facility);

        assert_eq!(state.facility_id, Some(id));
        assert_eq!(state.land_area, "120.5");
        assert_eq!(state.building_area_unit, Some(AreaUnit::Hectares));
        assert_eq!(state.capacity, "1500");
        assert_eq!(state.employees_count, "");
        assert_eq!(state.latitude, "-6.178306");
        assert!(!state.is_kelurahan_disabled());
    }

    #[test]
    fn maps_kelurahan_representation() {
        let id = kelurahan::Id::new();
        let change = Change::<kelurahan::Id>::Kelurahan(Some(id));

        assert_eq!(change.kelurahan(), Some(&id));
        assert_eq!(change.field(), Field::Kelurahan);

        let mapped = change
            .try_map_kelurahan(|_| Err::<Kelurahan, _>("missing"))
            .unwrap_err();
        assert_eq!(mapped, "missing");

        let change = Change::<kelurahan::Id>::Kelurahan(None)
            .try_map_kelurahan(|_| Err::<Kelurahan, _>("missing"))
            .unwrap();
        assert!(matches!(change, Change::Kelurahan(None)));
    }
}
