//! Validation of a submitted [`State`].

use std::{fmt, str::FromStr};

use common::Area;
use derive_more::{Display, Error};
use itertools::Itertools as _;
use rust_decimal::Decimal;

use crate::domain::{
    district, facility, facility_type, kelurahan, location::CoordinateError,
    Latitude, Location, Longitude, Slug,
};
#[cfg(doc)]
use crate::domain::Facility;

use super::{Field, State};

/// Validated data of a [`Facility`] to be saved.
#[derive(Clone, Debug)]
pub struct Draft {
    /// [`Slug`] of the [`Facility`].
    pub slug: Slug,

    /// Name of the [`Facility`].
    pub name: facility::Name,

    /// ID of the facility type.
    pub facility_type_id: facility_type::Id,

    /// Government ownership flag.
    pub is_government_owned: bool,

    /// Private ownership flag.
    pub is_private_owned: bool,

    /// PBG permit number, if any.
    pub pbg_permit: Option<facility::PbgPermit>,

    /// Capacity, if known.
    pub capacity: Option<facility::Capacity>,

    /// Number of employees, if known.
    pub employees_count: Option<facility::EmployeesCount>,

    /// Land [`Area`].
    pub land_area: Area,

    /// Building [`Area`].
    pub building_area: Area,

    /// ID of the district.
    pub district_id: district::Id,

    /// ID of the kelurahan, if any.
    pub kelurahan_id: Option<kelurahan::Id>,

    /// Full address.
    pub address: facility::Address,

    /// Description, if any.
    pub description: Option<facility::Description>,

    /// [`Location`] of the [`Facility`].
    pub location: Location,
}

impl State {
    /// Validates this [`State`] for submission.
    ///
    /// Latitude and longitude are taken from the typed fields, which are kept
    /// in sync with the map point.
    ///
    /// # Errors
    ///
    /// With all the found [`Violations`], if any.
    pub fn validate(&self) -> Result<Draft, Violations> {
        let mut v = Violations::default();

        let name = required_text(
            &mut v,
            Field::Name,
            &self.name,
            |s| facility::Name::new(s),
            facility::Name::MAX_LEN,
        );

        let slug = if self.facility_id.is_some() {
            self.slug.clone().or_else(|| {
                v.push(Field::Slug, ViolationKind::Required);
                None
            })
        } else if name.is_some() {
            Slug::derive(&self.name).or_else(|| {
                v.push(Field::Slug, ViolationKind::Invalid);
                None
            })
        } else {
            None
        };

        let facility_type_id = self.facility_type_id.or_else(|| {
            v.push(Field::FacilityType, ViolationKind::Required);
            None
        });

        let pbg_permit = optional_text(
            &mut v,
            Field::PbgPermit,
            &self.pbg_permit,
            |s| facility::PbgPermit::new(s),
            facility::PbgPermit::MAX_LEN,
        );
        let capacity = count(&mut v, Field::Capacity, &self.capacity);
        let employees_count =
            count(&mut v, Field::EmployeesCount, &self.employees_count);

        let land_area = area(
            &mut v,
            (Field::LandArea, &self.land_area),
            (Field::LandAreaUnit, self.land_area_unit),
        );
        let building_area = area(
            &mut v,
            (Field::BuildingArea, &self.building_area),
            (Field::BuildingAreaUnit, self.building_area_unit),
        );

        let district_id = self.district_id.or_else(|| {
            v.push(Field::District, ViolationKind::Required);
            None
        });

        let address = required_text(
            &mut v,
            Field::Address,
            &self.address,
            |s| facility::Address::new(s),
            facility::Address::MAX_LEN,
        );
        let description = optional_text(
            &mut v,
            Field::Description,
            &self.description,
            |s| facility::Description::new(s),
            facility::Description::MAX_LEN,
        );

        let latitude =
            coordinate::<Latitude>(&mut v, Field::Latitude, &self.latitude);
        let longitude =
            coordinate::<Longitude>(&mut v, Field::Longitude, &self.longitude);

        match (
            slug,
            name,
            facility_type_id,
            pbg_permit,
            capacity,
            employees_count,
            land_area,
            building_area,
            district_id,
            address,
            description,
            latitude,
            longitude,
        ) {
            (
                Some(slug),
                Some(name),
                Some(facility_type_id),
                Some(pbg_permit),
                Some(capacity),
                Some(employees_count),
                Some(land_area),
                Some(building_area),
                Some(district_id),
                Some(address),
                Some(description),
                Some(latitude),
                Some(longitude),
            ) if v.is_empty() => Ok(Draft {
                slug,
                name,
                facility_type_id,
                is_government_owned: self.is_government_owned,
                is_private_owned: self.is_private_owned,
                pbg_permit,
                capacity,
                employees_count,
                land_area,
                building_area,
                district_id,
                kelurahan_id: self.kelurahan_id,
                address,
                description,
                location: Location {
                    latitude,
                    longitude,
                },
            }),
            _ => Err(v),
        }
    }
}

/// Validates a required text field.
fn required_text<T>(
    v: &mut Violations,
    field: Field,
    input: &str,
    new: impl FnOnce(&str) -> Option<T>,
    max_len: usize,
) -> Option<T> {
    let input = input.trim();
    if input.is_empty() {
        v.push(field, ViolationKind::Required);
        return None;
    }
    if input.chars().count() > max_len {
        v.push(field, ViolationKind::TooLong { max: max_len });
        return None;
    }
    new(input).or_else(|| {
        v.push(field, ViolationKind::Invalid);
        None
    })
}

/// Validates an optional text field.
///
/// Blank input means no value, so `Some(None)` is returned for it.
fn optional_text<T>(
    v: &mut Violations,
    field: Field,
    input: &str,
    new: impl FnOnce(&str) -> Option<T>,
    max_len: usize,
) -> Option<Option<T>> {
    if input.trim().is_empty() {
        return Some(None);
    }
    required_text(v, field, input, new, max_len).map(Some)
}

/// Validates an optional non-negative integer field.
fn count(v: &mut Violations, field: Field, input: &str) -> Option<Option<u32>> {
    let input = input.trim();
    if input.is_empty() {
        return Some(None);
    }
    match input.parse::<i64>() {
        Ok(n) if n < 0 => {
            v.push(field, ViolationKind::Negative);
            None
        }
        Ok(n) => {
            if let Ok(n) = u32::try_from(n) {
                Some(Some(n))
            } else {
                v.push(field, ViolationKind::OutOfRange);
                None
            }
        }
        Err(_) => {
            v.push(field, ViolationKind::Invalid);
            None
        }
    }
}

/// Validates a required non-negative [`Area`] with its unit.
fn area(
    v: &mut Violations,
    (amount_field, amount): (Field, &str),
    (unit_field, unit): (Field, Option<common::AreaUnit>),
) -> Option<Area> {
    let amount = amount.trim();
    let amount = if amount.is_empty() {
        v.push(amount_field, ViolationKind::Required);
        None
    } else {
        match Decimal::from_str(amount) {
            Ok(a) if a.is_sign_negative() && !a.is_zero() => {
                v.push(amount_field, ViolationKind::Negative);
                None
            }
            Ok(a) => Some(a),
            Err(_) => {
                v.push(amount_field, ViolationKind::Invalid);
                None
            }
        }
    };
    let unit = unit.or_else(|| {
        v.push(unit_field, ViolationKind::Required);
        None
    });

    Area::new(amount?, unit?)
}

/// Validates a required coordinate field.
fn coordinate<C>(v: &mut Violations, field: Field, input: &str) -> Option<C>
where
    C: FromStr<Err = CoordinateError>,
{
    let input = input.trim();
    if input.is_empty() {
        v.push(field, ViolationKind::Required);
        return None;
    }
    input
        .parse()
        .map_err(|e| {
            v.push(
                field,
                match e {
                    CoordinateError::Invalid => ViolationKind::Invalid,
                    CoordinateError::OutOfRange => ViolationKind::OutOfRange,
                },
            );
        })
        .ok()
}

/// Single violation of a [`Field`] value.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[display("`{field}` {kind}")]
pub struct Violation {
    /// Violated [`Field`].
    pub field: Field,

    /// [`ViolationKind`] describing what's wrong.
    pub kind: ViolationKind,
}

/// Kind of a [`Violation`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ViolationKind {
    /// Value is missing.
    #[display("is required")]
    Required,

    /// Value has a wrong format.
    #[display("is invalid")]
    Invalid,

    /// Value is negative.
    #[display("must not be negative")]
    Negative,

    /// Value is too long.
    #[display("must not be longer than {max} characters")]
    TooLong {
        /// Maximum allowed number of characters.
        max: usize,
    },

    /// Value is out of the allowed range.
    #[display("is out of range")]
    OutOfRange,

    /// Value is already taken.
    #[display("is already taken")]
    NotUnique,

    /// Referenced entity doesn't exist.
    #[display("refers to a non-existent entity")]
    NotExists,
}

/// Non-empty collection of [`Violation`]s.
#[derive(Clone, Debug, Default, Eq, Error, PartialEq)]
pub struct Violations(#[error(not(source))] Vec<Violation>);

impl Violations {
    /// Records a new [`Violation`].
    pub fn push(&mut self, field: Field, kind: ViolationKind) {
        self.0.push(Violation { field, kind });
    }

    /// Indicates whether no [`Violation`]s have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the recorded [`Violation`]s.
    #[must_use]
    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    /// Returns an [`Err`] with these [`Violations`] if any have been
    /// recorded.
    ///
    /// # Errors
    ///
    /// If any [`Violation`]s have been recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Violation> for Violations {
    fn from(violation: Violation) -> Self {
        Self(vec![violation])
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().format("; "))
    }
}

#[cfg(test)]
mod spec {
    use common::AreaUnit;

    use crate::domain::{district, facility, facility_type, Location, Slug};

    use super::{Field, State, Violation, ViolationKind};

    fn valid() -> State {
        State {
            name: "Stadion A".into(),
            slug: Slug::new("stadion-a"),
            facility_type_id: Some(facility_type::Id::new()),
            land_area: "120.5".into(),
            building_area: "80".into(),
            district_id: Some(district::Id::new()),
            address: "Jl. Raya Cipondoh No. 1".into(),
            latitude: "-6.178306".into(),
            longitude: "106.631889".into(),
            ..State::new()
        }
    }

    fn violations(state: &State) -> Vec<Violation> {
        state.validate().unwrap_err().as_slice().to_vec()
    }

    #[test]
    fn accepts_minimal_facility() {
        let draft = valid().validate().unwrap();

        assert_eq!(draft.slug.as_ref(), "stadion-a");
        assert_eq!(draft.name.as_ref(), "Stadion A");
        assert_eq!(draft.land_area.to_string(), "120.5 m²");
        assert_eq!(draft.building_area.to_string(), "80 m²");
        assert_eq!(draft.kelurahan_id, None);
        assert_eq!(draft.capacity, None);
        assert_eq!(draft.pbg_permit, None);
        assert_eq!(
            draft.location,
            Location::parse("-6.178306", "106.631889").unwrap(),
        );
    }

    #[test]
    fn reports_every_missing_field() {
        let v = violations(&State::new());

        let required = |field| Violation {
            field,
            kind: ViolationKind::Required,
        };
        assert_eq!(
            v,
            [
                required(Field::Name),
                required(Field::FacilityType),
                required(Field::LandArea),
                required(Field::BuildingArea),
                required(Field::District),
                required(Field::Address),
                required(Field::Latitude),
                required(Field::Longitude),
            ],
        );
    }

    #[test]
    fn rejects_negative_areas() {
        let state = State {
            land_area: "-0.01".into(),
            building_area: "-5".into(),
            ..valid()
        };

        assert_eq!(
            violations(&state),
            [
                Violation {
                    field: Field::LandArea,
                    kind: ViolationKind::Negative,
                },
                Violation {
                    field: Field::BuildingArea,
                    kind: ViolationKind::Negative,
                },
            ],
        );

        let zero = State {
            land_area: "0".into(),
            building_area: "0.00".into(),
            ..valid()
        };
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn requires_area_units() {
        let state = State {
            land_area_unit: None,
            building_area_unit: Some(AreaUnit::Hectares),
            ..valid()
        };

        assert_eq!(
            violations(&state),
            [Violation {
                field: Field::LandAreaUnit,
                kind: ViolationKind::Required,
            }],
        );
    }

    #[test]
    fn keeps_units_independent() {
        let state = State {
            land_area_unit: Some(AreaUnit::Hectares),
            building_area_unit: Some(AreaUnit::SquareFeet),
            ..valid()
        };

        let draft = state.validate().unwrap();

        assert_eq!(draft.land_area.to_string(), "120.5 ha");
        assert_eq!(draft.building_area.to_string(), "80 ft²");
    }

    #[test]
    fn validates_counts() {
        let state = State {
            capacity: "-1".into(),
            employees_count: "a dozen".into(),
            ..valid()
        };

        assert_eq!(
            violations(&state),
            [
                Violation {
                    field: Field::Capacity,
                    kind: ViolationKind::Negative,
                },
                Violation {
                    field: Field::EmployeesCount,
                    kind: ViolationKind::Invalid,
                },
            ],
        );

        let state = State {
            capacity: " 2500 ".into(),
            employees_count: "0".into(),
            ..valid()
        };
        let draft = state.validate().unwrap();
        assert_eq!(draft.capacity, Some(2500));
        assert_eq!(draft.employees_count, Some(0));
    }

    #[test]
    fn validates_coordinates() {
        let state = State {
            latitude: "-91".into(),
            longitude: "east".into(),
            ..valid()
        };

        assert_eq!(
            violations(&state),
            [
                Violation {
                    field: Field::Latitude,
                    kind: ViolationKind::OutOfRange,
                },
                Violation {
                    field: Field::Longitude,
                    kind: ViolationKind::Invalid,
                },
            ],
        );
    }

    #[test]
    fn validates_lengths() {
        let state = State {
            name: "a".repeat(256),
            pbg_permit: "p".repeat(256),
            ..valid()
        };

        assert_eq!(
            violations(&state),
            [
                Violation {
                    field: Field::Name,
                    kind: ViolationKind::TooLong { max: 255 },
                },
                Violation {
                    field: Field::PbgPermit,
                    kind: ViolationKind::TooLong { max: 255 },
                },
            ],
        );
    }

    #[test]
    fn derives_slug_only_while_creating() {
        let state = State {
            name: "Lapangan Futsal".into(),
            slug: None,
            ..valid()
        };
        assert_eq!(state.validate().unwrap().slug.as_ref(), "lapangan-futsal");

        let state = State {
            facility_id: Some(facility::Id::new()),
            name: "Lapangan Futsal".into(),
            slug: Slug::new("stadion-a"),
            ..valid()
        };
        assert_eq!(state.validate().unwrap().slug.as_ref(), "stadion-a");

        let state = State {
            name: "!!!".into(),
            ..valid()
        };
        assert_eq!(
            violations(&state),
            [Violation {
                field: Field::Slug,
                kind: ViolationKind::Invalid,
            }],
        );
    }

    #[test]
    fn trims_text_inputs() {
        let state = State {
            name: "  Stadion A  ".into(),
            description: "   ".into(),
            pbg_permit: " PBG-01 ".into(),
            ..valid()
        };

        let draft = state.validate().unwrap();

        assert_eq!(draft.name.as_ref(), "Stadion A");
        assert_eq!(draft.description, None);
        assert_eq!(draft.pbg_permit.unwrap().as_ref(), "PBG-01");
    }

    #[test]
    fn displays_violations() {
        let v = violations(&State {
            name: String::new(),
            land_area: "-1".into(),
            ..valid()
        });

        assert_eq!(
            super::Violations::from(v[0]).to_string(),
            "`name` is required",
        );
        assert_eq!(v[1].to_string(), "`land_area` must not be negative");
    }
}
