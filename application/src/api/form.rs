//! `Facility` form definitions.

use derive_more::{Display, Error as StdError};
use juniper::{GraphQLEnum, GraphQLInputObject, GraphQLObject};
use service::{command, domain, form, query, read};
use uuid::Uuid;

use crate::{
    api::{self, facility::AreaUnit, map::LocationInput},
    define_error,
    error::FieldViolation,
    AsError, Context, Error,
};

/// State of a `Facility` form during a single edit session.
///
/// Clients keep it between requests and send it back along with every change.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "FacilityFormState")]
pub struct State {
    /// ID of the edited `Facility`, or `null` if a new one is created.
    pub facility_id: Option<api::facility::Id>,

    /// Name of the `Facility`.
    pub name: String,

    /// Slug derived from the `name`, read-only.
    pub slug: Option<api::facility::Slug>,

    /// ID of the selected `FacilityType`.
    pub facility_type_id: Option<api::facility_type::Id>,

    /// Government ownership flag.
    pub is_government_owned: bool,

    /// Private ownership flag.
    pub is_private_owned: bool,

    /// PBG permit number.
    pub pbg_permit: String,

    /// Capacity of the `Facility`.
    pub capacity: String,

    /// Number of employees of the `Facility`.
    pub employees_count: String,

    /// Land area amount.
    pub land_area: String,

    /// Unit of the land area.
    pub land_area_unit: Option<AreaUnit>,

    /// Building area amount.
    pub building_area: String,

    /// Unit of the building area.
    pub building_area_unit: Option<AreaUnit>,

    /// ID of the selected `District`.
    pub district_id: Option<api::district::Id>,

    /// ID of the selected `Kelurahan`.
    pub kelurahan_id: Option<api::kelurahan::Id>,

    /// Indicator whether the `Kelurahan` selector is disabled.
    pub is_kelurahan_disabled: bool,

    /// Full address.
    pub address: String,

    /// Free-text description.
    pub description: String,

    /// Point picked on the map.
    pub location: Option<api::map::Location>,

    /// Latitude as typed.
    pub latitude: String,

    /// Longitude as typed.
    pub longitude: String,
}

impl From<form::State> for State {
    fn from(state: form::State) -> Self {
        let is_kelurahan_disabled = state.is_kelurahan_disabled();
        let form::State {
            facility_id,
            name,
            slug,
            facility_type_id,
            is_government_owned,
            is_private_owned,
            pbg_permit,
            capacity,
            employees_count,
            land_area,
            land_area_unit,
            building_area,
            building_area_unit,
            district_id,
            kelurahan_id,
            address,
            description,
            location,
            latitude,
            longitude,
        } = state;

        Self {
            facility_id: facility_id.map(Into::into),
            name,
            slug: slug.map(Into::into),
            facility_type_id: facility_type_id.map(Into::into),
            is_government_owned,
            is_private_owned,
            pbg_permit,
            capacity,
            employees_count,
            land_area,
            land_area_unit: land_area_unit.map(Into::into),
            building_area,
            building_area_unit: building_area_unit.map(Into::into),
            district_id: district_id.map(Into::into),
            kelurahan_id: kelurahan_id.map(Into::into),
            is_kelurahan_disabled,
            address,
            description,
            location: location.map(Into::into),
            latitude,
            longitude,
        }
    }
}

/// State of a `Facility` form, as sent back by a client.
///
/// Omitted text fields are empty.
#[derive(Clone, Debug, Default, GraphQLInputObject)]
#[graphql(name = "FacilityFormStateInput")]
pub struct StateInput {
    /// ID of the edited `Facility`, or `null` if a new one is created.
    pub facility_id: Option<api::facility::Id>,

    /// Name of the `Facility`.
    #[graphql(default)]
    pub name: String,

    /// Slug of the `Facility`, as previously returned by the server.
    pub slug: Option<api::facility::Slug>,

    /// ID of the selected `FacilityType`.
    pub facility_type_id: Option<api::facility_type::Id>,

    /// Government ownership flag.
    #[graphql(default)]
    pub is_government_owned: bool,

    /// Private ownership flag.
    #[graphql(default)]
    pub is_private_owned: bool,

    /// PBG permit number.
    #[graphql(default)]
    pub pbg_permit: String,

    /// Capacity of the `Facility`.
    #[graphql(default)]
    pub capacity: String,

    /// Number of employees of the `Facility`.
    #[graphql(default)]
    pub employees_count: String,

    /// Land area amount.
    #[graphql(default)]
    pub land_area: String,

    /// Unit of the land area.
    pub land_area_unit: Option<AreaUnit>,

    /// Building area amount.
    #[graphql(default)]
    pub building_area: String,

    /// Unit of the building area.
    pub building_area_unit: Option<AreaUnit>,

    /// ID of the selected `District`.
    pub district_id: Option<api::district::Id>,

    /// ID of the selected `Kelurahan`.
    pub kelurahan_id: Option<api::kelurahan::Id>,

    /// Full address.
    #[graphql(default)]
    pub address: String,

    /// Free-text description.
    #[graphql(default)]
    pub description: String,

    /// Point picked on the map.
    pub location: Option<LocationInput>,

    /// Latitude as typed.
    #[graphql(default)]
    pub latitude: String,

    /// Longitude as typed.
    #[graphql(default)]
    pub longitude: String,
}

impl From<StateInput> for form::State {
    fn from(input: StateInput) -> Self {
        let StateInput {
            facility_id,
            name,
            slug,
            facility_type_id,
            is_government_owned,
            is_private_owned,
            pbg_permit,
            capacity,
            employees_count,
            land_area,
            land_area_unit,
            building_area,
            building_area_unit,
            district_id,
            kelurahan_id,
            address,
            description,
            location,
            latitude,
            longitude,
        } = input;

        Self {
            facility_id: facility_id.map(Into::into),
            name,
            slug: slug.map(Into::into),
            facility_type_id: facility_type_id.map(Into::into),
            is_government_owned,
            is_private_owned,
            pbg_permit,
            capacity,
            employees_count,
            land_area,
            land_area_unit: land_area_unit.map(Into::into),
            building_area,
            building_area_unit: building_area_unit.map(Into::into),
            district_id: district_id.map(Into::into),
            kelurahan_id: kelurahan_id.map(Into::into),
            address,
            description,
            location: location.map(Into::into),
            latitude,
            longitude,
        }
    }
}

/// Field of a `Facility` form.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "FacilityFormField")]
pub enum Field {
    /// Name of the `Facility`.
    Name,

    /// Slug derived from the name.
    Slug,

    /// Type of the `Facility`.
    FacilityType,

    /// Government ownership flag.
    IsGovernmentOwned,

    /// Private ownership flag.
    IsPrivateOwned,

    /// PBG permit number.
    PbgPermit,

    /// Capacity of the `Facility`.
    Capacity,

    /// Number of employees.
    EmployeesCount,

    /// Land area amount.
    LandArea,

    /// Unit of the land area.
    LandAreaUnit,

    /// Building area amount.
    BuildingArea,

    /// Unit of the building area.
    BuildingAreaUnit,

    /// `District` the `Facility` is located in.
    District,

    /// `Kelurahan` the `Facility` is located in.
    Kelurahan,

    /// Full address.
    Address,

    /// Free-text description.
    Description,

    /// Point picked on the map.
    Location,

    /// Latitude typed by hand.
    Latitude,

    /// Longitude typed by hand.
    Longitude,
}

impl From<form::Field> for Field {
    fn from(field: form::Field) -> Self {
        use form::Field as F;
        match field {
            F::Name => Self::Name,
            F::Slug => Self::Slug,
            F::FacilityType => Self::FacilityType,
            F::IsGovernmentOwned => Self::IsGovernmentOwned,
            F::IsPrivateOwned => Self::IsPrivateOwned,
            F::PbgPermit => Self::PbgPermit,
            F::Capacity => Self::Capacity,
            F::EmployeesCount => Self::EmployeesCount,
            F::LandArea => Self::LandArea,
            F::LandAreaUnit => Self::LandAreaUnit,
            F::BuildingArea => Self::BuildingArea,
            F::BuildingAreaUnit => Self::BuildingAreaUnit,
            F::District => Self::District,
            F::Kelurahan => Self::Kelurahan,
            F::Address => Self::Address,
            F::Description => Self::Description,
            F::Location => Self::Location,
            F::Latitude => Self::Latitude,
            F::Longitude => Self::Longitude,
        }
    }
}

/// Change of a single `FacilityFormField`.
///
/// Only the value matching the `field` is used:
/// - `text` for text fields, `null` clears them;
/// - `flag` for ownership flags, required;
/// - `id` for `FacilityType`, `District` and `Kelurahan` selectors, `null`
///   clears the selection;
/// - `unit` for area units;
/// - `location` for the map point.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "FacilityFormChangeInput")]
pub struct ChangeInput {
    /// Changed `FacilityFormField`.
    pub field: Field,

    /// New value of a text field.
    pub text: Option<String>,

    /// New value of an ownership flag.
    pub flag: Option<bool>,

    /// ID of the newly selected entity.
    pub id: Option<Uuid>,

    /// New area unit.
    pub unit: Option<AreaUnit>,

    /// New point picked on the map.
    pub location: Option<LocationInput>,
}

impl TryFrom<ChangeInput> for form::Change<domain::kelurahan::Id> {
    type Error = ChangeInputError;

    fn try_from(input: ChangeInput) -> Result<Self, Self::Error> {
        let ChangeInput {
            field,
            text,
            flag,
            id,
            unit,
            location,
        } = input;
        let text = text.unwrap_or_default();
        let flag = || flag.ok_or(ChangeInputError::MissingFlag);

        Ok(match field {
            Field::Name => Self::Name(text),
            Field::Slug => return Err(ChangeInputError::ReadOnly),
            Field::FacilityType => Self::FacilityType(id.map(Into::into)),
            Field::IsGovernmentOwned => Self::IsGovernmentOwned(flag()?),
            Field::IsPrivateOwned => Self::IsPrivateOwned(flag()?),
            Field::PbgPermit => Self::PbgPermit(text),
            Field::Capacity => Self::Capacity(text),
            Field::EmployeesCount => Self::EmployeesCount(text),
            Field::LandArea => Self::LandArea(text),
            Field::LandAreaUnit => Self::LandAreaUnit(unit.map(Into::into)),
            Field::BuildingArea => Self::BuildingArea(text),
            Field::BuildingAreaUnit => {
                Self::BuildingAreaUnit(unit.map(Into::into))
            }
            Field::District => Self::District(id.map(Into::into)),
            Field::Kelurahan => Self::Kelurahan(id.map(Into::into)),
            Field::Address => Self::Address(text),
            Field::Description => Self::Description(text),
            Field::Location => Self::Location(location.map(Into::into)),
            Field::Latitude => Self::Latitude(text),
            Field::Longitude => Self::Longitude(text),
        })
    }
}

/// Error of converting a [`ChangeInput`] into a [`form::Change`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, StdError)]
pub enum ChangeInputError {
    /// Ownership flag change without a `flag` value.
    #[display("`flag` must be provided for ownership flags")]
    MissingFlag,

    /// Change of a field that cannot be changed directly.
    #[display("`slug` is derived from `name` and cannot be changed")]
    ReadOnly,
}

impl AsError for ChangeInputError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "MISSING_CHANGE_VALUE"]
                #[status = BAD_REQUEST]
                #[message = "`flag` must be provided for ownership flags"]
                MissingFlag,

                #[code = "FIELD_NOT_EDITABLE"]
                #[status = BAD_REQUEST]
                #[message = "`slug` is derived from `name` and cannot be \
                             changed"]
                ReadOnly,
            }
        }

        Some(match self {
            Self::MissingFlag => Error::MissingFlag.into(),
            Self::ReadOnly => Error::ReadOnly.into(),
        })
    }
}

/// Result of applying a change to a `FacilityFormState`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "FacilityFormApplied")]
pub struct Applied {
    /// New `FacilityFormState`.
    pub state: State,

    /// `FacilityFormField`s changed, in the order they were changed,
    /// starting with the directly changed one.
    pub changed: Vec<Field>,
}

impl From<read::form::Applied> for Applied {
    fn from(applied: read::form::Applied) -> Self {
        Self {
            state: applied.state.into(),
            changed: applied.changed.into_iter().map(Into::into).collect(),
        }
    }
}

/// Options to choose from in a `FacilityFormState`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "FacilityFormOptions", context = Context)]
pub struct Options {
    /// `FacilityType`s ordered by name.
    pub facility_types: Vec<api::FacilityType>,

    /// `District`s ordered by name.
    pub districts: Vec<api::District>,

    /// `Kelurahan`s of the selected `District` ordered by name.
    ///
    /// Empty if no `District` is selected.
    pub kelurahans: Vec<api::Kelurahan>,

    /// Indicator whether the `Kelurahan` selector is disabled.
    pub is_kelurahan_disabled: bool,
}

impl From<read::form::Options> for Options {
    fn from(options: read::form::Options) -> Self {
        let read::form::Options {
            facility_types,
            districts,
            kelurahans,
            is_kelurahan_disabled,
        } = options;

        Self {
            facility_types: facility_types
                .into_iter()
                .map(Into::into)
                .collect(),
            districts: districts.into_iter().map(Into::into).collect(),
            kelurahans: kelurahans.into_iter().map(Into::into).collect(),
            is_kelurahan_disabled,
        }
    }
}

impl AsError for form::Violations {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error {
            code: "VALIDATION_FAILED",
            status_code: http::StatusCode::BAD_REQUEST,
            message: "Submitted `FacilityFormState` has invalid fields"
                .to_owned(),
            fields: self
                .as_slice()
                .iter()
                .map(|v| FieldViolation {
                    field: v.field.into(),
                    message: v.kind.to_string(),
                })
                .collect(),
            backtrace: None,
        })
    }
}

impl AsError for form::ChangeError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "KELURAHAN_NOT_IN_DISTRICT"]
                #[status = BAD_REQUEST]
                #[message = "`Kelurahan` doesn't belong to the selected \
                             `District`"]
                KelurahanNotInDistrict,
            }
        }

        match self {
            Self::KelurahanNotInDistrict { .. } => {
                Some(Error::KelurahanNotInDistrict.into())
            }
        }
    }
}

impl AsError for query::form::ApplyChangeError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Kelurahan(e) => e.try_as_error(),
            Self::KelurahanNotExists(_) => {
                Some(api::kelurahan::KelurahanError::NotExists.into())
            }
        }
    }
}

impl AsError for query::form::EditError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::FacilityNotExists(_) => {
                Some(api::facility::FacilityError::NotExists.into())
            }
        }
    }
}

impl AsError for command::create_facility::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Invalid(v) => v.try_as_error(),
            Self::Kelurahan(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_facility::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::FacilityNotExists(_) => {
                Some(api::facility::FacilityError::NotExists.into())
            }
            Self::Invalid(v) => v.try_as_error(),
            Self::Kelurahan(e) => e.try_as_error(),
        }
    }
}
