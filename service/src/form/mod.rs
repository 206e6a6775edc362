//! Editable form of a [`Facility`].
//!
//! A form is an explicit [`State`] owned by a single edit session. Every user
//! input is a [`Change`] of one [`Field`], applied with [`State::apply()`],
//! which synchronously recomputes all the [`Field::dependents()`] before
//! returning. On submission, [`State::validate()`] turns the [`State`] into a
//! [`Draft`] or reports every offending [`Field`] at once.

mod state;
mod validation;

use strum::{Display, EnumString, IntoStaticStr};

#[cfg(doc)]
use crate::domain::{Facility, Kelurahan, Location};

pub use self::{
    state::{Change, ChangeError, State},
    validation::{Draft, Violation, ViolationKind, Violations},
};

/// Field of a [`Facility`] form.
#[derive(
    Clone, Copy, Debug, Display, EnumString, Eq, Hash, IntoStaticStr, PartialEq,
)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    /// Name of the [`Facility`].
    Name,

    /// Slug derived from the [`Field::Name`].
    Slug,

    /// Type of the [`Facility`].
    FacilityType,

    /// Government ownership flag.
    IsGovernmentOwned,

    /// Private ownership flag.
    IsPrivateOwned,

    /// PBG permit number.
    PbgPermit,

    /// Capacity of the [`Facility`].
    Capacity,

    /// Number of employees.
    EmployeesCount,

    /// Land area amount.
    LandArea,

    /// Unit of the [`Field::LandArea`].
    LandAreaUnit,

    /// Building area amount.
    BuildingArea,

    /// Unit of the [`Field::BuildingArea`].
    BuildingAreaUnit,

    /// District the [`Facility`] is located in.
    District,

    /// [`Kelurahan`] the [`Facility`] is located in.
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

impl Field {
    /// Returns [`Field`]s to be recomputed once this [`Field`] changes.
    ///
    /// | Changed field           | Recomputed                             |
    /// |-------------------------|----------------------------------------|
    /// | [`Field::Name`]         | [`Field::Slug`] (while creating)       |
    /// | [`Field::District`]     | [`Field::Kelurahan`] (cleared)         |
    /// | [`Field::Kelurahan`]    | [`Field::Location`] (its default)      |
    /// | [`Field::Location`]     | [`Field::Latitude`], [`Field::Longitude`] |
    /// | [`Field::Latitude`]     | [`Field::Location`] (when both valid)  |
    /// | [`Field::Longitude`]    | [`Field::Location`] (when both valid)  |
    #[must_use]
    pub const fn dependents(self) -> &'static [Self] {
        match self {
            Self::Name => &[Self::Slug],
            Self::District => &[Self::Kelurahan],
            Self::Kelurahan => &[Self::Location],
            Self::Location => &[Self::Latitude, Self::Longitude],
            Self::Latitude | Self::Longitude => &[Self::Location],
            Self::Slug
            | Self::FacilityType
            | Self::IsGovernmentOwned
            | Self::IsPrivateOwned
            | Self::PbgPermit
            | Self::Capacity
            | Self::EmployeesCount
            | Self::LandArea
            | Self::LandAreaUnit
            | Self::BuildingArea
            | Self::BuildingAreaUnit
            | Self::Address
            | Self::Description => &[],
        }
    }
}
