//! [`Facility`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, Area, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{district, facility_type, kelurahan, Location, Slug};
#[cfg(doc)]
use super::{District, FacilityType, Kelurahan};

/// Sports facility.
#[derive(Clone, Debug)]
pub struct Facility {
    /// ID of this [`Facility`].
    pub id: Id,

    /// [`Slug`] of this [`Facility`].
    ///
    /// Derived from the [`Name`] once, when this [`Facility`] is created.
    pub slug: Slug,

    /// [`Name`] of this [`Facility`].
    pub name: Name,

    /// ID of the [`FacilityType`] of this [`Facility`].
    pub facility_type_id: facility_type::Id,

    /// Indicator whether this [`Facility`] is owned by the government.
    pub is_government_owned: bool,

    /// Indicator whether this [`Facility`] is owned privately.
    pub is_private_owned: bool,

    /// [`PbgPermit`] of this [`Facility`], if any.
    pub pbg_permit: Option<PbgPermit>,

    /// [`Capacity`] of this [`Facility`], if known.
    pub capacity: Option<Capacity>,

    /// Number of employees of this [`Facility`], if known.
    pub employees_count: Option<EmployeesCount>,

    /// Land [`Area`] of this [`Facility`].
    pub land_area: Area,

    /// Building [`Area`] of this [`Facility`].
    pub building_area: Area,

    /// ID of the [`District`] this [`Facility`] is located in.
    pub district_id: district::Id,

    /// ID of the [`Kelurahan`] this [`Facility`] is located in, if any.
    ///
    /// Always belongs to the [`District`] of this [`Facility`].
    pub kelurahan_id: Option<kelurahan::Id>,

    /// [`Address`] of this [`Facility`].
    pub address: Address,

    /// [`Description`] of this [`Facility`], if any.
    pub description: Option<Description>,

    /// [`Location`] of this [`Facility`].
    pub location: Location,

    /// [`DateTime`] when this [`Facility`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Facility`] was modified the last time.
    pub updated_at: ModificationDateTime,
}

/// ID of a [`Facility`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Name of a [`Facility`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(str)]
pub struct Name(String);

impl Name {
    /// Maximum length of a [`Name`] in characters.
    pub const MAX_LEN: usize = 255;

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name
            && !name.is_empty()
            && name.chars().count() <= Self::MAX_LEN
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// PBG (building approval) permit number of a [`Facility`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(str)]
pub struct PbgPermit(String);

impl PbgPermit {
    /// Maximum length of a [`PbgPermit`] in characters.
    pub const MAX_LEN: usize = 255;

    /// Creates a new [`PbgPermit`] if the given `permit` is valid.
    #[must_use]
    pub fn new(permit: impl Into<String>) -> Option<Self> {
        let permit = permit.into();
        Self::check(&permit).then_some(Self(permit))
    }

    /// Checks whether the given `permit` is a valid [`PbgPermit`].
    fn check(permit: impl AsRef<str>) -> bool {
        let permit = permit.as_ref();
        permit.trim() == permit
            && !permit.is_empty()
            && permit.chars().count() <= Self::MAX_LEN
    }
}

impl FromStr for PbgPermit {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `PbgPermit`")
    }
}

/// Capacity (number of visitors) of a [`Facility`].
pub type Capacity = u32;

/// Number of employees of a [`Facility`].
pub type EmployeesCount = u32;

/// Full address of a [`Facility`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(str)]
pub struct Address(String);

impl Address {
    /// Maximum length of an [`Address`] in characters.
    pub const MAX_LEN: usize = 1024;

    /// Creates a new [`Address`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Address`].
    fn check(address: impl AsRef<str>) -> bool {
        let address = address.as_ref();
        address.trim() == address
            && !address.is_empty()
            && address.chars().count() <= Self::MAX_LEN
    }
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Address`")
    }
}

/// Free-text description of a [`Facility`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(str)]
pub struct Description(String);

impl Description {
    /// Maximum length of a [`Description`] in characters.
    pub const MAX_LEN: usize = 65535;

    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Description`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        text.trim() == text
            && !text.is_empty()
            && text.chars().count() <= Self::MAX_LEN
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// [`DateTime`] when a [`Facility`] was created.
pub type CreationDateTime = DateTimeOf<(Facility, unit::Creation)>;

/// [`DateTime`] when a [`Facility`] was modified the last time.
pub type ModificationDateTime = DateTimeOf<(Facility, unit::Modification)>;
