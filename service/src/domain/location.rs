//! [`Location`] definitions.

use std::str::FromStr;

use derive_more::{Display, Error, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Geographic point on a map.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("{latitude}, {longitude}")]
pub struct Location {
    /// [`Latitude`] of this [`Location`].
    pub latitude: Latitude,

    /// [`Longitude`] of this [`Location`].
    pub longitude: Longitude,
}

impl Location {
    /// Parses a [`Location`] out of the provided textual coordinates.
    ///
    /// [`None`] is returned if any of them is not a valid coordinate.
    #[must_use]
    pub fn parse(latitude: &str, longitude: &str) -> Option<Self> {
        Some(Self {
            latitude: latitude.trim().parse().ok()?,
            longitude: longitude.trim().parse().ok()?,
        })
    }
}

/// Latitude of a [`Location`] in degrees.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Latitude(Decimal);

impl Latitude {
    /// Creates a new [`Latitude`] if the provided `degrees` are within
    /// `-90..=90` range.
    #[must_use]
    pub fn new(degrees: Decimal) -> Option<Self> {
        (Decimal::from(-90)..=Decimal::from(90))
            .contains(&degrees)
            .then_some(Self(degrees))
    }
}

impl FromStr for Latitude {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let degrees =
            Decimal::from_str(s).map_err(|_| CoordinateError::Invalid)?;
        Self::new(degrees).ok_or(CoordinateError::OutOfRange)
    }
}

/// Longitude of a [`Location`] in degrees.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Longitude(Decimal);

impl Longitude {
    /// Creates a new [`Longitude`] if the provided `degrees` are within
    /// `-180..=180` range.
    #[must_use]
    pub fn new(degrees: Decimal) -> Option<Self> {
        (Decimal::from(-180)..=Decimal::from(180))
            .contains(&degrees)
            .then_some(Self(degrees))
    }
}

impl FromStr for Longitude {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let degrees =
            Decimal::from_str(s).map_err(|_| CoordinateError::Invalid)?;
        Self::new(degrees).ok_or(CoordinateError::OutOfRange)
    }
}

/// Error of parsing a [`Latitude`] or a [`Longitude`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum CoordinateError {
    /// Not a decimal number.
    #[display("not a decimal number")]
    Invalid,

    /// Decimal number out of the allowed range.
    #[display("out of range")]
    OutOfRange,
}

#[cfg(test)]
mod spec {
    use super::{CoordinateError, Latitude, Location, Longitude};

    #[test]
    fn latitude_range() {
        assert!("-90".parse::<Latitude>().is_ok());
        assert!("90".parse::<Latitude>().is_ok());
        assert_eq!(
            "90.000001".parse::<Latitude>(),
            Err(CoordinateError::OutOfRange),
        );
        assert_eq!("north".parse::<Latitude>(), Err(CoordinateError::Invalid));
    }

    #[test]
    fn longitude_range() {
        assert!("-180".parse::<Longitude>().is_ok());
        assert!("106.631889".parse::<Longitude>().is_ok());
        assert_eq!(
            "-180.5".parse::<Longitude>(),
            Err(CoordinateError::OutOfRange),
        );
    }

    #[test]
    fn parses_pair() {
        let loc = Location::parse(" -6.178306 ", "106.631889").unwrap();

        assert_eq!(loc.to_string(), "-6.178306, 106.631889");
        assert!(Location::parse("-6.178306", "").is_none());
        assert!(Location::parse("", "106.631889").is_none());
    }

    #[test]
    fn compares_by_value() {
        assert_eq!(
            "-6.10".parse::<Latitude>().unwrap(),
            "-6.1".parse::<Latitude>().unwrap(),
        );
    }
}
